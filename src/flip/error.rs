use crate::units::Real;

/// Errors detected while reading or validating a [`super::SimulationConfig`].
///
/// All of these are fatal, a simulation is never created from an invalid configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("grid dimension {axis} needs to be positive")]
    NonPositiveGridDimension { axis: char },

    #[error("{field} needs to be positive and finite, got {value}")]
    NonPositiveValue { field: &'static str, value: Real },

    #[error("{field} must not be negative, got {value}")]
    NegativeValue { field: &'static str, value: Real },

    #[error("{field} needs to be finite, got {value}")]
    NonFiniteValue { field: &'static str, value: Real },

    #[error("at least one pressure grid level is required")]
    NoGridLevels,

    #[error("{field} ({x}, {y}, {z}) lies outside of the {size_x}x{size_y}x{size_z} grid")]
    CellOutOfGrid {
        field: &'static str,
        x: usize,
        y: usize,
        z: usize,
        size_x: usize,
        size_y: usize,
        size_z: usize,
    },

    #[error("{field} has min corner above max corner")]
    InvertedBox { field: &'static str },

    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
