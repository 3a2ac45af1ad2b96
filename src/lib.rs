pub mod flip;
pub mod units;
