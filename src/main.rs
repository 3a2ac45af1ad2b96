use anyhow::Context;
use cgmath::prelude::*;
use std::time::{Duration, Instant};

use yaflip3d::flip::*;
use yaflip3d::units::*;

// Processing time per update after which the simulation gives up on keeping up with real time.
const MAX_ALLOWED_SIM_PROCESSING_TIME: Duration = Duration::from_millis(100);

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    microprofile::init!();
    microprofile::set_enable_all_groups!(true);

    // yaflip3d [config.toml] [ticks]
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimulationConfig::load(&path).with_context(|| format!("failed to load configuration {}", path))?,
        None => SimulationConfig::default(),
    };
    let num_ticks = args
        .next()
        .map(|ticks| ticks.parse::<u64>())
        .transpose()
        .context("number of ticks needs to be a non-negative integer")?;

    let mut simulation = Simulation::new(config)?;
    simulation.start();

    let mut reporter = Reporter::new(simulation.config().time_step);
    match num_ticks {
        Some(num_ticks) => {
            for _ in 0..num_ticks {
                step(&mut simulation, &mut reporter);
            }
            reporter.report(&simulation);
        }
        None => run_realtime(&mut simulation, &mut reporter),
    }

    Ok(())
}

fn step(simulation: &mut Simulation, reporter: &mut Reporter) {
    let step_start = Instant::now();
    simulation.tick();
    reporter.record_step(step_start.elapsed());
    if reporter.due(simulation.num_ticks()) {
        reporter.report(simulation);
    }
    microprofile::flip!();
}

// Runs ticks paced against the wall clock, forever.
fn run_realtime(simulation: &mut Simulation, reporter: &mut Reporter) {
    let mut time_manager = TimeManager::new(simulation.config().time_step);
    let mut last_update = Instant::now();
    loop {
        let now = Instant::now();
        time_manager.accumulate(now - last_update);
        last_update = now;

        let processing_start = Instant::now();
        while time_manager.consume_tick() {
            step(simulation, reporter);

            // If we can't process fast enough, drop the remaining residual time.
            // I.e. we give up on getting physics-time on par to real time.
            if processing_start.elapsed() > MAX_ALLOWED_SIM_PROCESSING_TIME {
                log::warn!(
                    "Simulation can't keep up with real time, dropping {:.2}ms",
                    time_manager.backlog().as_secs_f64() * 1000.0
                );
                time_manager.drop_backlog();
                break;
            }
        }

        std::thread::sleep(Duration::from_millis(1));
    }
}

/// Logs a short summary of the fluid roughly once per simulated second.
struct Reporter {
    ticks_per_report: u64,
    step_processing_time: Duration,
    num_steps: u32,
}

impl Reporter {
    fn new(timestep: Real) -> Reporter {
        Reporter {
            ticks_per_report: std::cmp::max(1, (1.0 / timestep).round() as u64),
            step_processing_time: Duration::ZERO,
            num_steps: 0,
        }
    }

    fn record_step(&mut self, duration: Duration) {
        self.step_processing_time += duration;
        self.num_steps += 1;
    }

    fn due(&self, num_ticks: u64) -> bool {
        num_ticks % self.ticks_per_report == 0
    }

    fn report(&mut self, simulation: &Simulation) {
        let positions = simulation.particle_positions();
        let mean_position = if positions.is_empty() {
            Point::origin()
        } else {
            Point::centroid(positions)
        };
        let average_step = if self.num_steps > 0 {
            self.step_processing_time / self.num_steps
        } else {
            Duration::ZERO
        };

        log::info!(
            "SimTime {:.2}s ({} ticks) | water cells: {} | mean particle position ({:.2}, {:.2}, {:.2}) | probe pressure {:.2} | Single Step (averaged): {:.2}ms",
            simulation.num_ticks() as f64 * simulation.config().time_step as f64,
            simulation.num_ticks(),
            simulation.world().cells.num_water_cells(),
            mean_position.x,
            mean_position.y,
            mean_position.z,
            simulation.probe_pressure(),
            average_step.as_secs_f64() * 1000.0,
        );

        self.step_processing_time = Duration::ZERO;
        self.num_steps = 0;
    }
}
