use crate::units::*;
use std::time::Duration;

// All timing values in seconds
//
// Fixed timestep scheduling: real time is banked with `accumulate` and paid out in whole ticks by `consume_tick`.
// The simulation itself never looks at the wall clock.
pub struct TimeManager {
    timestep: Real,
    passed_time: Real,
    num_ticks: u64,

    budget: Duration, // real time that hasn't been simulated yet
    timestep_duration: Duration,
}

impl TimeManager {
    pub fn new(timestep: Real) -> TimeManager {
        assert!(timestep > 0.0, "timestep needs to be positive");
        TimeManager {
            timestep,
            passed_time: 0.0,
            num_ticks: 0,

            budget: Duration::ZERO,
            timestep_duration: Duration::from_secs_f64(timestep as f64),
        }
    }

    // how much physical time has passed in the simulation
    pub fn passed_time(&self) -> Real {
        self.passed_time
    }

    // how long a single tick is
    pub fn timestep(&self) -> Real {
        self.timestep
    }

    pub fn num_ticks(&self) -> u64 {
        self.num_ticks
    }

    // real time that is waiting to be simulated
    pub fn backlog(&self) -> Duration {
        self.budget
    }

    pub fn accumulate(&mut self, real_elapsed: Duration) {
        self.budget += real_elapsed;
    }

    /// Takes one timestep from the budget if there is enough. Returns true if the caller should run a tick.
    pub fn consume_tick(&mut self) -> bool {
        if self.budget < self.timestep_duration {
            return false;
        }
        self.budget -= self.timestep_duration;
        self.passed_time += self.timestep;
        self.num_ticks += 1;
        true
    }

    /// Forgets all banked time.
    /// Used when the simulation can't keep up with real time, otherwise it would try to catch up forever.
    pub fn drop_backlog(&mut self) {
        self.budget = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use more_asserts::*;

    #[test]
    fn ticks_are_paid_from_budget() {
        let mut time_manager = TimeManager::new(0.25);
        assert!(!time_manager.consume_tick());

        time_manager.accumulate(Duration::from_millis(600));
        assert!(time_manager.consume_tick());
        assert!(time_manager.consume_tick());
        assert!(!time_manager.consume_tick());

        assert_eq!(time_manager.num_ticks(), 2);
        assert_eq!(time_manager.passed_time(), 0.5);
        assert_eq!(time_manager.backlog(), Duration::from_millis(100));
    }

    #[test]
    fn remainder_carries_over() {
        let mut time_manager = TimeManager::new(0.02);
        for _ in 0..3 {
            time_manager.accumulate(Duration::from_millis(15));
        }
        let mut ticks = 0;
        while time_manager.consume_tick() {
            ticks += 1;
        }
        assert_eq!(ticks, 2);
        assert_lt!(time_manager.backlog(), Duration::from_millis(20));
    }

    #[test]
    fn dropping_backlog_stops_catching_up() {
        let mut time_manager = TimeManager::new(0.01);
        time_manager.accumulate(Duration::from_secs(10));
        assert!(time_manager.consume_tick());
        time_manager.drop_backlog();
        assert!(!time_manager.consume_tick());
        assert_eq!(time_manager.num_ticks(), 1);
    }
}
