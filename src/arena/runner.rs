// arena/runner.rs
use std::time::Duration;

use log::debug;

use super::simulation::Simulation;
use super::timer::Timer;

/// How long an idle runner waits before looking again.
pub const IDLE_WAIT: Duration = Duration::from_millis(10);

/// Keeps a [`Simulation`] in step with real time.
///
/// One simulation step is `neutral_time_scale` timer ticks, and real time
/// runs the timer at `steps_per_sec * time_scale` ticks per second. So a
/// `time_scale` equal to the neutral value runs at real speed, and 0 pauses.
#[derive(Debug, Clone)]
pub struct Runner {
    pub simulation: Simulation,
    timer: Timer,
    time_scale: u32,
    force_step: bool,
}

impl Runner {
    pub fn new(simulation: Simulation) -> Self {
        let cfg = simulation.config();
        let step = (cfg.neutral_time_scale as i64).max(1);
        let max_ticks = cfg.steps_per_sec as i64 * cfg.max_ms_behind as i64 * step / 1000;
        let time_scale = cfg.neutral_time_scale;
        let mut runner = Self {
            timer: Timer::new(0, max_ticks.max(step)),
            simulation,
            time_scale: 0,
            force_step: false,
        };
        runner.set_time_scale(time_scale);
        runner
    }

    #[inline]
    pub fn time_scale(&self) -> u32 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, time_scale: u32) {
        self.time_scale = time_scale;
        self.timer.ticks_per_sec = self.simulation.config().steps_per_sec as i64 * time_scale as i64;
        debug!("time scale set to {time_scale}");
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.time_scale == 0
    }

    /// Asks for one extra step on the next update, even while paused.
    pub fn force_step(&mut self) {
        self.force_step = true;
    }

    #[inline]
    fn ticks_per_step(&self) -> i64 {
        (self.simulation.config().neutral_time_scale as i64).max(1)
    }

    /// Runs every step owed for `elapsed` real time, returns how many ran.
    /// Frame-driven hosts call this once per frame.
    pub fn advance(&mut self, elapsed: Duration) -> u64 {
        let per_step = self.ticks_per_step();
        let owed = self.timer.ticks(elapsed) / per_step;
        for _ in 0..owed {
            self.simulation.step();
        }
        self.timer.add_ticks(-owed * per_step);

        if owed == 0 && std::mem::take(&mut self.force_step) {
            self.simulation.step();
            return 1;
        }
        self.force_step = false;
        owed as u64
    }

    /// Runs at most one step and returns how long to wait before calling again.
    /// Thread-driven hosts call this in a loop.
    pub fn on_step(&mut self, elapsed: Duration) -> Duration {
        let per_step = self.ticks_per_step();
        if self.timer.ticks(elapsed) >= per_step {
            self.simulation.step();
            self.timer.add_ticks(-per_step);
            return Duration::ZERO;
        }
        if std::mem::take(&mut self.force_step) {
            self.simulation.step();
            return Duration::ZERO;
        }
        self.timer.time_until(per_step).map_or(IDLE_WAIT, |d| d.min(IDLE_WAIT))
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(Simulation::default())
    }
}
