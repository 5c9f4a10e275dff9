// arena/timer.rs
use std::time::Duration;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Converts elapsed real time into whole ticks, carrying the fraction over
/// to the next update. The count never exceeds `max_ticks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    pub ticks_per_sec: i64,
    pub max_ticks: i64,
    last_ticks: i64,
    last_remainder: i128,
}

impl Timer {
    pub fn new(ticks_per_sec: i64, max_ticks: i64) -> Self {
        Self { ticks_per_sec, max_ticks, last_ticks: 0, last_remainder: 0 }
    }

    /// Accounts for `elapsed` and returns the tick count.
    pub fn ticks(&mut self, elapsed: Duration) -> i64 {
        let rate = self.ticks_per_sec.max(0) as i128;
        let Some(scaled) = (elapsed.as_nanos() as i128)
            .checked_mul(rate)
            .and_then(|s| s.checked_add(self.last_remainder))
        else {
            self.last_remainder = 0;
            self.add_ticks(i64::MAX);
            return self.last_ticks;
        };
        let whole = scaled / NANOS_PER_SEC;
        self.last_remainder = scaled % NANOS_PER_SEC;
        self.add_ticks(whole.clamp(i64::MIN as i128, i64::MAX as i128) as i64);
        self.last_ticks
    }

    /// Adds (or with a negative count, consumes) ticks; saturates at `max_ticks`.
    pub fn add_ticks(&mut self, ticks: i64) {
        self.last_ticks = self.last_ticks.saturating_add(ticks).min(self.max_ticks);
    }

    #[inline]
    pub fn current(&self) -> i64 {
        self.last_ticks
    }

    /// Real time until the count reaches `target`, at the current rate.
    pub fn time_until(&self, target: i64) -> Option<Duration> {
        if self.ticks_per_sec <= 0 {
            return None;
        }
        let owed = (target - self.last_ticks).max(0) as i128 * NANOS_PER_SEC - self.last_remainder;
        let nanos = (owed.max(0) + self.ticks_per_sec as i128 - 1) / self.ticks_per_sec as i128;
        Some(Duration::from_nanos(nanos.min(u64::MAX as i128) as u64))
    }
}
