use std::time::{Duration, Instant};

/// Turns successive tick instants into whole-millisecond deltas.
#[derive(Clone, Debug)]
pub struct FrameClock {
    last: Option<Instant>,
    carry: Duration,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Clock that reports 0 on its first tick.
    pub fn new() -> Self {
        Self {
            last: None,
            carry: Duration::ZERO,
        }
    }

    /// Milliseconds elapsed since the previous call.
    pub fn tick(&mut self) -> i64 {
        self.tick_at(Instant::now())
    }

    /// Same as [`FrameClock::tick`] with an explicit instant.
    ///
    /// Sub-millisecond remainders carry into the next tick so no time is lost to truncation.
    /// An instant earlier than the previous one yields 0.
    pub fn tick_at(&mut self, now: Instant) -> i64 {
        let Some(last) = self.last.replace(now) else {
            return 0;
        };
        let total = now.saturating_duration_since(last) + self.carry;
        let ms = total.as_millis();
        self.carry = total - Duration::from_millis(ms as u64);
        i64::try_from(ms).unwrap_or(i64::MAX)
    }
}
