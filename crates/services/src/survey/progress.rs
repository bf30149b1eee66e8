use std::time::Duration;

/// Tuning for the cosmetic submission progress bar.
///
/// The bar is not tied to backend progress: it ramps towards `cap` over
/// `duration`, then holds until the response arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressConfig {
    duration: Duration,
    tick: Duration,
    cap: f32,
    /// Pause at 100% before the report is shown.
    reveal_delay: Duration,
}

impl ProgressConfig {
    pub const DEFAULT_DURATION: Duration = Duration::from_secs(20);
    pub const TICK: Duration = Duration::from_millis(50);
    pub const MIN_TICK: Duration = Duration::from_millis(1);
    pub const CAP: f32 = 95.0;
    pub const REVEAL_DELAY: Duration = Duration::from_millis(300);

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Clamped to `MIN_TICK`; a zero period would never advance.
    #[must_use]
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick.max(Self::MIN_TICK);
        self
    }

    #[must_use]
    pub fn with_reveal_delay(mut self, reveal_delay: Duration) -> Self {
        self.reveal_delay = reveal_delay;
        self
    }

    #[must_use]
    pub fn tick(&self) -> Duration {
        self.tick
    }

    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }

    /// Percent added per tick.
    #[must_use]
    pub fn increment(&self) -> f32 {
        let duration_ms = self.duration.as_secs_f32() * 1000.0;
        if duration_ms <= 0.0 {
            return self.cap;
        }
        let tick_ms = self.tick.as_secs_f32() * 1000.0;
        self.cap / duration_ms * tick_ms
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            duration: Self::DEFAULT_DURATION,
            tick: Self::TICK,
            cap: Self::CAP,
            reveal_delay: Self::REVEAL_DELAY,
        }
    }
}

/// Synthetic progress value, in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticProgress {
    value: f32,
    increment: f32,
    cap: f32,
}

impl SyntheticProgress {
    #[must_use]
    pub fn new(config: &ProgressConfig) -> Self {
        Self {
            value: 0.0,
            increment: config.increment(),
            cap: config.cap,
        }
    }

    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[must_use]
    pub fn is_capped(&self) -> bool {
        self.value >= self.cap
    }

    /// Advance one tick. Never exceeds the cap.
    pub fn tick(&mut self) -> f32 {
        self.value = (self.value + self.increment).min(self.cap);
        self.value
    }

    /// Jump to 100% once the real response is in.
    pub fn complete(&mut self) -> f32 {
        self.value = 100.0;
        self.value
    }
}
