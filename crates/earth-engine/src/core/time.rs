/// Elapsed-time clock driven by per-frame deltas.
///
/// Everything time-dependent in the scene is a function of `elapsed()`, so a
/// replayed sequence of deltas reproduces the same frames.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    /// Seconds accumulated since the first frame.
    elapsed: f32,
    /// Delta of the most recent frame.
    delta: f32,
    frames: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame. Negative or non-finite deltas (tab switches,
    /// clock skew) count as zero. Returns the new elapsed time.
    pub fn tick(&mut self, frame_dt: f32) -> f32 {
        self.delta = if frame_dt.is_finite() { frame_dt.max(0.0) } else { 0.0 };
        self.elapsed += self.delta;
        self.frames += 1;
        self.elapsed
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Number of ticks so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
