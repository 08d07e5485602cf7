use chrono::Utc;

/// Monotonic, time-derived id source
///
/// Ids are Unix milliseconds, bumped past the last value handed out so two
/// ids issued within the same millisecond never collide.
#[derive(Debug, Default)]
pub struct IdClock {
    last: u64,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> String {
        self.reserve(1).to_string()
    }

    /// Reserve `count` consecutive values and return the first one
    pub fn reserve(&mut self, count: usize) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let base = now.max(self.last + 1);
        self.last = base + count.saturating_sub(1) as u64;
        base
    }
}
