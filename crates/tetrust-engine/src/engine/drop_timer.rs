use std::time::{Duration, Instant};

/// Wall-clock pacing for automatic drops.
///
/// The timer fires at most once per poll. When a poll comes late, the next
/// interval is measured from that poll, so missed intervals never pile up
/// into several drops.
#[derive(Debug, Clone, Default)]
pub struct DropTimer {
    last_drop: Option<Instant>,
}

impl DropTimer {
    #[must_use]
    pub const fn new() -> Self {
        Self { last_drop: None }
    }

    /// Returns `true` if at least `interval` has passed since the last drop.
    ///
    /// The first poll after [`Self::restart`] only starts the clock.
    pub fn poll(&mut self, now: Instant, interval: Duration) -> bool {
        match self.last_drop {
            Some(last) if now.saturating_duration_since(last) < interval => false,
            Some(_) => {
                self.last_drop = Some(now);
                true
            }
            None => {
                self.last_drop = Some(now);
                false
            }
        }
    }

    /// Keeps the timer from advancing, e.g. while the game is paused.
    pub fn hold(&mut self, now: Instant) {
        self.last_drop = Some(now);
    }

    /// Starts a fresh interval at the next poll.
    pub fn restart(&mut self) {
        self.last_drop = None;
    }
}
