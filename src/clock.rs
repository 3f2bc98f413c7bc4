//! Wall-clock access for everything that stamps or compares epoch times.
//!
//! Cart expiry, order start times and countdowns all read the clock through
//! [`Clock`] so tests can run on tokio's paused time.
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::time::Instant;

pub trait Clock: Send + Sync + Debug {
    fn now_epoch_ms(&self) -> u64;
}

pub type SharedClock = Arc<dyn Clock>;

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Epoch time that advances with `tokio::time`.
///
/// Under `#[tokio::test(start_paused = true)]` it moves only when the test
/// advances time, so timer-driven behavior can be asserted exactly.
#[derive(Debug, Clone, Copy)]
pub struct InstantClock {
    anchor_epoch_ms: u64,
    anchor: Instant,
}

impl InstantClock {
    pub fn starting_at(anchor_epoch_ms: u64) -> Self {
        Self {
            anchor_epoch_ms,
            anchor: Instant::now(),
        }
    }
}

impl Clock for InstantClock {
    fn now_epoch_ms(&self) -> u64 {
        self.anchor_epoch_ms + self.anchor.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn instant_clock_follows_paused_time() {
        let clock = InstantClock::starting_at(1_000_000);
        assert_eq!(clock.now_epoch_ms(), 1_000_000);

        tokio::time::advance(Duration::from_secs(90)).await;
        assert_eq!(clock.now_epoch_ms(), 1_090_000);
    }

    #[test]
    fn system_clock_is_past_the_epoch() {
        assert!(SystemClock.now_epoch_ms() > 1_600_000_000_000);
    }
}
