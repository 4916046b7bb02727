use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// A periodic timer whose first tick lands one full period after creation.
///
/// Late ticks are delayed rather than bunched up, so a slow handler never
/// causes back-to-back ticks.
pub struct Ticker {
    period: Duration,
    interval: Interval,
}

impl Ticker {
    pub fn every(period: Duration) -> Self {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { period, interval }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Switches to `period`, counting from now. Takes effect from the next tick.
    pub fn reschedule(&mut self, period: Duration) {
        *self = Ticker::every(period);
    }

    pub async fn tick(&mut self) -> Instant {
        self.interval.tick().await
    }
}

/// Ticks `ticker` when armed; never resolves when it is `None`.
pub async fn tick_if_armed(ticker: &mut Option<Ticker>) -> Instant {
    match ticker {
        Some(ticker) => ticker.tick().await,
        None => std::future::pending().await,
    }
}
