// SPDX-License-Identifier: GPL-3.0-only

//! Flight timer
//!
//! Counts whole seconds from mount. The timer task only shares the counter,
//! never the view, and the count is guarded by the same lock as the running
//! flag so nothing can increment after [`ElapsedTicker::stop`] returns.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

#[derive(Debug)]
struct TickerState {
    seconds: u64,
    running: bool,
}

/// Cancellable one-per-period counter
#[derive(Debug)]
pub struct ElapsedTicker {
    state: Arc<Mutex<TickerState>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl ElapsedTicker {
    /// Start counting from zero. Must be called from within a tokio runtime.
    pub fn start(period: Duration) -> Self {
        let state = Arc::new(Mutex::new(TickerState {
            seconds: 0,
            running: true,
        }));

        let shared = Arc::clone(&state);
        let task = tokio::spawn(async move {
            // First tick one full period after start, not immediately
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                let Ok(mut state) = shared.lock() else {
                    break;
                };
                if !state.running {
                    break;
                }
                state.seconds += 1;
            }
            debug!("Ticker task finished");
        });

        info!(period_ms = period.as_millis() as u64, "Flight timer started");
        Self {
            state,
            task: Some(task),
        }
    }

    pub fn elapsed(&self) -> u64 {
        self.state.lock().map(|s| s.seconds).unwrap_or(0)
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Cancel the schedule. The count is frozen once this returns.
    pub fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        if let Ok(mut state) = self.state.lock() {
            state.running = false;
        }
        task.abort();
        info!(elapsed = self.elapsed(), "Flight timer stopped");
    }
}

impl Drop for ElapsedTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(1000);

    #[tokio::test(start_paused = true)]
    async fn test_starts_at_zero() {
        let ticker = ElapsedTicker::start(PERIOD);
        assert_eq!(ticker.elapsed(), 0);
        assert!(ticker.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_counts_one_per_period() {
        let ticker = ElapsedTicker::start(PERIOD);
        time::sleep(Duration::from_millis(5_500)).await;
        let elapsed = ticker.elapsed();
        assert!((4..=6).contains(&elapsed), "elapsed = {}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_increment_after_stop() {
        let mut ticker = ElapsedTicker::start(PERIOD);
        time::sleep(Duration::from_millis(2_500)).await;
        ticker.stop();
        let frozen = ticker.elapsed();

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(ticker.elapsed(), frozen);
        assert!(!ticker.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let mut ticker = ElapsedTicker::start(PERIOD);
        ticker.stop();
        ticker.stop();
        assert_eq!(ticker.elapsed(), 0);
    }
}
