//! Cancellable cosmetic timers.
//!
//! Progress animations run on their own tasks and only ever post events back
//! to the session. Each timer is owned by the operation it decorates: dropping
//! the [`Ticker`] aborts the task, so the timer cannot outlive its operation
//! on any exit path.

use std::time::Duration;
use tokio::task::JoinHandle;

/// A fixed-cadence timer task that is aborted when dropped.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Call `on_tick` every `period`, at most `limit` times.
    ///
    /// The first call happens one full period after spawning. The timer stops
    /// early when `on_tick` returns `false` (the receiver went away).
    pub fn spawn<F>(period: Duration, limit: usize, mut on_tick: F) -> Self
    where
        F: FnMut(usize) -> bool + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            for tick in 0..limit {
                tokio::time::sleep(period).await;
                if !on_tick(tick) {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Run `action` once after `delay`.
    pub fn once<F>(delay: Duration, action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the timer now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_ticker_respects_limit() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let ticker = Ticker::spawn(Duration::from_secs(2), 3, move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            true
        });

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(ticker.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_ticker_stops_it() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let ticker = Ticker::spawn(Duration::from_secs(2), 10, move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            true
        });

        tokio::time::sleep(Duration::from_millis(4500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        ticker.cancel();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_once_fires_after_delay() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let _timer = Ticker::once(Duration::from_millis(800), move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(799)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
