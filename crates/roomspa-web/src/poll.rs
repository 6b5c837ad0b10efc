//! Cancellable fixed-period polling for live pages

use std::ops::ControlFlow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

/// A background task that runs a fetch immediately and then every `period`
///
/// Each tick awaits its fetch before waiting for the next one, so fetches
/// never overlap. Stopping or dropping the poller aborts the task; a fetch
/// in flight at that moment is cancelled at its next await point.
#[derive(Debug)]
pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    /// Start polling; the closure returns `Break` to end the loop itself
    pub fn spawn<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tick().await.is_break() {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Cancel the timer; no further fetch starts
    pub fn stop(self) {
        drop(self);
    }

    /// Whether the loop has ended on its own or been aborted
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    fn counting(counter: &Arc<AtomicUsize>) -> impl FnMut() -> std::future::Ready<ControlFlow<()>> + Send + 'static {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(ControlFlow::Continue(()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_immediately_then_every_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let poller = Poller::spawn(Duration::from_secs(5), counting(&count));

        sleep(Duration::from_millis(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);

        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_poller_fetches_nothing_more() {
        let count = Arc::new(AtomicUsize::new(0));
        let poller = Poller::spawn(Duration::from_secs(5), counting(&count));

        sleep(Duration::from_millis(10)).await;
        poller.stop();

        sleep(Duration::from_secs(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_poller_cancels() {
        let count = Arc::new(AtomicUsize::new(0));
        {
            let _poller = Poller::spawn(Duration::from_secs(10), counting(&count));
            sleep(Duration::from_millis(10)).await;
        }

        sleep(Duration::from_secs(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetches_never_overlap() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let (flight, max) = (Arc::clone(&in_flight), Arc::clone(&max_seen));

        let poller = Poller::spawn(Duration::from_secs(5), move || {
            let (flight, max) = (Arc::clone(&flight), Arc::clone(&max));
            async move {
                let now = flight.fetch_add(1, Ordering::SeqCst) + 1;
                max.fetch_max(now, Ordering::SeqCst);
                sleep(Duration::from_secs(12)).await;
                flight.fetch_sub(1, Ordering::SeqCst);
                ControlFlow::Continue(())
            }
        });

        sleep(Duration::from_secs(60)).await;
        poller.stop();
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_break_ends_loop() {
        let poller = Poller::spawn(Duration::from_secs(1), || async { ControlFlow::Break(()) });
        sleep(Duration::from_millis(10)).await;
        assert!(poller.is_finished());
    }
}
