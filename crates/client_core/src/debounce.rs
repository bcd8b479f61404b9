use std::{future::Future, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle};

/// Cancellable delayed task. Re-arming aborts the pending timer; the work it
/// launches once the timer fires runs to completion on its own task.
pub struct Debouncer {
    delay: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            timer: Mutex::new(None),
        }
    }

    pub async fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        });
        if let Some(previous) = self.timer.lock().await.replace(handle) {
            previous.abort();
        }
    }

    /// Returns true when a timer was still pending.
    pub async fn cancel(&self) -> bool {
        match self.timer.lock().await.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub async fn is_pending(&self) -> bool {
        self.timer
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;

    fn counting_task(counter: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_within_the_window_runs_only_the_last_task() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            debouncer.schedule(counting_task(&counter)).await;
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(250)).await;
        tokio::task::yield_now().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending().await);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_abort_the_pending_timer() {
        let counter = Arc::new(AtomicUsize::new(0));

        let debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.schedule(counting_task(&counter)).await;
        assert!(debouncer.is_pending().await);
        assert!(debouncer.cancel().await);
        assert!(!debouncer.cancel().await);

        let dropped = Debouncer::new(Duration::from_millis(300));
        dropped.schedule(counting_task(&counter)).await;
        drop(dropped);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
