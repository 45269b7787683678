//! Reusable cancellable status poller.
//!
//! The submission protocol embeds the same polling loop, but the poller
//! is also useful on its own (e.g. re-attaching to a lesson whose video
//! was still processing when the dashboard was last closed). It is an
//! explicit task handle with `start`/`stop`, not a bare interval id
//! captured in a closure, so teardown is testable in isolation from any
//! UI shell.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use ederaxy_client::LessonVideoApi;
use ederaxy_store::CatalogStore;

use crate::events::SubmitEvent;
use crate::submit::poll_status_loop;

/// Fixed-interval poller for one lesson's video status.
pub struct StatusPoller {
    api: Arc<dyn LessonVideoApi>,
    store: Arc<CatalogStore>,
    interval: Duration,
}

/// Handle to a running poll task.
///
/// Dropping the handle does not stop the task; call [`stop`](Self::stop)
/// (or cancel the session token it was started under).
pub struct PollerHandle {
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
    /// Stream of [`SubmitEvent`]s produced by the poll loop.
    pub events: mpsc::UnboundedReceiver<SubmitEvent>,
}

impl StatusPoller {
    pub fn new(api: Arc<dyn LessonVideoApi>, store: Arc<CatalogStore>, interval: Duration) -> Self {
        Self {
            api,
            store,
            interval,
        }
    }

    /// Spawn the poll task for a lesson.
    ///
    /// Polls until a terminal status, a transport error, or
    /// [`PollerHandle::stop`]. `start_progress` seeds the cosmetic
    /// progress value (0 for a fresh submission).
    pub fn start(&self, lesson_id: impl Into<String>, start_progress: u8) -> PollerHandle {
        let api = Arc::clone(&self.api);
        let store = Arc::clone(&self.store);
        let interval = self.interval;
        let lesson_id = lesson_id.into();
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::unbounded_channel();

        let task_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            poll_status_loop(
                api.as_ref(),
                store.as_ref(),
                &lesson_id,
                interval,
                start_progress,
                &task_cancel,
                &tx,
            )
            .await;
        });

        PollerHandle {
            cancel,
            task,
            events: rx,
        }
    }
}

impl PollerHandle {
    /// Stop observing. Idempotent; the task exits at its next
    /// suspension point and sends [`SubmitEvent::Cancelled`].
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Stop and wait for the task to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{video_record, ScriptedApi};
    use ederaxy_core::video::VideoStatus;

    #[tokio::test(start_paused = true)]
    async fn poller_stops_on_terminal_status() {
        let api = ScriptedApi::new();
        api.push_get(Ok(video_record("v1", "l1", VideoStatus::Processing)));
        api.push_get(Ok(video_record("v1", "l1", VideoStatus::Ready)));

        let store = Arc::new(CatalogStore::new());
        let poller = StatusPoller::new(
            Arc::new(api.clone()),
            Arc::clone(&store),
            Duration::from_millis(7000),
        );

        let mut handle = poller.start("l1", 0);
        let mut completed = false;
        while let Some(event) = handle.events.recv().await {
            if matches!(event, SubmitEvent::Completed { .. }) {
                completed = true;
            }
        }
        assert!(completed);
        assert_eq!(api.get_calls(), 2);
        assert_eq!(
            store.video_for_lesson("l1").await.unwrap().status,
            VideoStatus::Ready
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_polling_without_further_requests() {
        let api = ScriptedApi::new();
        api.always_get(|| Ok(video_record("v1", "l1", VideoStatus::Processing)));

        let store = Arc::new(CatalogStore::new());
        let poller = StatusPoller::new(
            Arc::new(api.clone()),
            Arc::clone(&store),
            Duration::from_millis(7000),
        );

        let mut handle = poller.start("l1", 0);
        // Observe one poll, then stop.
        loop {
            match handle.events.recv().await {
                Some(SubmitEvent::StatusPolled { .. }) => break,
                Some(_) => continue,
                None => panic!("poller ended unexpectedly"),
            }
        }
        handle.stop();
        // Double stop is harmless.
        handle.stop();

        // Drain to the Cancelled terminal event.
        let mut cancelled = false;
        while let Some(event) = handle.events.recv().await {
            if matches!(event, SubmitEvent::Cancelled) {
                cancelled = true;
            }
        }
        assert!(cancelled);

        let calls = api.get_calls();
        tokio::time::advance(Duration::from_secs(60)).await;
        tokio::task::yield_now().await;
        assert_eq!(api.get_calls(), calls);
    }
}
