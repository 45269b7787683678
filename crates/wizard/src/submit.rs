//! The submission protocol.
//!
//! Strictly sequential: upload the video, wait for the backend to link
//! it to the lesson (bounded fixed-delay retries), upload the thumbnail
//! (retrying the availability wait on a not-ready failure), then poll
//! status at a fixed interval until a terminal state. No two network
//! operations for the same lesson are ever in flight at once.
//!
//! Cancellation is checked between steps and during every delay; an
//! in-flight request is never aborted, its result is simply discarded
//! once the token is cancelled.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use ederaxy_client::{LessonVideoApi, VideoApiError};
use ederaxy_core::progress;
use ederaxy_core::upload::UploadFile;
use ederaxy_core::video::{Video, VideoStatus};
use ederaxy_store::CatalogStore;

use crate::config::SubmitConfig;
use crate::events::SubmitEvent;

/// Fallback message when the server reports `failed` without a reason.
pub const GENERIC_FAILURE_MESSAGE: &str = "Video processing failed";

/// Errors surfaced to the user at the submission boundary.
///
/// The `Display` form is the user-facing message; the wizard flattens it
/// into its `submit_error` string.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SubmitError {
    /// The video never became available within the bounded retries.
    #[error("The video was not available after {attempts} attempts")]
    NotReady { attempts: u32 },

    /// The server reported `status: failed`; the reason is shown verbatim.
    #[error("{0}")]
    ProcessingFailed(String),

    /// Transport or unexpected API error.
    #[error("{0}")]
    Other(String),
}

impl From<VideoApiError> for SubmitError {
    fn from(e: VideoApiError) -> Self {
        SubmitError::Other(e.to_string())
    }
}

/// Result of a cancellable protocol step.
#[derive(Debug)]
enum StepOutcome<T> {
    Done(T),
    Cancelled,
}

/// Run the full submission protocol, reporting over `events`.
///
/// The task always ends by sending exactly one terminal event
/// ([`SubmitEvent::Completed`], [`SubmitEvent::Failed`], or
/// [`SubmitEvent::Cancelled`]).
#[allow(clippy::too_many_arguments)]
pub async fn run_submission(
    api: Arc<dyn LessonVideoApi>,
    store: Arc<CatalogStore>,
    config: SubmitConfig,
    lesson_id: String,
    video_file: UploadFile,
    thumbnail_file: UploadFile,
    cancel: CancellationToken,
    events: mpsc::UnboundedSender<SubmitEvent>,
) {
    let submission_id = uuid::Uuid::new_v4();
    tracing::info!(
        %submission_id,
        lesson_id = %lesson_id,
        video_file = %video_file.file_name,
        size = video_file.size(),
        "Starting video submission",
    );

    // 1. Upload the video file.
    let video = match api.upload_video(&lesson_id, &video_file).await {
        Ok(video) => video,
        Err(e) => {
            tracing::error!(%submission_id, error = %e, "Video upload failed");
            let _ = events.send(SubmitEvent::Failed { error: e.into() });
            return;
        }
    };
    if cancel.is_cancelled() {
        let _ = events.send(SubmitEvent::Cancelled);
        return;
    }
    store.upsert_video(video.clone()).await;
    let _ = events.send(SubmitEvent::VideoUploaded { video });

    // 2. Wait for the server to link the video to the lesson.
    match wait_for_availability(api.as_ref(), &lesson_id, &config, &cancel).await {
        Ok(StepOutcome::Done(video)) => {
            store.upsert_video(video.clone()).await;
            let _ = events.send(SubmitEvent::VideoAvailable { video });
        }
        Ok(StepOutcome::Cancelled) => {
            let _ = events.send(SubmitEvent::Cancelled);
            return;
        }
        Err(error) => {
            let _ = events.send(SubmitEvent::Failed { error });
            return;
        }
    }

    // 3. Upload the thumbnail, retrying the availability wait on a
    //    not-ready failure.
    let mut thumbnail_done = false;
    for attempt in 1..=config.thumbnail_attempts {
        if cancel.is_cancelled() {
            let _ = events.send(SubmitEvent::Cancelled);
            return;
        }
        match api.upload_thumbnail(&lesson_id, &thumbnail_file).await {
            Ok(video) => {
                store.upsert_video(video.clone()).await;
                let _ = events.send(SubmitEvent::ThumbnailUploaded { video });
                thumbnail_done = true;
                break;
            }
            Err(e) if e.is_not_ready() => {
                tracing::warn!(
                    %submission_id,
                    attempt,
                    error = %e,
                    "Thumbnail rejected, video not linked yet",
                );
                if attempt == config.thumbnail_attempts {
                    break;
                }
                match wait_for_availability(api.as_ref(), &lesson_id, &config, &cancel).await {
                    Ok(StepOutcome::Done(video)) => {
                        store.upsert_video(video.clone()).await;
                        let _ = events.send(SubmitEvent::VideoAvailable { video });
                    }
                    Ok(StepOutcome::Cancelled) => {
                        let _ = events.send(SubmitEvent::Cancelled);
                        return;
                    }
                    Err(error) => {
                        let _ = events.send(SubmitEvent::Failed { error });
                        return;
                    }
                }
            }
            Err(e) => {
                tracing::error!(%submission_id, error = %e, "Thumbnail upload failed");
                let _ = events.send(SubmitEvent::Failed { error: e.into() });
                return;
            }
        }
    }
    if !thumbnail_done {
        let _ = events.send(SubmitEvent::Failed {
            error: SubmitError::NotReady {
                attempts: config.thumbnail_attempts,
            },
        });
        return;
    }

    // 4. Poll status until terminal.
    poll_status_loop(
        api.as_ref(),
        store.as_ref(),
        &lesson_id,
        config.poll_interval,
        0,
        &cancel,
        &events,
    )
    .await;
}

/// Bounded availability wait: GET the lesson video up to
/// `availability_attempts` times with a fixed delay between attempts,
/// stopping early on the first success.
///
/// Only the not-ready condition (404 / "video is not available") is
/// retried; any other error aborts. Exhausting the attempts escalates
/// to [`SubmitError::NotReady`].
async fn wait_for_availability(
    api: &dyn LessonVideoApi,
    lesson_id: &str,
    config: &SubmitConfig,
    cancel: &CancellationToken,
) -> Result<StepOutcome<Video>, SubmitError> {
    for attempt in 1..=config.availability_attempts {
        if cancel.is_cancelled() {
            return Ok(StepOutcome::Cancelled);
        }

        match api.get_video(lesson_id).await {
            Ok(video) => {
                tracing::debug!(lesson_id, attempt, "Video available");
                return Ok(StepOutcome::Done(video));
            }
            Err(e) if e.is_not_ready() => {
                tracing::debug!(
                    lesson_id,
                    attempt,
                    max_attempts = config.availability_attempts,
                    "Video not available yet",
                );
            }
            Err(e) => return Err(e.into()),
        }

        // Fixed delay between attempts, none after the last one.
        if attempt < config.availability_attempts {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(StepOutcome::Cancelled),
                _ = tokio::time::sleep(config.availability_delay) => {}
            }
        }
    }

    Err(SubmitError::NotReady {
        attempts: config.availability_attempts,
    })
}

/// Fixed-interval status polling until a terminal state.
///
/// Each tick GETs the lesson video, overwrites the store record, and
/// emits [`SubmitEvent::StatusPolled`]. Non-terminal statuses advance
/// the cosmetic progress; `ready` sets it to 100 and completes;
/// `failed` and transport errors stop the loop immediately (no silent
/// infinite retry on unknown errors).
#[allow(clippy::too_many_arguments)]
pub(crate) async fn poll_status_loop(
    api: &dyn LessonVideoApi,
    store: &CatalogStore,
    lesson_id: &str,
    interval: Duration,
    start_progress: u8,
    cancel: &CancellationToken,
    events: &mpsc::UnboundedSender<SubmitEvent>,
) {
    let mut percent = start_progress;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = events.send(SubmitEvent::Cancelled);
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }

        let result = api.get_video(lesson_id).await;

        // Cancelled while the GET was in flight: discard the result.
        if cancel.is_cancelled() {
            let _ = events.send(SubmitEvent::Cancelled);
            return;
        }

        match result {
            Ok(video) => {
                store.upsert_video(video.clone()).await;
                let _ = events.send(SubmitEvent::StatusPolled {
                    video: video.clone(),
                });

                match video.status {
                    VideoStatus::Ready => {
                        let _ = events.send(SubmitEvent::Progress {
                            percent: progress::PROGRESS_COMPLETE,
                        });
                        tracing::info!(lesson_id, video_id = %video.id, "Video ready");
                        let _ = events.send(SubmitEvent::Completed { video });
                        return;
                    }
                    VideoStatus::Failed => {
                        let reason = video
                            .failure_reason
                            .clone()
                            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
                        tracing::error!(lesson_id, video_id = %video.id, reason = %reason, "Video processing failed");
                        let _ = events.send(SubmitEvent::Failed {
                            error: SubmitError::ProcessingFailed(reason),
                        });
                        return;
                    }
                    VideoStatus::Uploaded | VideoStatus::Processing => {
                        percent = progress::tick(percent);
                        let _ = events.send(SubmitEvent::Progress { percent });
                    }
                }
            }
            Err(e) => {
                tracing::error!(lesson_id, error = %e, "Status poll failed, stopping poller");
                let _ = events.send(SubmitEvent::Failed { error: e.into() });
                return;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{video_record, ScriptedApi};
    use assert_matches::assert_matches;

    fn fast_config() -> SubmitConfig {
        SubmitConfig {
            availability_attempts: 10,
            availability_delay: Duration::from_millis(800),
            thumbnail_attempts: 10,
            poll_interval: Duration::from_millis(7000),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn availability_wait_succeeds_after_nine_misses() {
        let api = ScriptedApi::new();
        for _ in 0..9 {
            api.push_get(Err(VideoApiError::Api {
                status: 404,
                body: "Not Found".into(),
            }));
        }
        api.push_get(Ok(video_record("v1", "l1", VideoStatus::Uploaded)));

        let cancel = CancellationToken::new();
        let result = wait_for_availability(&api, "l1", &fast_config(), &cancel).await;

        assert_matches!(result, Ok(StepOutcome::Done(v)) if v.id == "v1");
        assert_eq!(api.get_calls(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn availability_wait_exhausts_exactly_ten_attempts() {
        let api = ScriptedApi::new();
        api.always_get(|| {
            Err(VideoApiError::Api {
                status: 404,
                body: "Not Found".into(),
            })
        });

        let cancel = CancellationToken::new();
        let before = tokio::time::Instant::now();
        let result = wait_for_availability(&api, "l1", &fast_config(), &cancel).await;
        let elapsed = before.elapsed();

        assert_matches!(result, Err(SubmitError::NotReady { attempts: 10 }));
        assert_eq!(api.get_calls(), 10);
        // Nine delays between ten attempts, none after the last.
        assert_eq!(elapsed, Duration::from_millis(800 * 9));
    }

    #[tokio::test(start_paused = true)]
    async fn availability_wait_aborts_on_non_retryable_error() {
        let api = ScriptedApi::new();
        api.push_get(Err(VideoApiError::Api {
            status: 500,
            body: "internal".into(),
        }));

        let cancel = CancellationToken::new();
        let result = wait_for_availability(&api, "l1", &fast_config(), &cancel).await;

        assert_matches!(result, Err(SubmitError::Other(_)));
        assert_eq!(api.get_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn availability_wait_respects_cancellation() {
        let api = ScriptedApi::new();
        api.always_get(|| {
            Err(VideoApiError::Api {
                status: 404,
                body: "Not Found".into(),
            })
        });

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = wait_for_availability(&api, "l1", &fast_config(), &cancel).await;

        assert_matches!(result, Ok(StepOutcome::Cancelled));
        assert_eq!(api.get_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_loop_stops_on_ready_with_progress_100() {
        let api = ScriptedApi::new();
        api.push_get(Ok(video_record("v1", "l1", VideoStatus::Processing)));
        api.push_get(Ok(video_record("v1", "l1", VideoStatus::Ready)));

        let store = CatalogStore::new();
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        poll_status_loop(
            &api,
            &store,
            "l1",
            Duration::from_millis(7000),
            0,
            &cancel,
            &tx,
        )
        .await;

        let mut progress_values = vec![];
        let mut completed = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                SubmitEvent::Progress { percent } => progress_values.push(percent),
                SubmitEvent::Completed { .. } => completed = true,
                _ => {}
            }
        }
        assert!(completed);
        assert_eq!(progress_values, vec![3, 100]);
        assert_eq!(api.get_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_loop_surfaces_failure_reason_verbatim() {
        let api = ScriptedApi::new();
        let mut failed = video_record("v1", "l1", VideoStatus::Failed);
        failed.failure_reason = Some("unsupported codec".into());
        api.push_get(Ok(failed));

        let store = CatalogStore::new();
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        poll_status_loop(
            &api,
            &store,
            "l1",
            Duration::from_millis(7000),
            0,
            &cancel,
            &tx,
        )
        .await;

        let mut error = None;
        while let Ok(event) = rx.try_recv() {
            if let SubmitEvent::Failed { error: e } = event {
                error = Some(e);
            }
        }
        assert_matches!(
            error,
            Some(SubmitError::ProcessingFailed(reason)) if reason == "unsupported codec"
        );
        assert_eq!(api.get_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_loop_uses_generic_message_without_reason() {
        let api = ScriptedApi::new();
        api.push_get(Ok(video_record("v1", "l1", VideoStatus::Failed)));

        let store = CatalogStore::new();
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        poll_status_loop(
            &api,
            &store,
            "l1",
            Duration::from_millis(7000),
            0,
            &cancel,
            &tx,
        )
        .await;

        let mut error = None;
        while let Ok(event) = rx.try_recv() {
            if let SubmitEvent::Failed { error: e } = event {
                error = Some(e);
            }
        }
        assert_matches!(
            error,
            Some(SubmitError::ProcessingFailed(reason)) if reason == GENERIC_FAILURE_MESSAGE
        );
    }

    #[tokio::test(start_paused = true)]
    async fn poll_loop_stops_on_transport_error() {
        let api = ScriptedApi::new();
        api.push_get(Ok(video_record("v1", "l1", VideoStatus::Processing)));
        api.push_get(Err(VideoApiError::Api {
            status: 502,
            body: "bad gateway".into(),
        }));

        let store = CatalogStore::new();
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        poll_status_loop(
            &api,
            &store,
            "l1",
            Duration::from_millis(7000),
            0,
            &cancel,
            &tx,
        )
        .await;

        let mut saw_failed = false;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, SubmitEvent::Failed { .. }) {
                saw_failed = true;
            }
        }
        assert!(saw_failed);
        // No further polling after the error.
        assert_eq!(api.get_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_loop_progress_never_exceeds_cap_before_ready() {
        let api = ScriptedApi::new();
        for _ in 0..40 {
            api.push_get(Ok(video_record("v1", "l1", VideoStatus::Processing)));
        }
        api.push_get(Ok(video_record("v1", "l1", VideoStatus::Ready)));

        let store = CatalogStore::new();
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        poll_status_loop(
            &api,
            &store,
            "l1",
            Duration::from_millis(7000),
            0,
            &cancel,
            &tx,
        )
        .await;

        let mut last = 0u8;
        let mut final_value = 0u8;
        let mut ready_seen = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                SubmitEvent::Progress { percent } => {
                    assert!(percent >= last, "progress went backwards");
                    if !ready_seen {
                        assert!(percent == 100 || percent <= 95);
                    }
                    last = percent;
                    final_value = percent;
                }
                SubmitEvent::Completed { .. } => ready_seen = true,
                _ => {}
            }
        }
        assert!(ready_seen);
        assert_eq!(final_value, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn thumbnail_500_aborts_without_retry() {
        let api = ScriptedApi::new();
        api.push_upload(Ok(video_record("v1", "l1", VideoStatus::Uploaded)));
        api.push_get(Ok(video_record("v1", "l1", VideoStatus::Uploaded)));
        api.push_thumbnail(Err(VideoApiError::Api {
            status: 500,
            body: "internal".into(),
        }));

        let store = Arc::new(CatalogStore::new());
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        run_submission(
            Arc::new(api.clone()),
            store,
            fast_config(),
            "l1".into(),
            crate::testing::mp4(),
            crate::testing::png(),
            cancel,
            tx,
        )
        .await;

        let mut error = None;
        while let Ok(event) = rx.try_recv() {
            if let SubmitEvent::Failed { error: e } = event {
                error = Some(e);
            }
        }
        assert_matches!(error, Some(SubmitError::Other(_)));
        assert_eq!(api.thumbnail_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn thumbnail_exhaustion_escalates_to_not_ready() {
        let api = ScriptedApi::new();
        api.push_upload(Ok(video_record("v1", "l1", VideoStatus::Uploaded)));
        // Every availability GET succeeds, but the thumbnail endpoint
        // keeps rejecting the video as not linked.
        api.always_get(|| Ok(video_record("v1", "l1", VideoStatus::Uploaded)));
        for _ in 0..10 {
            api.push_thumbnail(Err(VideoApiError::Api {
                status: 404,
                body: "video is not available".into(),
            }));
        }

        let store = Arc::new(CatalogStore::new());
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        run_submission(
            Arc::new(api.clone()),
            store,
            fast_config(),
            "l1".into(),
            crate::testing::mp4(),
            crate::testing::png(),
            cancel,
            tx,
        )
        .await;

        let mut error = None;
        while let Ok(event) = rx.try_recv() {
            if let SubmitEvent::Failed { error: e } = event {
                error = Some(e);
            }
        }
        assert_matches!(error, Some(SubmitError::NotReady { attempts: 10 }));
        assert_eq!(api.thumbnail_calls(), 10);
        // One initial availability check plus one per retried attempt.
        assert_eq!(api.get_calls(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn thumbnail_404_triggers_availability_retry() {
        let api = ScriptedApi::new();
        api.push_upload(Ok(video_record("v1", "l1", VideoStatus::Uploaded)));
        // Initial availability wait.
        api.push_get(Ok(video_record("v1", "l1", VideoStatus::Uploaded)));
        // First thumbnail attempt is rejected, second succeeds after one
        // more availability cycle.
        api.push_thumbnail(Err(VideoApiError::Api {
            status: 404,
            body: "video is not available".into(),
        }));
        api.push_get(Ok(video_record("v1", "l1", VideoStatus::Uploaded)));
        api.push_thumbnail(Ok(video_record("v1", "l1", VideoStatus::Uploaded)));
        // One poll tick finishes the submission.
        api.push_get(Ok(video_record("v1", "l1", VideoStatus::Ready)));

        let store = Arc::new(CatalogStore::new());
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        run_submission(
            Arc::new(api.clone()),
            store,
            fast_config(),
            "l1".into(),
            crate::testing::mp4(),
            crate::testing::png(),
            cancel,
            tx,
        )
        .await;

        let mut completed = false;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, SubmitEvent::Completed { .. }) {
                completed = true;
            }
        }
        assert!(completed);
        assert_eq!(api.thumbnail_calls(), 2);
    }
}
