//! The upload wizard state machine.
//!
//! Walks the fixed step sequence with per-step gating, owns the
//! selection path and the chosen files, and orchestrates the submission
//! task: `submit()` spawns [`run_submission`](crate::submit::run_submission)
//! with a fresh cancellation token, and the resulting
//! [`SubmitEvent`]s are folded back into the machine via [`apply`]
//! (or the [`next_event`] convenience that receives and applies in one
//! call).
//!
//! [`apply`]: UploadWizard::apply
//! [`next_event`]: UploadWizard::next_event

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use ederaxy_client::LessonVideoApi;
use ederaxy_core::error::CoreError;
use ederaxy_core::selection::SelectionPath;
use ederaxy_core::upload::{validate_thumbnail_file, validate_video_file, UploadFile};
use ederaxy_core::wizard_step::{step_satisfied, validate_breadcrumb_jump, WizardStep};
use ederaxy_store::CatalogStore;

use crate::config::SubmitConfig;
use crate::events::SubmitEvent;
use crate::submit::run_submission;

/// Notice shown after a user-initiated cancellation.
pub const CANCELLED_NOTICE: &str = "Upload cancelled";

/// Coarse lifecycle phase of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    /// Stepping through selections; navigation is allowed.
    Editing,
    /// The submission task is running; navigation is locked.
    Submitting,
    /// The video reached `ready`. Terminal for this wizard session.
    Done,
}

/// Bookkeeping for one running submission task.
struct SubmissionHandle {
    cancel: CancellationToken,
    events: mpsc::UnboundedReceiver<SubmitEvent>,
    task: tokio::task::JoinHandle<()>,
}

/// The lesson-video upload wizard.
pub struct UploadWizard {
    api: Arc<dyn LessonVideoApi>,
    store: Arc<CatalogStore>,
    config: SubmitConfig,
    step: WizardStep,
    phase: WizardPhase,
    selection: SelectionPath,
    video_file: Option<UploadFile>,
    thumbnail_file: Option<UploadFile>,
    progress: u8,
    submit_error: Option<String>,
    notice: Option<String>,
    submission: Option<SubmissionHandle>,
}

impl UploadWizard {
    pub fn new(api: Arc<dyn LessonVideoApi>, store: Arc<CatalogStore>) -> Self {
        Self::with_config(api, store, SubmitConfig::default())
    }

    pub fn with_config(
        api: Arc<dyn LessonVideoApi>,
        store: Arc<CatalogStore>,
        config: SubmitConfig,
    ) -> Self {
        Self {
            api,
            store,
            config,
            step: WizardStep::Curriculum,
            phase: WizardPhase::Editing,
            selection: SelectionPath::new(),
            video_file: None,
            thumbnail_file: None,
            progress: 0,
            submit_error: None,
            notice: None,
            submission: None,
        }
    }

    // ---- accessors ----

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn selection(&self) -> &SelectionPath {
        &self.selection
    }

    /// Cosmetic progress percentage shown while submitting.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// The flattened user-facing error from the last submission attempt.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    // ---- selections ----

    pub fn select_curriculum(&mut self, id: impl Into<String>) {
        if self.editing() {
            self.selection.select_curriculum(id.into());
        }
    }

    pub fn select_level(&mut self, id: impl Into<String>) {
        if self.editing() {
            self.selection.select_level(id.into());
        }
    }

    pub fn select_class(&mut self, id: impl Into<String>) {
        if self.editing() {
            self.selection.select_class(id.into());
        }
    }

    pub fn select_subject(&mut self, id: impl Into<String>) {
        if self.editing() {
            self.selection.select_subject(id.into());
        }
    }

    pub fn select_course(&mut self, id: impl Into<String>) {
        if self.editing() {
            self.selection.select_course(id.into());
        }
    }

    pub fn select_lesson(&mut self, id: impl Into<String>) {
        if self.editing() {
            self.selection.select_lesson(id.into());
        }
    }

    /// Choose the video file. Rejects non-video MIME types up front.
    pub fn set_video_file(&mut self, file: UploadFile) -> Result<(), CoreError> {
        validate_video_file(&file)?;
        self.video_file = Some(file);
        Ok(())
    }

    /// Choose the thumbnail image. Rejects non-image MIME types up front.
    pub fn set_thumbnail_file(&mut self, file: UploadFile) -> Result<(), CoreError> {
        validate_thumbnail_file(&file)?;
        self.thumbnail_file = Some(file);
        Ok(())
    }

    // ---- navigation ----

    /// Advance one step if the current step's gating predicate holds.
    ///
    /// Returns `true` if the wizard advanced; a `false` return leaves
    /// the state untouched.
    pub fn next(&mut self) -> bool {
        if !self.editing() {
            return false;
        }
        if !step_satisfied(
            self.step,
            &self.selection,
            self.video_file.is_some(),
            self.thumbnail_file.is_some(),
        ) {
            return false;
        }
        match self.step.next() {
            Some(next) => {
                self.step = next;
                true
            }
            None => false,
        }
    }

    /// Go back one step. Downstream selections are kept, so accidental
    /// back-navigation loses nothing; changing an upstream selection is
    /// what clears downstream ones.
    pub fn back(&mut self) -> bool {
        if !self.editing() {
            return false;
        }
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                true
            }
            None => false,
        }
    }

    /// Breadcrumb jump to a strictly earlier step.
    pub fn jump_to(&mut self, target: WizardStep) -> Result<(), CoreError> {
        if !self.editing() {
            return Err(CoreError::Validation(
                "Cannot navigate while a submission is in progress".to_string(),
            ));
        }
        validate_breadcrumb_jump(self.step, target)?;
        self.step = target;
        Ok(())
    }

    // ---- submission ----

    /// Validate and start the submission task.
    ///
    /// Only callable from the review step. On missing data the error is
    /// surfaced (and recorded as `submit_error`) without any state
    /// change or network call.
    pub fn submit(&mut self) -> Result<(), CoreError> {
        if self.phase != WizardPhase::Editing || self.step != WizardStep::Review {
            return self.reject_submit("Submission is only possible from the review step");
        }
        let lesson_id = match (&self.selection.lesson_id, self.selection.is_complete()) {
            (Some(id), true) => id.clone(),
            _ => return self.reject_submit("Please choose a lesson"),
        };
        let video_file = match &self.video_file {
            Some(file) => file.clone(),
            None => return self.reject_submit("Please select a video file"),
        };
        let thumbnail_file = match &self.thumbnail_file {
            Some(file) => file.clone(),
            None => return self.reject_submit("Please select a thumbnail image"),
        };

        self.submit_error = None;
        self.notice = None;
        self.progress = 0;
        self.phase = WizardPhase::Submitting;

        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_submission(
            Arc::clone(&self.api),
            Arc::clone(&self.store),
            self.config.clone(),
            lesson_id,
            video_file,
            thumbnail_file,
            cancel.clone(),
            tx,
        ));
        self.submission = Some(SubmissionHandle {
            cancel,
            events: rx,
            task,
        });
        Ok(())
    }

    /// Cancel the running submission.
    ///
    /// Stops all client-side timers and observation immediately and
    /// returns to review; the server is not asked to abort anything.
    /// Calling this when no submission is running has no effect.
    pub fn cancel_upload(&mut self) {
        if self.phase != WizardPhase::Submitting {
            return;
        }
        if let Some(handle) = &self.submission {
            handle.cancel.cancel();
        }
        self.phase = WizardPhase::Editing;
        self.notice = Some(CANCELLED_NOTICE.to_string());
        tracing::info!("Upload cancelled by user");
    }

    /// Receive the next submission event and fold it into the machine.
    ///
    /// Returns `None` when no submission is running or the task has
    /// finished and its channel is drained.
    pub async fn next_event(&mut self) -> Option<SubmitEvent> {
        let event = match self.submission.as_mut() {
            Some(handle) => handle.events.recv().await?,
            None => return None,
        };
        self.apply(&event);
        Some(event)
    }

    /// Fold one submission event into the wizard state.
    pub fn apply(&mut self, event: &SubmitEvent) {
        match event {
            SubmitEvent::Progress { percent } => {
                if self.phase == WizardPhase::Submitting {
                    self.progress = *percent;
                }
            }
            SubmitEvent::Completed { .. } => {
                self.progress = ederaxy_core::progress::PROGRESS_COMPLETE;
                self.phase = WizardPhase::Done;
                self.drop_submission_task();
            }
            SubmitEvent::Failed { error } => {
                self.submit_error = Some(error.to_string());
                self.phase = WizardPhase::Editing;
                self.drop_submission_task();
            }
            SubmitEvent::Cancelled => {
                // Usually already back in Editing via cancel_upload();
                // this also covers a token cancelled externally.
                if self.phase == WizardPhase::Submitting {
                    self.phase = WizardPhase::Editing;
                    self.notice = Some(CANCELLED_NOTICE.to_string());
                }
                self.drop_submission_task();
            }
            // Store-side effects of these already happened in the task.
            SubmitEvent::VideoUploaded { .. }
            | SubmitEvent::VideoAvailable { .. }
            | SubmitEvent::ThumbnailUploaded { .. }
            | SubmitEvent::StatusPolled { .. } => {}
        }
    }

    // ---- private helpers ----

    fn editing(&self) -> bool {
        self.phase == WizardPhase::Editing
    }

    fn reject_submit(&mut self, message: &str) -> Result<(), CoreError> {
        self.submit_error = Some(message.to_string());
        Err(CoreError::Validation(message.to_string()))
    }

    /// Forget the finished submission task. The join handle is dropped,
    /// not aborted; the task has already sent its terminal event.
    fn drop_submission_task(&mut self) {
        if let Some(handle) = self.submission.take() {
            drop(handle.task);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
