//! Events emitted by the submission task.
//!
//! The submission protocol runs detached from the wizard state machine;
//! it reports every observable state change over an unbounded mpsc
//! channel. The UI shell (or the CLI) drains the channel and folds each
//! event into the machine via
//! [`UploadWizard::apply`](crate::machine::UploadWizard::apply).

use ederaxy_core::video::Video;

use crate::submit::SubmitError;

/// A state change observed during submission.
#[derive(Debug, Clone)]
pub enum SubmitEvent {
    /// The video file was accepted by the backend.
    VideoUploaded { video: Video },

    /// The availability wait saw the video linked to its lesson.
    VideoAvailable { video: Video },

    /// The thumbnail was accepted by the backend.
    ThumbnailUploaded { video: Video },

    /// A status poll returned a fresh record (any status).
    StatusPolled { video: Video },

    /// The cosmetic progress percentage advanced.
    Progress { percent: u8 },

    /// Terminal: the video reached `ready`.
    Completed { video: Video },

    /// Terminal: the submission failed and the wizard returns to review.
    Failed { error: SubmitError },

    /// Terminal: the user cancelled while submitting.
    Cancelled,
}

impl SubmitEvent {
    /// Whether this event ends the submission task.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. } | Self::Failed { .. } | Self::Cancelled
        )
    }
}
