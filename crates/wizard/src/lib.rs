//! The lesson-video upload wizard.
//!
//! [`UploadWizard`](machine::UploadWizard) drives a teacher through
//! hierarchy selection, file selection, review, and submission. The
//! submission protocol itself (upload, availability wait, thumbnail with
//! not-ready retry, status polling) runs as a spawned task that reports
//! back over a [`SubmitEvent`](events::SubmitEvent) channel and is
//! stopped through a cancellation token. Cancellation is cooperative and
//! client-side only: it stops observation and retries, it never asks the
//! server to abort processing.

pub mod config;
pub mod events;
pub mod machine;
pub mod poller;
pub mod submit;

#[cfg(test)]
pub(crate) mod testing;

pub use config::SubmitConfig;
pub use events::SubmitEvent;
pub use machine::{UploadWizard, WizardPhase};
pub use poller::{PollerHandle, StatusPoller};
pub use submit::SubmitError;
