//! Domain model and validation for the Ederaxy lesson-video upload engine.
//!
//! Everything here is pure data and synchronous validation: the curriculum
//! hierarchy entities, the video/status records mirrored from the remote
//! API, the wizard step sequence with its gating rules, and the error
//! taxonomy shared by the other crates.

pub mod error;
pub mod hierarchy;
pub mod progress;
pub mod selection;
pub mod types;
pub mod upload;
pub mod video;
pub mod wizard_step;

pub use error::CoreError;
pub use types::{EntityId, Timestamp};
pub use video::{Video, VideoStatus};
