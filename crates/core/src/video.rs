//! Video status and record types mirrored from the remote video API.
//!
//! A [`Video`] is an ephemeral, client-held mirror of server state: it is
//! created speculatively when an upload starts and overwritten wholesale
//! each time a poll returns a fresher record. A lesson has at most one
//! current video; uploading again supersedes the old record, it is never
//! merged.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Video status
// ---------------------------------------------------------------------------

/// Processing status of an uploaded lesson video.
///
/// The happy path is monotonic: `Uploaded -> Processing -> Ready`.
/// `Failed` is reachable from `Processing`, or from a stalled `Uploaded`
/// after repeated polling misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    Uploaded,
    Processing,
    Ready,
    Failed,
}

impl VideoStatus {
    /// Parse a status string from the wire.
    pub fn from_wire(s: &str) -> Result<Self, CoreError> {
        match s {
            "uploaded" => Ok(Self::Uploaded),
            "processing" => Ok(Self::Processing),
            "ready" => Ok(Self::Ready),
            "failed" => Ok(Self::Failed),
            _ => Err(CoreError::Parse(format!(
                "Invalid video status '{s}'. Must be one of: uploaded, processing, ready, failed"
            ))),
        }
    }

    /// Convert to the wire-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::Processing => "processing",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }

    /// Whether this status ends the polling loop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }

    /// Whether moving from `self` to `next` respects the status ordering.
    ///
    /// Repeating the same status is allowed (polls often observe the same
    /// state twice). Moving backwards (e.g. `Processing -> Uploaded`) is not.
    pub fn can_transition_to(&self, next: VideoStatus) -> bool {
        use VideoStatus::*;
        match (self, next) {
            (a, b) if *a == b => true,
            (Uploaded, Processing) | (Uploaded, Failed) => true,
            (Processing, Ready) | (Processing, Failed) => true,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Video record
// ---------------------------------------------------------------------------

/// A single HLS rendition produced by server-side processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoVariant {
    /// Rendition label, e.g. `"720p"`.
    pub label: String,
    /// Playlist path for this rendition.
    pub playlist_path: String,
}

/// The uploaded media asset and its processing record for one lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: EntityId,
    pub lesson_id: EntityId,
    pub status: VideoStatus,
    pub original_file_name: String,
    pub mime_type: String,
    /// File size in bytes as reported by the server.
    pub size: u64,
    /// Duration in seconds, known once processing completes.
    pub duration_secs: Option<u32>,
    pub thumbnail_url: Option<String>,
    /// Server-reported reason when `status` is `Failed`.
    pub failure_reason: Option<String>,
    /// Server-side processing job identifier, if assigned.
    pub job_id: Option<String>,
    pub hls_master_playlist_path: Option<String>,
    pub variants: Vec<VideoVariant>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
