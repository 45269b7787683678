//! HTTP client for the lesson-video endpoints.
//!
//! Wraps the three video operations (multipart upload, status GET,
//! thumbnail upload) and classifies the recoverable "video is not
//! available yet" condition that the submission protocol retries on.

use reqwest::multipart::{Form, Part};

use ederaxy_core::upload::UploadFile;
use ederaxy_core::video::Video;

use crate::dto::VideoRecordDto;

/// Marker substring the backend puts in error bodies while the uploaded
/// video has not been linked to its lesson yet.
///
/// Matching on a human-readable message is fragile; it stays until the
/// backend grows a structured error code (tracked upstream), and is
/// isolated behind [`VideoApiError::is_not_ready`] so tightening the
/// contract is a one-line change here.
const NOT_AVAILABLE_MARKER: &str = "video is not available";

/// HTTP client for the lesson-video endpoints of one backend.
pub struct VideoApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the video API layer.
#[derive(Debug, thiserror::Error)]
pub enum VideoApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Video API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging and message matching.
        body: String,
    },

    /// A 2xx response body could not be normalized into a domain type.
    #[error("Failed to decode video API response: {0}")]
    Decode(String),
}

impl VideoApiError {
    /// Whether this error means "the video is not linked yet, try again".
    ///
    /// True for HTTP 404 and for any error body containing the
    /// [`NOT_AVAILABLE_MARKER`] phrase (case-insensitive). Everything
    /// else is a genuine failure and must not be retried.
    pub fn is_not_ready(&self) -> bool {
        match self {
            Self::Api { status, body } => {
                *status == 404 || body.to_ascii_lowercase().contains(NOT_AVAILABLE_MARKER)
            }
            _ => false,
        }
    }
}

impl VideoApi {
    /// Create a new client for a backend.
    ///
    /// * `base_url` - Base HTTP URL without a trailing slash,
    ///   e.g. `http://localhost:4000`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`] (shares
    /// the connection pool with the curriculum client).
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Upload a video file for a lesson.
    ///
    /// Sends `POST /lessons/{lesson_id}/video` as multipart form data.
    /// Returns the freshly created video record.
    pub async fn upload_video(
        &self,
        lesson_id: &str,
        file: &UploadFile,
    ) -> Result<Video, VideoApiError> {
        let form = Self::file_form(file)?;

        let response = self
            .client
            .post(format!("{}/lessons/{}/video", self.base_url, lesson_id))
            .multipart(form)
            .send()
            .await?;

        let video = Self::parse_video(response).await?;
        tracing::info!(
            lesson_id,
            video_id = %video.id,
            size = file.size(),
            "Video uploaded",
        );
        Ok(video)
    }

    /// Fetch the lesson's current video record.
    ///
    /// Sends `GET /lessons/{lesson_id}/video`. A 404 is a recoverable
    /// condition while the server is still linking a fresh upload; use
    /// [`VideoApiError::is_not_ready`] to classify it.
    pub async fn get_video(&self, lesson_id: &str) -> Result<Video, VideoApiError> {
        let response = self
            .client
            .get(format!("{}/lessons/{}/video", self.base_url, lesson_id))
            .send()
            .await?;

        Self::parse_video(response).await
    }

    /// Upload a thumbnail image for the lesson's video.
    ///
    /// Sends `POST /lessons/{lesson_id}/video/thumbnail` as multipart
    /// form data. May fail with a not-ready error if the video has not
    /// been linked yet.
    pub async fn upload_thumbnail(
        &self,
        lesson_id: &str,
        file: &UploadFile,
    ) -> Result<Video, VideoApiError> {
        let form = Self::file_form(file)?;

        let response = self
            .client
            .post(format!(
                "{}/lessons/{}/video/thumbnail",
                self.base_url, lesson_id
            ))
            .multipart(form)
            .send()
            .await?;

        let video = Self::parse_video(response).await?;
        tracing::info!(lesson_id, video_id = %video.id, "Thumbnail uploaded");
        Ok(video)
    }

    // ---- private helpers ----

    /// Build a single-part multipart form carrying the file payload.
    fn file_form(file: &UploadFile) -> Result<Form, VideoApiError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)?;
        Ok(Form::new().part("file", part))
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`VideoApiError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, VideoApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(VideoApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful response body into a normalized [`Video`].
    async fn parse_video(response: reqwest::Response) -> Result<Video, VideoApiError> {
        let response = Self::ensure_success(response).await?;
        let dto = response.json::<VideoRecordDto>().await?;
        dto.into_video()
            .map_err(|e| VideoApiError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
