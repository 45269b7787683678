//! Upload file descriptors and pre-submission validation.

use crate::error::CoreError;

/// A file chosen by the user for upload (video or thumbnail).
///
/// Carries the full byte payload; the files in this flow are a lesson
/// video and a thumbnail image, both read into memory before the
/// multipart POST.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Validate a file chosen as the lesson video.
pub fn validate_video_file(file: &UploadFile) -> Result<(), CoreError> {
    if file.bytes.is_empty() {
        return Err(CoreError::Validation(
            "Video file is empty".to_string(),
        ));
    }
    if !file.mime_type.starts_with("video/") {
        return Err(CoreError::Validation(format!(
            "Expected a video file, got '{}'",
            file.mime_type
        )));
    }
    Ok(())
}

/// Validate a file chosen as the thumbnail image.
pub fn validate_thumbnail_file(file: &UploadFile) -> Result<(), CoreError> {
    if file.bytes.is_empty() {
        return Err(CoreError::Validation(
            "Thumbnail file is empty".to_string(),
        ));
    }
    if !file.mime_type.starts_with("image/") {
        return Err(CoreError::Validation(format!(
            "Expected an image file, got '{}'",
            file.mime_type
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
