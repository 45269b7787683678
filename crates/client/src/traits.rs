//! Trait seam over the lesson-video operations.
//!
//! The wizard's submission protocol only needs the three video
//! operations, so it takes this trait instead of the concrete
//! [`VideoApi`](crate::VideoApi) and can be driven by scripted fakes in
//! tests.

use async_trait::async_trait;

use ederaxy_core::upload::UploadFile;
use ederaxy_core::video::Video;

use crate::video_api::{VideoApi, VideoApiError};

/// The remote video API as seen by the upload wizard.
#[async_trait]
pub trait LessonVideoApi: Send + Sync {
    /// `POST /lessons/{id}/video` — multipart video upload.
    async fn upload_video(
        &self,
        lesson_id: &str,
        file: &UploadFile,
    ) -> Result<Video, VideoApiError>;

    /// `GET /lessons/{id}/video` — current video record.
    async fn get_video(&self, lesson_id: &str) -> Result<Video, VideoApiError>;

    /// `POST /lessons/{id}/video/thumbnail` — multipart thumbnail upload.
    async fn upload_thumbnail(
        &self,
        lesson_id: &str,
        file: &UploadFile,
    ) -> Result<Video, VideoApiError>;
}

#[async_trait]
impl LessonVideoApi for VideoApi {
    async fn upload_video(
        &self,
        lesson_id: &str,
        file: &UploadFile,
    ) -> Result<Video, VideoApiError> {
        VideoApi::upload_video(self, lesson_id, file).await
    }

    async fn get_video(&self, lesson_id: &str) -> Result<Video, VideoApiError> {
        VideoApi::get_video(self, lesson_id).await
    }

    async fn upload_thumbnail(
        &self,
        lesson_id: &str,
        file: &UploadFile,
    ) -> Result<Video, VideoApiError> {
        VideoApi::upload_thumbnail(self, lesson_id, file).await
    }
}
