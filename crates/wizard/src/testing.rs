//! Scripted fake of the lesson-video API for wizard tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use ederaxy_client::{LessonVideoApi, VideoApiError};
use ederaxy_core::upload::UploadFile;
use ederaxy_core::video::{Video, VideoStatus};

type ApiResult = Result<Video, VideoApiError>;
type ResultFactory = Box<dyn Fn() -> ApiResult + Send + Sync>;

/// A [`LessonVideoApi`] that replays scripted responses in order.
///
/// Each operation pops from its own queue; when a GET queue runs dry the
/// optional `always_get` factory takes over. An unscripted call panics,
/// which doubles as the "no further requests were issued" assertion in
/// cancellation and termination tests.
#[derive(Clone, Default)]
pub(crate) struct ScriptedApi {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    uploads: Mutex<VecDeque<ApiResult>>,
    gets: Mutex<VecDeque<ApiResult>>,
    thumbnails: Mutex<VecDeque<ApiResult>>,
    fallback_get: Mutex<Option<ResultFactory>>,
    upload_calls: AtomicU32,
    get_calls: AtomicU32,
    thumbnail_calls: AtomicU32,
}

impl ScriptedApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_upload(&self, result: ApiResult) {
        self.inner.uploads.lock().unwrap().push_back(result);
    }

    pub(crate) fn push_get(&self, result: ApiResult) {
        self.inner.gets.lock().unwrap().push_back(result);
    }

    pub(crate) fn push_thumbnail(&self, result: ApiResult) {
        self.inner.thumbnails.lock().unwrap().push_back(result);
    }

    /// Serve every GET (after the queue is drained) from this factory.
    pub(crate) fn always_get<F>(&self, factory: F)
    where
        F: Fn() -> ApiResult + Send + Sync + 'static,
    {
        *self.inner.fallback_get.lock().unwrap() = Some(Box::new(factory));
    }

    pub(crate) fn upload_calls(&self) -> u32 {
        self.inner.upload_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn get_calls(&self) -> u32 {
        self.inner.get_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn thumbnail_calls(&self) -> u32 {
        self.inner.thumbnail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LessonVideoApi for ScriptedApi {
    async fn upload_video(&self, _lesson_id: &str, _file: &UploadFile) -> ApiResult {
        self.inner.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .uploads
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted upload_video call")
    }

    async fn get_video(&self, _lesson_id: &str) -> ApiResult {
        self.inner.get_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(result) = self.inner.gets.lock().unwrap().pop_front() {
            return result;
        }
        let fallback = self.inner.fallback_get.lock().unwrap();
        match fallback.as_ref() {
            Some(factory) => factory(),
            None => panic!("unscripted get_video call"),
        }
    }

    async fn upload_thumbnail(&self, _lesson_id: &str, _file: &UploadFile) -> ApiResult {
        self.inner.thumbnail_calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .thumbnails
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted upload_thumbnail call")
    }
}

/// A minimal video record for scripting responses.
pub(crate) fn video_record(id: &str, lesson_id: &str, status: VideoStatus) -> Video {
    Video {
        id: id.into(),
        lesson_id: lesson_id.into(),
        status,
        original_file_name: "lecture.mp4".into(),
        mime_type: "video/mp4".into(),
        size: 10 * 1024 * 1024,
        duration_secs: None,
        thumbnail_url: None,
        failure_reason: None,
        job_id: None,
        hls_master_playlist_path: None,
        variants: vec![],
        created_at: None,
        updated_at: None,
    }
}

pub(crate) fn mp4() -> UploadFile {
    UploadFile::new("video.mp4", "video/mp4", vec![0u8; 64])
}

pub(crate) fn png() -> UploadFile {
    UploadFile::new("thumb.png", "image/png", vec![0u8; 16])
}
