//! Operator CLI: upload one lesson video end-to-end.
//!
//! Usage: `ederaxy-upload <lesson-id> <video-file> <thumbnail-file>`
//!
//! Runs the full submission protocol (upload, availability wait,
//! thumbnail, status polling) against the backend configured via
//! `EDERAXY_API_URL`, logging each event until the video is ready or the
//! submission fails. Ctrl-C cancels client-side observation.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ederaxy_client::{ApiConfig, VideoApi};
use ederaxy_core::upload::{validate_thumbnail_file, validate_video_file, UploadFile};
use ederaxy_store::CatalogStore;
use ederaxy_wizard::submit::run_submission;
use ederaxy_wizard::{SubmitConfig, SubmitEvent};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ederaxy=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        eprintln!("Usage: ederaxy-upload <lesson-id> <video-file> <thumbnail-file>");
        return ExitCode::FAILURE;
    }
    let lesson_id = args[1].clone();

    let video_file = match read_upload_file(&args[2]).await {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot read video file: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = validate_video_file(&video_file) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let thumbnail_file = match read_upload_file(&args[3]).await {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot read thumbnail file: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = validate_thumbnail_file(&thumbnail_file) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let config = ApiConfig::from_env();
    tracing::info!(base_url = %config.base_url, lesson_id = %lesson_id, "Starting upload");

    let http = config.build_http_client();
    let api = Arc::new(VideoApi::with_client(http, config.base_url.clone()));
    let store = Arc::new(CatalogStore::new());

    let cancel = CancellationToken::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let task = tokio::spawn(run_submission(
        api,
        store,
        SubmitConfig::default(),
        lesson_id,
        video_file,
        thumbnail_file,
        cancel.clone(),
        tx,
    ));

    // Forward Ctrl-C to the cancellation token.
    let ctrlc_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping client-side observation");
            ctrlc_cancel.cancel();
        }
    });

    let mut exit = ExitCode::SUCCESS;
    while let Some(event) = rx.recv().await {
        match event {
            SubmitEvent::VideoUploaded { video } => {
                tracing::info!(video_id = %video.id, "Video uploaded");
            }
            SubmitEvent::VideoAvailable { video } => {
                tracing::info!(video_id = %video.id, "Video linked to lesson");
            }
            SubmitEvent::ThumbnailUploaded { video } => {
                tracing::info!(video_id = %video.id, "Thumbnail uploaded");
            }
            SubmitEvent::StatusPolled { video } => {
                tracing::debug!(video_id = %video.id, status = video.status.as_str(), "Status poll");
            }
            SubmitEvent::Progress { percent } => {
                tracing::info!(percent, "Processing");
            }
            SubmitEvent::Completed { video } => {
                tracing::info!(
                    video_id = %video.id,
                    duration_secs = video.duration_secs,
                    "Video ready",
                );
            }
            SubmitEvent::Failed { error } => {
                tracing::error!(%error, "Submission failed");
                exit = ExitCode::FAILURE;
            }
            SubmitEvent::Cancelled => {
                tracing::warn!("Submission cancelled");
                exit = ExitCode::FAILURE;
            }
        }
    }

    let _ = task.await;
    exit
}

/// Read a file into an [`UploadFile`], guessing the MIME type from the
/// extension.
async fn read_upload_file(path: &str) -> std::io::Result<UploadFile> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    let mime_type = guess_mime(&file_name);
    Ok(UploadFile::new(file_name, mime_type, bytes))
}

fn guess_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
