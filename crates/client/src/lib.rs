//! REST client for the Ederaxy backend.
//!
//! Wraps the lesson-video endpoints (multipart upload, status GET,
//! thumbnail upload) and the curriculum-hierarchy CRUD endpoints using
//! [`reqwest`]. All responses are deserialized into typed wire DTOs at
//! this boundary and converted to the core domain types; no raw JSON
//! escapes the client.

pub mod config;
pub mod curriculum_api;
pub mod dto;
pub mod traits;
pub mod video_api;

pub use config::ApiConfig;
pub use curriculum_api::CurriculumApi;
pub use traits::LessonVideoApi;
pub use video_api::{VideoApi, VideoApiError};
