//! Wire DTOs for backend responses.
//!
//! The backend speaks camelCase JSON and is loose about optional fields,
//! so every response is parsed into one of these structs and then
//! normalized into the core domain types. Shape problems surface here as
//! decode errors instead of panics at the point of use.

use serde::Deserialize;

use ederaxy_core::error::CoreError;
use ederaxy_core::hierarchy::{
    AcademicClass, AcademicLevel, Course, Curriculum, Lesson, Subject,
};
use ederaxy_core::video::{Video, VideoStatus, VideoVariant};

// ---------------------------------------------------------------------------
// Video record
// ---------------------------------------------------------------------------

/// The `lesson` field of a video record: either a bare id or an embedded
/// lesson object, depending on whether the backend populated the
/// reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LessonRefDto {
    Id(String),
    Object { id: String },
}

impl LessonRefDto {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Object { id } => id,
        }
    }
}

/// One HLS rendition entry in a video record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoVariantDto {
    pub label: String,
    pub playlist_path: String,
}

/// A video record as returned by `POST/GET /lessons/{id}/video` and the
/// thumbnail endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecordDto {
    pub id: String,
    pub lesson: LessonRefDto,
    pub status: String,
    #[serde(default)]
    pub original_file_name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub hls_master_playlist_path: Option<String>,
    #[serde(default)]
    pub variants: Vec<VideoVariantDto>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<ederaxy_core::Timestamp>,
    #[serde(default)]
    pub updated_at: Option<ederaxy_core::Timestamp>,
}

impl VideoRecordDto {
    /// Normalize the wire record into the core [`Video`] type.
    pub fn into_video(self) -> Result<Video, CoreError> {
        let status = VideoStatus::from_wire(&self.status)?;
        Ok(Video {
            id: self.id,
            lesson_id: self.lesson.id().to_string(),
            status,
            original_file_name: self.original_file_name.unwrap_or_default(),
            mime_type: self.mime_type.unwrap_or_default(),
            size: self.size.unwrap_or(0),
            duration_secs: self.duration,
            thumbnail_url: self.thumbnail_url,
            failure_reason: self.failure_reason,
            job_id: self.job_id,
            hls_master_playlist_path: self.hls_master_playlist_path,
            variants: self
                .variants
                .into_iter()
                .map(|v| VideoVariant {
                    label: v.label,
                    playlist_path: v.playlist_path,
                })
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Hierarchy entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CurriculumDto {
    pub id: String,
    pub name: String,
}

impl From<CurriculumDto> for Curriculum {
    fn from(dto: CurriculumDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicLevelDto {
    pub id: String,
    pub curriculum_id: String,
    pub name: String,
}

impl From<AcademicLevelDto> for AcademicLevel {
    fn from(dto: AcademicLevelDto) -> Self {
        Self {
            id: dto.id,
            curriculum_id: dto.curriculum_id,
            name: dto.name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicClassDto {
    pub id: String,
    pub level_id: String,
    pub name: String,
}

impl From<AcademicClassDto> for AcademicClass {
    fn from(dto: AcademicClassDto) -> Self {
        Self {
            id: dto.id,
            level_id: dto.level_id,
            name: dto.name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDto {
    pub id: String,
    pub curriculum_id: String,
    #[serde(default)]
    pub class_id: Option<String>,
    pub name: String,
}

impl From<SubjectDto> for Subject {
    fn from(dto: SubjectDto) -> Self {
        Self {
            id: dto.id,
            curriculum_id: dto.curriculum_id,
            class_id: dto.class_id,
            name: dto.name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    pub id: String,
    pub subject_id: String,
    pub title: String,
}

impl From<CourseDto> for Course {
    fn from(dto: CourseDto) -> Self {
        Self {
            id: dto.id,
            subject_id: dto.subject_id,
            title: dto.title,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDto {
    pub id: String,
    pub course_id: String,
    pub order: u32,
    pub title: String,
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub updated_at: Option<ederaxy_core::Timestamp>,
}

impl From<LessonDto> for Lesson {
    fn from(dto: LessonDto) -> Self {
        Self {
            id: dto.id,
            course_id: dto.course_id,
            order: dto.order,
            title: dto.title,
            video_id: dto.video_id,
            updated_at: dto.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
