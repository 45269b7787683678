//! HTTP client for the curriculum-hierarchy CRUD endpoints.
//!
//! These endpoints are opaque collaborators of the upload flow: the
//! wizard's selection steps list children of the current selection, and
//! the "create new" flows post a name/title and get the created entity
//! back. No contract beyond the entity shapes is assumed.

use serde::Serialize;

use ederaxy_core::hierarchy::{
    AcademicClass, AcademicLevel, Course, Curriculum, Lesson, Subject,
};

use crate::dto::{
    AcademicClassDto, AcademicLevelDto, CourseDto, CurriculumDto, LessonDto, SubjectDto,
};
use crate::video_api::VideoApiError;

/// HTTP client for the hierarchy endpoints of one backend.
pub struct CurriculumApi {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct NamePayload<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LevelPayload<'a> {
    curriculum_id: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassPayload<'a> {
    level_id: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CoursePayload<'a> {
    subject_id: &'a str,
    title: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LessonPayload<'a> {
    course_id: &'a str,
    order: u32,
    title: &'a str,
}

impl CurriculumApi {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Reuse an existing [`reqwest::Client`] (shared pool with the
    /// video client).
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    // ---- listing ----

    pub async fn list_curriculums(&self) -> Result<Vec<Curriculum>, VideoApiError> {
        let dtos: Vec<CurriculumDto> = self.get_json("/curriculums").await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    pub async fn list_levels(&self, curriculum_id: &str) -> Result<Vec<AcademicLevel>, VideoApiError> {
        let path = format!("/academic-levels?curriculum={curriculum_id}");
        let dtos: Vec<AcademicLevelDto> = self.get_json(&path).await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    pub async fn list_classes(&self, level_id: &str) -> Result<Vec<AcademicClass>, VideoApiError> {
        let path = format!("/academic-classes?level={level_id}");
        let dtos: Vec<AcademicClassDto> = self.get_json(&path).await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    pub async fn list_subjects(&self, curriculum_id: &str) -> Result<Vec<Subject>, VideoApiError> {
        let path = format!("/subjects?curriculum={curriculum_id}");
        let dtos: Vec<SubjectDto> = self.get_json(&path).await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    pub async fn list_courses(&self, subject_id: &str) -> Result<Vec<Course>, VideoApiError> {
        let path = format!("/courses?subject={subject_id}");
        let dtos: Vec<CourseDto> = self.get_json(&path).await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    pub async fn list_lessons(&self, course_id: &str) -> Result<Vec<Lesson>, VideoApiError> {
        let path = format!("/lessons?course={course_id}");
        let dtos: Vec<LessonDto> = self.get_json(&path).await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    // ---- creation ----

    pub async fn create_curriculum(&self, name: &str) -> Result<Curriculum, VideoApiError> {
        let dto: CurriculumDto = self.post_json("/curriculums", &NamePayload { name }).await?;
        Ok(dto.into())
    }

    pub async fn create_level(
        &self,
        curriculum_id: &str,
        name: &str,
    ) -> Result<AcademicLevel, VideoApiError> {
        let dto: AcademicLevelDto = self
            .post_json(
                "/academic-levels",
                &LevelPayload {
                    curriculum_id,
                    name,
                },
            )
            .await?;
        Ok(dto.into())
    }

    pub async fn create_class(
        &self,
        level_id: &str,
        name: &str,
    ) -> Result<AcademicClass, VideoApiError> {
        let dto: AcademicClassDto = self
            .post_json("/academic-classes", &ClassPayload { level_id, name })
            .await?;
        Ok(dto.into())
    }

    pub async fn create_subject(
        &self,
        curriculum_id: &str,
        name: &str,
    ) -> Result<Subject, VideoApiError> {
        #[derive(Debug, Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Payload<'a> {
            curriculum_id: &'a str,
            name: &'a str,
        }
        let dto: SubjectDto = self
            .post_json(
                "/subjects",
                &Payload {
                    curriculum_id,
                    name,
                },
            )
            .await?;
        Ok(dto.into())
    }

    pub async fn create_course(
        &self,
        subject_id: &str,
        title: &str,
    ) -> Result<Course, VideoApiError> {
        let dto: CourseDto = self
            .post_json("/courses", &CoursePayload { subject_id, title })
            .await?;
        Ok(dto.into())
    }

    pub async fn create_lesson(
        &self,
        course_id: &str,
        order: u32,
        title: &str,
    ) -> Result<Lesson, VideoApiError> {
        let dto: LessonDto = self
            .post_json(
                "/lessons",
                &LessonPayload {
                    course_id,
                    order,
                    title,
                },
            )
            .await?;
        Ok(dto.into())
    }

    // ---- private helpers ----

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, VideoApiError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn post_json<T: serde::de::DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, VideoApiError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, VideoApiError> {
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
        Ok(response.json::<T>().await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
