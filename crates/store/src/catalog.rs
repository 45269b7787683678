//! The shared in-memory entity store.

use std::collections::HashMap;

use tokio::sync::RwLock;

use ederaxy_core::hierarchy::{
    AcademicClass, AcademicLevel, Course, Curriculum, Lesson, Subject,
};
use ederaxy_core::types::EntityId;
use ederaxy_core::video::Video;

/// Single source of truth for hierarchy entities and video records.
///
/// Backed by `RwLock`-protected maps. Video records are keyed by lesson
/// id because a lesson has at most one current video; a new upload for
/// the same lesson replaces the old record wholesale.
#[derive(Default)]
pub struct CatalogStore {
    curriculums: RwLock<HashMap<EntityId, Curriculum>>,
    levels: RwLock<HashMap<EntityId, AcademicLevel>>,
    classes: RwLock<HashMap<EntityId, AcademicClass>>,
    subjects: RwLock<HashMap<EntityId, Subject>>,
    courses: RwLock<HashMap<EntityId, Course>>,
    lessons: RwLock<HashMap<EntityId, Lesson>>,
    /// Current video per lesson.
    videos: RwLock<HashMap<EntityId, Video>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- curriculum hierarchy ----

    pub async fn insert_curriculum(&self, curriculum: Curriculum) {
        self.curriculums
            .write()
            .await
            .insert(curriculum.id.clone(), curriculum);
    }

    pub async fn list_curriculums(&self) -> Vec<Curriculum> {
        let mut all: Vec<_> = self.curriculums.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub async fn insert_level(&self, level: AcademicLevel) {
        self.levels.write().await.insert(level.id.clone(), level);
    }

    /// Levels belonging to one curriculum.
    pub async fn levels_for_curriculum(&self, curriculum_id: &str) -> Vec<AcademicLevel> {
        let mut all: Vec<_> = self
            .levels
            .read()
            .await
            .values()
            .filter(|l| l.curriculum_id == curriculum_id)
            .cloned()
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub async fn insert_class(&self, class: AcademicClass) {
        self.classes.write().await.insert(class.id.clone(), class);
    }

    pub async fn classes_for_level(&self, level_id: &str) -> Vec<AcademicClass> {
        let mut all: Vec<_> = self
            .classes
            .read()
            .await
            .values()
            .filter(|c| c.level_id == level_id)
            .cloned()
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub async fn insert_subject(&self, subject: Subject) {
        self.subjects
            .write()
            .await
            .insert(subject.id.clone(), subject);
    }

    pub async fn subjects_for_curriculum(&self, curriculum_id: &str) -> Vec<Subject> {
        let mut all: Vec<_> = self
            .subjects
            .read()
            .await
            .values()
            .filter(|s| s.curriculum_id == curriculum_id)
            .cloned()
            .collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub async fn insert_course(&self, course: Course) {
        self.courses.write().await.insert(course.id.clone(), course);
    }

    pub async fn courses_for_subject(&self, subject_id: &str) -> Vec<Course> {
        let mut all: Vec<_> = self
            .courses
            .read()
            .await
            .values()
            .filter(|c| c.subject_id == subject_id)
            .cloned()
            .collect();
        all.sort_by(|a, b| a.title.cmp(&b.title));
        all
    }

    pub async fn insert_lesson(&self, lesson: Lesson) {
        self.lessons.write().await.insert(lesson.id.clone(), lesson);
    }

    pub async fn get_lesson(&self, lesson_id: &str) -> Option<Lesson> {
        self.lessons.read().await.get(lesson_id).cloned()
    }

    /// Lessons of a course, ordered by their `order` field.
    pub async fn lessons_for_course(&self, course_id: &str) -> Vec<Lesson> {
        let mut all: Vec<_> = self
            .lessons
            .read()
            .await
            .values()
            .filter(|l| l.course_id == course_id)
            .cloned()
            .collect();
        all.sort_by_key(|l| l.order);
        all
    }

    // ---- videos ----

    /// Replace the lesson's current video record wholesale.
    ///
    /// Also points the lesson's `video_id` at the new record and bumps
    /// its `updated_at`. Every successful fetch in the submission
    /// protocol (upload, availability check, thumbnail, status poll)
    /// funnels through here, so the mirror always reflects the freshest
    /// server state.
    pub async fn upsert_video(&self, video: Video) {
        let lesson_id = video.lesson_id.clone();
        let video_id = video.id.clone();

        if let Some(old) = self
            .videos
            .write()
            .await
            .insert(lesson_id.clone(), video)
        {
            if old.id != video_id {
                tracing::debug!(
                    lesson_id = %lesson_id,
                    old_video_id = %old.id,
                    new_video_id = %video_id,
                    "Superseding lesson video record",
                );
            }
        }

        if let Some(lesson) = self.lessons.write().await.get_mut(&lesson_id) {
            lesson.video_id = Some(video_id);
            lesson.updated_at = Some(chrono::Utc::now());
        }
    }

    /// The lesson's current video record, if any.
    pub async fn video_for_lesson(&self, lesson_id: &str) -> Option<Video> {
        self.videos.read().await.get(lesson_id).cloned()
    }

    /// Drop the lesson's video record and clear the lesson pointer.
    pub async fn remove_video(&self, lesson_id: &str) -> Option<Video> {
        let removed = self.videos.write().await.remove(lesson_id);
        if removed.is_some() {
            if let Some(lesson) = self.lessons.write().await.get_mut(lesson_id) {
                lesson.video_id = None;
                lesson.updated_at = Some(chrono::Utc::now());
            }
        }
        removed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
