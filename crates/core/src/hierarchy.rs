//! Curriculum hierarchy entities.
//!
//! The hierarchy is `curriculum -> academic level -> academic class ->
//! subject -> course -> lesson`, where level and class are optional tiers
//! (a curriculum may attach subjects directly).

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Timestamp};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Curriculum {
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicLevel {
    pub id: EntityId,
    pub curriculum_id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicClass {
    pub id: EntityId,
    pub level_id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: EntityId,
    pub curriculum_id: EntityId,
    /// Present when the subject hangs off a class rather than the
    /// curriculum root.
    pub class_id: Option<EntityId>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: EntityId,
    pub subject_id: EntityId,
    pub title: String,
}

/// A single unit of instructional content belonging to a course.
///
/// `video_id` points at the lesson's current video, if one has been
/// uploaded; it is maintained by the store when upload responses and
/// status polls come back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: EntityId,
    pub course_id: EntityId,
    /// Position of the lesson within its course.
    pub order: u32,
    pub title: String,
    pub video_id: Option<EntityId>,
    pub updated_at: Option<Timestamp>,
}
