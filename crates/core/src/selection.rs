//! The wizard's transient, strictly narrowing chain of hierarchy selections.
//!
//! Selecting a node at one tier invalidates everything chosen below it:
//! picking a different curriculum clears level, class, subject, course and
//! lesson; picking a different subject clears course and lesson; and so on.
//! Level and class are optional tiers and are not required for a complete
//! path.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// Current selection state of the upload wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPath {
    pub curriculum_id: Option<EntityId>,
    pub level_id: Option<EntityId>,
    pub class_id: Option<EntityId>,
    pub subject_id: Option<EntityId>,
    pub course_id: Option<EntityId>,
    pub lesson_id: Option<EntityId>,
}

impl SelectionPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a curriculum, clearing every downstream selection.
    pub fn select_curriculum(&mut self, id: EntityId) {
        self.curriculum_id = Some(id);
        self.level_id = None;
        self.class_id = None;
        self.subject_id = None;
        self.course_id = None;
        self.lesson_id = None;
    }

    /// Select an academic level, clearing class and below.
    pub fn select_level(&mut self, id: EntityId) {
        self.level_id = Some(id);
        self.class_id = None;
        self.subject_id = None;
        self.course_id = None;
        self.lesson_id = None;
    }

    /// Select an academic class, clearing subject and below.
    pub fn select_class(&mut self, id: EntityId) {
        self.class_id = Some(id);
        self.subject_id = None;
        self.course_id = None;
        self.lesson_id = None;
    }

    /// Select a subject, clearing course and lesson.
    pub fn select_subject(&mut self, id: EntityId) {
        self.subject_id = Some(id);
        self.course_id = None;
        self.lesson_id = None;
    }

    /// Select a course, clearing the lesson.
    pub fn select_course(&mut self, id: EntityId) {
        self.course_id = Some(id);
        self.lesson_id = None;
    }

    /// Select a lesson. Nothing is downstream of a lesson.
    pub fn select_lesson(&mut self, id: EntityId) {
        self.lesson_id = Some(id);
    }

    /// Whether the path is fully populated for submission.
    ///
    /// Curriculum, subject, course and lesson are required; level and
    /// class are optional tiers.
    pub fn is_complete(&self) -> bool {
        self.curriculum_id.is_some()
            && self.subject_id.is_some()
            && self.course_id.is_some()
            && self.lesson_id.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
