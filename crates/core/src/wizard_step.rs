//! Upload wizard step definitions and gating rules.
//!
//! The wizard walks a fixed sequence of steps with no skipping:
//! curriculum, level, class, subject, course, lesson, video file
//! selection, review. Each step has a completion predicate that must
//! hold before `next()` may advance, and breadcrumb navigation may only
//! jump to steps strictly before the current one.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::selection::SelectionPath;

/// The eight steps of the upload wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Curriculum,
    Level,
    Class,
    Subject,
    Course,
    Lesson,
    Video,
    Review,
}

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 8;

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

/// Maximum step number (1-based).
pub const MAX_STEP: u8 = 8;

impl WizardStep {
    /// Convert a 1-based step number to a `WizardStep`.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::Curriculum),
            2 => Ok(Self::Level),
            3 => Ok(Self::Class),
            4 => Ok(Self::Subject),
            5 => Ok(Self::Course),
            6 => Ok(Self::Lesson),
            7 => Ok(Self::Video),
            8 => Ok(Self::Review),
            _ => Err(CoreError::Validation(format!(
                "Invalid step number {n}. Must be between {MIN_STEP} and {MAX_STEP}"
            ))),
        }
    }

    /// Convert to a 1-based step number.
    pub fn to_number(self) -> u8 {
        match self {
            Self::Curriculum => 1,
            Self::Level => 2,
            Self::Class => 3,
            Self::Subject => 4,
            Self::Course => 5,
            Self::Lesson => 6,
            Self::Video => 7,
            Self::Review => 8,
        }
    }

    /// Human-readable label for the step.
    pub fn label(self) -> &'static str {
        match self {
            Self::Curriculum => "Curriculum",
            Self::Level => "Level",
            Self::Class => "Class",
            Self::Subject => "Subject",
            Self::Course => "Course",
            Self::Lesson => "Lesson",
            Self::Video => "Video",
            Self::Review => "Review",
        }
    }

    /// The step after this one, or `None` on the last step.
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.to_number() + 1).ok()
    }

    /// The step before this one, or `None` on the first step.
    pub fn prev(self) -> Option<Self> {
        let n = self.to_number();
        if n <= MIN_STEP {
            None
        } else {
            Self::from_number(n - 1).ok()
        }
    }

    pub fn is_first(self) -> bool {
        self == Self::Curriculum
    }

    pub fn is_last(self) -> bool {
        self == Self::Review
    }
}

/// Validate a breadcrumb jump from `current` to `target`.
///
/// Only strictly earlier steps may be jumped to; jumping to the current
/// step or ahead of it would allow skipping required selections.
pub fn validate_breadcrumb_jump(current: WizardStep, target: WizardStep) -> Result<(), CoreError> {
    if target >= current {
        return Err(CoreError::Validation(format!(
            "Cannot jump to step '{}' from step '{}'. Breadcrumb navigation only goes backwards.",
            target.label(),
            current.label()
        )));
    }
    Ok(())
}

/// Whether a step's completion predicate holds.
///
/// Level and class are optional tiers of the hierarchy, so their steps
/// pass without a selection. The video step requires both a video file
/// and a thumbnail file to have been chosen.
pub fn step_satisfied(
    step: WizardStep,
    selection: &SelectionPath,
    has_video_file: bool,
    has_thumbnail_file: bool,
) -> bool {
    match step {
        WizardStep::Curriculum => selection.curriculum_id.is_some(),
        WizardStep::Level => true,
        WizardStep::Class => true,
        WizardStep::Subject => selection.subject_id.is_some(),
        WizardStep::Course => selection.course_id.is_some(),
        WizardStep::Lesson => selection.lesson_id.is_some(),
        WizardStep::Video => has_video_file && has_thumbnail_file,
        // Review gates submission separately; advancing past it is not
        // a step transition.
        WizardStep::Review => true,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_from_number_valid() {
        assert_eq!(WizardStep::from_number(1).unwrap(), WizardStep::Curriculum);
        assert_eq!(WizardStep::from_number(8).unwrap(), WizardStep::Review);
    }

    #[test]
    fn step_from_number_invalid() {
        assert!(WizardStep::from_number(0).is_err());
        assert!(WizardStep::from_number(9).is_err());
        assert!(WizardStep::from_number(255).is_err());
    }

    #[test]
    fn step_to_number_roundtrip() {
        for n in MIN_STEP..=MAX_STEP {
            let step = WizardStep::from_number(n).unwrap();
            assert_eq!(step.to_number(), n);
        }
    }

    #[test]
    fn step_labels_are_nonempty() {
        for n in MIN_STEP..=MAX_STEP {
            assert!(!WizardStep::from_number(n).unwrap().label().is_empty());
        }
    }

    #[test]
    fn next_walks_the_sequence() {
        let mut step = WizardStep::Curriculum;
        let mut count = 1;
        while let Some(next) = step.next() {
            assert_eq!(next.to_number(), step.to_number() + 1);
            step = next;
            count += 1;
        }
        assert_eq!(step, WizardStep::Review);
        assert_eq!(count, TOTAL_STEPS);
    }

    #[test]
    fn prev_of_first_is_none() {
        assert_eq!(WizardStep::Curriculum.prev(), None);
    }

    #[test]
    fn next_of_last_is_none() {
        assert_eq!(WizardStep::Review.next(), None);
    }

    #[test]
    fn breadcrumb_jump_backwards_allowed() {
        assert!(validate_breadcrumb_jump(WizardStep::Review, WizardStep::Curriculum).is_ok());
        assert!(validate_breadcrumb_jump(WizardStep::Video, WizardStep::Lesson).is_ok());
    }

    #[test]
    fn breadcrumb_jump_to_current_rejected() {
        for n in MIN_STEP..=MAX_STEP {
            let step = WizardStep::from_number(n).unwrap();
            assert!(validate_breadcrumb_jump(step, step).is_err());
        }
    }

    #[test]
    fn breadcrumb_jump_forward_rejected() {
        assert!(validate_breadcrumb_jump(WizardStep::Curriculum, WizardStep::Level).is_err());
        assert!(validate_breadcrumb_jump(WizardStep::Lesson, WizardStep::Review).is_err());
    }

    #[test]
    fn gating_requires_selection_per_step() {
        let mut selection = SelectionPath::new();
        assert!(!step_satisfied(
            WizardStep::Curriculum,
            &selection,
            false,
            false
        ));
        selection.select_curriculum("c1".into());
        assert!(step_satisfied(
            WizardStep::Curriculum,
            &selection,
            false,
            false
        ));
        assert!(!step_satisfied(
            WizardStep::Subject,
            &selection,
            false,
            false
        ));
        selection.select_subject("s1".into());
        assert!(step_satisfied(WizardStep::Subject, &selection, false, false));
    }

    #[test]
    fn optional_tiers_always_pass() {
        let selection = SelectionPath::new();
        assert!(step_satisfied(WizardStep::Level, &selection, false, false));
        assert!(step_satisfied(WizardStep::Class, &selection, false, false));
    }

    #[test]
    fn video_step_requires_both_files() {
        let selection = SelectionPath::new();
        assert!(!step_satisfied(WizardStep::Video, &selection, false, false));
        assert!(!step_satisfied(WizardStep::Video, &selection, true, false));
        assert!(!step_satisfied(WizardStep::Video, &selection, false, true));
        assert!(step_satisfied(WizardStep::Video, &selection, true, true));
    }
}
