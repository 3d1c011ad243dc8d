//! Skill unlock evaluation.
//!
//! Pure queries over an [`ExerciseCatalog`] and a user's [`UserProgress`]:
//! - An exercise is unlocked when every prerequisite is completed
//! - Unknown ids fail soft (false / empty), never error
//! - Prerequisite cycles are not detected here; see [`crate::graph`]

use crate::{
    Exercise, ExerciseCatalog, ExerciseCategory, ExerciseStatus, SkillLevel, UserProgress,
};
use std::collections::BTreeMap;

/// Whether `exercise_id` is reachable given the user's progress
///
/// True when the exercise has no prerequisites, or when every prerequisite
/// exists in the catalog and is recorded as completed. A prerequisite id that
/// is not in the catalog can never be satisfied.
pub fn is_unlocked(catalog: &ExerciseCatalog, exercise_id: &str, progress: &UserProgress) -> bool {
    let Some(exercise) = catalog.get(exercise_id) else {
        tracing::debug!("Unlock check for unknown exercise '{}'", exercise_id);
        return false;
    };

    exercise
        .prerequisites
        .iter()
        .all(|prereq| catalog.contains(prereq) && progress.is_completed(prereq))
}

/// Exercises in `category`, in declared catalog order
pub fn exercises_by_category(
    catalog: &ExerciseCatalog,
    category: ExerciseCategory,
) -> Vec<&Exercise> {
    catalog
        .exercises()
        .iter()
        .filter(|e| e.category == category)
        .collect()
}

/// Like [`exercises_by_category`], but takes a raw category id
///
/// Returns an empty list for an unknown id.
pub fn exercises_by_category_id<'a>(catalog: &'a ExerciseCatalog, category_id: &str) -> Vec<&'a Exercise> {
    match category_id.parse::<ExerciseCategory>() {
        Ok(category) => exercises_by_category(catalog, category),
        Err(_) => Vec::new(),
    }
}

/// Exercises the user could start next: not completed, but unlocked
///
/// Only `Completed` records are excluded. Exercises already marked
/// `Current` or `Unlocked` stay in the list, so an in-progress skill is
/// still offered next. Returned in catalog order.
pub fn next_unlockable<'a>(catalog: &'a ExerciseCatalog, progress: &UserProgress) -> Vec<&'a Exercise> {
    catalog
        .exercises()
        .iter()
        .filter(|e| !progress.is_completed(&e.id))
        .filter(|e| is_unlocked(catalog, &e.id, progress))
        .collect()
}

/// Resolved prerequisite exercises of `exercise_id`
///
/// Dangling prerequisite ids are skipped.
pub fn prerequisites_of<'a>(catalog: &'a ExerciseCatalog, exercise_id: &str) -> Vec<&'a Exercise> {
    catalog
        .get(exercise_id)
        .map(|exercise| {
            exercise
                .prerequisites
                .iter()
                .filter_map(|id| catalog.get(id))
                .collect()
        })
        .unwrap_or_default()
}

/// An exercise annotated with its unlock state
#[derive(Clone, Debug)]
pub struct ExerciseUnlock<'a> {
    pub exercise: &'a Exercise,
    pub unlocked: bool,
    /// Status recorded in the progress, if any
    pub status: Option<ExerciseStatus>,
}

/// Every catalog exercise paired with its unlock state
pub fn unlock_overview<'a>(
    catalog: &'a ExerciseCatalog,
    progress: &UserProgress,
) -> Vec<ExerciseUnlock<'a>> {
    catalog
        .exercises()
        .iter()
        .map(|exercise| ExerciseUnlock {
            exercise,
            unlocked: is_unlocked(catalog, &exercise.id, progress),
            status: progress.status_of(&exercise.id),
        })
        .collect()
}

/// Aggregate view of a user's progress through the skill tree
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressSummary {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    /// Unlocked but neither started nor completed
    pub available: usize,
    pub highest_level: Option<SkillLevel>,
    /// Completion percentage (0-100) per category that has exercises
    pub category_completion: BTreeMap<ExerciseCategory, u8>,
}

/// Summarize progress against the catalog
///
/// Progress records for ids outside the catalog are ignored.
pub fn summarize(catalog: &ExerciseCatalog, progress: &UserProgress) -> ProgressSummary {
    let mut completed = 0;
    let mut in_progress = 0;
    let mut available = 0;
    let mut highest_level = None;
    let mut per_category: BTreeMap<ExerciseCategory, (usize, usize)> = BTreeMap::new();

    for exercise in catalog.exercises() {
        let entry = per_category.entry(exercise.category).or_default();
        entry.1 += 1;

        match progress.status_of(&exercise.id) {
            Some(ExerciseStatus::Completed) => {
                completed += 1;
                entry.0 += 1;
                highest_level = highest_level.max(Some(exercise.skill_level));
            }
            Some(ExerciseStatus::Current) => in_progress += 1,
            _ => {
                if is_unlocked(catalog, &exercise.id, progress) {
                    available += 1;
                }
            }
        }
    }

    let category_completion = per_category
        .into_iter()
        .map(|(category, (done, total))| (category, ((done * 100) / total) as u8))
        .collect();

    ProgressSummary {
        total: catalog.len(),
        completed,
        in_progress,
        available,
        highest_level,
        category_completion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_default_catalog, get_default_catalog, sample_progress, ExerciseStatus::*};

    fn exercise(id: &str, category: ExerciseCategory, prereqs: &[&str]) -> Exercise {
        Exercise {
            id: id.into(),
            name: id.into(),
            category,
            skill_level: SkillLevel::Beginner,
            description: String::new(),
            instructions: vec![],
            prerequisites: prereqs.iter().map(|s| s.to_string()).collect(),
            progression_order: 0,
            demo_video: None,
            tips: vec![],
            common_mistakes: vec![],
        }
    }

    /// A: [], B: [A], C: [A, B]
    fn abc_catalog() -> ExerciseCatalog {
        ExerciseCatalog::new(
            vec![],
            vec![
                exercise("A", ExerciseCategory::Core, &[]),
                exercise("B", ExerciseCategory::Core, &["A"]),
                exercise("C", ExerciseCategory::Legs, &["A", "B"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_chain_unlocks_step_by_step() {
        let catalog = abc_catalog();
        let progress = UserProgress::new().with("A", Completed);

        assert!(is_unlocked(&catalog, "A", &progress));
        assert!(is_unlocked(&catalog, "B", &progress));
        assert!(!is_unlocked(&catalog, "C", &progress));
    }

    #[test]
    fn test_no_prerequisites_always_unlocked() {
        let catalog = get_default_catalog();
        let empty = UserProgress::new();
        let everything_locked = catalog
            .exercises()
            .iter()
            .fold(UserProgress::new(), |p, e| p.with(e.id.clone(), Locked));

        for exercise in catalog.exercises().iter().filter(|e| e.prerequisites.is_empty()) {
            assert!(is_unlocked(catalog, &exercise.id, &empty));
            assert!(is_unlocked(catalog, &exercise.id, &everything_locked));
        }
    }

    #[test]
    fn test_only_completed_status_satisfies_prerequisite() {
        let catalog = abc_catalog();
        for status in [Locked, Unlocked, Current] {
            let progress = UserProgress::new().with("A", status);
            assert!(!is_unlocked(&catalog, "B", &progress), "{:?} should not satisfy", status);
        }
    }

    #[test]
    fn test_next_unlockable_keeps_current_exercises() {
        let catalog = abc_catalog();
        let progress = UserProgress::new().with("A", Completed).with("B", Current);

        let next: Vec<_> = next_unlockable(&catalog, &progress)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(next, vec!["B"]);
    }

    #[test]
    fn test_unlock_matches_all_prerequisites_completed() {
        let catalog = get_default_catalog();
        let progress = sample_progress();
        for exercise in catalog.exercises() {
            let expected = exercise
                .prerequisites
                .iter()
                .all(|p| progress.is_completed(p));
            assert_eq!(is_unlocked(catalog, &exercise.id, &progress), expected, "{}", exercise.id);
        }
    }

    #[test]
    fn test_unknown_exercise_is_locked() {
        let catalog = abc_catalog();
        let progress = UserProgress::new().with("A", Completed);
        assert!(!is_unlocked(&catalog, "Z", &progress));
    }

    #[test]
    fn test_dangling_prerequisite_never_satisfied() {
        let catalog = ExerciseCatalog::new(
            vec![],
            vec![exercise("X", ExerciseCategory::Core, &["ghost"])],
        )
        .unwrap();
        // Even a "completed" record for the missing id does not count
        let progress = UserProgress::new().with("ghost", Completed);
        assert!(!is_unlocked(&catalog, "X", &progress));
    }

    #[test]
    fn test_exercises_by_category_preserves_order() {
        let catalog = build_default_catalog();
        let ids: Vec<_> = exercises_by_category(&catalog, ExerciseCategory::VerticalPull)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec!["vertical-row", "incline-row", "horizontal-row", "wide-row", "archer-row"]
        );
    }

    #[test]
    fn test_categories_partition_catalog() {
        let catalog = get_default_catalog();
        let mut seen = std::collections::HashSet::new();
        let mut total = 0;
        for category in ExerciseCategory::ALL {
            for exercise in exercises_by_category(catalog, category) {
                assert_eq!(exercise.category, category);
                assert!(seen.insert(exercise.id.clone()), "duplicate {}", exercise.id);
                total += 1;
            }
        }
        assert_eq!(total, catalog.len());
    }

    #[test]
    fn test_exercises_by_unknown_category_id_is_empty() {
        let catalog = get_default_catalog();
        assert!(exercises_by_category_id(catalog, "cardio").is_empty());
        assert_eq!(exercises_by_category_id(catalog, "legs").len(), 2);
    }

    #[test]
    fn test_next_unlockable_with_sample_progress() {
        let catalog = get_default_catalog();
        let ids: Vec<_> = next_unlockable(catalog, &sample_progress())
            .iter()
            .map(|e| e.id.clone())
            .collect();

        assert_eq!(
            ids,
            vec![
                "tuck-back-lever",
                "horizontal-row",
                "arch-hang",
                "foot-sup-l-sit",
                "parallel-squat",
            ]
        );
    }

    #[test]
    fn test_next_unlockable_excludes_completed() {
        let catalog = abc_catalog();
        let progress = UserProgress::new().with("A", Completed).with("B", Completed);
        let ids: Vec<_> = next_unlockable(&catalog, &progress)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["C"]);
    }

    #[test]
    fn test_prerequisites_of() {
        let catalog = abc_catalog();
        let names: Vec<_> = prerequisites_of(&catalog, "C").iter().map(|e| e.id.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(prerequisites_of(&catalog, "A").is_empty());
        assert!(prerequisites_of(&catalog, "nope").is_empty());
    }

    #[test]
    fn test_unlock_overview_covers_catalog() {
        let catalog = abc_catalog();
        let progress = UserProgress::new().with("A", Completed);
        let overview = unlock_overview(&catalog, &progress);

        assert_eq!(overview.len(), 3);
        assert_eq!(overview[0].status, Some(Completed));
        assert!(overview[1].unlocked);
        assert_eq!(overview[1].status, None);
        assert!(!overview[2].unlocked);
    }

    #[test]
    fn test_summarize_sample_progress() {
        let catalog = get_default_catalog();
        let summary = summarize(catalog, &sample_progress());

        assert_eq!(summary.total, 20);
        assert_eq!(summary.completed, 7);
        assert_eq!(summary.in_progress, 3);
        // arch-hang and foot-sup-l-sit
        assert_eq!(summary.available, 2);
        assert_eq!(summary.highest_level, Some(SkillLevel::Beginner));
        assert_eq!(summary.category_completion[&ExerciseCategory::Core], 100);
        assert_eq!(summary.category_completion[&ExerciseCategory::HorizontalPush], 0);
        assert_eq!(summary.category_completion[&ExerciseCategory::Legs], 50);
    }

    #[test]
    fn test_summarize_empty_progress() {
        let catalog = abc_catalog();
        let summary = summarize(&catalog, &UserProgress::new());
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.available, 1);
        assert_eq!(summary.highest_level, None);
    }
}
