//! Default exercise catalog and catalog management.
//!
//! This module provides the built-in categories and exercises of the skill
//! tree, the sample progress fixture, and loading/validation of catalogs.

use crate::graph::PrerequisiteGraph;
use crate::types::*;
use crate::{Error, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<ExerciseCatalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static ExerciseCatalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog with built-in categories and exercises
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalogs.
pub fn build_default_catalog() -> ExerciseCatalog {
    build_default_catalog_internal()
}

impl ExerciseCatalog {
    /// Create a catalog from categories and exercises in declared order
    ///
    /// Rejects duplicate exercise ids. Prerequisite integrity is checked
    /// separately by [`ExerciseCatalog::validate`].
    pub fn new(categories: Vec<CategoryInfo>, exercises: Vec<Exercise>) -> Result<Self> {
        let mut seen = HashSet::new();
        for exercise in &exercises {
            if !seen.insert(exercise.id.as_str()) {
                return Err(Error::CatalogValidation(format!(
                    "Duplicate exercise id '{}'",
                    exercise.id
                )));
            }
        }
        Ok(Self::assemble(categories, exercises))
    }

    fn assemble(categories: Vec<CategoryInfo>, exercises: Vec<Exercise>) -> Self {
        let mut index = HashMap::with_capacity(exercises.len());
        for (i, exercise) in exercises.iter().enumerate() {
            index.entry(exercise.id.clone()).or_insert(i);
        }
        Self {
            categories,
            exercises,
            index,
        }
    }

    /// Load a catalog from a JSON file of the form `{ "categories": [...], "exercises": [...] }`
    ///
    /// Fails on duplicate ids and on the first prerequisite problem (self
    /// reference, unknown id, cycle).
    pub fn load_from(path: &Path) -> Result<Self> {
        #[derive(Deserialize)]
        struct CatalogFile {
            #[serde(default)]
            categories: Vec<CategoryInfo>,
            exercises: Vec<Exercise>,
        }

        let contents = crate::products::read_locked(path)?;
        let file: CatalogFile = serde_json::from_str(&contents)?;
        let catalog = Self::new(file.categories, file.exercises)?;
        PrerequisiteGraph::from_catalog(&catalog)?;
        tracing::info!(
            "Loaded {} exercises from {:?}",
            catalog.exercises.len(),
            path
        );
        Ok(catalog)
    }

    pub fn get(&self, exercise_id: &str) -> Option<&Exercise> {
        self.index.get(exercise_id).map(|&i| &self.exercises[i])
    }

    pub fn contains(&self, exercise_id: &str) -> bool {
        self.index.contains_key(exercise_id)
    }

    /// All exercises in declared order
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn categories(&self) -> &[CategoryInfo] {
        &self.categories
    }

    pub fn category_info(&self, category: ExerciseCategory) -> Option<&CategoryInfo> {
        self.categories.iter().find(|c| c.id == category)
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for exercise in &self.exercises {
            if exercise.id.is_empty() {
                errors.push("Exercise has empty ID".to_string());
            }
            if exercise.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", exercise.id));
            }
            if self.category_info(exercise.category).is_none() {
                errors.push(format!(
                    "Exercise '{}' uses category '{}' which has no metadata",
                    exercise.id, exercise.category
                ));
            }
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.id) {
                errors.push(format!("Category '{}' is declared twice", category.id));
            }
            if category.name.is_empty() {
                errors.push(format!("Category '{}' has empty name", category.id));
            }
        }

        errors.extend(
            PrerequisiteGraph::problems(self)
                .into_iter()
                .map(|e| e.to_string()),
        );

        errors
    }
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const DEMO_VIDEO: &str = "https://www.youtube.com/embed/fZhmZnIPJFI";

/// Internal function that actually builds the catalog
fn build_default_catalog_internal() -> ExerciseCatalog {
    use ExerciseCategory::*;
    use SkillLevel::*;

    // ========================================================================
    // Categories
    // ========================================================================

    let category = |id, name: &str, description: &str, color: &str, image: &str| CategoryInfo {
        id,
        name: name.into(),
        description: description.into(),
        color: color.into(),
        image: Some(image.into()),
    };

    let categories = vec![
        category(
            HorizontalPull,
            "Horizontal Pull",
            "Master pull-ups, front levers, and advanced pulling movements",
            "emerald",
            "https://images.pexels.com/photos/4803695/pexels-photo-4803695.jpeg",
        ),
        category(
            VerticalPull,
            "Vertical Pull",
            "Develop vertical pulling strength and power",
            "green",
            "https://images.pexels.com/photos/4803682/pexels-photo-4803682.jpeg",
        ),
        category(
            VerticalPush,
            "Vertical Push",
            "Develop handstand strength and pressing power",
            "teal",
            "https://images.unsplash.com/photo-1606827728401-939ad3483e7b",
        ),
        category(
            HorizontalPush,
            "Horizontal Push",
            "Master push-up progressions and planche skills",
            "cyan",
            "https://images.unsplash.com/photo-1599744331120-3226c87a6e25",
        ),
        category(
            Core,
            "Core Mastery",
            "Build unbreakable core strength and stability",
            "lime",
            "https://images.pexels.com/photos/4803717/pexels-photo-4803717.jpeg",
        ),
        category(
            Legs,
            "Legs",
            "Develop single-leg strength and mobility",
            "forest",
            "https://images.unsplash.com/photo-1472722266948-a898ab5ff257",
        ),
    ];

    // ========================================================================
    // Exercises
    // ========================================================================

    let exercises = vec![
        // Horizontal pull: back lever into front lever
        Exercise {
            id: "german-hang".into(),
            name: "German Hang".into(),
            category: HorizontalPull,
            skill_level: Beginner,
            description: "A shoulder mobility and strength exercise where you hang with arms behind your back.".into(),
            instructions: lines(&[
                "Start in a regular dead hang position",
                "Slowly rotate your hands backward while maintaining grip",
                "Lower into the german hang position",
                "Hold for prescribed time",
                "Return to starting position slowly",
            ]),
            prerequisites: vec![],
            progression_order: 1,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&[
                "Start with very short holds (5-10 seconds)",
                "Focus on shoulder flexibility first",
                "Never force the position - progress gradually",
            ]),
            common_mistakes: lines(&[
                "Dropping into position too quickly",
                "Ignoring shoulder discomfort",
                "Not warming up properly",
            ]),
        },
        Exercise {
            id: "skin-the-cat".into(),
            name: "Skin the Cat".into(),
            category: HorizontalPull,
            skill_level: Beginner,
            description: "A dynamic movement that improves shoulder mobility and strength.".into(),
            instructions: lines(&[
                "Start in dead hang position",
                "Pull knees to chest",
                "Continue rotating backward through shoulder joint",
                "Extend legs in german hang position",
                "Reverse the movement to return",
            ]),
            prerequisites: lines(&["german-hang"]),
            progression_order: 2,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&[
                "Master german hang first",
                "Use slow, controlled movements",
                "Build up range of motion gradually",
            ]),
            common_mistakes: lines(&[
                "Moving too fast",
                "Not having enough shoulder flexibility",
                "Skipping the static holds",
            ]),
        },
        Exercise {
            id: "tuck-back-lever".into(),
            name: "Tuck Back Lever".into(),
            category: HorizontalPull,
            skill_level: Beginner,
            description: "An isometric hold that builds posterior chain strength.".into(),
            instructions: lines(&[
                "Start in german hang position",
                "Pull knees to chest while maintaining horizontal position",
                "Keep body rigid and parallel to ground",
                "Hold for prescribed time",
            ]),
            prerequisites: lines(&["skin-the-cat"]),
            progression_order: 3,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&[
                "Engage core and glutes strongly",
                "Keep knees tucked tight to chest",
            ]),
            common_mistakes: lines(&["Letting hips sag", "Holding breath during exercise"]),
        },
        Exercise {
            id: "adv-tuck-back-lever".into(),
            name: "Advanced Tuck Back Lever".into(),
            category: HorizontalPull,
            skill_level: Beginner,
            description: "Progression toward full back lever with knees closer to 90 degrees.".into(),
            instructions: lines(&[
                "Start in tuck back lever position",
                "Gradually open hip angle",
                "Keep knees bent but less tucked",
                "Maintain horizontal body position",
            ]),
            prerequisites: lines(&["tuck-back-lever"]),
            progression_order: 4,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&["Progress slowly from tuck position"]),
            common_mistakes: lines(&["Opening hip angle too quickly", "Losing body tension"]),
        },
        Exercise {
            id: "tuck-front-lever".into(),
            name: "Tuck Front Lever".into(),
            category: HorizontalPull,
            skill_level: Intermediate,
            description: "Fundamental front lever progression building pulling strength.".into(),
            instructions: lines(&[
                "Start from dead hang",
                "Pull knees to chest",
                "Lean back until body is horizontal",
                "Hold position with strong core engagement",
            ]),
            prerequisites: lines(&["adv-tuck-back-lever"]),
            progression_order: 5,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&[
                "Master negative movements first",
                "Keep shoulders depressed and engaged",
                "Maintain hollow body position",
            ]),
            common_mistakes: lines(&["Allowing hips to pike", "Rushing the progression"]),
        },
        Exercise {
            id: "adv-tuck-front-lever".into(),
            name: "Advanced Tuck Front Lever".into(),
            category: HorizontalPull,
            skill_level: Intermediate,
            description: "Front lever progression with more extended hip position.".into(),
            instructions: lines(&[
                "Start in tuck front lever",
                "Gradually extend hips",
                "Keep knees bent at approximately 90 degrees",
                "Maintain horizontal body alignment",
            ]),
            prerequisites: lines(&["tuck-front-lever"]),
            progression_order: 6,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&["Increase lever arm gradually"]),
            common_mistakes: lines(&["Extending too far too fast", "Losing shoulder position"]),
        },
        Exercise {
            id: "straddle-front-lever".into(),
            name: "Straddle Front Lever".into(),
            category: HorizontalPull,
            skill_level: Intermediate,
            description: "Front lever with legs in straddle position, reducing leverage.".into(),
            instructions: lines(&[
                "From advanced tuck front lever",
                "Extend legs into wide straddle position",
                "Keep legs straight and wide",
                "Maintain horizontal body position",
            ]),
            prerequisites: lines(&["adv-tuck-front-lever"]),
            progression_order: 7,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&["Keep legs as wide as comfortable"]),
            common_mistakes: lines(&["Not keeping legs straight", "Allowing body to rotate"]),
        },
        Exercise {
            id: "one-leg-front-lever".into(),
            name: "One Leg Front Lever".into(),
            category: HorizontalPull,
            skill_level: Intermediate,
            description: "Front lever with one leg extended, one leg tucked.".into(),
            instructions: lines(&[
                "Start in straddle front lever",
                "Tuck one leg to chest",
                "Keep other leg straight and horizontal",
            ]),
            prerequisites: lines(&["straddle-front-lever"]),
            progression_order: 8,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&["Alternate legs for balanced development"]),
            common_mistakes: lines(&["Letting extended leg drop", "Favoring one side only"]),
        },
        Exercise {
            id: "front-lever".into(),
            name: "Front Lever".into(),
            category: HorizontalPull,
            skill_level: Intermediate,
            description: "Full front lever with both legs straight and horizontal.".into(),
            instructions: lines(&[
                "From one leg front lever",
                "Extend tucked leg to match extended leg",
                "Keep both legs straight and together",
                "Maintain perfect horizontal body line",
            ]),
            prerequisites: lines(&["one-leg-front-lever"]),
            progression_order: 9,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&[
                "Master all previous progressions first",
                "Focus on perfect form over duration",
            ]),
            common_mistakes: lines(&[
                "Attempting too early in progression",
                "Insufficient shoulder strength",
            ]),
        },
        // Vertical pull: row progression
        Exercise {
            id: "vertical-row".into(),
            name: "Vertical Row".into(),
            category: VerticalPull,
            skill_level: Beginner,
            description: "Basic rowing movement to build pulling strength.".into(),
            instructions: lines(&[
                "Set up rings or suspension trainer at chest height",
                "Grab handles with overhand grip",
                "Walk feet forward to create body angle",
                "Pull chest to handles",
                "Lower under control",
            ]),
            prerequisites: vec![],
            progression_order: 1,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&[
                "Keep body straight throughout movement",
                "Control the negative portion",
            ]),
            common_mistakes: lines(&["Allowing hips to sag", "Using momentum instead of strength"]),
        },
        Exercise {
            id: "incline-row".into(),
            name: "Incline Row".into(),
            category: VerticalPull,
            skill_level: Beginner,
            description: "Angled rowing movement with increased difficulty.".into(),
            instructions: lines(&[
                "Lower ring/bar height compared to vertical row",
                "Create steeper body angle",
                "Maintain straight body line",
                "Pull chest to rings/bar",
            ]),
            prerequisites: lines(&["vertical-row"]),
            progression_order: 2,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&["Increase angle gradually as strength improves"]),
            common_mistakes: lines(&["Progressing angle too quickly"]),
        },
        Exercise {
            id: "horizontal-row".into(),
            name: "Horizontal Row".into(),
            category: VerticalPull,
            skill_level: Beginner,
            description: "Horizontal body position rowing for maximum difficulty.".into(),
            instructions: lines(&[
                "Set rings/bar at lowest possible height",
                "Lie under bar with body straight",
                "Pull chest to bar",
                "Keep body rigid throughout movement",
            ]),
            prerequisites: lines(&["incline-row"]),
            progression_order: 3,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&["Keep heels on ground"]),
            common_mistakes: lines(&["Allowing body to bend", "Not pulling chest to bar"]),
        },
        Exercise {
            id: "wide-row".into(),
            name: "Wide Row".into(),
            category: VerticalPull,
            skill_level: Beginner,
            description: "Rowing with wide grip to target different muscle groups.".into(),
            instructions: lines(&[
                "Use wide overhand grip on bar/rings",
                "Maintain horizontal body position",
                "Pull with elbows wide",
            ]),
            prerequisites: lines(&["horizontal-row"]),
            progression_order: 4,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&["Keep elbows high and wide", "Squeeze shoulder blades together"]),
            common_mistakes: lines(&["Allowing elbows to drop"]),
        },
        Exercise {
            id: "archer-row".into(),
            name: "Archer Row".into(),
            category: VerticalPull,
            skill_level: Beginner,
            description: "Unilateral rowing movement emphasizing one arm.".into(),
            instructions: lines(&[
                "Start in horizontal row position",
                "Pull primarily with one arm",
                "Keep other arm straight for support",
                "Alternate arms between sets",
            ]),
            prerequisites: lines(&["wide-row"]),
            progression_order: 5,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&["Keep supporting arm straight"]),
            common_mistakes: lines(&["Using both arms equally", "Allowing body rotation"]),
        },
        // Vertical push
        Exercise {
            id: "scapular-shrug".into(),
            name: "Scapular Shrug".into(),
            category: VerticalPush,
            skill_level: Beginner,
            description: "Foundation exercise for shoulder blade mobility and strength.".into(),
            instructions: lines(&[
                "Hang from pull-up bar with straight arms",
                "Shrug shoulders up toward ears",
                "Depress shoulders down",
                "Keep arms straight throughout",
            ]),
            prerequisites: vec![],
            progression_order: 1,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&["Focus on shoulder blade movement only"]),
            common_mistakes: lines(&["Bending arms during movement", "Using momentum"]),
        },
        Exercise {
            id: "arch-hang".into(),
            name: "Arch Hang".into(),
            category: VerticalPush,
            skill_level: Beginner,
            description: "Active hanging position building shoulder strength.".into(),
            instructions: lines(&[
                "Hang from bar with active shoulders",
                "Create slight arch in back",
                "Engage lats and rear delts",
                "Hold position for time",
            ]),
            prerequisites: lines(&["scapular-shrug"]),
            progression_order: 2,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&["Create arch through thoracic spine"]),
            common_mistakes: lines(&["Hanging passively"]),
        },
        // Horizontal push
        Exercise {
            id: "foot-sup-l-sit".into(),
            name: "Foot Supported L-Sit".into(),
            category: HorizontalPush,
            skill_level: Beginner,
            description: "L-sit progression with feet touching ground for support.".into(),
            instructions: lines(&[
                "Sit between parallettes or on rings",
                "Lift body up on straight arms",
                "Keep feet on ground with legs straight",
                "Hold position",
            ]),
            prerequisites: vec![],
            progression_order: 1,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&["Focus on pushing through hands", "Keep legs straight"]),
            common_mistakes: lines(&["Putting too much weight on feet"]),
        },
        // Core
        Exercise {
            id: "support-hold".into(),
            name: "Support Hold".into(),
            category: Core,
            skill_level: Beginner,
            description: "Basic static hold building shoulder and core strength.".into(),
            instructions: lines(&[
                "Mount rings or parallel bars",
                "Straighten arms and support full body weight",
                "Keep shoulders depressed",
                "Maintain neutral spine",
            ]),
            prerequisites: vec![],
            progression_order: 1,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&["Keep shoulders down and back"]),
            common_mistakes: lines(&["Allowing shoulders to shrug up"]),
        },
        // Legs
        Exercise {
            id: "assisted-squat".into(),
            name: "Assisted Squat".into(),
            category: Legs,
            skill_level: Beginner,
            description: "Basic squat movement with assistance for proper form.".into(),
            instructions: lines(&[
                "Hold onto sturdy object for support",
                "Lower into deep squat position",
                "Keep chest up and knees tracking over toes",
                "Rise back to standing",
            ]),
            prerequisites: vec![],
            progression_order: 1,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&["Use minimal assistance"]),
            common_mistakes: lines(&["Relying too heavily on assistance"]),
        },
        Exercise {
            id: "parallel-squat".into(),
            name: "Parallel Squat".into(),
            category: Legs,
            skill_level: Beginner,
            description: "Standard squat to parallel depth.".into(),
            instructions: lines(&[
                "Stand with feet shoulder-width apart",
                "Lower until thighs are parallel to ground",
                "Keep chest up and core engaged",
                "Drive through heels to stand",
            ]),
            prerequisites: lines(&["assisted-squat"]),
            progression_order: 2,
            demo_video: Some(DEMO_VIDEO.into()),
            tips: lines(&["Keep weight on heels"]),
            common_mistakes: lines(&["Not reaching parallel depth"]),
        },
    ];

    ExerciseCatalog::assemble(categories, exercises)
}

/// Sample progress used when no progress file is present
pub fn sample_progress() -> UserProgress {
    let completed = |y, m, d, hold: Option<&str>, reps: Option<&str>| ProgressRecord {
        status: ExerciseStatus::Completed,
        hold_time: hold.map(Into::into),
        reps: reps.map(Into::into),
        progress: Some(100),
        started_date: None,
        completed_date: NaiveDate::from_ymd_opt(y, m, d),
    };
    let current = |y, m, d, progress| ProgressRecord {
        status: ExerciseStatus::Current,
        progress: Some(progress),
        started_date: NaiveDate::from_ymd_opt(y, m, d),
        ..ProgressRecord::default()
    };
    let locked = || ProgressRecord {
        status: ExerciseStatus::Locked,
        progress: Some(0),
        ..ProgressRecord::default()
    };

    let mut progress = UserProgress::new();
    let records = &mut progress.records;
    records.insert("german-hang".into(), completed(2024, 1, 15, Some("30s"), None));
    records.insert("skin-the-cat".into(), completed(2024, 1, 20, None, Some("5x3")));
    records.insert("tuck-back-lever".into(), current(2024, 1, 25, 75));
    records.insert("adv-tuck-back-lever".into(), locked());
    records.insert("tuck-front-lever".into(), locked());
    records.insert("vertical-row".into(), completed(2024, 1, 10, None, Some("3x12")));
    records.insert("incline-row".into(), completed(2024, 1, 18, None, Some("3x10")));
    records.insert("horizontal-row".into(), current(2024, 1, 22, 60));
    records.insert("scapular-shrug".into(), completed(2024, 1, 12, None, Some("3x15")));
    records.insert("support-hold".into(), completed(2024, 1, 14, Some("45s"), None));
    records.insert("assisted-squat".into(), completed(2024, 1, 8, None, Some("3x15")));
    records.insert("parallel-squat".into(), current(2024, 1, 16, 80));
    progress
}
