//! Core domain types for SkillPath.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises, movement categories and skill levels
//! - Per-user progress records
//! - Shop products
//! - Leaderboard and community feed entries

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Exercise Types
// ============================================================================

/// Movement category an exercise trains
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseCategory {
    HorizontalPull,
    VerticalPull,
    VerticalPush,
    HorizontalPush,
    Core,
    Legs,
}

impl ExerciseCategory {
    /// Every category, in display order
    pub const ALL: [ExerciseCategory; 6] = [
        ExerciseCategory::HorizontalPull,
        ExerciseCategory::VerticalPull,
        ExerciseCategory::VerticalPush,
        ExerciseCategory::HorizontalPush,
        ExerciseCategory::Core,
        ExerciseCategory::Legs,
    ];

    /// Wire id of the category (e.g. `horizontal-pull`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseCategory::HorizontalPull => "horizontal-pull",
            ExerciseCategory::VerticalPull => "vertical-pull",
            ExerciseCategory::VerticalPush => "vertical-push",
            ExerciseCategory::HorizontalPush => "horizontal-push",
            ExerciseCategory::Core => "core",
            ExerciseCategory::Legs => "legs",
        }
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ExerciseCategory {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| crate::Error::InvalidQuery(format!("unknown exercise category '{}'", s)))
    }
}

/// Ordinal difficulty of an exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Elite,
}

impl SkillLevel {
    /// Numeric rank, 1 (beginner) through 4 (elite)
    pub fn rank(&self) -> u8 {
        match self {
            SkillLevel::Beginner => 1,
            SkillLevel::Intermediate => 2,
            SkillLevel::Advanced => 3,
            SkillLevel::Elite => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Elite => "Elite",
        }
    }
}

/// Display metadata for a movement category
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub id: ExerciseCategory,
    pub name: String,
    pub description: String,
    pub color: String,
    pub image: Option<String>,
}

/// A single exercise in the skill tree (e.g., "Tuck Front Lever")
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub category: ExerciseCategory,
    pub skill_level: SkillLevel,
    pub description: String,
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Ids of exercises that must be completed first
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub progression_order: u32,
    #[serde(default)]
    pub demo_video: Option<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub common_mistakes: Vec<String>,
}

/// The complete exercise catalog: categories plus exercises in declared order
///
/// Built once and treated as immutable. Lookups by id go through an index
/// into the `exercises` arena so declared order is never lost.
#[derive(Clone, Debug, Default)]
pub struct ExerciseCatalog {
    pub(crate) categories: Vec<CategoryInfo>,
    pub(crate) exercises: Vec<Exercise>,
    pub(crate) index: HashMap<String, usize>,
}

// ============================================================================
// Progress Types
// ============================================================================

/// Where a user stands on a given exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseStatus {
    #[default]
    Locked,
    Unlocked,
    Current,
    Completed,
}

/// Progress record for one exercise
///
/// Only `status` feeds unlock evaluation; the rest is display data.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct ProgressRecord {
    pub status: ExerciseStatus,
    #[serde(default, alias = "holdTime", skip_serializing_if = "Option::is_none")]
    pub hold_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<String>,
    /// Percentage towards completing the exercise (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(default, alias = "startedDate", skip_serializing_if = "Option::is_none")]
    pub started_date: Option<NaiveDate>,
    #[serde(default, alias = "completedDate", skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,
}

impl ProgressRecord {
    pub fn with_status(status: ExerciseStatus) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}

/// A user's progress, keyed by exercise id
///
/// Ids missing from the map are treated as locked and not completed.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct UserProgress {
    pub records: BTreeMap<String, ProgressRecord>,
}

impl UserProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures and tests
    pub fn with(mut self, exercise_id: impl Into<String>, status: ExerciseStatus) -> Self {
        self.records
            .insert(exercise_id.into(), ProgressRecord::with_status(status));
        self
    }

    pub fn get(&self, exercise_id: &str) -> Option<&ProgressRecord> {
        self.records.get(exercise_id)
    }

    /// Recorded status, if any
    pub fn status_of(&self, exercise_id: &str) -> Option<ExerciseStatus> {
        self.records.get(exercise_id).map(|r| r.status)
    }

    pub fn is_completed(&self, exercise_id: &str) -> bool {
        self.status_of(exercise_id) == Some(ExerciseStatus::Completed)
    }
}

// ============================================================================
// Product Types
// ============================================================================

/// Availability status of a product
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    OutOfStock,
}

/// Placeholder 3D asset references shown by the product viewer
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product3dAsset {
    pub model_url: String,
    #[serde(default)]
    pub texture_urls: Vec<String>,
    pub preview_image: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct ProductSpecs {
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub color_options: Vec<String>,
}

/// A shop product as served by the catalog endpoint
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, alias = "longDescription")]
    pub long_description: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    pub price: f64,
    #[serde(default, alias = "discountPrice")]
    pub discount_price: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, alias = "reviewCount")]
    pub review_count: u32,
    #[serde(default, alias = "stockQuantity")]
    pub stock_quantity: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub assets_3d: Option<Product3dAsset>,
    #[serde(default)]
    pub specifications: Option<ProductSpecs>,
}

fn default_currency() -> String {
    "USD".into()
}

/// Ordering applied to a product query
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Keep input order
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    Rating,
    /// Descending string comparison of product ids
    Newest,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Featured,
        SortKey::PriceLow,
        SortKey::PriceHigh,
        SortKey::Rating,
        SortKey::Newest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Featured => "featured",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Rating => "rating",
            SortKey::Newest => "newest",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| {
                crate::Error::InvalidQuery(format!(
                    "unknown sort key '{}' (expected one of: featured, price-low, price-high, rating, newest)",
                    s
                ))
            })
    }
}

// ============================================================================
// Leaderboard and Community Types
// ============================================================================

/// An athlete entry on the leaderboard
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Athlete {
    pub name: String,
    pub university: String,
    #[serde(default)]
    pub city: Option<String>,
    pub points: u32,
    pub level: SkillLevel,
    #[serde(default)]
    pub streak_days: u32,
}

/// An athlete with its computed leaderboard position
#[derive(Clone, Debug, PartialEq)]
pub struct RankedAthlete {
    pub rank: usize,
    pub athlete: Athlete,
}

/// Aggregate standing for one university
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniversityStanding {
    pub name: String,
    pub members: usize,
    pub avg_points: u32,
}

/// One entry in the community activity feed
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CommunityActivity {
    pub user: String,
    pub action: String,
    pub university: String,
    pub occurred_at: DateTime<Utc>,
}
