//! Category record and its load-time migration.
//!
//! # Responsibility
//! - Define the canonical and legacy stored shapes of a category.
//! - Heal stored collections so the default-category invariants hold.
//!
//! # Invariants
//! - Exactly one category has `id == DEFAULT_CATEGORY_ID` after healing.
//! - The default category's color is always `REFERENCE_BLUE`.
//! - Every healed category has a non-empty color.

use super::{fresh_record_id, require_text, RecordId, ValidationError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved id of the built-in category.
pub const DEFAULT_CATEGORY_ID: &str = "default-tasks";
/// Display name given to the default category when it is seeded.
pub const DEFAULT_CATEGORY_NAME: &str = "Tasks";
/// Pinned color of the default category.
pub const REFERENCE_BLUE: &str = "#1e90ff";

/// Palette offered to users when creating a category.
pub const COLOR_OPTIONS: [&str; 10] = [
    REFERENCE_BLUE,
    "#ff6347",
    "#32cd32",
    "#ffa500",
    "#8a2be2",
    "#ff69b4",
    "#20b2aa",
    "#ffd700",
    "#ff4500",
    "#00bfff",
];

const MIGRATED_SATURATION_PCT: u8 = 70;
const MIGRATED_LIGHTNESS_PCT: u8 = 50;

/// User-defined label used to group tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: RecordId,
    pub name: String,
    pub color: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    /// The built-in category as seeded into an empty store.
    pub fn default_category() -> Self {
        Self {
            id: DEFAULT_CATEGORY_ID.to_string(),
            name: DEFAULT_CATEGORY_NAME.to_string(),
            color: REFERENCE_BLUE.to_string(),
            extra: Map::new(),
        }
    }

    pub(crate) fn create(
        name: &str,
        color: &str,
        taken: impl Fn(&str) -> bool,
    ) -> Result<Self, ValidationError> {
        validate_name(name)?;
        require_text(color, ValidationError::EmptyColor)?;
        Ok(Self {
            id: fresh_record_id(taken),
            name: name.to_string(),
            color: color.to_string(),
            extra: Map::new(),
        })
    }

    pub fn is_default(&self) -> bool {
        is_default_id(&self.id)
    }
}

/// Category as found in storage; older records carry no color.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredCategory {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of healing a stored collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealedCategories {
    pub categories: Vec<Category>,
    /// True when the result differs from what was stored.
    pub changed: bool,
}

pub fn is_default_id(id: &str) -> bool {
    id == DEFAULT_CATEGORY_ID
}

/// `hsl(<hue>, 70%, 50%)` with a uniformly chosen hue.
pub fn random_hsl_color() -> String {
    let hue: u16 = rand::rng().random_range(0..360);
    format!("hsl({hue}, {MIGRATED_SATURATION_PCT}%, {MIGRATED_LIGHTNESS_PCT}%)")
}

/// Applies the load-time migration to a stored collection.
///
/// - Empty input yields the seeded default category.
/// - A record without a color gets `REFERENCE_BLUE` if it is the default
///   category, otherwise a color from `pick_color`.
/// - A default category with any other color is corrected.
/// - A missing default is inserted first; duplicate defaults after the first
///   are dropped.
///
/// Healing an already healed collection returns it unchanged with
/// `changed == false`.
pub fn heal_categories(
    stored: Vec<StoredCategory>,
    mut pick_color: impl FnMut() -> String,
) -> HealedCategories {
    if stored.is_empty() {
        return HealedCategories {
            categories: vec![Category::default_category()],
            changed: true,
        };
    }

    let mut changed = false;
    let mut seen_default = false;
    let mut categories = Vec::with_capacity(stored.len() + 1);

    for record in stored {
        let is_default = is_default_id(&record.id);
        if is_default {
            if seen_default {
                changed = true;
                continue;
            }
            seen_default = true;
        }

        let color = match record.color {
            Some(color) if is_default && color != REFERENCE_BLUE => {
                changed = true;
                REFERENCE_BLUE.to_string()
            }
            Some(color) if !color.trim().is_empty() => color,
            _ => {
                changed = true;
                if is_default {
                    REFERENCE_BLUE.to_string()
                } else {
                    pick_color()
                }
            }
        };

        categories.push(Category {
            id: record.id,
            name: record.name,
            color,
            extra: record.extra,
        });
    }

    if !seen_default {
        categories.insert(0, Category::default_category());
        changed = true;
    }

    HealedCategories {
        categories,
        changed,
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    require_text(name, ValidationError::EmptyName)
}
