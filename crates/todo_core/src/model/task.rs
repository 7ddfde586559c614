//! Task record.
//!
//! # Invariants
//! - `title.trim()` is never empty for records written by this crate.
//! - `category_id` may dangle after its category is deleted; that is allowed.

use super::{fresh_record_id, require_text, RecordId, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One to-do entry, serialized as `{id, title, categoryId?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    /// Legacy records without a title load with an empty one.
    #[serde(default)]
    pub title: String,
    /// `None` means uncategorized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<RecordId>,
    /// Stored fields this version does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Builds a validated task whose id does not collide with `taken`.
    pub(crate) fn create(
        title: &str,
        category_id: Option<RecordId>,
        taken: impl Fn(&str) -> bool,
    ) -> Result<Self, ValidationError> {
        validate_title(title)?;
        Ok(Self {
            id: fresh_record_id(taken),
            title: title.to_string(),
            category_id,
            extra: Map::new(),
        })
    }

    /// Returns whether this task points at `category_id`.
    pub fn is_in_category(&self, category_id: &str) -> bool {
        self.category_id.as_deref() == Some(category_id)
    }
}

pub(crate) fn validate_title(title: &str) -> Result<(), ValidationError> {
    require_text(title, ValidationError::EmptyTitle)
}

#[cfg(test)]
mod tests {
    use super::Task;
    use crate::model::ValidationError;

    #[test]
    fn create_rejects_blank_title() {
        let err = Task::create("   ", None, |_| false).unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle);
    }

    #[test]
    fn serialization_omits_missing_category() {
        let task = Task::create("Buy milk", None, |_| false).unwrap();
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["title"], "Buy milk");
        assert!(json.get("categoryId").is_none());
    }

    #[test]
    fn legacy_record_keeps_unknown_fields() {
        let raw = r#"{"id":"1700000000000","title":"Walk dog","done":true}"#;
        let task: Task = serde_json::from_str(raw).unwrap();

        assert_eq!(task.id, "1700000000000");
        assert_eq!(task.category_id, None);
        assert!(!task.is_in_category("x"));

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["done"], true);
    }
}
