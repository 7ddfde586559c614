//! Domain records persisted by the repositories.
//!
//! # Responsibility
//! - Define the on-disk shape of tasks and categories.
//! - Own field-level validation shared by create/update paths.
//!
//! # Invariants
//! - Record ids are opaque strings and never change after creation.
//! - Unknown stored fields ride along in `extra` and are written back as-is.

use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod category;
pub mod task;

/// Opaque record identifier shared by tasks and categories.
pub type RecordId = String;

/// Rejected user input for a required text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTitle,
    EmptyName,
    EmptyColor,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::EmptyName => write!(f, "category name cannot be empty"),
            Self::EmptyColor => write!(f, "category color cannot be empty"),
        }
    }
}

impl Error for ValidationError {}

/// Generates a timestamp-ordered id not present in `taken`.
pub(crate) fn fresh_record_id(taken: impl Fn(&str) -> bool) -> RecordId {
    loop {
        let candidate = Uuid::now_v7().to_string();
        if !taken(candidate.as_str()) {
            return candidate;
        }
    }
}

pub(crate) fn require_text(value: &str, error: ValidationError) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{fresh_record_id, require_text, ValidationError};

    #[test]
    fn fresh_record_id_skips_taken_values() {
        let first = fresh_record_id(|_| false);
        let second = fresh_record_id(|candidate| candidate == first);
        assert_ne!(first, second);
    }

    #[test]
    fn require_text_rejects_whitespace() {
        assert_eq!(
            require_text(" \t\n", ValidationError::EmptyTitle),
            Err(ValidationError::EmptyTitle)
        );
        assert_eq!(require_text(" a ", ValidationError::EmptyTitle), Ok(()));
    }
}
