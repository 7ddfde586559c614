//! Repositories owning the persisted collections.
//!
//! # Responsibility
//! - Keep each collection's in-memory snapshot and its stored copy in step.
//! - Reject invalid commands before anything is written.
//!
//! # Invariants
//! - Every successful mutation overwrites the whole stored collection.
//! - Failed commands never write.
//! - Store failures are logged and degrade; they never escape as errors.

use crate::model::{RecordId, ValidationError};
use crate::store::KeyValueStore;
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Recoverable command failure. The stored collection is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Validation(ValidationError),
    NotFound(RecordId),
    /// Attempted to edit or delete the default category.
    Protected(RecordId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Protected(id) => write!(f, "record is protected: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::Protected(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// What a collection read produced.
#[derive(Debug)]
pub(crate) enum StoredCollection<T> {
    /// Nothing stored under the key yet.
    Absent,
    Records(Vec<T>),
    /// The stored value is not a JSON array at all.
    Undecodable,
    /// The store itself failed; the stored value may still be intact.
    ReadFailed,
}

/// Reads a collection record by record.
///
/// A record that does not decode is skipped and logged; the rest of the
/// collection is kept.
pub(crate) fn read_collection<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> StoredCollection<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return StoredCollection::Absent,
        Err(err) => {
            error!("event=collection_read module=repo status=error key={key} error={err}");
            return StoredCollection::ReadFailed;
        }
    };

    let values = match serde_json::from_str::<Vec<Value>>(&raw) {
        Ok(values) => values,
        Err(err) => {
            warn!(
                "event=collection_read module=repo status=error key={} error_code=decode_failed bytes={} error={}",
                key,
                raw.len(),
                err
            );
            return StoredCollection::Undecodable;
        }
    };

    let records = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<T>(value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(
                    "event=record_skip module=repo status=error key={key} index={index} error={err}"
                );
                None
            }
        })
        .collect();
    StoredCollection::Records(records)
}

/// Overwrites the stored collection. Returns false when nothing was written.
pub(crate) fn write_collection<T: Serialize>(
    store: &impl KeyValueStore,
    key: &str,
    records: &[T],
) -> bool {
    let encoded = match serde_json::to_string(records) {
        Ok(encoded) => encoded,
        Err(err) => {
            error!(
                "event=collection_write module=repo status=error key={key} error_code=encode_failed error={err}"
            );
            return false;
        }
    };

    match store.set(key, &encoded) {
        Ok(()) => true,
        Err(err) => {
            error!(
                "event=collection_write module=repo status=error key={} count={} error={}",
                key,
                records.len(),
                err
            );
            false
        }
    }
}
