//! Key-value persistence boundary.
//!
//! # Responsibility
//! - Define the flat `get`/`set` contract repositories persist through.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - Values are opaque serialized text; the store never inspects them.
//! - `set` overwrites the whole value stored under a key.
//! - Only repositories talk to a store.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
pub mod migrations;
mod open;
mod sqlite;

pub use memory::MemoryKvStore;
pub use open::{open_store, open_store_in_memory};
pub use sqlite::SqliteKvStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A store deliberately refused or lost the round-trip.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "store schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Unavailable(reason) => write!(f, "store unavailable: {reason}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Flat text key-value store used for durability across launches.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}
