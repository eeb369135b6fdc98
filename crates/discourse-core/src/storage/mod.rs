mod error;
mod file;
mod saved;

pub use error::StorageError;
pub use file::FileStorage;
pub use saved::{next_label, SavedQuery};

use crate::query::Query;

/// Trait for query storage backends.
///
/// Implementations persist saved queries and the scratch query being edited.
pub trait Storage {
    /// Saves a query, replacing any saved query with the same label.
    fn save_query(&self, query: &SavedQuery) -> Result<(), StorageError>;

    /// Loads a saved query by label.
    fn load_query(&self, label: &str) -> Result<SavedQuery, StorageError>;

    /// Lists saved queries, oldest first.
    fn list_queries(&self) -> Result<Vec<SavedQuery>, StorageError>;

    /// Deletes a saved query.
    fn delete_query(&self, label: &str) -> Result<(), StorageError>;

    /// Loads the scratch query, if one was stored.
    fn load_scratch(&self) -> Result<Option<Query>, StorageError>;

    /// Stores the scratch query.
    fn save_scratch(&self, query: &Query) -> Result<(), StorageError>;
}
