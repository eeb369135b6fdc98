use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use crate::config::StorageConfig;
use crate::query::Query;

use super::error::StorageError;
use super::saved::SavedQuery;
use super::Storage;

/// File-based storage implementation.
///
/// ```text
/// .discourse/
///   scratch.json                   # Query being edited
///   queries/
///     query-1-3f2a9c1e.json        # One file per saved query
/// ```
pub struct FileStorage {
    config: StorageConfig,
}

impl FileStorage {
    /// Creates a new FileStorage with default config.
    pub fn new() -> Self {
        Self::with_config(StorageConfig::default())
    }

    /// Creates a new FileStorage with custom configuration.
    pub fn with_config(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Returns the path to the saved queries directory.
    fn queries_dir(&self) -> PathBuf {
        self.config.queries_path()
    }

    /// Returns the path of a saved query's file.
    ///
    /// Labels are free text; the file name is a slug plus a short hash of the
    /// exact label so that labels differing only in case or punctuation do
    /// not collide.
    fn query_file(&self, label: &str) -> PathBuf {
        let slug: String = label
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        let slug = slug.trim_matches('-');
        let hash = hex::encode(Sha256::digest(label.as_bytes()));
        self.queries_dir()
            .join(format!("{}-{}.json", slug, &hash[..8]))
    }

    /// Ensures the queries directory exists.
    fn ensure_queries_dir(&self) -> Result<(), StorageError> {
        let dir = self.queries_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
        }
        Ok(())
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for FileStorage {
    fn save_query(&self, query: &SavedQuery) -> Result<(), StorageError> {
        if query.label.trim().is_empty() {
            return Err(StorageError::InvalidLabel(query.label.clone()));
        }
        self.ensure_queries_dir()?;

        let path = self.query_file(&query.label);
        let json = serde_json::to_string_pretty(query)?;
        fs::write(&path, json).map_err(|e| StorageError::io(&path, e))?;

        Ok(())
    }

    fn load_query(&self, label: &str) -> Result<SavedQuery, StorageError> {
        let path = self.query_file(label);
        if !path.exists() {
            return Err(StorageError::QueryNotFound(label.to_string()));
        }

        let json = fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))?;
        let query: SavedQuery = serde_json::from_str(&json)?;

        Ok(query)
    }

    fn list_queries(&self) -> Result<Vec<SavedQuery>, StorageError> {
        let dir = self.queries_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut queries = Vec::new();

        let entries = fs::read_dir(&dir).map_err(|e| StorageError::io(&dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(&dir, e))?;
            let path = entry.path();

            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let json = fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))?;
            match serde_json::from_str::<SavedQuery>(&json) {
                Ok(query) => queries.push(query),
                Err(_) => continue, // Skip unreadable files
            }
        }

        queries.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.label.cmp(&b.label))
        });

        Ok(queries)
    }

    fn delete_query(&self, label: &str) -> Result<(), StorageError> {
        let path = self.query_file(label);
        if !path.exists() {
            return Err(StorageError::QueryNotFound(label.to_string()));
        }

        fs::remove_file(&path).map_err(|e| StorageError::io(&path, e))?;

        Ok(())
    }

    fn load_scratch(&self) -> Result<Option<Query>, StorageError> {
        let path = self.config.scratch_path();
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn save_scratch(&self, query: &Query) -> Result<(), StorageError> {
        let path = self.config.scratch_path();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
            }
        }

        let json = serde_json::to_string_pretty(query)?;
        fs::write(&path, json).map_err(|e| StorageError::io(&path, e))?;

        Ok(())
    }
}
