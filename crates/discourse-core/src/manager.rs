use thiserror::Error;
use tracing::info;

use crate::query::{
    CompileCache, CompileError, CompiledQuery, Condition, ConditionId, ParseError, Query,
    QueryCompiler,
};
use crate::schema::SchemaRegistry;
use crate::storage::{next_label, SavedQuery, Storage, StorageError};

/// Manages the scratch query and saved queries.
///
/// The scratch query is persisted after every change, so an editing session
/// can be picked up again later. Scratch compilations go through a
/// [`CompileCache`], which is disabled until a capacity is set.
pub struct QueryManager<S: Storage> {
    storage: S,
    scratch: Query,
    cache: CompileCache,
}

impl<S: Storage> QueryManager<S> {
    /// Creates a manager, restoring the stored scratch query if any.
    pub fn new(storage: S) -> Result<Self, ManagerError> {
        let scratch = storage.load_scratch()?.unwrap_or_default();
        Ok(Self {
            storage,
            scratch,
            cache: CompileCache::new(0),
        })
    }

    /// Keep up to `capacity` compiled scratch queries.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = CompileCache::new(capacity);
        self
    }

    /// Number of compiled scratch queries held in the cache.
    pub fn cached_compilations(&self) -> usize {
        self.cache.len()
    }

    /// The query being edited.
    pub fn scratch(&self) -> &Query {
        &self.scratch
    }

    /// Sets the return variable of the scratch query.
    pub fn set_return_variable(&mut self, name: &str) -> Result<(), ManagerError> {
        self.scratch.return_variable = name.trim().to_string();
        self.persist()
    }

    /// Appends a condition to the scratch query.
    pub fn add_condition(
        &mut self,
        source: &str,
        relation: &str,
        target: &str,
    ) -> Result<ConditionId, ManagerError> {
        let condition = Condition::new(source.trim(), relation.trim(), target.trim());
        let uid = condition.uid.clone();
        self.scratch.push(condition);
        self.persist()?;
        Ok(uid)
    }

    /// Replaces the statement of an existing condition, keeping its id.
    pub fn update_condition(
        &mut self,
        uid: &ConditionId,
        source: &str,
        relation: &str,
        target: &str,
    ) -> Result<(), ManagerError> {
        let condition = self
            .scratch
            .conditions
            .iter_mut()
            .find(|c| &c.uid == uid)
            .ok_or_else(|| ManagerError::ConditionNotFound(uid.clone()))?;
        condition.source = source.trim().to_string();
        condition.relation = relation.trim().to_string();
        condition.target = target.trim().to_string();
        self.persist()
    }

    /// Removes a condition from the scratch query.
    pub fn remove_condition(&mut self, uid: &ConditionId) -> Result<Condition, ManagerError> {
        let index = self
            .scratch
            .conditions
            .iter()
            .position(|c| &c.uid == uid)
            .ok_or_else(|| ManagerError::ConditionNotFound(uid.clone()))?;
        let removed = self.scratch.conditions.remove(index);
        self.persist()?;
        Ok(removed)
    }

    /// Names the condition at `index` may use as its source.
    pub fn source_candidates(&self, index: usize) -> Vec<String> {
        self.scratch.source_candidates(index)
    }

    /// Empties the scratch query.
    pub fn clear_scratch(&mut self) -> Result<(), ManagerError> {
        self.scratch = Query::default();
        self.persist()
    }

    /// Label the next saved query would get by default.
    pub fn next_label(&self) -> Result<String, ManagerError> {
        let saved = self.storage.list_queries()?;
        Ok(next_label(saved.iter().map(|q| q.label.as_str())))
    }

    /// Saves the scratch query and starts a fresh one.
    pub fn save_scratch(&mut self, label: Option<&str>) -> Result<SavedQuery, ManagerError> {
        let label = match label.map(str::trim).filter(|l| !l.is_empty()) {
            Some(label) => label.to_string(),
            None => self.next_label()?,
        };

        let saved = SavedQuery::new(label, self.scratch.to_lines());
        self.storage.save_query(&saved)?;
        info!(label = %saved.label, "Saved query");

        self.clear_scratch()?;
        Ok(saved)
    }

    /// Moves a saved query back into the scratch for editing.
    pub fn edit_saved(
        &mut self,
        registry: &SchemaRegistry,
        label: &str,
    ) -> Result<&Query, ManagerError> {
        let query = self.parse_saved(registry, label)?;
        self.scratch = query;
        self.persist()?;
        self.storage.delete_query(label)?;
        Ok(&self.scratch)
    }

    pub fn list_saved(&self) -> Result<Vec<SavedQuery>, ManagerError> {
        Ok(self.storage.list_queries()?)
    }

    pub fn load_saved(&self, label: &str) -> Result<SavedQuery, ManagerError> {
        Ok(self.storage.load_query(label)?)
    }

    pub fn delete_saved(&mut self, label: &str) -> Result<(), ManagerError> {
        self.storage.delete_query(label)?;
        Ok(())
    }

    /// Compiles the scratch query. Its condition ids are stable, so repeated
    /// compilations of an unchanged scratch hit the cache.
    pub fn compile_scratch(&mut self, registry: &SchemaRegistry) -> Result<CompiledQuery, ManagerError> {
        Ok(self.cache.compile(registry, &self.scratch)?)
    }

    /// Compiles a saved query. Parsing assigns fresh ids, so this bypasses
    /// the cache.
    pub fn compile_saved(
        &self,
        registry: &SchemaRegistry,
        label: &str,
    ) -> Result<CompiledQuery, ManagerError> {
        let query = self.parse_saved(registry, label)?;
        Ok(QueryCompiler::new(registry).compile(&query)?)
    }

    fn parse_saved(&self, registry: &SchemaRegistry, label: &str) -> Result<Query, ManagerError> {
        let saved = self.storage.load_query(label)?;
        Ok(Query::from_lines(&saved.lines, &registry.relation_labels())?)
    }

    fn persist(&self) -> Result<(), ManagerError> {
        self.storage.save_scratch(&self.scratch)?;
        Ok(())
    }
}

/// Errors that can occur in QueryManager operations.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Condition not found: {0}")]
    ConditionNotFound(ConditionId),
}
