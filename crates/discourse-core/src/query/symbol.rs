//! Per-instance variable table.

use std::collections::HashMap;

use crate::datalog::{Scope, Symbol};

use super::condition::ConditionId;

/// Maps the variable names of one template instantiation to symbols.
///
/// Names start out local to the instance. A name aliased to a query variable
/// resolves to that variable everywhere in the instance.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    uid: ConditionId,
    aliases: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new(uid: ConditionId) -> Self {
        Self {
            uid,
            aliases: HashMap::new(),
        }
    }

    /// Bind a template variable to another symbol.
    pub fn alias(&mut self, name: impl Into<String>, symbol: Symbol) {
        self.aliases.insert(name.into(), symbol);
    }

    /// The symbol a template variable stands for.
    pub fn resolve(&self, name: &str) -> Symbol {
        self.aliases
            .get(name)
            .cloned()
            .unwrap_or_else(|| Symbol::local(&self.uid, name))
    }

    /// Scope for helpers created while translating this instance.
    pub fn scope(&self) -> Scope {
        Scope::Instance(self.uid.clone())
    }

    pub fn uid(&self) -> &ConditionId {
        &self.uid
    }
}
