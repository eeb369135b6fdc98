//! Query compilation.
//!
//! Turns a [`Query`] into one Datalog query over the host graph. Each
//! condition becomes a fragment: native relations translate directly, template
//! relations become an `or-join` with one branch per matching template.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::datalog::{is_variable_name, render_clauses, Clause, Scope, Symbol, Term};
use crate::schema::native::{HAS_TITLE, IS_A};
use crate::schema::{NativeRelation, NodeType, SchemaRegistry, TargetKind};

use super::condition::{Condition, Query};
use super::error::{CompileError, CompileWarning};
use super::resolver::{RelationRef, Resolver};
use super::rewrite::{rewrite, Binding};

/// Attributes pulled for every result, with the keys they are returned under.
pub const PROJECTION: &[(&str, &str)] = &[
    (":block/string", "text"),
    (":node/title", "text"),
    (":block/uid", "pageUid"),
    (":create/time", "createdTime"),
    (":edit/time", "editedTime"),
];

/// Rendered in place of a condition that matched nothing.
pub const ALWAYS_FALSE: &str = "[(= 0 1)]";

/// Output of [`QueryCompiler::compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    return_variable: Symbol,
    fragments: Vec<Vec<Clause>>,
    warnings: Vec<CompileWarning>,
    unsatisfiable: bool,
}

impl CompiledQuery {
    pub fn return_variable(&self) -> &Symbol {
        &self.return_variable
    }

    /// Clauses of each condition, in condition order.
    pub fn fragments(&self) -> &[Vec<Clause>] {
        &self.fragments
    }

    /// Every where-clause, flattened.
    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.fragments.iter().flatten()
    }

    /// The where body: one line per condition. A condition that could not be
    /// resolved renders as [`ALWAYS_FALSE`], so the text never matches more
    /// than the query asked for.
    pub fn body(&self) -> String {
        self.fragments
            .iter()
            .map(|f| {
                if f.is_empty() {
                    ALWAYS_FALSE.to_string()
                } else {
                    render_clauses(f)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The complete query text.
    pub fn text(&self) -> String {
        let projection = PROJECTION
            .iter()
            .map(|(attribute, key)| format!("[{} :as \"{}\"]", attribute, key))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "[:find (pull {} [{}]) :where {}]",
            self.return_variable,
            projection,
            self.body()
        )
    }

    pub fn warnings(&self) -> &[CompileWarning] {
        &self.warnings
    }

    /// Some condition could not be resolved; the query can match nothing.
    pub fn is_unsatisfiable(&self) -> bool {
        self.unsatisfiable
    }

    /// No where-clauses at all.
    pub fn is_empty(&self) -> bool {
        self.fragments.iter().all(Vec::is_empty)
    }

    /// Whether the query is worth sending to a store.
    pub fn is_executable(&self) -> bool {
        !self.unsatisfiable && !self.is_empty()
    }
}

/// Compiles queries against one registry.
pub struct QueryCompiler<'r> {
    registry: &'r SchemaRegistry,
    resolver: Resolver<'r>,
}

impl<'r> QueryCompiler<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            resolver: Resolver::new(registry),
        }
    }

    pub fn compile(&self, query: &Query) -> Result<CompiledQuery, CompileError> {
        validate(query)?;

        let mut fragments = Vec::with_capacity(query.conditions.len());
        let mut warnings = Vec::new();
        let mut unsatisfiable = false;

        for condition in &query.conditions {
            let fragment = match self.compile_condition(condition, query, &mut warnings) {
                Some(fragment) => fragment,
                None => {
                    unsatisfiable = true;
                    Vec::new()
                }
            };
            fragments.push(fragment);
        }

        for warning in &warnings {
            warn!(%warning, "Compile warning");
        }

        Ok(CompiledQuery {
            return_variable: Symbol::query(query.return_variable.trim()),
            fragments,
            warnings,
            unsatisfiable,
        })
    }

    /// Clauses for one condition, or `None` when it cannot be resolved.
    fn compile_condition(
        &self,
        condition: &Condition,
        query: &Query,
        warnings: &mut Vec<CompileWarning>,
    ) -> Option<Vec<Clause>> {
        let resolution = self.resolver.resolve(condition, query);
        warnings.extend(resolution.warnings.iter().cloned());

        if let [RelationRef::Native(native)] = resolution.refs.as_slice() {
            return self.compile_native(native, condition, query, warnings);
        }
        if resolution.is_unresolved() {
            return None;
        }

        let target = self.binding(&condition.target, query);
        let mut branches = Vec::with_capacity(resolution.refs.len());
        for relation in &resolution.refs {
            if let RelationRef::Template {
                template,
                orientation,
                ..
            } = relation
            {
                branches.push(rewrite(
                    self.registry,
                    template,
                    *orientation,
                    condition,
                    &target,
                ));
            }
        }

        let mut vars = vec![Symbol::query(condition.source.as_str())];
        if let Binding::Variable(symbol) = &target {
            if !vars.contains(symbol) {
                vars.push(symbol.clone());
            }
        }

        debug!(
            condition = %condition.uid,
            branches = branches.len(),
            "Compiled template condition"
        );

        Some(vec![Clause::OrJoin { vars, branches }])
    }

    fn compile_native(
        &self,
        native: &NativeRelation,
        condition: &Condition,
        query: &Query,
        warnings: &mut Vec<CompileWarning>,
    ) -> Option<Vec<Clause>> {
        let scope = Scope::Instance(condition.uid.clone());
        let source = Symbol::query(condition.source.as_str());
        let unresolved_type = |warnings: &mut Vec<CompileWarning>| {
            warnings.push(CompileWarning::UnresolvedType {
                condition: condition.uid.clone(),
                text: condition.target.clone(),
            });
        };

        if native.target == TargetKind::NodeType {
            let node_type = self
                .registry
                .node_type_by_label(&condition.target)
                .or_else(|| self.registry.node_type(condition.target.trim()));
            let Some(node_type) = node_type else {
                unresolved_type(warnings);
                return None;
            };
            return native.translate(&source, &Term::Type(node_type.clone()), &scope);
        }

        let mut clauses = Vec::new();
        if let Some(node_type) = self.registry.node_type_by_label(&condition.source) {
            clauses.extend(membership(&source, node_type, &scope));
        }

        let target = match (native.target, self.binding(&condition.target, query)) {
            (_, Binding::Variable(symbol)) => {
                if let Some(node_type) = self.registry.node_type_by_label(&condition.target) {
                    clauses.extend(membership(&symbol, node_type, &scope));
                }
                Term::Var(symbol)
            }
            (TargetKind::Variable, Binding::Literal(text)) => {
                let node = Symbol::local(&condition.uid, "target");
                clauses.extend(title(&node, text, &scope));
                Term::Var(node)
            }
            (TargetKind::Variable, Binding::Type(node_type)) => {
                let node = Symbol::local(&condition.uid, "target");
                clauses.extend(membership(&node, node_type, &scope));
                Term::Var(node)
            }
            _ => Term::Literal(condition.target.clone()),
        };

        let Some(translated) = native.translate(&source, &target, &scope) else {
            unresolved_type(warnings);
            return None;
        };
        clauses.extend(translated);
        Some(clauses)
    }

    /// How a condition target is bound.
    fn binding<'a>(&self, target: &'a str, query: &Query) -> Binding<'a>
    where
        'r: 'a,
    {
        if query.is_variable(target) {
            Binding::Variable(Symbol::query(target))
        } else if let Some(node_type) = self.registry.node_type_by_label(target) {
            Binding::Type(node_type)
        } else {
            Binding::Literal(target)
        }
    }
}

fn membership(symbol: &Symbol, node_type: &NodeType, scope: &Scope) -> Vec<Clause> {
    crate::schema::native::lookup(IS_A)
        .and_then(|n| n.translate(symbol, &Term::Type(node_type.clone()), scope))
        .unwrap_or_default()
}

fn title(symbol: &Symbol, text: &str, scope: &Scope) -> Vec<Clause> {
    crate::schema::native::lookup(HAS_TITLE)
        .and_then(|n| n.translate(symbol, &Term::Literal(text.to_string()), scope))
        .unwrap_or_default()
}

fn validate(query: &Query) -> Result<(), CompileError> {
    let return_variable = query.return_variable.trim();
    if return_variable.is_empty() {
        return Err(CompileError::BlankReturnVariable);
    }
    if !is_variable_name(return_variable) {
        return Err(CompileError::InvalidVariable(return_variable.to_string()));
    }

    let mut seen = HashSet::new();
    for (index, condition) in query.conditions.iter().enumerate() {
        if condition.source.trim().is_empty() {
            return Err(CompileError::BlankSource { index });
        }
        if !is_variable_name(&condition.source) {
            return Err(CompileError::InvalidVariable(condition.source.clone()));
        }
        if condition.relation.trim().is_empty() {
            return Err(CompileError::BlankRelation { index });
        }
        if !seen.insert(&condition.uid) {
            return Err(CompileError::DuplicateConditionId(condition.uid.clone()));
        }
    }

    Ok(())
}

/// Memoised compilation results.
///
/// Keyed by the registry fingerprint, the serialized query lines and the
/// condition ids (which appear in the output). Evicts the oldest entry once
/// full.
#[derive(Debug)]
pub struct CompileCache {
    capacity: usize,
    entries: HashMap<CacheKey, CompiledQuery>,
    order: VecDeque<CacheKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    fingerprint: String,
    lines: Vec<String>,
    uids: Vec<String>,
}

impl CompileCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Compile through the cache.
    pub fn compile(
        &mut self,
        registry: &SchemaRegistry,
        query: &Query,
    ) -> Result<CompiledQuery, CompileError> {
        let key = CacheKey {
            fingerprint: registry.fingerprint().to_string(),
            lines: query.to_lines(),
            uids: query
                .conditions
                .iter()
                .map(|c| c.uid.as_str().to_string())
                .collect(),
        };

        if let Some(hit) = self.entries.get(&key) {
            debug!("Compile cache hit");
            return Ok(hit.clone());
        }

        let compiled = QueryCompiler::new(registry).compile(query)?;
        if self.capacity > 0 {
            while self.entries.len() >= self.capacity {
                match self.order.pop_front() {
                    Some(oldest) => {
                        self.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
            self.order.push_back(key.clone());
            self.entries.insert(key, compiled.clone());
        }
        Ok(compiled)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
