//! Datalog clause model and rendering.
//!
//! The compiler never builds query text by splicing strings. It produces
//! [`Clause`] values over scoped [`Symbol`]s and renders them once, at the end,
//! into the host graph's Datalog dialect (Datascript / Roam flavour):
//!
//! ```text
//! [?e :block/refs ?v]                     pattern
//! [(re-find ?re ?title)]                  function call
//! [(re-pattern "^x$") ?re]                function call with a binding
//! (or [..] [..])                          disjunction
//! (or-join [?v] (and ..) (and ..))        disjunction joined on ?v
//! ```

use std::fmt;

use crate::query::ConditionId;
use crate::schema::NodeType;

/// Where a variable lives.
///
/// Query variables are shared by every condition. Instance variables belong
/// to a single condition and are rendered with that condition's id as a
/// prefix, so two instantiations of the same template never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Query,
    Instance(ConditionId),
}

/// A Datalog variable: a name inside a scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    scope: Scope,
    name: String,
}

impl Symbol {
    /// A variable visible to the whole query.
    pub fn query(name: impl Into<String>) -> Self {
        Self {
            scope: Scope::Query,
            name: name.into(),
        }
    }

    /// A variable local to one condition instance.
    pub fn local(uid: &ConditionId, name: impl Into<String>) -> Self {
        Self {
            scope: Scope::Instance(uid.clone()),
            name: name.into(),
        }
    }

    /// A helper variable named after this one, living in `scope`.
    ///
    /// Translators place their helpers in the scope of the condition being
    /// compiled, so two conditions on the same query variable never share one.
    pub fn helper(&self, scope: &Scope, suffix: &str) -> Self {
        Self {
            scope: scope.clone(),
            name: format!("{}-{}", self.name, suffix),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_query(&self) -> bool {
        self.scope == Scope::Query
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Scope::Query => write!(f, "?{}", sanitize(&self.name)),
            Scope::Instance(uid) => write!(f, "?{}-{}", sanitize(uid.as_str()), sanitize(&self.name)),
        }
    }
}

/// One side of a rewritten triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// A variable.
    Var(Symbol),
    /// Literal text, usually a page title.
    Literal(String),
    /// A declared node type (membership is tested through its title format).
    Type(NodeType),
}

impl Term {
    pub fn as_var(&self) -> Option<&Symbol> {
        match self {
            Term::Var(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// The term as a clause value. Node types render as their id.
    pub fn to_value(&self) -> Value {
        match self {
            Term::Var(symbol) => Value::Var(symbol.clone()),
            Term::Literal(text) => Value::Str(text.clone()),
            Term::Type(node_type) => Value::Str(node_type.type_id.clone()),
        }
    }
}

/// A value position inside a clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Var(Symbol),
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Var(symbol) => write!(f, "{}", symbol),
            Value::Str(text) => write!(f, "\"{}\"", escape_string(text)),
        }
    }
}

/// A single where-clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `[?e attribute value]`
    Pattern {
        entity: Symbol,
        attribute: String,
        value: Value,
    },
    /// `[(function args..) ?binding]`
    Call {
        function: String,
        args: Vec<Value>,
        binding: Option<Symbol>,
    },
    /// `(or a b ..)`
    Or(Vec<Clause>),
    /// `(or-join [?v..] (and ..) ..)`
    OrJoin {
        vars: Vec<Symbol>,
        branches: Vec<Vec<Clause>>,
    },
}

impl Clause {
    pub fn pattern(entity: Symbol, attribute: impl Into<String>, value: Value) -> Self {
        Clause::Pattern {
            entity,
            attribute: attribute.into(),
            value,
        }
    }

    pub fn call(function: impl Into<String>, args: Vec<Value>, binding: Option<Symbol>) -> Self {
        Clause::Call {
            function: function.into(),
            args,
            binding,
        }
    }

    /// Every variable mentioned by this clause, in order of appearance.
    pub fn symbols(&self) -> Vec<&Symbol> {
        let mut out = Vec::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols<'a>(&'a self, out: &mut Vec<&'a Symbol>) {
        match self {
            Clause::Pattern { entity, value, .. } => {
                out.push(entity);
                if let Value::Var(symbol) = value {
                    out.push(symbol);
                }
            }
            Clause::Call { args, binding, .. } => {
                for arg in args {
                    if let Value::Var(symbol) = arg {
                        out.push(symbol);
                    }
                }
                if let Some(symbol) = binding {
                    out.push(symbol);
                }
            }
            Clause::Or(clauses) => {
                for clause in clauses {
                    clause.collect_symbols(out);
                }
            }
            Clause::OrJoin { vars, branches } => {
                out.extend(vars.iter());
                for clause in branches.iter().flatten() {
                    clause.collect_symbols(out);
                }
            }
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Pattern {
                entity,
                attribute,
                value,
            } => write!(f, "[{} {} {}]", entity, attribute, value),
            Clause::Call {
                function,
                args,
                binding,
            } => {
                write!(f, "[({}", function)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")?;
                if let Some(symbol) = binding {
                    write!(f, " {}", symbol)?;
                }
                write!(f, "]")
            }
            Clause::Or(clauses) => write!(f, "(or {})", render_clauses(clauses)),
            Clause::OrJoin { vars, branches } => {
                let vars = vars
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                write!(f, "(or-join [{}]", vars)?;
                for branch in branches {
                    write!(f, "\n  (and {})", render_clauses(branch))?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Render clauses separated by single spaces.
pub fn render_clauses(clauses: &[Clause]) -> String {
    clauses
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape text for a Datalog (EDN) string literal.
pub fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Whether `name` can name a query variable as is.
///
/// Query variables render without escaping, so two of them only share a
/// Datalog name when they are equal. `-` is left out since instance
/// variables use it to separate the condition id from the local name.
pub fn is_variable_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || "_*+!<>=.".contains(c))
}

/// Turn a free-form name into something usable inside a Datalog symbol.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || "-_*+!<>=.".contains(c) {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Attribute keyword for a relation name with no native translation.
///
/// `Has Source` becomes `:has-source`.
pub fn attribute_keyword(relation: &str) -> String {
    let mut keyword = String::from(":");
    let mut pending_dash = false;
    for c in relation.trim().chars() {
        if c.is_alphanumeric() {
            if pending_dash && keyword.len() > 1 {
                keyword.push('-');
            }
            pending_dash = false;
            keyword.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    keyword
}
