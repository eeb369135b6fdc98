//! Structural queries and their compilation to Datalog.
//!
//! ## Components
//!
//! - `Query` / `Condition` - the query model and its line form
//! - `Resolver` - maps a condition's relation to native relations or templates
//! - `rewrite` - instantiates one template for one condition
//! - `QueryCompiler` - assembles the final query text
//!
//! ```text
//! Query -> Resolver -> rewrite (per template) -> QueryCompiler -> CompiledQuery
//! ```

mod compiler;
mod condition;
mod error;
mod resolver;
mod rewrite;
mod symbol;
mod text;

pub use compiler::{CompileCache, CompiledQuery, QueryCompiler, ALWAYS_FALSE, PROJECTION};
pub use condition::{Condition, ConditionId, Query};
pub use error::{CompileError, CompileWarning, ParseError};
pub use resolver::{RelationRef, Resolution, Resolver};
pub use rewrite::{rewrite, Binding};
pub use symbol::SymbolTable;
