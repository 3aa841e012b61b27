//! Per-module symbol tables for formal module checking.
//!
//! - [`existence`] - which predicate, function and rule symbols a module can see
//! - [`labels`] - node ids and import labels registered by a module
//! - [`reference`] - resolving textual references against a label table

pub mod error;
pub mod existence;
pub mod labels;
pub mod reference;

pub use error::{LabelError, RegistryError, Result};
pub use existence::{Definition, ExistenceChecker, ExistenceRegistry, ImportedRegistry, RuleEntry};
pub use labels::{LabelTable, LabelTarget};
pub use reference::{Reference, ReferenceProblem, ResolveScope};
