//! Core types for formal module checking: formula elements, symbol keys,
//! module document trees, locations and diagnostics.

/// Diagnostics and their numeric codes.
pub mod diagnostic;
/// Formula and term trees.
pub mod element;
/// Predicate, function and rule keys.
pub mod key;
/// Immutable module paths and source spans.
pub mod location;
/// Module document tree as supplied by a loader.
pub mod module;
/// Closed operator set with arity and sort rules.
pub mod operator;
/// Tri-state check outcome.
pub mod status;

pub use diagnostic::{Diagnostic, Diagnostics, Severity, codes};
pub use element::{Atom, Element, ElementList};
pub use key::{FunctionKey, MODULE_SEPARATOR, PredicateKey, RuleKey, Version, VersionError};
pub use location::{ModuleId, ModuleLocation, ModulePath, Segment, SourceMap, SourceSpan};
pub use module::{Module, Node, NodeAddress, NodeKind};
pub use operator::{Arity, Operator, Sort};
pub use status::CheckStatus;
