//! Checkers for formulas, definitions and formal proofs.
//!
//! All checks collect [`Diagnostic`](hilbert_primitives::Diagnostic)s instead
//! of stopping at the first problem. Only a malformed node whose children
//! cannot be interpreted short-circuits, and then only for that subtree.

pub mod definition;
pub mod formula;
pub mod proof;
mod strategy;
pub mod subst;
pub mod vars;

pub use definition::{DefinitionOutcome, DefinitionPolicy, DefinitionSettings};
pub use formula::{FormulaChecker, WellFormedChecker};
pub use proof::{AddLookup, AddTarget, FormalProofChecker, ProofChecker, ProofEnvironment};
pub use strategy::CheckerStrategy;
