//! Module graph coordination for formal module checking.
//!
//! A [`ModuleGraph`] holds modules with their imports resolved. A
//! [`ModuleService`] checks a module by first checking its imports, then
//! running two [`traverse`] passes over it: one registering labels, one
//! checking definitions, axioms, propositions with their proofs, rules and
//! links. The result is published as an immutable [`CheckedModule`].

mod config;
mod error;
mod graph;
mod pass;
mod service;
pub mod traverse;

pub use config::{CheckerConfig, LinkSeverity};
pub use error::{CheckError, ConfigError, GraphError, Result};
pub use graph::{CheckedModule, ModuleGraph, ModuleHandle, NodeStatus, ResolvedImport};
pub use hilbert_worker::{CheckToken, PassClock};
pub use service::{ModuleService, import_location};
pub use traverse::{Flow, Visit, Visitor, traverse};
