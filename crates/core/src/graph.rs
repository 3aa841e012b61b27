//! Modules under check and their published results.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use hilbert_primitives::{CheckStatus, Diagnostics, Module, ModuleId, NodeAddress};
use hilbert_registry::{ExistenceRegistry, LabelTable};
use hilbert_worker::ModuleLock;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::GraphError;

/// Outcome of checking one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeStatus {
	pub well_formed: CheckStatus,
	/// Only propositions are proved; other nodes stay `Unchecked`.
	pub proved: CheckStatus,
}

/// Immutable result of a completed pass over one module.
#[derive(Debug, Clone)]
pub struct CheckedModule {
	pub module: ModuleId,
	/// Pass that produced this result.
	pub pass: u64,
	pub registry: Arc<ExistenceRegistry>,
	pub labels: Arc<LabelTable>,
	pub diagnostics: Diagnostics,
	pub nodes: BTreeMap<NodeAddress, NodeStatus>,
	pub well_formed: CheckStatus,
	pub proved: CheckStatus,
}

impl CheckedModule {
	pub fn is_well_formed(&self) -> bool {
		self.well_formed.is_success()
	}

	pub fn status(&self, address: NodeAddress) -> NodeStatus {
		self.nodes.get(&address).copied().unwrap_or_default()
	}

	/// Status of the node registered under `id`.
	pub fn node_status(&self, id: &str) -> Option<NodeStatus> {
		self.labels.node(id).map(|address| self.status(address))
	}
}

/// A direct import resolved to its module handle.
#[derive(Debug, Clone)]
pub struct ResolvedImport {
	pub label: Arc<str>,
	pub handle: Arc<ModuleHandle>,
}

/// A module in the graph together with its lock and last published result.
#[derive(Debug)]
pub struct ModuleHandle {
	module: Arc<Module>,
	imports: Vec<ResolvedImport>,
	pub(crate) lock: ModuleLock,
	checked: ArcSwapOption<CheckedModule>,
}

impl ModuleHandle {
	pub fn id(&self) -> &ModuleId {
		&self.module.id
	}

	pub fn module(&self) -> &Arc<Module> {
		&self.module
	}

	pub fn imports(&self) -> &[ResolvedImport] {
		&self.imports
	}

	/// Last published result, if any.
	pub fn checked(&self) -> Option<Arc<CheckedModule>> {
		self.checked.load_full()
	}

	/// Drops the published result so the next check runs a new pass.
	pub fn invalidate(&self) {
		self.checked.store(None);
	}

	/// Returns true if a pass currently holds this module.
	pub fn is_locked(&self) -> bool {
		self.lock.is_locked()
	}

	pub(crate) fn publish(&self, checked: Arc<CheckedModule>) {
		tracing::debug!(module = %checked.module, pass = checked.pass, well_formed = ?checked.well_formed, "published module result");
		self.checked.store(Some(checked));
	}
}

/// Modules known to the checker.
///
/// Imports are resolved on insertion, so a module can only import modules
/// inserted before it and the graph cannot contain cycles.
#[derive(Debug, Default)]
pub struct ModuleGraph {
	modules: RwLock<FxHashMap<ModuleId, Arc<ModuleHandle>>>,
}

impl ModuleGraph {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&self, module: Module) -> Result<Arc<ModuleHandle>, GraphError> {
		let mut modules = self.modules.write();
		if modules.contains_key(&module.id) {
			return Err(GraphError::DuplicateModule { module: module.id });
		}
		let imports = module
			.imports
			.iter()
			.map(|import| {
				let handle = modules.get(&import.module).ok_or_else(|| GraphError::UnresolvedImport {
					module: module.id.clone(),
					label: import.label.clone(),
					import: import.module.clone(),
				})?;
				Ok(ResolvedImport {
					label: Arc::from(import.label.as_str()),
					handle: Arc::clone(handle),
				})
			})
			.collect::<Result<Vec<_>, GraphError>>()?;

		tracing::debug!(module = %module.id, imports = imports.len(), "inserted module");
		let handle = Arc::new(ModuleHandle {
			module: Arc::new(module),
			imports,
			lock: ModuleLock::new(),
			checked: ArcSwapOption::empty(),
		});
		modules.insert(handle.id().clone(), Arc::clone(&handle));
		Ok(handle)
	}

	pub fn get(&self, id: &ModuleId) -> Option<Arc<ModuleHandle>> {
		self.modules.read().get(id).cloned()
	}

	pub fn len(&self) -> usize {
		self.modules.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.modules.read().is_empty()
	}
}
