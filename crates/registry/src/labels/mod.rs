//! Module label table.
//!
//! Node ids, import labels and bare labels share one namespace per module.
//! Proof line labels are scoped to their node and recorded on its entry.

use std::sync::Arc;

use hilbert_primitives::{ModuleId, ModuleLocation, NodeAddress};
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

use crate::error::LabelError;
use crate::reference::{self, Reference, ResolveScope};


/// What a label names.
#[derive(Debug, Clone)]
pub enum LabelTarget {
	/// A content node and the proof line labels inside it.
	Node { address: NodeAddress, lines: HashSet<Arc<str>> },
	/// A direct import and its published label table.
	Import { module: ModuleId, labels: Arc<LabelTable> },
	/// A label with no further structure.
	Bare,
}

#[derive(Debug, Clone)]
struct LabelEntry {
	target: LabelTarget,
	location: ModuleLocation,
}

/// Labels registered by one module during a checking pass.
#[derive(Debug, Clone)]
pub struct LabelTable {
	module: ModuleId,
	entries: HashMap<Arc<str>, LabelEntry>,
}

impl LabelTable {
	pub fn new(module: ModuleId) -> Self {
		Self {
			module,
			entries: HashMap::default(),
		}
	}

	pub fn module(&self) -> &ModuleId {
		&self.module
	}

	fn insert(&mut self, label: &str, target: LabelTarget, location: ModuleLocation) -> Result<(), LabelError> {
		if let Some(first) = self.entries.get(label) {
			return Err(LabelError::Duplicate {
				label: label.to_string(),
				first: first.location.clone(),
				second: location,
			});
		}
		self.entries.insert(Arc::from(label), LabelEntry { target, location });
		Ok(())
	}

	/// Registers a content node id.
	pub fn add_node(&mut self, id: &str, address: NodeAddress, location: ModuleLocation) -> Result<(), LabelError> {
		self.insert(
			id,
			LabelTarget::Node {
				address,
				lines: HashSet::default(),
			},
			location,
		)
	}

	/// Registers an import label with the import's label table.
	pub fn add_import(&mut self, label: &str, labels: Arc<LabelTable>, location: ModuleLocation) -> Result<(), LabelError> {
		let module = labels.module.clone();
		self.insert(label, LabelTarget::Import { module, labels }, location)
	}

	/// Registers a label without target.
	pub fn add_label(&mut self, label: &str, location: ModuleLocation) -> Result<(), LabelError> {
		self.insert(label, LabelTarget::Bare, location)
	}

	/// Records a proof line label of node `id`.
	///
	/// Returns false if `id` is not a registered node.
	pub fn add_line_label(&mut self, id: &str, line: &str) -> bool {
		match self.entries.get_mut(id) {
			Some(LabelEntry {
				target: LabelTarget::Node { lines, .. },
				..
			}) => {
				lines.insert(Arc::from(line));
				true
			}
			_ => false,
		}
	}

	pub fn get(&self, label: &str) -> Option<&LabelTarget> {
		self.entries.get(label).map(|entry| &entry.target)
	}

	/// Where `label` was registered.
	pub fn location(&self, label: &str) -> Option<&ModuleLocation> {
		self.entries.get(label).map(|entry| &entry.location)
	}

	pub fn node(&self, id: &str) -> Option<NodeAddress> {
		match self.get(id)? {
			LabelTarget::Node { address, .. } => Some(*address),
			_ => None,
		}
	}

	/// Returns true if node `id` has a proof line labelled `line`.
	pub fn has_line(&self, id: &str, line: &str) -> bool {
		matches!(self.get(id), Some(LabelTarget::Node { lines, .. }) if lines.contains(line))
	}

	pub fn import(&self, label: &str) -> Option<(&ModuleId, &Arc<LabelTable>)> {
		match self.get(label)? {
			LabelTarget::Import { module, labels } => Some((module, labels)),
			_ => None,
		}
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Resolves a textual reference against this table.
	pub fn resolve(&self, text: &str, scope: &ResolveScope<'_>) -> Reference {
		reference::resolve(self, text, scope)
	}
}
