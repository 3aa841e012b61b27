use std::sync::Arc;

use hilbert_primitives::{Diagnostic, ModuleLocation, NodeKind};
use hilbert_registry::LabelTable;

use crate::traverse::{Flow, Visit, Visitor};

/// Registers node ids, their proof line labels and import labels.
pub(crate) struct LabelCollector {
	pub(crate) table: LabelTable,
	pub(crate) diagnostics: Vec<Diagnostic>,
	imports: Vec<(Arc<str>, Arc<LabelTable>, ModuleLocation)>,
}

impl LabelCollector {
	pub(crate) fn new(table: LabelTable, imports: Vec<(Arc<str>, Arc<LabelTable>, ModuleLocation)>) -> Self {
		Self {
			table,
			diagnostics: Vec::new(),
			imports,
		}
	}
}

impl<'m> Visitor<'m> for LabelCollector {
	fn enter(&mut self, visit: &Visit<'m>, location: &ModuleLocation) -> Flow {
		match visit {
			Visit::Module(_) => {
				for (label, labels, at) in std::mem::take(&mut self.imports) {
					if let Err(err) = self.table.add_import(&label, labels, at) {
						self.diagnostics.push(err.to_diagnostic());
					}
				}
				Flow::Continue
			}
			Visit::Node { address, node } => {
				if let Err(err) = self.table.add_node(&node.id, *address, location.clone()) {
					self.diagnostics.push(err.to_diagnostic());
					return Flow::Block;
				}
				if let NodeKind::Proposition(proposition) = &node.kind {
					for line in proposition.line_labels() {
						self.table.add_line_label(&node.id, line);
					}
				}
				Flow::Block
			}
			_ => Flow::Continue,
		}
	}

	fn report(&mut self, diagnostic: Diagnostic) {
		self.diagnostics.push(diagnostic);
	}
}
