//! Depth-first walk over a module tree.
//!
//! Every descent builds the child's [`ModuleLocation`] from its parent's, so
//! visitors always see the full path of what they are looking at. Each node
//! is visited inside `catch_unwind`: a panicking visitor costs that node one
//! [`UNEXPECTED_INTERNAL_ERROR`](codes::UNEXPECTED_INTERNAL_ERROR) and the
//! walk continues with the next node.

use std::panic::{AssertUnwindSafe, catch_unwind};

use hilbert_primitives::module::{Axiom, Chapter, FormalProof, Proposition, RuleDeclaration, Section, SymbolDefinition};
use hilbert_primitives::{Diagnostic, Module, ModuleLocation, Node, NodeAddress, NodeKind, codes};
use hilbert_worker::{CheckToken, panic_message};

use crate::error::{CheckError, Result};


/// An element of the module tree handed to a [`Visitor`].
#[derive(Debug, Clone, Copy)]
pub enum Visit<'m> {
	Module(&'m Module),
	Chapter(&'m Chapter),
	Section(&'m Section),
	Node { address: NodeAddress, node: &'m Node },
	Axiom(&'m Axiom),
	PredicateDefinition(&'m SymbolDefinition),
	FunctionDefinition(&'m SymbolDefinition),
	Proposition(&'m Proposition),
	FormalProof { index: usize, proof: &'m FormalProof },
	Rule(&'m RuleDeclaration),
}

/// Whether the walk descends into the children of an entered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
	Continue,
	/// Skip the children; `leave` still runs.
	Block,
}

pub trait Visitor<'m> {
	fn enter(&mut self, _visit: &Visit<'m>, _location: &ModuleLocation) -> Flow {
		Flow::Continue
	}

	fn leave(&mut self, _visit: &Visit<'m>, _location: &ModuleLocation) {}

	/// Receives problems found by the walk itself.
	fn report(&mut self, diagnostic: Diagnostic);
}

/// Walks `module` with `visitor`, stopping with
/// [`CheckError::Interrupted`] once `token` is cancelled.
pub fn traverse<'m, V>(module: &'m Module, visitor: &mut V, token: &CheckToken) -> Result<()>
where
	V: Visitor<'m> + ?Sized,
{
	let mut walker = Walker {
		module,
		token,
		blocked: false,
	};
	walker.module(visitor)
}

struct Walker<'m, 't> {
	module: &'m Module,
	token: &'t CheckToken,
	blocked: bool,
}

impl<'m> Walker<'m, '_> {
	fn interrupted(&self) -> Result<()> {
		if self.token.is_cancelled() {
			tracing::debug!(module = %self.module.id, pass = self.token.pass(), "traversal interrupted");
			return Err(CheckError::Interrupted {
				module: self.module.id.clone(),
			});
		}
		Ok(())
	}

	/// Enters `visit`; returns true if its children are to be walked.
	fn enter<V: Visitor<'m> + ?Sized>(&mut self, visitor: &mut V, visit: &Visit<'m>, location: &ModuleLocation) -> bool {
		if visitor.enter(visit, location) == Flow::Block {
			self.blocked = true;
		}
		!self.blocked
	}

	fn leave<V: Visitor<'m> + ?Sized>(&mut self, visitor: &mut V, visit: &Visit<'m>, location: &ModuleLocation) {
		visitor.leave(visit, location);
		self.blocked = false;
	}

	fn module<V: Visitor<'m> + ?Sized>(&mut self, visitor: &mut V) -> Result<()> {
		self.interrupted()?;
		let module = self.module;
		let root = ModuleLocation::module_root(module.id.clone());
		let visit = Visit::Module(module);
		if self.enter(visitor, &visit, &root) {
			for (c, chapter) in module.chapters.iter().enumerate() {
				self.interrupted()?;
				let chapter_at = root.index("chapter", c);
				let visit = Visit::Chapter(chapter);
				if self.enter(visitor, &visit, &chapter_at) {
					for (s, section) in chapter.sections.iter().enumerate() {
						self.interrupted()?;
						let section_at = chapter_at.index("section", s);
						let visit = Visit::Section(section);
						if self.enter(visitor, &visit, &section_at) {
							for (n, node) in section.nodes.iter().enumerate() {
								self.interrupted()?;
								let address = NodeAddress {
									chapter: c,
									section: s,
									node: n,
								};
								self.guarded_node(visitor, address, node, &section_at);
							}
						}
						self.leave(visitor, &visit, &section_at);
					}
				}
				self.leave(visitor, &visit, &chapter_at);
			}
		}
		self.leave(visitor, &visit, &root);
		Ok(())
	}

	fn guarded_node<V: Visitor<'m> + ?Sized>(&mut self, visitor: &mut V, address: NodeAddress, node: &'m Node, section_at: &ModuleLocation) {
		let location = section_at.label("node", node.id.as_str());
		let result = catch_unwind(AssertUnwindSafe(|| self.node(visitor, address, node, &location)));
		if let Err(payload) = result {
			self.blocked = false;
			let message = panic_message(&*payload);
			tracing::warn!(module = %self.module.id, node = %node.id, panic = %message, "node check panicked");
			visitor.report(Diagnostic::error(
				codes::UNEXPECTED_INTERNAL_ERROR,
				location,
				format!("internal error while checking {} {:?}: {message}", node.kind.name(), node.id),
			));
		}
	}

	fn node<V: Visitor<'m> + ?Sized>(&mut self, visitor: &mut V, address: NodeAddress, node: &'m Node, location: &ModuleLocation) {
		let visit = Visit::Node { address, node };
		if self.enter(visitor, &visit, location) {
			let kind = match &node.kind {
				NodeKind::Axiom(axiom) => Visit::Axiom(axiom),
				NodeKind::PredicateDefinition(definition) => Visit::PredicateDefinition(definition),
				NodeKind::FunctionDefinition(definition) => Visit::FunctionDefinition(definition),
				NodeKind::Proposition(proposition) => Visit::Proposition(proposition),
				NodeKind::Rule(rule) => Visit::Rule(rule),
			};
			if self.enter(visitor, &kind, location)
				&& let NodeKind::Proposition(proposition) = &node.kind
			{
				for (index, proof) in proposition.proofs.iter().enumerate() {
					let proof_at = location.index("proof", index);
					let visit = Visit::FormalProof { index, proof };
					self.enter(visitor, &visit, &proof_at);
					self.leave(visitor, &visit, &proof_at);
				}
			}
			self.leave(visitor, &kind, location);
		}
		self.leave(visitor, &visit, location);
	}
}
