//! In-memory document tree of a formal module, as produced by a loader.

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::location::{ModuleId, ModulePath, SourceMap};

mod proof;


pub use proof::{CONDITIONAL_PROOF_RULE, Conclusion, ConditionalProof, FormalProof, FormulaLine, Hypothesis, ProofLine, Reason};

/// A parsed module: imports plus chapters of content nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
	pub id: ModuleId,
	#[serde(default)]
	pub imports: Vec<ImportDecl>,
	#[serde(default)]
	pub chapters: Vec<Chapter>,
	/// Source positions of document elements, keyed by path.
	#[serde(default)]
	pub source_map: SourceMap,
}

/// `label` names the imported module inside this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDecl {
	pub label: String,
	pub module: ModuleId,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Chapter {
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub nodes: Vec<Node>,
}

/// A labelled content node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
	pub id: String,
	/// Cross references cited by the node outside its formal content.
	#[serde(default)]
	pub links: Vec<String>,
	#[serde(flatten)]
	pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
	Axiom(Axiom),
	PredicateDefinition(SymbolDefinition),
	FunctionDefinition(SymbolDefinition),
	Proposition(Proposition),
	Rule(RuleDeclaration),
}

impl NodeKind {
	/// Short name used in paths and messages.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Axiom(_) => "axiom",
			Self::PredicateDefinition(_) => "predicate definition",
			Self::FunctionDefinition(_) => "function definition",
			Self::Proposition(_) => "proposition",
			Self::Rule(_) => "rule",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axiom {
	pub formula: Element,
}

/// Predicate or function definition `name(parameters) := definiens`.
///
/// A missing definiens declares an initial (undefined) symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDefinition {
	pub name: String,
	pub arity: usize,
	#[serde(default)]
	pub parameters: Vec<Element>,
	#[serde(default)]
	pub definiens: Option<Element>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposition {
	pub formula: Element,
	#[serde(default)]
	pub proofs: Vec<FormalProof>,
}

impl Proposition {
	/// All line, hypothesis and conclusion labels of every proof.
	pub fn line_labels(&self) -> Vec<&str> {
		let mut out = Vec::new();
		for proof in &self.proofs {
			proof::collect_labels(&proof.lines, &mut out);
		}
		out
	}
}

/// Declaration of an inference rule, optionally superseding older versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDeclaration {
	pub name: String,
	pub version: String,
	#[serde(default)]
	pub changes: Vec<RuleChange>,
}

/// A rule version superseded by the enclosing declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleChange {
	pub name: String,
	pub version: String,
}

/// Position of a node inside the chapter/section structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeAddress {
	pub chapter: usize,
	pub section: usize,
	pub node: usize,
}

impl NodeAddress {
	/// Path of the node `id` at this address.
	pub fn path(&self, id: &str) -> ModulePath {
		ModulePath::root().index("chapter", self.chapter).index("section", self.section).label("node", id)
	}
}

impl Module {
	/// Iterates over all nodes in document order.
	pub fn nodes(&self) -> impl Iterator<Item = (NodeAddress, &Node)> {
		self.chapters.iter().enumerate().flat_map(|(c, chapter)| {
			chapter.sections.iter().enumerate().flat_map(move |(s, section)| {
				section.nodes.iter().enumerate().map(move |(n, node)| {
					(
						NodeAddress {
							chapter: c,
							section: s,
							node: n,
						},
						node,
					)
				})
			})
		})
	}

	pub fn node(&self, address: NodeAddress) -> Option<&Node> {
		self.chapters.get(address.chapter)?.sections.get(address.section)?.nodes.get(address.node)
	}

	/// Finds the first node with `id`.
	pub fn find_node(&self, id: &str) -> Option<(NodeAddress, &Node)> {
		self.nodes().find(|(_, node)| node.id == id)
	}
}
