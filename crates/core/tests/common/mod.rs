#![allow(dead_code)]

use hilbert_primitives::element::build::*;
use hilbert_primitives::module::{
	Axiom, Chapter, FormalProof, FormulaLine, ImportDecl, Proposition, ProofLine, Reason, RuleDeclaration, Section, SymbolDefinition,
};
use hilbert_primitives::{Element, Module, ModuleId, Node, NodeKind, SourceMap};

pub const RULES: [&str; 9] = [
	"ADD",
	"MODUS_PONENS",
	"RENAME",
	"SUBST_FREE",
	"SUBST_PRED",
	"SUBST_FUN",
	"UNIVERSAL",
	"EXISTENTIAL",
	"CONDITIONAL_PROOF",
];

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt::try_init();
}

pub fn module(id: &str, imports: &[(&str, &str)], nodes: Vec<Node>) -> Module {
	Module {
		id: ModuleId::from(id),
		imports: imports
			.iter()
			.map(|(label, module)| ImportDecl {
				label: label.to_string(),
				module: ModuleId::from(*module),
			})
			.collect(),
		chapters: vec![Chapter {
			title: id.to_string(),
			sections: vec![Section {
				title: String::new(),
				nodes,
			}],
		}],
		source_map: SourceMap::default(),
	}
}

pub fn node(id: &str, kind: NodeKind) -> Node {
	Node {
		id: id.to_string(),
		links: Vec::new(),
		kind,
	}
}

pub fn axiom(id: &str, formula: Element) -> Node {
	node(id, NodeKind::Axiom(Axiom { formula }))
}

pub fn rule(id: &str, name: &str, version: &str) -> Node {
	node(
		id,
		NodeKind::Rule(RuleDeclaration {
			name: name.to_string(),
			version: version.to_string(),
			changes: Vec::new(),
		}),
	)
}

/// Declarations of every proof rule.
pub fn rule_nodes() -> Vec<Node> {
	RULES.iter().map(|name| rule(&format!("rule_{}", name.to_lowercase()), name, "1.00.00")).collect()
}

pub fn predicate(id: &str, name: &str, parameters: &[&str], definiens: Option<Element>) -> Node {
	node(
		id,
		NodeKind::PredicateDefinition(SymbolDefinition {
			name: name.to_string(),
			arity: parameters.len(),
			parameters: parameters.iter().map(|p| var(p)).collect(),
			definiens,
		}),
	)
}

pub fn function(id: &str, name: &str, parameters: &[&str], definiens: Option<Element>) -> Node {
	node(
		id,
		NodeKind::FunctionDefinition(SymbolDefinition {
			name: name.to_string(),
			arity: parameters.len(),
			parameters: parameters.iter().map(|p| var(p)).collect(),
			definiens,
		}),
	)
}

pub fn proposition(id: &str, formula: Element, proofs: Vec<Vec<ProofLine>>) -> Node {
	node(
		id,
		NodeKind::Proposition(Proposition {
			formula,
			proofs: proofs.into_iter().map(|lines| FormalProof { lines }).collect(),
		}),
	)
}

pub fn line(label: &str, formula: Element, reason: Reason) -> ProofLine {
	ProofLine::Line(FormulaLine {
		label: Some(label.to_string()),
		formula,
		reason,
	})
}

pub fn add(reference: &str) -> Reason {
	Reason::Add {
		reference: reference.to_string(),
	}
}

pub fn mp(first: &str, second: &str) -> Reason {
	Reason::ModusPonens {
		first: first.to_string(),
		second: second.to_string(),
	}
}

/// Rules, the identity predicate and reflexivity of identity.
pub fn logic() -> Module {
	let mut nodes = rule_nodes();
	nodes.push(predicate("def_equal", "equal", &["x", "y"], None));
	nodes.push(axiom("ax_refl", forall("x", predcon("equal", [var("x"), var("x")]))));
	module("logic", &[], nodes)
}
