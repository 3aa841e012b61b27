use serde::{Deserialize, Serialize};

use crate::element::Element;

/// One candidate formal proof of a proposition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormalProof {
	pub lines: Vec<ProofLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProofLine {
	/// A formula justified by a reason.
	Line(FormulaLine),
	/// A nested conditional proof.
	Conditional(ConditionalProof),
}

impl ProofLine {
	/// Label under which later lines can refer to this one.
	pub fn label(&self) -> Option<&str> {
		match self {
			Self::Line(line) => line.label.as_deref(),
			Self::Conditional(cp) => cp.conclusion.label.as_deref(),
		}
	}

	/// The formula this line establishes.
	pub fn formula(&self) -> &Element {
		match self {
			Self::Line(line) => &line.formula,
			Self::Conditional(cp) => &cp.conclusion.formula,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaLine {
	#[serde(default)]
	pub label: Option<String>,
	pub formula: Element,
	pub reason: Reason,
}

/// Hypothesis, inner lines and conclusion `IMPL(hypothesis, last line)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalProof {
	pub hypothesis: Hypothesis,
	pub lines: Vec<ProofLine>,
	pub conclusion: Conclusion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
	pub label: String,
	pub formula: Element,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conclusion {
	#[serde(default)]
	pub label: Option<String>,
	pub formula: Element,
}

/// Justification of a proof line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Reason {
	/// Adds an axiom, definition or proved proposition.
	Add { reference: String },
	/// From `A` and `IMPL(A, B)` derive `B`.
	ModusPonens { first: String, second: String },
	/// Renames a bound subject variable of an earlier line.
	Rename {
		reference: String,
		original: Element,
		replacement: Element,
		/// 1-based binder occurrence; 0 renames every occurrence.
		#[serde(default)]
		occurrence: usize,
	},
	SubstFree {
		reference: String,
		variable: Element,
		substitute: Element,
	},
	SubstPred {
		reference: String,
		predicate_variable: Element,
		substitute: Element,
	},
	SubstFunc {
		reference: String,
		function_variable: Element,
		substitute: Element,
	},
	/// `IMPL(A, B)` to `IMPL(A, FORALL(x, B))`.
	Universal { reference: String, variable: Element },
	/// `IMPL(A, B)` to `IMPL(EXISTS(x, A), B)`.
	Existential { reference: String, variable: Element },
}

impl Reason {
	/// Name of the inference rule this reason applies.
	pub fn rule_name(&self) -> &'static str {
		match self {
			Self::Add { .. } => "ADD",
			Self::ModusPonens { .. } => "MODUS_PONENS",
			Self::Rename { .. } => "RENAME",
			Self::SubstFree { .. } => "SUBST_FREE",
			Self::SubstPred { .. } => "SUBST_PRED",
			Self::SubstFunc { .. } => "SUBST_FUN",
			Self::Universal { .. } => "UNIVERSAL",
			Self::Existential { .. } => "EXISTENTIAL",
		}
	}
}

/// Name of the rule justifying conditional proofs.
pub const CONDITIONAL_PROOF_RULE: &str = "CONDITIONAL_PROOF";

pub(super) fn collect_labels<'a>(lines: &'a [ProofLine], out: &mut Vec<&'a str>) {
	for line in lines {
		match line {
			ProofLine::Line(line) => out.extend(line.label.as_deref()),
			ProofLine::Conditional(cp) => {
				out.push(&cp.hypothesis.label);
				collect_labels(&cp.lines, out);
				out.extend(cp.conclusion.label.as_deref());
			}
		}
	}
}
