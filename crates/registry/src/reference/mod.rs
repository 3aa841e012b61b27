//! Resolution of textual references.
//!
//! Accepted forms, tried in order:
//!
//! - `line` - a proof line label of the current node
//! - `node`, `node!sub`, `node/line` - a node of the current module
//! - `import` - an imported module as a whole
//! - `import.node`, `import.node!sub`, `import.node/line` - a node of a direct import
//!
//! A reference never carries both a sub-formula and a proof-line part.
//! Resolution does not fail: a miss yields a fallback [`Reference`] that
//! carries its [`ReferenceProblem`], and the caller decides whether to report
//! it as an error, a warning or not at all.

use std::fmt;

use hilbert_primitives::{Diagnostic, MODULE_SEPARATOR, ModuleId, ModuleLocation, NodeAddress, Severity, codes};

use crate::labels::LabelTable;


const SUB_FORMULA_MARKER: char = '!';
const PROOF_LINE_MARKER: char = '/';

/// Context a reference is resolved in.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveScope<'a> {
	/// Id of the node the reference occurs in.
	pub node: Option<&'a str>,
	/// Proof line labels visible at the reference.
	pub lines: &'a [&'a str],
}

impl<'a> ResolveScope<'a> {
	/// Scope outside any node.
	pub fn module() -> Self {
		Self::default()
	}

	pub fn node(id: &'a str, lines: &'a [&'a str]) -> Self {
		Self { node: Some(id), lines }
	}
}

/// Why a reference could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceProblem {
	/// The text does not have a valid reference shape.
	Format(String),
	/// The shape is valid but a part does not exist.
	NotFound(String),
}

impl ReferenceProblem {
	pub fn code(&self) -> u32 {
		match self {
			Self::Format(_) => codes::REFERENCE_FORMAT,
			Self::NotFound(_) => codes::REFERENCE_NOT_FOUND,
		}
	}
}

impl fmt::Display for ReferenceProblem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Format(message) | Self::NotFound(message) => f.write_str(message),
		}
	}
}

/// Imported module a reference points into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalModule {
	pub label: String,
	pub module: ModuleId,
}

/// A resolved (or fallback) reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
	text: String,
	/// Node the reference occurs in.
	pub origin: Option<String>,
	pub external: Option<ExternalModule>,
	/// Target node id, in `external` if set, else in the current module.
	pub node: Option<String>,
	pub address: Option<NodeAddress>,
	pub sub_formula: Option<String>,
	pub proof_line: Option<String>,
	pub problem: Option<ReferenceProblem>,
}

impl Reference {
	fn new(text: &str, scope: &ResolveScope<'_>) -> Self {
		Self {
			text: text.to_string(),
			origin: scope.node.map(str::to_string),
			external: None,
			node: None,
			address: None,
			sub_formula: None,
			proof_line: None,
			problem: None,
		}
	}

	fn fallback(mut self, problem: ReferenceProblem) -> Self {
		self.problem = Some(problem);
		self
	}

	/// The text the reference was resolved from.
	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn is_resolved(&self) -> bool {
		self.problem.is_none()
	}

	/// Returns true for a proof line of the origin node.
	pub fn is_local_line(&self) -> bool {
		self.is_resolved() && self.external.is_none() && self.proof_line.is_some() && self.node == self.origin
	}

	/// Diagnostic for an unresolved reference, with the caller's severity.
	pub fn to_diagnostic(&self, location: ModuleLocation, severity: Severity) -> Option<Diagnostic> {
		let problem = self.problem.as_ref()?;
		let message = format!("cannot resolve reference {:?}: {problem}", self.text);
		Some(Diagnostic::error(problem.code(), location, message).with_severity(severity))
	}
}

impl fmt::Display for Reference {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.text)?;
		if !self.is_resolved() {
			f.write_str("?")?;
		}
		Ok(())
	}
}

struct Parts<'t> {
	base: &'t str,
	sub_formula: Option<&'t str>,
	proof_line: Option<&'t str>,
}

fn split_markers(text: &str) -> Result<Parts<'_>, ReferenceProblem> {
	let (base, sub_formula, proof_line) = if let Some((base, sub)) = text.split_once(SUB_FORMULA_MARKER) {
		(base, Some(sub), None)
	} else if let Some((base, line)) = text.split_once(PROOF_LINE_MARKER) {
		(base, None, Some(line))
	} else {
		(text, None, None)
	};
	if base.is_empty() || sub_formula.is_some_and(str::is_empty) || proof_line.is_some_and(str::is_empty) {
		return Err(ReferenceProblem::Format(format!("reference {text:?} has an empty part")));
	}
	Ok(Parts {
		base,
		sub_formula,
		proof_line,
	})
}

/// Resolves `text` against `table`; see the module docs for the accepted forms.
pub fn resolve(table: &LabelTable, text: &str, scope: &ResolveScope<'_>) -> Reference {
	let mut reference = Reference::new(text, scope);

	if text.contains(SUB_FORMULA_MARKER) && text.contains(PROOF_LINE_MARKER) {
		return reference.fallback(ReferenceProblem::Format(
			"a reference cannot name both a sub-formula and a proof line".to_string(),
		));
	}

	if let Some(node) = scope.node
		&& scope.lines.iter().any(|line| *line == text)
	{
		reference.node = Some(node.to_string());
		reference.address = table.node(node);
		reference.proof_line = Some(text.to_string());
		return reference;
	}

	let parts = match split_markers(text) {
		Ok(parts) => parts,
		Err(problem) => return reference.fallback(problem),
	};
	reference.sub_formula = parts.sub_formula.map(str::to_string);
	reference.proof_line = parts.proof_line.map(str::to_string);

	if let Some(address) = table.node(parts.base) {
		reference.node = Some(parts.base.to_string());
		reference.address = Some(address);
		return check_line(reference, table, parts.base, parts.proof_line);
	}

	if parts.base == text
		&& let Some((module, _)) = table.import(text)
	{
		reference.external = Some(ExternalModule {
			label: text.to_string(),
			module: module.clone(),
		});
		return reference;
	}

	let Some((label, id)) = parts.base.split_once(MODULE_SEPARATOR).filter(|(_, id)| !id.contains(MODULE_SEPARATOR)) else {
		return reference.fallback(ReferenceProblem::Format(format!(
			"{:?} is neither a local label nor of the form `import{MODULE_SEPARATOR}node`",
			parts.base
		)));
	};
	let Some((module, labels)) = table.import(label) else {
		return reference.fallback(ReferenceProblem::NotFound(format!("import label {label:?} is not defined")));
	};
	reference.external = Some(ExternalModule {
		label: label.to_string(),
		module: module.clone(),
	});
	let Some(address) = labels.node(id) else {
		return reference.fallback(ReferenceProblem::NotFound(format!("node {id:?} not found in module {module}")));
	};
	reference.node = Some(id.to_string());
	reference.address = Some(address);
	check_line(reference, labels, id, parts.proof_line)
}

fn check_line(reference: Reference, table: &LabelTable, id: &str, line: Option<&str>) -> Reference {
	match line {
		Some(line) if !table.has_line(id, line) => {
			reference.fallback(ReferenceProblem::NotFound(format!("proof line {line:?} not found in node {id:?}")))
		}
		_ => reference,
	}
}
