use std::collections::BTreeMap;
use std::sync::Arc;

use hilbert_checker::definition::{check_function_definition, check_predicate_definition, check_rule_declaration};
use hilbert_checker::{AddLookup, AddTarget, CheckerStrategy, DefinitionSettings, ProofEnvironment};
use hilbert_primitives::module::FormalProof;
use hilbert_primitives::{
	CheckStatus, Diagnostic, Diagnostics, Element, MODULE_SEPARATOR, Module, ModuleLocation, Node, NodeAddress, NodeKind, Operator, codes,
};
use hilbert_registry::{ExistenceChecker, ExistenceRegistry, LabelTable, ReferenceProblem, ResolveScope};
use rustc_hash::FxHashMap;

use crate::config::LinkSeverity;
use crate::graph::{CheckedModule, NodeStatus};
use crate::traverse::{Flow, Visit, Visitor};

/// A direct import as seen by the node checker.
pub(crate) struct ImportView {
	pub(crate) module: Arc<Module>,
	pub(crate) checked: Arc<CheckedModule>,
}

struct CurrentNode<'m> {
	address: NodeAddress,
	id: &'m str,
	errors_before: usize,
	proposition: Option<PropositionState<'m>>,
}

struct PropositionState<'m> {
	formula: &'m Element,
	formula_ok: bool,
	/// Some proof was checked without errors.
	accepted: bool,
}

/// Checks definitions, axioms, propositions with their proofs, rules and links.
pub(crate) struct NodeChecker<'m, 'c> {
	module: &'m Module,
	pub(crate) registry: ExistenceRegistry,
	labels: &'c LabelTable,
	imports: &'c FxHashMap<Arc<str>, ImportView>,
	strategy: &'c CheckerStrategy,
	settings: &'c DefinitionSettings,
	link_severity: LinkSeverity,
	pub(crate) diagnostics: Diagnostics,
	pub(crate) statuses: BTreeMap<NodeAddress, NodeStatus>,
	current: Option<CurrentNode<'m>>,
}

impl<'m, 'c> NodeChecker<'m, 'c> {
	#[allow(clippy::too_many_arguments)]
	pub(crate) fn new(
		module: &'m Module,
		registry: ExistenceRegistry,
		labels: &'c LabelTable,
		imports: &'c FxHashMap<Arc<str>, ImportView>,
		strategy: &'c CheckerStrategy,
		settings: &'c DefinitionSettings,
		link_severity: LinkSeverity,
		diagnostics: Diagnostics,
	) -> Self {
		Self {
			module,
			registry,
			labels,
			imports,
			strategy,
			settings,
			link_severity,
			diagnostics,
			statuses: BTreeMap::new(),
			current: None,
		}
	}

	fn check_links(&mut self, node: &Node, location: &ModuleLocation) {
		let Some(severity) = self.link_severity.severity() else {
			return;
		};
		let lines = match &node.kind {
			NodeKind::Proposition(proposition) => proposition.line_labels(),
			_ => Vec::new(),
		};
		for (index, link) in node.links.iter().enumerate() {
			let reference = self.labels.resolve(link, &ResolveScope::node(&node.id, &lines));
			if let Some(diagnostic) = reference.to_diagnostic(location.field("links").index("link", index), severity) {
				self.diagnostics.push(diagnostic);
			}
		}
	}

	fn check_formula(&mut self, formula: &Element, location: &ModuleLocation) -> bool {
		let existence: &dyn ExistenceChecker = &self.registry;
		let errors = self.strategy.formula.check_formula(formula, location, Some(existence));
		let ok = errors.is_empty();
		self.diagnostics.extend(errors);
		ok
	}

	fn check_proposition(&mut self, formula: &'m Element, proofs: usize, location: &ModuleLocation) {
		let formula_ok = self.check_formula(formula, &location.field("formula"));
		let Some(current) = self.current.as_mut() else {
			return;
		};
		if proofs == 0 {
			self.diagnostics.push(Diagnostic::warning(
				codes::NO_FORMAL_PROOF,
				location.clone(),
				format!("proposition {:?} has no formal proof", current.id),
			));
		}
		current.proposition = Some(PropositionState {
			formula,
			formula_ok,
			accepted: false,
		});
	}

	fn check_proof(&mut self, proof: &'m FormalProof, location: &ModuleLocation) {
		let Some((id, conclusion)) = self
			.current
			.as_ref()
			.and_then(|current| Some((current.id, current.proposition.as_ref()?.formula)))
		else {
			return;
		};
		let diagnostics = {
			let lookup = NodeLookup {
				module: self.module,
				labels: self.labels,
				imports: self.imports,
				statuses: &self.statuses,
				node: id,
			};
			let environment = ProofEnvironment {
				existence: &self.registry,
				formulas: &*self.strategy.formula,
				lookup: &lookup,
			};
			self.strategy.proof.check_proof(conclusion, proof, location, &environment)
		};
		let accepted = !diagnostics.iter().any(Diagnostic::is_error);
		tracing::trace!(node = id, accepted, "checked proof");
		self.diagnostics.extend(diagnostics);
		if accepted && let Some(state) = self.current.as_mut().and_then(|current| current.proposition.as_mut()) {
			state.accepted = true;
		}
	}

	fn finish_node(&mut self, failed: bool) {
		let Some(current) = self.current.take() else {
			return;
		};
		let well_formed = !failed && self.diagnostics.errors().len() == current.errors_before;
		let proved = match current.proposition {
			Some(state) => CheckStatus::from_ok(!failed && state.formula_ok && state.accepted),
			None => CheckStatus::Unchecked,
		};
		self.statuses.insert(
			current.address,
			NodeStatus {
				well_formed: CheckStatus::from_ok(well_formed),
				proved,
			},
		);
	}
}

impl<'m> Visitor<'m> for NodeChecker<'m, '_> {
	fn enter(&mut self, visit: &Visit<'m>, location: &ModuleLocation) -> Flow {
		match *visit {
			Visit::Node { address, node } => {
				self.current = Some(CurrentNode {
					address,
					id: node.id.as_str(),
					errors_before: self.diagnostics.errors().len(),
					proposition: None,
				});
				self.check_links(node, location);
			}
			Visit::Axiom(axiom) => {
				self.check_formula(&axiom.formula, &location.field("formula"));
			}
			Visit::PredicateDefinition(definition) => {
				let outcome = check_predicate_definition(definition, location, &mut self.registry, &*self.strategy.formula, self.settings);
				self.diagnostics.extend(outcome.diagnostics);
			}
			Visit::FunctionDefinition(definition) => {
				let outcome = check_function_definition(definition, location, &mut self.registry, &*self.strategy.formula, self.settings);
				self.diagnostics.extend(outcome.diagnostics);
			}
			Visit::Proposition(proposition) => self.check_proposition(&proposition.formula, proposition.proofs.len(), location),
			Visit::FormalProof { proof, .. } => self.check_proof(proof, location),
			Visit::Rule(rule) => {
				let diagnostics = check_rule_declaration(rule, location, &mut self.registry, self.settings);
				self.diagnostics.extend(diagnostics);
			}
			Visit::Module(_) | Visit::Chapter(_) | Visit::Section(_) => {}
		}
		Flow::Continue
	}

	fn leave(&mut self, visit: &Visit<'m>, _location: &ModuleLocation) {
		if let Visit::Node { .. } = visit {
			self.finish_node(false);
		}
	}

	fn report(&mut self, diagnostic: Diagnostic) {
		self.diagnostics.push(diagnostic);
		self.finish_node(true);
	}
}

/// Resolves `Add` references of the node being checked.
struct NodeLookup<'a> {
	module: &'a Module,
	labels: &'a LabelTable,
	imports: &'a FxHashMap<Arc<str>, ImportView>,
	statuses: &'a BTreeMap<NodeAddress, NodeStatus>,
	node: &'a str,
}

impl AddLookup for NodeLookup<'_> {
	fn lookup_add(&self, reference: &str) -> Result<AddTarget, ReferenceProblem> {
		let resolved = self.labels.resolve(reference, &ResolveScope::node(self.node, &[]));
		if let Some(problem) = resolved.problem {
			return Err(problem);
		}
		if resolved.sub_formula.is_some() || resolved.proof_line.is_some() {
			return Err(ReferenceProblem::Format(format!("{reference:?} must name a whole node")));
		}
		let Some(address) = resolved.address else {
			return Err(ReferenceProblem::Format(format!("{reference:?} names a module, not a node")));
		};
		let not_found = || ReferenceProblem::NotFound(format!("node {reference:?} not found"));
		match &resolved.external {
			None => {
				let node = self.module.node(address).ok_or_else(not_found)?;
				let proved = self.statuses.get(&address).map_or(CheckStatus::Unchecked, |status| status.proved);
				Ok(add_target(node, proved, None))
			}
			Some(external) => {
				let view = self.imports.get(external.label.as_str()).ok_or_else(not_found)?;
				let node = view.module.node(address).ok_or_else(not_found)?;
				Ok(add_target(node, view.checked.status(address).proved, Some(&external.label)))
			}
		}
	}
}

/// What `node` contributes to an `Add`, with constants of an imported
/// node qualified by the import `label`.
fn add_target(node: &Node, proved: CheckStatus, label: Option<&str>) -> AddTarget {
	let formula = |element: &Element| match label {
		Some(label) => qualify_constants(element, label),
		None => element.clone(),
	};
	let name = |name: &str| match label {
		Some(label) => format!("{label}{MODULE_SEPARATOR}{name}"),
		None => name.to_string(),
	};
	match &node.kind {
		NodeKind::Axiom(axiom) => AddTarget::Axiom(formula(&axiom.formula)),
		NodeKind::PredicateDefinition(definition) => AddTarget::PredicateDefinition {
			name: name(&definition.name),
			parameters: definition.parameters.clone(),
			definiens: definition.definiens.as_ref().map(formula),
		},
		NodeKind::FunctionDefinition(definition) => AddTarget::FunctionDefinition {
			name: name(&definition.name),
			parameters: definition.parameters.clone(),
			definiens: definition.definiens.as_ref().map(formula),
		},
		NodeKind::Proposition(proposition) => AddTarget::Proposition {
			formula: formula(&proposition.formula),
			status: proved,
		},
		NodeKind::Rule(_) => AddTarget::Rule,
	}
}

/// Prefixes every predicate and function constant with `label.`.
fn qualify_constants(element: &Element, label: &str) -> Element {
	let Some(list) = element.as_list() else {
		return element.clone();
	};
	let mut children: Vec<Element> = list.children().iter().map(|child| qualify_constants(child, label)).collect();
	if matches!(list.operator(), Operator::PredCon | Operator::FunCon)
		&& let Some(name) = element.symbol_name()
		&& let Some(first) = children.first_mut()
	{
		*first = Element::atom(format!("{label}{MODULE_SEPARATOR}{}", name.as_str()));
	}
	element.with_children(children)
}
