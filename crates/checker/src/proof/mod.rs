//! Formal proof checking.
//!
//! A proof is a list of lines, each a formula with a [`Reason`] or a nested
//! conditional proof. Every line is re-derived from its reason and compared
//! with the stated formula; all problems are collected, and a proof is
//! accepted iff it produced no errors.

use hilbert_primitives::element::build;
use hilbert_primitives::module::{CONDITIONAL_PROOF_RULE, ConditionalProof, FormalProof, FormulaLine, ProofLine, Reason};
use hilbert_primitives::{Atom, CheckStatus, Diagnostic, Element, ModuleLocation, Operator, codes};
use hilbert_registry::{ExistenceChecker, ReferenceProblem};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::formula::FormulaChecker;
use crate::subst::{self, Schematic};
use crate::vars;


/// What an `Add` reason refers to.
///
/// Symbol names are as seen from the proving module, so definitions from
/// imports carry their qualified `label.name`.
#[derive(Debug, Clone, PartialEq)]
pub enum AddTarget {
	Axiom(Element),
	PredicateDefinition {
		name: String,
		parameters: Vec<Element>,
		definiens: Option<Element>,
	},
	FunctionDefinition {
		name: String,
		parameters: Vec<Element>,
		definiens: Option<Element>,
	},
	Proposition {
		formula: Element,
		status: CheckStatus,
	},
	Rule,
}

/// Resolves `Add` references to nodes.
pub trait AddLookup {
	fn lookup_add(&self, reference: &str) -> Result<AddTarget, ReferenceProblem>;
}

/// Everything a proof check reads besides the proof itself.
#[derive(Clone, Copy)]
pub struct ProofEnvironment<'a> {
	pub existence: &'a dyn ExistenceChecker,
	pub formulas: &'a dyn FormulaChecker,
	pub lookup: &'a dyn AddLookup,
}

/// Checks one formal proof of `conclusion`.
pub trait ProofChecker: Send + Sync {
	fn check_proof(
		&self,
		conclusion: &Element,
		proof: &FormalProof,
		location: &ModuleLocation,
		environment: &ProofEnvironment<'_>,
	) -> Vec<Diagnostic>;
}

/// Checker for the built-in rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormalProofChecker;

impl ProofChecker for FormalProofChecker {
	fn check_proof(
		&self,
		conclusion: &Element,
		proof: &FormalProof,
		location: &ModuleLocation,
		environment: &ProofEnvironment<'_>,
	) -> Vec<Diagnostic> {
		let mut run = Run::new(*environment, proof);
		let Some(last) = run.lines(&proof.lines, location) else {
			run.error(codes::PROOF_EMPTY, location, "formal proof has no lines".to_string());
			return run.out;
		};
		if last != conclusion {
			run.error(
				codes::PROOF_CONCLUSION_MISMATCH,
				location,
				format!("proof ends with {last} but the proposition states {conclusion}"),
			);
		}
		tracing::trace!(lines = proof.lines.len(), errors = run.out.len(), "checked formal proof");
		run.out
	}
}

/// State of one proof check.
struct Run<'a, 'p> {
	env: ProofEnvironment<'a>,
	/// Label scopes, innermost last. `None` marks a line with errors.
	scopes: Vec<FxHashMap<&'p str, Option<&'p Element>>>,
	/// Every label defined so far, in any scope.
	seen: FxHashSet<&'p str>,
	/// Every label of the proof, for telling later lines from unknown ones.
	all: FxHashSet<&'p str>,
	/// Hypotheses of the enclosing conditional proofs.
	hypotheses: Vec<&'p Element>,
	out: Vec<Diagnostic>,
}

fn collect<'p>(lines: &'p [ProofLine], out: &mut FxHashSet<&'p str>) {
	for line in lines {
		if let ProofLine::Conditional(cp) = line {
			out.insert(&cp.hypothesis.label);
			collect(&cp.lines, out);
		}
		out.extend(line.label());
	}
}

impl<'a, 'p> Run<'a, 'p> {
	fn new(env: ProofEnvironment<'a>, proof: &'p FormalProof) -> Self {
		let mut all = FxHashSet::default();
		collect(&proof.lines, &mut all);
		Self {
			env,
			scopes: vec![FxHashMap::default()],
			seen: FxHashSet::default(),
			all,
			hypotheses: Vec::new(),
			out: Vec::new(),
		}
	}

	fn error(&mut self, code: u32, location: &ModuleLocation, message: String) {
		self.out.push(Diagnostic::error(code, location.clone(), message));
	}

	/// Checks `lines` in order and returns the last line's formula.
	fn lines(&mut self, lines: &'p [ProofLine], location: &ModuleLocation) -> Option<&'p Element> {
		for (index, line) in lines.iter().enumerate() {
			let at = location.index("line", index);
			let before = self.out.len();
			match line {
				ProofLine::Line(line) => self.formula_line(line, &at),
				ProofLine::Conditional(cp) => self.conditional(cp, &at),
			}
			let clean = self.out.len() == before;
			if let Some(label) = line.label() {
				let field = match line {
					ProofLine::Line(_) => at.clone(),
					ProofLine::Conditional(_) => at.field("conclusion"),
				};
				self.define(label, clean.then_some(line.formula()), &field);
			}
		}
		lines.last().map(ProofLine::formula)
	}

	fn define(&mut self, label: &'p str, formula: Option<&'p Element>, location: &ModuleLocation) {
		if !self.seen.insert(label) {
			self.error(
				codes::LINE_LABEL_DEFINED_MORE_THAN_ONCE,
				location,
				format!("proof line label {label:?} is defined more than once"),
			);
			return;
		}
		if let Some(scope) = self.scopes.last_mut() {
			scope.insert(label, formula);
		}
	}

	/// Formula of the visible line `label`, reporting unusable references.
	fn line(&mut self, label: &str, location: &ModuleLocation) -> Option<&'p Element> {
		let found = self.scopes.iter().rev().find_map(|scope| scope.get(label).copied());
		match found {
			Some(Some(formula)) => Some(formula),
			Some(None) => {
				self.error(
					codes::LINE_REFERENCE_INVALID,
					location,
					format!("proof line {label:?} has errors and cannot be used"),
				);
				None
			}
			None if self.all.contains(label) => {
				self.error(
					codes::LINE_REFERENCE_NOT_FOUND,
					location,
					format!("proof line {label:?} is not available here"),
				);
				None
			}
			None => {
				self.error(codes::LINE_REFERENCE_NOT_FOUND, location, format!("proof line {label:?} does not exist"));
				None
			}
		}
	}

	fn well_formed(&mut self, formula: &Element, location: &ModuleLocation) -> bool {
		let errors = self.env.formulas.check_formula(formula, location, Some(self.env.existence));
		let ok = errors.is_empty();
		self.out.extend(errors);
		ok
	}

	fn well_formed_term(&mut self, term: &Element, location: &ModuleLocation) -> bool {
		let errors = self.env.formulas.check_term(term, location, Some(self.env.existence));
		let ok = errors.is_empty();
		self.out.extend(errors);
		ok
	}

	fn rule_declared(&mut self, rule: &str, location: &ModuleLocation) {
		if !self.env.existence.rule_declared(rule) {
			self.error(codes::PROOF_RULE_NOT_DECLARED, location, format!("rule {rule} is not declared"));
		}
	}

	fn formula_line(&mut self, line: &'p FormulaLine, location: &ModuleLocation) {
		let well_formed = self.well_formed(&line.formula, &location.field("formula"));
		let at = location.field("reason");
		self.rule_declared(line.reason.rule_name(), &at);
		let derived = self.derive(&line.reason, &at);
		if let Some(derived) = derived
			&& well_formed
			&& derived != line.formula
		{
			self.error(
				codes::DERIVED_FORMULA_MISMATCH,
				location,
				format!("{} derives {derived} but the line states {}", line.reason.rule_name(), line.formula),
			);
		}
	}

	fn conditional(&mut self, cp: &'p ConditionalProof, location: &ModuleLocation) {
		let hypothesis_at = location.field("hypothesis");
		let hypothesis_ok = self.well_formed(&cp.hypothesis.formula, &hypothesis_at);
		self.rule_declared(CONDITIONAL_PROOF_RULE, location);

		self.scopes.push(FxHashMap::default());
		self.hypotheses.push(&cp.hypothesis.formula);
		self.define(&cp.hypothesis.label, hypothesis_ok.then_some(&cp.hypothesis.formula), &hypothesis_at);
		let last = self.lines(&cp.lines, &location.field("lines"));
		self.hypotheses.pop();
		self.scopes.pop();

		let conclusion_at = location.field("conclusion");
		let conclusion_ok = self.well_formed(&cp.conclusion.formula, &conclusion_at);
		let Some(last) = last else {
			self.error(codes::CONDITIONAL_PROOF_EMPTY, location, "conditional proof has no lines".to_string());
			return;
		};
		let expected = build::implies(cp.hypothesis.formula.clone(), last.clone());
		if conclusion_ok && expected != cp.conclusion.formula {
			self.error(
				codes::CONDITIONAL_CONCLUSION_MISMATCH,
				&conclusion_at,
				format!("conditional proof concludes {expected} but states {}", cp.conclusion.formula),
			);
		}
	}

	/// Formula the reason yields, if it applies.
	fn derive(&mut self, reason: &Reason, location: &ModuleLocation) -> Option<Element> {
		match reason {
			Reason::Add { reference } => self.add(reference, location),
			Reason::ModusPonens { first, second } => {
				let (first, second) = (self.line(first, location), self.line(second, location));
				let (first, second) = (first?, second?);
				match (implication(second), implication(first)) {
					(Some((premise, conclusion)), _) if premise == first => Some(conclusion.clone()),
					(_, Some((premise, conclusion))) if premise == second => Some(conclusion.clone()),
					_ => {
						self.error(
							codes::MODUS_PONENS_MISMATCH,
							location,
							format!("neither {first} nor {second} is an implication from the other"),
						);
						None
					}
				}
			}
			Reason::Rename {
				reference,
				original,
				replacement,
				occurrence,
			} => {
				let formula = self.line(reference, location)?;
				self.rename(formula, original, replacement, *occurrence, location)
			}
			Reason::SubstFree {
				reference,
				variable,
				substitute,
			} => {
				let formula = self.line(reference, location);
				let term_ok = self.well_formed_term(substitute, &location.field("substitute"));
				let formula = formula?;
				if !term_ok {
					return None;
				}
				self.substitute_free(formula, variable, substitute, location)
			}
			Reason::SubstPred {
				reference,
				predicate_variable,
				substitute,
			} => {
				let formula = self.line(reference, location);
				let substitute_ok = self.well_formed(substitute, &location.field("substitute"));
				let formula = formula?;
				if !substitute_ok {
					return None;
				}
				self.substitute_schematic(formula, &Operator::PredVar, predicate_variable, substitute, location)
			}
			Reason::SubstFunc {
				reference,
				function_variable,
				substitute,
			} => {
				let formula = self.line(reference, location);
				let substitute_ok = self.well_formed_term(substitute, &location.field("substitute"));
				let formula = formula?;
				if !substitute_ok {
					return None;
				}
				self.substitute_schematic(formula, &Operator::FunVar, function_variable, substitute, location)
			}
			Reason::Universal { reference, variable } => {
				let formula = self.line(reference, location)?;
				let (premise, conclusion) = self.generalizable(formula, variable, location)?;
				if vars::is_free_in(variable.subject_variable()?.as_str(), premise) {
					self.error(
						codes::GENERALIZATION_NOT_POSSIBLE,
						location,
						format!("{variable} occurs free in the premise {premise}"),
					);
					return None;
				}
				Some(build::implies(premise.clone(), Element::list(Operator::ForAll, [variable.clone(), conclusion.clone()])))
			}
			Reason::Existential { reference, variable } => {
				let formula = self.line(reference, location)?;
				let (premise, conclusion) = self.generalizable(formula, variable, location)?;
				if vars::is_free_in(variable.subject_variable()?.as_str(), conclusion) {
					self.error(
						codes::GENERALIZATION_NOT_POSSIBLE,
						location,
						format!("{variable} occurs free in the conclusion {conclusion}"),
					);
					return None;
				}
				Some(build::implies(Element::list(Operator::Exists, [variable.clone(), premise.clone()]), conclusion.clone()))
			}
		}
	}

	fn add(&mut self, reference: &str, location: &ModuleLocation) -> Option<Element> {
		let target = match self.env.lookup.lookup_add(reference) {
			Ok(target) => target,
			Err(problem) => {
				self.error(problem.code(), location, problem.to_string());
				return None;
			}
		};
		match target {
			AddTarget::Axiom(formula) => Some(formula),
			AddTarget::Proposition { formula, status } => {
				if status.is_success() {
					Some(formula)
				} else {
					self.error(
						codes::PROPOSITION_NOT_PROVED,
						location,
						format!("proposition {reference:?} is not proved"),
					);
					None
				}
			}
			AddTarget::PredicateDefinition {
				name,
				parameters,
				definiens: Some(definiens),
			} => Some(build::equi([build::predcon(&name, parameters), definiens])),
			AddTarget::FunctionDefinition {
				name,
				parameters,
				definiens: Some(definiens),
			} => {
				let Some(identity) = self.env.existence.identity_operator() else {
					self.error(
						codes::IDENTITY_OPERATOR_NOT_DEFINED,
						location,
						format!("adding function definition {reference:?} needs the identity operator"),
					);
					return None;
				};
				Some(build::predcon(identity, [build::funcon(&name, parameters), definiens]))
			}
			AddTarget::PredicateDefinition { definiens: None, .. } | AddTarget::FunctionDefinition { definiens: None, .. } => {
				self.error(
					codes::ADD_TARGET_NOT_A_FORMULA,
					location,
					format!("{reference:?} declares an undefined symbol and has no formula"),
				);
				None
			}
			AddTarget::Rule => {
				self.error(codes::ADD_TARGET_NOT_A_FORMULA, location, format!("{reference:?} is a rule, not a formula"));
				None
			}
		}
	}

	fn rename(&mut self, formula: &Element, original: &Element, replacement: &Element, occurrence: usize, location: &ModuleLocation) -> Option<Element> {
		let (Some(from), Some(to)) = (original.subject_variable(), replacement.subject_variable()) else {
			self.error(
				codes::RENAME_NOT_POSSIBLE,
				location,
				format!("rename needs subject variables but got {original} and {replacement}"),
			);
			return None;
		};
		if vars::occurs(to.as_str(), formula) {
			self.error(
				codes::RENAME_NOT_POSSIBLE,
				location,
				format!("{replacement} already occurs in {formula}"),
			);
			return None;
		}
		let renamed = subst::rename_bound(formula, from, to, occurrence);
		if renamed.is_none() {
			let message = match occurrence {
				0 => format!("{formula} has no binder of {original}"),
				n => format!("{formula} has no binder number {n} of {original}"),
			};
			self.error(codes::RENAME_NOT_POSSIBLE, location, message);
		}
		renamed
	}

	fn substitute_free(&mut self, formula: &Element, variable: &Element, term: &Element, location: &ModuleLocation) -> Option<Element> {
		let Some(name) = variable.subject_variable() else {
			self.error(
				codes::SUBSTITUTION_NOT_POSSIBLE,
				location,
				format!("{variable} is not a subject variable"),
			);
			return None;
		};
		let bound = vars::bound_variables(formula);
		if let Some(captured) = vars::free_variables(term).into_iter().find(|var| bound.contains(var)) {
			self.error(
				codes::SUBSTITUTION_NOT_POSSIBLE,
				location,
				format!("free variable {captured} of {term} is bound in {formula}"),
			);
			return None;
		}
		if let Some(hypothesis) = self.restricting_hypothesis(|h| vars::is_free_in(name.as_str(), h)) {
			self.error(
				codes::HYPOTHESIS_RESTRICTION,
				location,
				format!("{variable} occurs free in the open hypothesis {hypothesis}"),
			);
			return None;
		}
		Some(subst::replace_free(formula, name, term))
	}

	fn substitute_schematic(
		&mut self,
		formula: &Element,
		operator: &Operator,
		schematic: &Element,
		substitute: &Element,
		location: &ModuleLocation,
	) -> Option<Element> {
		let Some(parameters) = schematic_parameters(schematic, operator) else {
			self.error(
				codes::SUBSTITUTION_NOT_POSSIBLE,
				location,
				format!("{schematic} must be a {} with distinct subject variable arguments", operator.as_str()),
			);
			return None;
		};
		let name = schematic.symbol_name()?;
		if let Some(bound) = vars::bound_variables(substitute).into_iter().find(|var| vars::occurs(var.as_str(), formula)) {
			self.error(
				codes::SUBSTITUTION_NOT_POSSIBLE,
				location,
				format!("bound variable {bound} of {substitute} occurs in {formula}"),
			);
			return None;
		}
		let bound = vars::bound_variables(formula);
		if let Some(captured) = vars::free_variables(substitute)
			.into_iter()
			.find(|var| !parameters.contains(var) && bound.contains(var))
		{
			self.error(
				codes::SUBSTITUTION_NOT_POSSIBLE,
				location,
				format!("free variable {captured} of {substitute} would be captured in {formula}"),
			);
			return None;
		}
		let arity = parameters.len();
		if let Some(hypothesis) = self.restricting_hypothesis(|h| vars::schematic_occurs(h, operator, name.as_str(), arity)) {
			self.error(
				codes::HYPOTHESIS_RESTRICTION,
				location,
				format!("{schematic} occurs in the open hypothesis {hypothesis}"),
			);
			return None;
		}
		let schematic = Schematic {
			operator,
			name: name.as_str(),
			parameters: &parameters,
		};
		Some(subst::replace_schematic(formula, &schematic, substitute))
	}

	/// Splits an implication for generalization over `variable`.
	fn generalizable<'f>(&mut self, formula: &'f Element, variable: &Element, location: &ModuleLocation) -> Option<(&'f Element, &'f Element)> {
		let Some(name) = variable.subject_variable() else {
			self.error(
				codes::GENERALIZATION_NOT_POSSIBLE,
				location,
				format!("{variable} is not a subject variable"),
			);
			return None;
		};
		let Some(parts) = implication(formula) else {
			self.error(
				codes::GENERALIZATION_NOT_POSSIBLE,
				location,
				format!("{formula} is not an implication"),
			);
			return None;
		};
		if let Some(hypothesis) = self.restricting_hypothesis(|h| vars::is_free_in(name.as_str(), h)) {
			self.error(
				codes::HYPOTHESIS_RESTRICTION,
				location,
				format!("{variable} occurs free in the open hypothesis {hypothesis}"),
			);
			return None;
		}
		Some(parts)
	}

	fn restricting_hypothesis(&self, restricts: impl Fn(&Element) -> bool) -> Option<&'p Element> {
		self.hypotheses.iter().copied().find(|&hypothesis| restricts(hypothesis))
	}
}

/// `(premise, conclusion)` of a well-shaped `IMPL`.
fn implication(formula: &Element) -> Option<(&Element, &Element)> {
	match formula.children() {
		[premise, conclusion] if formula.is(&Operator::Impl) => Some((premise, conclusion)),
		_ => None,
	}
}

/// Argument names of `operator(name, VAR..)`, if they are distinct variables.
fn schematic_parameters<'e>(schematic: &'e Element, operator: &Operator) -> Option<Vec<&'e Atom>> {
	if !schematic.is(operator) || schematic.symbol_name().is_none() {
		return None;
	}
	let mut names = Vec::with_capacity(schematic.arguments().len());
	for argument in schematic.arguments() {
		let name = argument.subject_variable()?;
		if names.contains(&name) {
			return None;
		}
		names.push(name);
	}
	Some(names)
}
