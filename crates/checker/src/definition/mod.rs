//! Predicate, function and rule declarations.
//!
//! Each check reports its diagnostics and, if the declaration is acceptable
//! under the configured [`DefinitionPolicy`], registers it in the module's
//! [`ExistenceRegistry`].

use hilbert_primitives::module::{RuleDeclaration, SymbolDefinition};
use hilbert_primitives::{
	Atom, Diagnostic, Element, FunctionKey, ModuleLocation, PredicateKey, RuleKey, Severity, Version, codes,
};
use hilbert_registry::{Definition, ExistenceChecker, ExistenceRegistry, RegistryError};
use serde::{Deserialize, Serialize};

use crate::formula::FormulaChecker;
use crate::vars;

#[cfg(test)]
mod tests;

/// When a definition with errors is still registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefinitionPolicy {
	/// Only definitions without errors are registered.
	Strict,
	/// Definitions whose only errors are free-variable mismatches between
	/// parameters and definiens are registered; name, arity and parameters
	/// are sound, so later uses of the symbol check normally.
	#[default]
	SignatureSound,
}

impl DefinitionPolicy {
	fn admits(self, errors: &[&Diagnostic]) -> bool {
		match self {
			Self::Strict => errors.is_empty(),
			Self::SignatureSound => errors
				.iter()
				.all(|d| matches!(d.code, codes::NUMBER_OF_FREE_SUBJECT_VARIABLES_NOT_EQUAL | codes::FREE_SUBJECT_VARIABLE_MISMATCH)),
		}
	}
}

/// Names and policy that declarations are checked with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionSettings {
	pub policy: DefinitionPolicy,
	/// A binary predicate definition with this name is the identity operator.
	pub identity_operator: String,
	/// A rule declaration with this name establishes the class operator.
	pub class_rule: String,
}

impl Default for DefinitionSettings {
	fn default() -> Self {
		Self {
			policy: DefinitionPolicy::default(),
			identity_operator: "equal".to_string(),
			class_rule: "CLASS_DEFINITION_BY_FORMULA".to_string(),
		}
	}
}

/// Diagnostics of a definition and whether it was registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionOutcome {
	pub diagnostics: Vec<Diagnostic>,
	pub registered: bool,
}

impl DefinitionOutcome {
	pub fn has_errors(&self) -> bool {
		self.diagnostics.iter().any(Diagnostic::is_error)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolKind {
	Predicate,
	Function,
}

/// Checks a predicate definition and registers it if admitted.
pub fn check_predicate_definition(
	definition: &SymbolDefinition,
	location: &ModuleLocation,
	registry: &mut ExistenceRegistry,
	formulas: &dyn FormulaChecker,
	settings: &DefinitionSettings,
) -> DefinitionOutcome {
	let mut outcome = check_symbol(SymbolKind::Predicate, definition, location, registry, formulas, settings);
	if outcome.registered && definition.name == settings.identity_operator && definition.arity == 2 {
		if let Err(err) = registry.set_identity_operator(definition.name.as_str(), registry.module().clone()) {
			outcome.diagnostics.push(err.to_diagnostic(location.clone()));
		}
	}
	outcome
}

/// Checks a function definition and registers it if admitted.
pub fn check_function_definition(
	definition: &SymbolDefinition,
	location: &ModuleLocation,
	registry: &mut ExistenceRegistry,
	formulas: &dyn FormulaChecker,
	settings: &DefinitionSettings,
) -> DefinitionOutcome {
	check_symbol(SymbolKind::Function, definition, location, registry, formulas, settings)
}

fn check_symbol(
	kind: SymbolKind,
	definition: &SymbolDefinition,
	location: &ModuleLocation,
	registry: &mut ExistenceRegistry,
	formulas: &dyn FormulaChecker,
	settings: &DefinitionSettings,
) -> DefinitionOutcome {
	let mut out = Vec::new();
	let name = definition.name.as_str();
	let arity = definition.arity;
	let (kind_name, existing, shadowed) = match kind {
		SymbolKind::Predicate => {
			let key = PredicateKey::new(name, arity);
			(
				PredicateKey::KIND,
				registry.predicate(&key).map(|d| d.location.clone()),
				registry
					.predicate_shadows(&key)
					.map(|import| (import.label.clone(), import.registry.predicate(&key).map(|d| d.location.clone()))),
			)
		}
		SymbolKind::Function => {
			let key = FunctionKey::new(name, arity);
			(
				FunctionKey::KIND,
				registry.function(&key).map(|d| d.location.clone()),
				registry
					.function_shadows(&key)
					.map(|import| (import.label.clone(), import.registry.function(&key).map(|d| d.location.clone()))),
			)
		}
	};

	if name.contains(hilbert_primitives::MODULE_SEPARATOR) {
		let err = RegistryError::QualifiedName {
			kind: kind_name,
			name: name.to_string(),
		};
		out.push(err.to_diagnostic(location.field("name")));
	} else if let Some(existing) = existing {
		let err = RegistryError::AlreadyDefined {
			kind: kind_name,
			key: format!("{name}/{arity}"),
			existing,
		};
		out.push(err.to_diagnostic(location.clone()));
	} else if let Some((label, first)) = shadowed {
		let warning = Diagnostic::warning(
			codes::SYMBOL_SHADOWS_IMPORT,
			location.clone(),
			format!("{kind_name} {name}/{arity} shadows the one defined in import {label:?}"),
		);
		out.push(match first {
			Some(first) => warning.with_reference(first),
			None => warning,
		});
	}

	if kind == SymbolKind::Function && registry.identity_operator().is_none() {
		out.push(Diagnostic::error(
			codes::IDENTITY_OPERATOR_NOT_DEFINED,
			location.clone(),
			format!("function {name}/{arity} needs the identity operator, which is not defined"),
		));
	}

	let parameters = check_parameters(definition, location, &mut out);

	if let Some(definiens) = &definition.definiens {
		let at = location.field("definiens");
		let existence: &dyn ExistenceChecker = &*registry;
		let errors = match kind {
			SymbolKind::Predicate => formulas.check_formula(definiens, &at, Some(existence)),
			SymbolKind::Function => formulas.check_term(definiens, &at, Some(existence)),
		};
		let clean = errors.is_empty();
		out.extend(errors);
		if clean && let Some(parameters) = &parameters {
			compare_free_variables(definiens, parameters, location, &mut out);
		}
	}

	let errors: Vec<&Diagnostic> = out.iter().filter(|d| d.severity == Severity::Error).collect();
	let mut registered = settings.policy.admits(&errors);
	if registered {
		let entry = Definition {
			parameters: definition.parameters.clone(),
			definiens: definition.definiens.clone(),
			location: location.clone(),
		};
		let added = match kind {
			SymbolKind::Predicate => registry.add_predicate(PredicateKey::new(name, arity), entry),
			SymbolKind::Function => registry.add_function(FunctionKey::new(name, arity), entry),
		};
		if let Err(err) = added {
			registered = false;
			out.push(err.to_diagnostic(location.clone()));
		}
	}
	if !registered {
		tracing::debug!(module = %registry.module(), symbol = %format_args!("{name}/{arity}"), kind = kind_name, "definition not registered");
	}

	DefinitionOutcome {
		diagnostics: out,
		registered,
	}
}

/// Parameter names, or `None` if some parameter is not a subject variable.
fn check_parameters<'d>(definition: &'d SymbolDefinition, location: &ModuleLocation, out: &mut Vec<Diagnostic>) -> Option<Vec<&'d Atom>> {
	let at = location.field("parameters");
	if definition.parameters.len() != definition.arity {
		out.push(Diagnostic::error(
			codes::ARGUMENT_COUNT_MISMATCH,
			at.clone(),
			format!(
				"{} declares arity {} but has {} parameters",
				definition.name,
				definition.arity,
				definition.parameters.len()
			),
		));
	}
	let mut names: Vec<&Atom> = Vec::with_capacity(definition.parameters.len());
	let mut valid = true;
	for (index, parameter) in definition.parameters.iter().enumerate() {
		match parameter.subject_variable() {
			None => {
				valid = false;
				out.push(Diagnostic::error(
					codes::SUBJECT_VARIABLE_EXPECTED,
					at.index("param", index),
					format!("parameter {parameter} is not a subject variable"),
				));
			}
			Some(name) if names.contains(&name) => {
				valid = false;
				out.push(Diagnostic::error(
					codes::DUPLICATE_PARAMETER,
					at.index("param", index),
					format!("parameter {name} is declared more than once"),
				));
			}
			Some(name) => names.push(name),
		}
	}
	valid.then_some(names)
}

fn compare_free_variables(definiens: &Element, parameters: &[&Atom], location: &ModuleLocation, out: &mut Vec<Diagnostic>) {
	let free = vars::free_variables(definiens);
	if free.len() != parameters.len() {
		let listed: Vec<&str> = free.iter().map(|var| var.as_str()).collect();
		out.push(Diagnostic::error(
			codes::NUMBER_OF_FREE_SUBJECT_VARIABLES_NOT_EQUAL,
			location.field("definiens"),
			format!(
				"definiens has {} free subject variables [{}] but {} parameters are declared",
				free.len(),
				listed.join(", "),
				parameters.len()
			),
		));
		return;
	}
	for (index, parameter) in parameters.iter().enumerate() {
		if !free.contains(parameter) {
			out.push(Diagnostic::error(
				codes::FREE_SUBJECT_VARIABLE_MISMATCH,
				location.field("parameters").index("param", index),
				format!("parameter {parameter} does not occur free in the definiens"),
			));
		}
	}
}

/// Checks a rule declaration and registers it if valid.
///
/// Declaring the configured class rule establishes the class operator.
pub fn check_rule_declaration(
	rule: &RuleDeclaration,
	location: &ModuleLocation,
	registry: &mut ExistenceRegistry,
	settings: &DefinitionSettings,
) -> Vec<Diagnostic> {
	let mut out = Vec::new();
	let version = parse_version(&rule.version, location.field("version"), &mut out);
	let changes: Vec<Option<RuleKey>> = rule
		.changes
		.iter()
		.enumerate()
		.map(|(index, change)| {
			let at = location.field("changes").index("change", index);
			parse_version(&change.version, at, &mut out).map(|version| RuleKey::new(change.name.as_str(), version))
		})
		.collect();
	let (Some(version), Some(changes)) = (version, changes.into_iter().collect::<Option<Vec<_>>>()) else {
		return out;
	};

	if let Err(err) = registry.declare_rule(RuleKey::new(rule.name.as_str(), version), &changes, location.clone()) {
		out.push(err.to_diagnostic(location.clone()));
		return out;
	}
	if rule.name == settings.class_rule
		&& let Err(err) = registry.set_class_operator(registry.module().clone())
	{
		out.push(err.to_diagnostic(location.clone()));
	}
	out
}

fn parse_version(text: &str, location: ModuleLocation, out: &mut Vec<Diagnostic>) -> Option<Version> {
	match text.parse::<Version>() {
		Ok(version) => Some(version),
		Err(err) => {
			out.push(Diagnostic::error(codes::INVALID_RULE_VERSION, location, err.to_string()));
			None
		}
	}
}
