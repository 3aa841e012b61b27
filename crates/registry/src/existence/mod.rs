//! Existence registry: the symbols a module can see.
//!
//! A registry holds the predicate and function constants and the rules a
//! module defines itself, plus snapshots of its direct imports' registries.
//! Unqualified predicate and function names resolve locally only; a name
//! `label.rest` resolves `rest` in the import registered under `label`, which
//! applies the same rule again. Rules are global: a rule key is looked up
//! locally first and then in every import, in declaration order.

use std::collections::BTreeMap;
use std::sync::Arc;

use hilbert_primitives::{Diagnostic, Element, FunctionKey, MODULE_SEPARATOR, ModuleId, ModuleLocation, PredicateKey, RuleKey};
use rustc_hash::FxHashMap as HashMap;

use crate::error::{RegistryError, Result};

#[cfg(test)]
mod tests;

/// Read-only view of symbol existence used by the checkers.
pub trait ExistenceChecker {
	fn predicate_exists(&self, key: &PredicateKey) -> bool;

	fn function_exists(&self, key: &FunctionKey) -> bool;

	fn rule_exists(&self, key: &RuleKey) -> bool;

	/// Returns true if any version of rule `name` is reachable.
	fn rule_declared(&self, name: &str) -> bool;

	/// Name of the identity predicate, qualified relative to this module.
	fn identity_operator(&self) -> Option<&str>;

	fn class_operator_defined(&self) -> bool;

	/// Arities under which `name` is defined as a predicate constant.
	fn predicate_arities(&self, name: &str) -> Vec<usize>;

	/// Arities under which `name` is defined as a function constant.
	fn function_arities(&self, name: &str) -> Vec<usize>;

	/// A visible predicate name close to `name`.
	fn suggest_predicate(&self, name: &str) -> Option<String>;

	/// A visible function name close to `name`.
	fn suggest_function(&self, name: &str) -> Option<String>;
}

/// A registered predicate or function constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
	pub parameters: Vec<Element>,
	/// `None` for initial (undefined) symbols.
	pub definiens: Option<Element>,
	pub location: ModuleLocation,
}

/// A declared rule version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEntry {
	pub location: ModuleLocation,
	/// Keys this declaration supersedes.
	pub changes: Vec<RuleKey>,
}

impl RuleEntry {
	/// Module that declared the rule.
	pub fn owner(&self) -> &ModuleId {
		&self.location.module
	}
}

/// A direct import's published registry.
#[derive(Debug, Clone)]
pub struct ImportedRegistry {
	pub label: Arc<str>,
	pub registry: Arc<ExistenceRegistry>,
	/// Location of the import declaration in the importing module.
	pub location: ModuleLocation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct IdentityOperator {
	name: Arc<str>,
	owner: ModuleId,
}

/// Symbol table of one module, built during a single checking pass.
#[derive(Debug, Clone)]
pub struct ExistenceRegistry {
	module: ModuleId,
	imports: Vec<ImportedRegistry>,
	predicates: HashMap<PredicateKey, Definition>,
	functions: HashMap<FunctionKey, Definition>,
	rules: BTreeMap<RuleKey, RuleEntry>,
	identity: Option<IdentityOperator>,
	class_owner: Option<ModuleId>,
}

const SUGGESTION_DISTANCE: usize = 3;

impl ExistenceRegistry {
	/// Creates an empty registry without imports.
	pub fn new(module: ModuleId) -> Self {
		Self {
			module,
			imports: Vec::new(),
			predicates: HashMap::default(),
			functions: HashMap::default(),
			rules: BTreeMap::new(),
			identity: None,
			class_owner: None,
		}
	}

	/// Creates the registry of `module` from its direct imports.
	///
	/// Imports are walked in declaration order. The identity operator is
	/// propagated under the import's label and the class operator by owner.
	/// A later import asserting a different owner than an earlier one yields
	/// an error diagnostic at that import's declaration.
	pub fn seed(module: ModuleId, imports: Vec<ImportedRegistry>) -> (Self, Vec<Diagnostic>) {
		let mut registry = Self::new(module);
		let mut diagnostics = Vec::new();

		for import in &imports {
			if let Some(identity) = &import.registry.identity {
				let name = format!("{}{MODULE_SEPARATOR}{}", import.label, identity.name);
				match registry.set_identity_operator(name, identity.owner.clone()) {
					Ok(()) => tracing::debug!(module = %registry.module, import = %import.label, owner = %identity.owner, "propagated identity operator"),
					Err(err) => diagnostics.push(err.to_diagnostic(import.location.clone())),
				}
			}
			if let Some(owner) = &import.registry.class_owner {
				match registry.set_class_operator(owner.clone()) {
					Ok(()) => tracing::debug!(module = %registry.module, import = %import.label, %owner, "propagated class operator"),
					Err(err) => diagnostics.push(err.to_diagnostic(import.location.clone())),
				}
			}
		}

		registry.imports = imports;
		(registry, diagnostics)
	}

	pub fn module(&self) -> &ModuleId {
		&self.module
	}

	pub fn imports(&self) -> &[ImportedRegistry] {
		&self.imports
	}

	/// Returns the direct import registered under `label`.
	pub fn import(&self, label: &str) -> Option<&ImportedRegistry> {
		self.imports.iter().find(|import| &*import.label == label)
	}

	/// Registry and local name that a possibly qualified `name` refers to.
	fn scope_for<'a, 'n>(&'a self, name: &'n str) -> Option<(&'a Self, &'n str)> {
		match name.split_once(MODULE_SEPARATOR) {
			None => Some((self, name)),
			Some((label, rest)) => self.import(label)?.registry.scope_for(rest),
		}
	}

	pub fn predicate(&self, key: &PredicateKey) -> Option<&Definition> {
		let (registry, local) = self.scope_for(key.name())?;
		registry.predicates.get(&PredicateKey::new(local, key.arity()))
	}

	pub fn function(&self, key: &FunctionKey) -> Option<&Definition> {
		let (registry, local) = self.scope_for(key.name())?;
		registry.functions.get(&FunctionKey::new(local, key.arity()))
	}

	/// Registers a predicate constant of this module.
	pub fn add_predicate(&mut self, key: PredicateKey, definition: Definition) -> Result<()> {
		if key.is_qualified() {
			return Err(RegistryError::QualifiedName {
				kind: PredicateKey::KIND,
				name: key.name().to_string(),
			});
		}
		if let Some(existing) = self.predicates.get(&key) {
			return Err(RegistryError::AlreadyDefined {
				kind: PredicateKey::KIND,
				key: key.to_string(),
				existing: existing.location.clone(),
			});
		}
		tracing::debug!(module = %self.module, predicate = %key, "registered predicate");
		self.predicates.insert(key, definition);
		Ok(())
	}

	/// Registers a function constant of this module.
	pub fn add_function(&mut self, key: FunctionKey, definition: Definition) -> Result<()> {
		if key.is_qualified() {
			return Err(RegistryError::QualifiedName {
				kind: FunctionKey::KIND,
				name: key.name().to_string(),
			});
		}
		if let Some(existing) = self.functions.get(&key) {
			return Err(RegistryError::AlreadyDefined {
				kind: FunctionKey::KIND,
				key: key.to_string(),
				existing: existing.location.clone(),
			});
		}
		tracing::debug!(module = %self.module, function = %key, "registered function");
		self.functions.insert(key, definition);
		Ok(())
	}

	/// Direct import whose own table already defines the unqualified `key`.
	pub fn predicate_shadows(&self, key: &PredicateKey) -> Option<&ImportedRegistry> {
		self.imports.iter().find(|import| import.registry.predicates.contains_key(key))
	}

	/// Direct import whose own table already defines the unqualified `key`.
	pub fn function_shadows(&self, key: &FunctionKey) -> Option<&ImportedRegistry> {
		self.imports.iter().find(|import| import.registry.functions.contains_key(key))
	}

	/// Declares the identity operator.
	///
	/// Reasserting the current owner is a no-op; a different owner is rejected.
	pub fn set_identity_operator(&mut self, name: impl Into<Arc<str>>, owner: ModuleId) -> Result<()> {
		match &self.identity {
			Some(existing) if existing.owner == owner => Ok(()),
			Some(existing) => Err(RegistryError::IdentityOperatorExists {
				existing: existing.name.clone(),
				owner: existing.owner.clone(),
			}),
			None => {
				let name = name.into();
				tracing::debug!(module = %self.module, identity = %name, %owner, "identity operator defined");
				self.identity = Some(IdentityOperator { name, owner });
				Ok(())
			}
		}
	}

	/// Module that defines the identity operator.
	pub fn identity_owner(&self) -> Option<&ModuleId> {
		self.identity.as_ref().map(|identity| &identity.owner)
	}

	/// Declares the class operator.
	///
	/// Reasserting the current owner is a no-op; a different owner is rejected.
	pub fn set_class_operator(&mut self, owner: ModuleId) -> Result<()> {
		match &self.class_owner {
			Some(existing) if *existing == owner => Ok(()),
			Some(existing) => Err(RegistryError::ClassOperatorExists { owner: existing.clone() }),
			None => {
				tracing::debug!(module = %self.module, %owner, "class operator defined");
				self.class_owner = Some(owner);
				Ok(())
			}
		}
	}

	pub fn class_operator_owner(&self) -> Option<&ModuleId> {
		self.class_owner.as_ref()
	}

	/// Looks up a rule locally, then in imports.
	pub fn rule(&self, key: &RuleKey) -> Option<&RuleEntry> {
		self.rules.get(key).or_else(|| self.imports.iter().find_map(|import| import.registry.rule(key)))
	}

	/// Module that declared `key`, if reachable.
	pub fn rule_owner(&self, key: &RuleKey) -> Option<&ModuleId> {
		self.rule(key).map(RuleEntry::owner)
	}

	/// All reachable versions of rule `name`, ascending.
	pub fn rule_versions(&self, name: &str) -> Vec<RuleKey> {
		let mut out: Vec<RuleKey> = self.rule_keys().into_keys().filter(|key| key.name() == name).collect();
		out.sort();
		out
	}

	/// All reachable rule keys with their declarations.
	///
	/// Local declarations win over imported ones; among imports the first in
	/// declaration order wins.
	pub fn rule_keys(&self) -> BTreeMap<RuleKey, RuleEntry> {
		let mut out = self.rules.clone();
		for import in &self.imports {
			for (key, entry) in import.registry.rule_keys() {
				out.entry(key).or_insert(entry);
			}
		}
		out
	}

	/// Rule keys declared by this module itself.
	pub fn local_rules(&self) -> impl Iterator<Item = (&RuleKey, &RuleEntry)> {
		self.rules.iter()
	}

	/// Declares a rule, optionally as a change of earlier versions.
	///
	/// A name that is already reachable may only be declared again as a
	/// change of one of its versions, and every change must name a reachable
	/// version of the same rule with a strictly lower version.
	pub fn declare_rule(&mut self, key: RuleKey, changes: &[RuleKey], location: ModuleLocation) -> Result<()> {
		if let Some(existing) = self.rule(&key) {
			return Err(RegistryError::RuleAlreadyDefined {
				key,
				existing: existing.location.clone(),
			});
		}
		for change in changes {
			if change.name() != key.name() || self.rule(change).is_none() {
				return Err(RegistryError::ChangedRuleNotFound { key: change.clone() });
			}
			if change.version() >= key.version() {
				return Err(RegistryError::VersionNotIncreased {
					key,
					previous: change.clone(),
				});
			}
		}
		if changes.is_empty()
			&& let Some(previous) = self.rule_versions(key.name()).pop()
			&& let Some(existing) = self.rule(&previous)
		{
			return Err(RegistryError::RuleAlreadyDefined {
				key,
				existing: existing.location.clone(),
			});
		}

		tracing::debug!(module = %self.module, rule = %key, changes = changes.len(), "declared rule");
		self.rules.insert(
			key,
			RuleEntry {
				location,
				changes: changes.to_vec(),
			},
		);
		Ok(())
	}

	fn predicate_names(&self) -> Vec<&str> {
		self.predicates.keys().map(PredicateKey::name).collect()
	}

	fn function_names(&self) -> Vec<&str> {
		self.functions.keys().map(FunctionKey::name).collect()
	}

	/// Local names plus names of direct imports qualified by their label.
	fn visible_names(&self, names: fn(&Self) -> Vec<&str>) -> Vec<String> {
		let mut out: Vec<String> = names(self).into_iter().map(str::to_string).collect();
		for import in &self.imports {
			out.extend(names(&import.registry).into_iter().map(|name| format!("{}{MODULE_SEPARATOR}{name}", import.label)));
		}
		out
	}

	fn suggest(&self, wanted: &str, names: fn(&Self) -> Vec<&str>) -> Option<String> {
		self.visible_names(names)
			.into_iter()
			.filter(|name| name != wanted)
			.min_by_key(|name| strsim::levenshtein(wanted, name))
			.filter(|name| strsim::levenshtein(wanted, name) <= SUGGESTION_DISTANCE)
	}
}

impl ExistenceChecker for ExistenceRegistry {
	fn predicate_exists(&self, key: &PredicateKey) -> bool {
		self.predicate(key).is_some()
	}

	fn function_exists(&self, key: &FunctionKey) -> bool {
		self.function(key).is_some()
	}

	fn rule_exists(&self, key: &RuleKey) -> bool {
		self.rule(key).is_some()
	}

	fn rule_declared(&self, name: &str) -> bool {
		self.rules.keys().any(|key| key.name() == name) || self.imports.iter().any(|import| import.registry.rule_declared(name))
	}

	fn identity_operator(&self) -> Option<&str> {
		self.identity.as_ref().map(|identity| &*identity.name)
	}

	fn class_operator_defined(&self) -> bool {
		self.class_owner.is_some()
	}

	fn predicate_arities(&self, name: &str) -> Vec<usize> {
		let Some((registry, local)) = self.scope_for(name) else {
			return Vec::new();
		};
		let mut out: Vec<usize> = registry.predicates.keys().filter(|key| key.name() == local).map(PredicateKey::arity).collect();
		out.sort_unstable();
		out
	}

	fn function_arities(&self, name: &str) -> Vec<usize> {
		let Some((registry, local)) = self.scope_for(name) else {
			return Vec::new();
		};
		let mut out: Vec<usize> = registry.functions.keys().filter(|key| key.name() == local).map(FunctionKey::arity).collect();
		out.sort_unstable();
		out
	}

	fn suggest_predicate(&self, name: &str) -> Option<String> {
		self.suggest(name, Self::predicate_names)
	}

	fn suggest_function(&self, name: &str) -> Option<String> {
		self.suggest(name, Self::function_names)
	}
}
