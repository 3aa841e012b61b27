use std::sync::Arc;

use hilbert_primitives::{Diagnostic, ModuleId, ModuleLocation, RuleKey, codes};

/// Result alias for registry mutations.
pub type Result<T, E = RegistryError> = std::result::Result<T, E>;

/// Rejected registry mutation.
///
/// Registries never record these themselves; the caller turns them into
/// diagnostics at the location being checked via [`RegistryError::code`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	#[error("{kind} {key} is already defined at {existing}")]
	AlreadyDefined {
		kind: &'static str,
		key: String,
		existing: ModuleLocation,
	},
	#[error("{kind} name {name:?} must not contain a module label")]
	QualifiedName { kind: &'static str, name: String },
	#[error("rule {key} is already declared at {existing}")]
	RuleAlreadyDefined { key: RuleKey, existing: ModuleLocation },
	#[error("changed rule {key} was not found")]
	ChangedRuleNotFound { key: RuleKey },
	#[error("rule {key} must have a higher version than {previous}")]
	VersionNotIncreased { key: RuleKey, previous: RuleKey },
	#[error("identity operator is already defined as {existing:?} by module {owner}")]
	IdentityOperatorExists { existing: Arc<str>, owner: ModuleId },
	#[error("class operator is already defined by module {owner}")]
	ClassOperatorExists { owner: ModuleId },
}

impl RegistryError {
	/// Diagnostic code reported for this error.
	pub fn code(&self) -> u32 {
		match self {
			Self::AlreadyDefined { kind: "function", .. } => codes::FUNCTION_ALREADY_DEFINED,
			Self::AlreadyDefined { .. } => codes::PREDICATE_ALREADY_DEFINED,
			Self::QualifiedName { .. } => codes::QUALIFIED_DEFINITION_NAME,
			Self::RuleAlreadyDefined { .. } => codes::RULE_ALREADY_DEFINED,
			Self::ChangedRuleNotFound { .. } => codes::CHANGED_RULE_NOT_FOUND,
			Self::VersionNotIncreased { .. } => codes::RULE_VERSION_NOT_INCREASED,
			Self::IdentityOperatorExists { .. } => codes::IDENTITY_OPERATOR_ALREADY_EXISTS,
			Self::ClassOperatorExists { .. } => codes::CLASS_OPERATOR_ALREADY_EXISTS,
		}
	}

	/// Location of the conflicting earlier definition, if known.
	pub fn existing(&self) -> Option<&ModuleLocation> {
		match self {
			Self::AlreadyDefined { existing, .. } | Self::RuleAlreadyDefined { existing, .. } => Some(existing),
			_ => None,
		}
	}

	/// Error diagnostic at `location`, referencing the earlier definition.
	pub fn to_diagnostic(&self, location: ModuleLocation) -> Diagnostic {
		let diagnostic = Diagnostic::error(self.code(), location, self.to_string());
		match self.existing() {
			Some(existing) => diagnostic.with_reference(existing.clone()),
			None => diagnostic,
		}
	}
}

/// Rejected label registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
	#[error("label {label:?} is defined more than once")]
	Duplicate {
		label: String,
		first: ModuleLocation,
		second: ModuleLocation,
	},
}

impl LabelError {
	/// Error at the second registration, referencing the first.
	pub fn to_diagnostic(&self) -> Diagnostic {
		match self {
			Self::Duplicate { first, second, .. } => {
				Diagnostic::error(codes::LABEL_DEFINED_MORE_THAN_ONCE, second.clone(), self.to_string()).with_reference(first.clone())
			}
		}
	}
}
