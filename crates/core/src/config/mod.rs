//! Checker configuration.
//!
//! ```toml
//! identity_operator = "equal"
//! class_rule = "CLASS_DEFINITION_BY_FORMULA"
//! definition_policy = "signature-sound"
//! link_severity = "warning"
//! lock_poll_ms = 25
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above.

use std::path::Path;
use std::time::Duration;

use hilbert_checker::{DefinitionPolicy, DefinitionSettings};
use hilbert_primitives::Severity;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[cfg(test)]
mod tests;

/// How unresolved node links are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkSeverity {
	Error,
	#[default]
	Warning,
	Ignore,
}

impl LinkSeverity {
	/// Diagnostic severity, or `None` if links are not reported.
	pub fn severity(self) -> Option<Severity> {
		match self {
			Self::Error => Some(Severity::Error),
			Self::Warning => Some(Severity::Warning),
			Self::Ignore => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckerConfig {
	/// Binary predicate that acts as the identity operator.
	pub identity_operator: String,
	/// Rule whose declaration makes the class operator available.
	pub class_rule: String,
	pub definition_policy: DefinitionPolicy,
	pub link_severity: LinkSeverity,
	/// Interval at which a blocked lock wait rechecks cancellation.
	pub lock_poll_ms: u64,
}

impl Default for CheckerConfig {
	fn default() -> Self {
		let settings = DefinitionSettings::default();
		Self {
			identity_operator: settings.identity_operator,
			class_rule: settings.class_rule,
			definition_policy: settings.policy,
			link_severity: LinkSeverity::default(),
			lock_poll_ms: 25,
		}
	}
}

impl CheckerConfig {
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(text)?)
	}

	/// Reads and parses a TOML config file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml_str(&text)?;
		tracing::debug!(path = %path.display(), "loaded checker config");
		Ok(config)
	}

	pub fn definition_settings(&self) -> DefinitionSettings {
		DefinitionSettings {
			policy: self.definition_policy,
			identity_operator: self.identity_operator.clone(),
			class_rule: self.class_rule.clone(),
		}
	}

	pub fn lock_poll(&self) -> Duration {
		Duration::from_millis(self.lock_poll_ms.max(1))
	}
}
