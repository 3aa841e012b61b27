use std::fmt;

use serde::Serialize;

use crate::location::{ModuleLocation, SourceMap, SourceSpan};

pub mod codes;


/// Whether a diagnostic fails the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Error,
	Warning,
}

/// One finding of a checking pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
	/// Numeric code from [`codes`].
	pub code: u32,
	pub severity: Severity,
	pub message: String,
	/// Where the problem is.
	pub location: ModuleLocation,
	/// A second location the problem relates to (first definition, import, ...).
	pub reference: Option<ModuleLocation>,
	/// Source span, once resolved against a [`SourceMap`].
	pub span: Option<SourceSpan>,
}

impl Diagnostic {
	pub fn error(code: u32, location: ModuleLocation, message: impl Into<String>) -> Self {
		Self {
			code,
			severity: Severity::Error,
			message: message.into(),
			location,
			reference: None,
			span: None,
		}
	}

	pub fn warning(code: u32, location: ModuleLocation, message: impl Into<String>) -> Self {
		Self {
			severity: Severity::Warning,
			..Self::error(code, location, message)
		}
	}

	pub fn with_reference(mut self, reference: ModuleLocation) -> Self {
		self.reference = Some(reference);
		self
	}

	/// Re-labels this diagnostic with another severity.
	pub fn with_severity(mut self, severity: Severity) -> Self {
		self.severity = severity;
		self
	}

	pub fn is_error(&self) -> bool {
		self.severity == Severity::Error
	}
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let kind = match self.severity {
			Severity::Error => "error",
			Severity::Warning => "warning",
		};
		write!(f, "{kind}[{}] {}: {}", self.code, self.location, self.message)?;
		if let Some(reference) = &self.reference {
			write!(f, " (see {reference})")?;
		}
		Ok(())
	}
}

/// Append-only error and warning lists of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
	errors: Vec<Diagnostic>,
	warnings: Vec<Diagnostic>,
}

impl Diagnostics {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends to the list matching the diagnostic's severity.
	pub fn push(&mut self, diagnostic: Diagnostic) {
		match diagnostic.severity {
			Severity::Error => self.errors.push(diagnostic),
			Severity::Warning => self.warnings.push(diagnostic),
		}
	}

	pub fn errors(&self) -> &[Diagnostic] {
		&self.errors
	}

	pub fn warnings(&self) -> &[Diagnostic] {
		&self.warnings
	}

	pub fn has_errors(&self) -> bool {
		!self.errors.is_empty()
	}

	pub fn is_empty(&self) -> bool {
		self.errors.is_empty() && self.warnings.is_empty()
	}

	pub fn len(&self) -> usize {
		self.errors.len() + self.warnings.len()
	}

	/// Errors followed by warnings, each in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
		self.errors.iter().chain(self.warnings.iter())
	}

	/// Returns true if any error carries `code`.
	pub fn has_error_code(&self, code: u32) -> bool {
		self.errors.iter().any(|d| d.code == code)
	}

	/// Fills in source spans for diagnostics whose location is mapped.
	pub fn resolve_spans(&mut self, map: &SourceMap) {
		if map.is_empty() {
			return;
		}
		for diagnostic in self.errors.iter_mut().chain(self.warnings.iter_mut()) {
			if diagnostic.span.is_none() {
				diagnostic.span = map.lookup(&diagnostic.location.path);
			}
		}
	}
}

impl Extend<Diagnostic> for Diagnostics {
	fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
		for diagnostic in iter {
			self.push(diagnostic);
		}
	}
}

impl FromIterator<Diagnostic> for Diagnostics {
	fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
		let mut out = Self::new();
		out.extend(iter);
		out
	}
}
