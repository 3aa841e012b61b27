use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};


/// Separator between an import label and a symbol name.
pub const MODULE_SEPARATOR: char = '.';

macro_rules! symbol_key {
	($(#[$meta:meta])* $name:ident, $kind:literal) => {
		$(#[$meta])*
		#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		pub struct $name {
			name: Arc<str>,
			arity: usize,
		}

		impl $name {
			pub fn new(name: impl Into<Arc<str>>, arity: usize) -> Self {
				Self { name: name.into(), arity }
			}

			pub fn name(&self) -> &str {
				&self.name
			}

			pub fn arity(&self) -> usize {
				self.arity
			}

			/// Splits `label.rest` into the import label and the key for `rest`.
			///
			/// Returns `None` for unqualified names.
			pub fn split_qualified(&self) -> Option<(&str, Self)> {
				let (label, rest) = self.name.split_once(MODULE_SEPARATOR)?;
				Some((label, Self::new(rest, self.arity)))
			}

			/// Prefixes the name with an import label.
			pub fn qualify(&self, label: &str) -> Self {
				Self::new(format!("{label}{MODULE_SEPARATOR}{}", self.name), self.arity)
			}

			pub fn is_qualified(&self) -> bool {
				self.name.contains(MODULE_SEPARATOR)
			}

			/// Human readable kind, used in diagnostics.
			pub const KIND: &'static str = $kind;
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}/{}", self.name, self.arity)
			}
		}
	};
}

symbol_key!(
	/// Predicate constant identity: name plus argument count.
	PredicateKey,
	"predicate"
);

symbol_key!(
	/// Function constant identity: name plus argument count.
	FunctionKey,
	"function"
);

/// Error parsing a rule version.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid rule version {text:?}: expected numeric `a.b.c`")]
pub struct VersionError {
	pub text: String,
}

/// Rule version `major.minor.patch`, compared numerically.
///
/// Components are plain decimal digits; leading zeros are allowed so that
/// `1.00.00` and `1.0.0` denote the same version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
	pub major: u32,
	pub minor: u32,
	pub patch: u32,
}

impl Version {
	pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
		Self { major, minor, patch }
	}
}

impl FromStr for Version {
	type Err = VersionError;

	fn from_str(text: &str) -> Result<Self, Self::Err> {
		let err = || VersionError { text: text.to_string() };
		let mut parts = text.split('.');
		let mut next = || -> Result<u32, VersionError> {
			let part = parts.next().ok_or_else(err)?;
			if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
				return Err(err());
			}
			part.parse().map_err(|_| err())
		};
		let version = Self::new(next()?, next()?, next()?);
		if parts.next().is_some() {
			return Err(err());
		}
		Ok(version)
	}
}

impl fmt::Display for Version {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{:02}.{:02}", self.major, self.minor, self.patch)
	}
}

impl Serialize for Version {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for Version {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let text = String::deserialize(deserializer)?;
		text.parse().map_err(serde::de::Error::custom)
	}
}

/// Inference rule identity: name plus version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleKey {
	name: Arc<str>,
	version: Version,
}

impl RuleKey {
	pub fn new(name: impl Into<Arc<str>>, version: Version) -> Self {
		Self { name: name.into(), version }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn version(&self) -> Version {
		self.version
	}
}

impl Ord for RuleKey {
	fn cmp(&self, other: &Self) -> Ordering {
		self.name.cmp(&other.name).then(self.version.cmp(&other.version))
	}
}

impl PartialOrd for RuleKey {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl fmt::Display for RuleKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.name, self.version)
	}
}
