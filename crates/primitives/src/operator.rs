use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Operator tag of a list element.
///
/// The set is closed: every operator the logic knows has a variant, and any
/// other tag is carried verbatim in [`Operator::Unknown`] so the checker can
/// report it instead of failing to load the module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
	/// Predicate variable `PREDVAR(name, terms...)`.
	PredVar,
	/// Function variable `FUNVAR(name, terms...)`.
	FunVar,
	/// Predicate constant `PREDCON(name, terms...)`.
	PredCon,
	/// Function constant `FUNCON(name, terms...)`.
	FunCon,
	/// Subject variable `VAR(name)`.
	Var,
	/// Conjunction.
	And,
	/// Disjunction.
	Or,
	/// Implication.
	Impl,
	/// Equivalence.
	Equi,
	/// Negation.
	Not,
	/// Universal quantifier.
	ForAll,
	/// Existential quantifier.
	Exists,
	/// Unique existential quantifier.
	ExistsUnique,
	/// Class abstraction `{x | phi}`.
	Class,
	/// Finite class `{a, b, ...}`.
	ClassList,
	/// Class intersection over a quantified variable.
	QuantorIntersection,
	/// Class union over a quantified variable.
	QuantorUnion,
	/// Any tag the logic does not define.
	Unknown(Arc<str>),
}

/// Whether an operator builds a formula or a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sort {
	Formula,
	Term,
	/// Unknown operators have no sort.
	Unknown,
}

impl fmt::Display for Sort {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Formula => f.write_str("formula"),
			Self::Term => f.write_str("term"),
			Self::Unknown => f.write_str("unknown"),
		}
	}
}

/// Number of children an operator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
	Exactly(usize),
	AtLeast(usize),
	/// Inclusive range.
	Between(usize, usize),
}

impl Arity {
	/// Returns true if `count` children are acceptable.
	pub fn accepts(self, count: usize) -> bool {
		match self {
			Self::Exactly(n) => count == n,
			Self::AtLeast(n) => count >= n,
			Self::Between(lo, hi) => (lo..=hi).contains(&count),
		}
	}
}

impl fmt::Display for Arity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Exactly(1) => f.write_str("exactly one argument"),
			Self::Exactly(n) => write!(f, "exactly {n} arguments"),
			Self::AtLeast(1) => f.write_str("at least one argument"),
			Self::AtLeast(n) => write!(f, "at least {n} arguments"),
			Self::Between(lo, hi) if *hi == lo + 1 => write!(f, "{lo} or {hi} arguments"),
			Self::Between(lo, hi) => write!(f, "between {lo} and {hi} arguments"),
		}
	}
}

impl Operator {
	/// Parses an operator tag. Unrecognised tags become [`Operator::Unknown`].
	pub fn parse(tag: &str) -> Self {
		match tag {
			"PREDVAR" => Self::PredVar,
			"FUNVAR" => Self::FunVar,
			"PREDCON" => Self::PredCon,
			"FUNCON" => Self::FunCon,
			"VAR" => Self::Var,
			"AND" => Self::And,
			"OR" => Self::Or,
			"IMPL" => Self::Impl,
			"EQUI" => Self::Equi,
			"NOT" => Self::Not,
			"FORALL" => Self::ForAll,
			"EXISTS" => Self::Exists,
			"EXISTSU" => Self::ExistsUnique,
			"CLASS" => Self::Class,
			"CLASSLIST" => Self::ClassList,
			"QUANTOR_INTERSECTION" => Self::QuantorIntersection,
			"QUANTOR_UNION" => Self::QuantorUnion,
			other => Self::Unknown(Arc::from(other)),
		}
	}

	/// Returns the canonical tag.
	pub fn as_str(&self) -> &str {
		match self {
			Self::PredVar => "PREDVAR",
			Self::FunVar => "FUNVAR",
			Self::PredCon => "PREDCON",
			Self::FunCon => "FUNCON",
			Self::Var => "VAR",
			Self::And => "AND",
			Self::Or => "OR",
			Self::Impl => "IMPL",
			Self::Equi => "EQUI",
			Self::Not => "NOT",
			Self::ForAll => "FORALL",
			Self::Exists => "EXISTS",
			Self::ExistsUnique => "EXISTSU",
			Self::Class => "CLASS",
			Self::ClassList => "CLASSLIST",
			Self::QuantorIntersection => "QUANTOR_INTERSECTION",
			Self::QuantorUnion => "QUANTOR_UNION",
			Self::Unknown(tag) => tag,
		}
	}

	/// Returns the accepted child count.
	pub fn arity(&self) -> Arity {
		match self {
			Self::Var | Self::Not => Arity::Exactly(1),
			Self::Impl | Self::Class => Arity::Exactly(2),
			Self::PredVar | Self::PredCon | Self::FunCon => Arity::AtLeast(1),
			Self::FunVar | Self::And | Self::Or | Self::Equi => Arity::AtLeast(2),
			Self::ForAll | Self::Exists | Self::ExistsUnique | Self::QuantorIntersection | Self::QuantorUnion => Arity::Between(2, 3),
			Self::ClassList | Self::Unknown(_) => Arity::AtLeast(0),
		}
	}

	pub fn sort(&self) -> Sort {
		match self {
			Self::PredVar
			| Self::PredCon
			| Self::And
			| Self::Or
			| Self::Impl
			| Self::Equi
			| Self::Not
			| Self::ForAll
			| Self::Exists
			| Self::ExistsUnique => Sort::Formula,
			Self::Var | Self::FunVar | Self::FunCon | Self::Class | Self::ClassList | Self::QuantorIntersection | Self::QuantorUnion => {
				Sort::Term
			}
			Self::Unknown(_) => Sort::Unknown,
		}
	}

	/// Returns true for operators whose first child is a bound subject variable.
	pub fn is_binder(&self) -> bool {
		matches!(
			self,
			Self::ForAll | Self::Exists | Self::ExistsUnique | Self::Class | Self::QuantorIntersection | Self::QuantorUnion
		)
	}

	/// Returns true for operators that need the class operator.
	pub fn needs_class_operator(&self) -> bool {
		matches!(self, Self::Class | Self::ClassList | Self::QuantorIntersection | Self::QuantorUnion)
	}

	/// Returns true for operators whose first child is a symbol name.
	pub fn is_named(&self) -> bool {
		matches!(self, Self::PredVar | Self::FunVar | Self::PredCon | Self::FunCon)
	}
}

impl fmt::Display for Operator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<String> for Operator {
	fn from(tag: String) -> Self {
		Self::parse(&tag)
	}
}

impl From<&str> for Operator {
	fn from(tag: &str) -> Self {
		Self::parse(tag)
	}
}

impl From<Operator> for String {
	fn from(op: Operator) -> Self {
		op.as_str().to_string()
	}
}
