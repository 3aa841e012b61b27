use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::operator::Operator;

pub mod build;


/// Opaque atom content: a variable name, a symbol name or a literal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Atom(Arc<str>);

impl Atom {
	pub fn new(text: impl Into<Arc<str>>) -> Self {
		Self(text.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns the shared backing string.
	pub fn as_arc(&self) -> &Arc<str> {
		&self.0
	}
}

impl fmt::Debug for Atom {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}", &*self.0)
	}
}

impl fmt::Display for Atom {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Atom {
	fn from(text: &str) -> Self {
		Self(Arc::from(text))
	}
}

impl std::borrow::Borrow<str> for Atom {
	fn borrow(&self) -> &str {
		&self.0
	}
}

/// Operator tag plus ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementList {
	#[serde(rename = "op")]
	operator: Operator,
	#[serde(default, rename = "args")]
	children: Vec<Element>,
}

impl ElementList {
	pub fn operator(&self) -> &Operator {
		&self.operator
	}

	pub fn children(&self) -> &[Element] {
		&self.children
	}

	pub fn len(&self) -> usize {
		self.children.len()
	}

	pub fn is_empty(&self) -> bool {
		self.children.is_empty()
	}

	pub fn child(&self, index: usize) -> Option<&Element> {
		self.children.get(index)
	}
}

/// Recursive formula or term node.
///
/// Elements are immutable once built and cheap to clone; lists share their
/// children behind an [`Arc`], so proof lines, registry entries and callers
/// can hold the same tree without copying it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
	Atom(Atom),
	List(Arc<ElementList>),
}

impl Element {
	/// Creates an atom.
	pub fn atom(text: impl Into<Arc<str>>) -> Self {
		Self::Atom(Atom::new(text))
	}

	/// Creates a list element.
	pub fn list(operator: impl Into<Operator>, children: impl IntoIterator<Item = Element>) -> Self {
		Self::List(Arc::new(ElementList {
			operator: operator.into(),
			children: children.into_iter().collect(),
		}))
	}

	pub fn is_atom(&self) -> bool {
		matches!(self, Self::Atom(_))
	}

	pub fn as_atom(&self) -> Option<&Atom> {
		match self {
			Self::Atom(atom) => Some(atom),
			Self::List(_) => None,
		}
	}

	pub fn as_list(&self) -> Option<&ElementList> {
		match self {
			Self::Atom(_) => None,
			Self::List(list) => Some(list.as_ref()),
		}
	}

	/// Returns the operator, or `None` for atoms.
	pub fn operator(&self) -> Option<&Operator> {
		self.as_list().map(ElementList::operator)
	}

	/// Returns the children; atoms have none.
	pub fn children(&self) -> &[Element] {
		match self {
			Self::Atom(_) => &[],
			Self::List(list) => list.children(),
		}
	}

	/// Returns true if this element has the given operator.
	pub fn is(&self, operator: &Operator) -> bool {
		self.operator() == Some(operator)
	}

	/// Returns the variable name if this is a well-shaped `VAR(name)`.
	pub fn subject_variable(&self) -> Option<&Atom> {
		let list = self.as_list()?;
		if list.operator() != &Operator::Var || list.len() != 1 {
			return None;
		}
		list.child(0)?.as_atom()
	}

	/// Returns the symbol name of a `PREDVAR`/`FUNVAR`/`PREDCON`/`FUNCON` element.
	pub fn symbol_name(&self) -> Option<&Atom> {
		let list = self.as_list()?;
		if !list.operator().is_named() {
			return None;
		}
		list.child(0)?.as_atom()
	}

	/// Returns the argument terms of a named element (children after the name).
	pub fn arguments(&self) -> &[Element] {
		match self.as_list() {
			Some(list) if list.operator().is_named() && !list.is_empty() => &list.children()[1..],
			_ => &[],
		}
	}

	/// Returns a list with the same operator and the given children.
	///
	/// Atoms are returned unchanged.
	pub fn with_children(&self, children: Vec<Element>) -> Self {
		match self {
			Self::Atom(_) => self.clone(),
			Self::List(list) => Self::List(Arc::new(ElementList {
				operator: list.operator.clone(),
				children,
			})),
		}
	}

	/// Total number of nodes in the tree.
	pub fn size(&self) -> usize {
		1 + self.children().iter().map(Element::size).sum::<usize>()
	}
}

impl fmt::Display for Element {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Atom(atom) => write!(f, "{atom}"),
			Self::List(list) => {
				if let Some(name) = self.subject_variable() {
					return write!(f, "{name}");
				}
				write!(f, "{}(", list.operator())?;
				for (idx, child) in list.children().iter().enumerate() {
					if idx > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{child}")?;
				}
				f.write_str(")")
			}
		}
	}
}
