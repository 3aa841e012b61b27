//! Constructors for common element shapes.
//!
//! ```
//! use hilbert_primitives::element::build::*;
//!
//! // forall x (A(x) -> A(x))
//! let f = forall("x", implies(predvar("A", [var("x")]), predvar("A", [var("x")])));
//! assert_eq!(f.to_string(), "FORALL(x, IMPL(PREDVAR(A, x), PREDVAR(A, x)))");
//! ```

use super::Element;
use crate::operator::Operator;

/// `VAR(name)`.
pub fn var(name: &str) -> Element {
	Element::list(Operator::Var, [Element::atom(name)])
}

fn named(operator: Operator, name: &str, args: impl IntoIterator<Item = Element>) -> Element {
	Element::list(operator, std::iter::once(Element::atom(name)).chain(args))
}

/// `PREDVAR(name, args...)`.
pub fn predvar(name: &str, args: impl IntoIterator<Item = Element>) -> Element {
	named(Operator::PredVar, name, args)
}

/// `PREDCON(name, args...)`.
pub fn predcon(name: &str, args: impl IntoIterator<Item = Element>) -> Element {
	named(Operator::PredCon, name, args)
}

/// `FUNVAR(name, args...)`.
pub fn funvar(name: &str, args: impl IntoIterator<Item = Element>) -> Element {
	named(Operator::FunVar, name, args)
}

/// `FUNCON(name, args...)`.
pub fn funcon(name: &str, args: impl IntoIterator<Item = Element>) -> Element {
	named(Operator::FunCon, name, args)
}

pub fn not(formula: Element) -> Element {
	Element::list(Operator::Not, [formula])
}

pub fn and(formulas: impl IntoIterator<Item = Element>) -> Element {
	Element::list(Operator::And, formulas)
}

pub fn or(formulas: impl IntoIterator<Item = Element>) -> Element {
	Element::list(Operator::Or, formulas)
}

pub fn implies(premise: Element, conclusion: Element) -> Element {
	Element::list(Operator::Impl, [premise, conclusion])
}

pub fn equi(formulas: impl IntoIterator<Item = Element>) -> Element {
	Element::list(Operator::Equi, formulas)
}

pub fn forall(variable: &str, body: Element) -> Element {
	Element::list(Operator::ForAll, [var(variable), body])
}

pub fn exists(variable: &str, body: Element) -> Element {
	Element::list(Operator::Exists, [var(variable), body])
}

pub fn exists_unique(variable: &str, body: Element) -> Element {
	Element::list(Operator::ExistsUnique, [var(variable), body])
}

/// `CLASS(VAR(variable), formula)`.
pub fn class(variable: &str, formula: Element) -> Element {
	Element::list(Operator::Class, [var(variable), formula])
}

pub fn class_list(terms: impl IntoIterator<Item = Element>) -> Element {
	Element::list(Operator::ClassList, terms)
}
