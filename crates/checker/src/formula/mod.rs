//! Well-formedness of formulas and terms.

use hilbert_primitives::{Atom, Diagnostic, Element, ElementList, FunctionKey, ModuleLocation, Operator, PredicateKey, Sort, codes};
use hilbert_registry::ExistenceChecker;
use smallvec::SmallVec;

use crate::vars;

#[cfg(test)]
mod tests;

/// Checks formulas and terms, optionally against an existence registry.
///
/// Without a registry only shape, arity and variable binding are checked.
pub trait FormulaChecker: Send + Sync {
	fn check_formula(&self, element: &Element, location: &ModuleLocation, existence: Option<&dyn ExistenceChecker>) -> Vec<Diagnostic>;

	fn check_term(&self, element: &Element, location: &ModuleLocation, existence: Option<&dyn ExistenceChecker>) -> Vec<Diagnostic>;
}

/// Recursive descent checker for the built-in operator set.
#[derive(Debug, Clone, Copy, Default)]
pub struct WellFormedChecker;

impl FormulaChecker for WellFormedChecker {
	fn check_formula(&self, element: &Element, location: &ModuleLocation, existence: Option<&dyn ExistenceChecker>) -> Vec<Diagnostic> {
		let mut walk = Walk::new(existence);
		walk.formula(element, location);
		walk.out
	}

	fn check_term(&self, element: &Element, location: &ModuleLocation, existence: Option<&dyn ExistenceChecker>) -> Vec<Diagnostic> {
		let mut walk = Walk::new(existence);
		walk.term(element, location);
		walk.out
	}
}

struct Walk<'a> {
	existence: Option<&'a dyn ExistenceChecker>,
	/// Variables bound by enclosing binders.
	bound: SmallVec<[Atom; 8]>,
	out: Vec<Diagnostic>,
}

fn arg(location: &ModuleLocation, index: usize) -> ModuleLocation {
	location.index("arg", index)
}

impl<'a> Walk<'a> {
	fn new(existence: Option<&'a dyn ExistenceChecker>) -> Self {
		Self {
			existence,
			bound: SmallVec::new(),
			out: Vec::new(),
		}
	}

	fn error(&mut self, code: u32, location: &ModuleLocation, message: String) {
		self.out.push(Diagnostic::error(code, location.clone(), message));
	}

	/// Shape checks shared by formulas and terms.
	///
	/// Returns the list if its children can be interpreted for `expected`.
	fn shape<'e>(&mut self, element: &'e Element, location: &ModuleLocation, expected: Sort) -> Option<&'e ElementList> {
		let Some(list) = element.as_list() else {
			self.error(
				codes::LIST_EXPECTED,
				location,
				format!("expected a {expected} but found the atom {element}"),
			);
			return None;
		};
		let operator = list.operator();
		if let Operator::Unknown(tag) = operator {
			if tag.is_empty() {
				self.error(codes::OPERATOR_EMPTY, location, "operator is empty".to_string());
			} else {
				self.error(codes::UNKNOWN_OPERATOR, location, format!("unknown operator {tag:?}"));
			}
			return None;
		}
		if operator.sort() != expected {
			let code = match expected {
				Sort::Term => codes::TERM_EXPECTED,
				_ => codes::FORMULA_EXPECTED,
			};
			self.error(code, location, format!("expected a {expected} but {operator} builds a {}", operator.sort()));
			return None;
		}
		let arity = operator.arity();
		if !arity.accepts(list.len()) {
			self.error(
				codes::WRONG_NUMBER_OF_ARGUMENTS,
				location,
				format!("{operator} expects {arity} but has {}", list.len()),
			);
			return None;
		}
		Some(list)
	}

	fn formula(&mut self, element: &Element, location: &ModuleLocation) {
		let Some(list) = self.shape(element, location, Sort::Formula) else {
			return;
		};
		let start = self.out.len();
		match list.operator() {
			Operator::Not | Operator::And | Operator::Or | Operator::Impl | Operator::Equi => {
				for (index, child) in list.children().iter().enumerate() {
					self.formula(child, &arg(location, index));
				}
			}
			Operator::ForAll | Operator::Exists => self.binder(list, location),
			Operator::ExistsUnique => {
				self.require_identity(location);
				self.binder(list, location);
			}
			Operator::PredVar => {
				self.name_slot(list, location);
				self.arguments(list, location);
			}
			Operator::PredCon => {
				if let Some(name) = self.name_slot(list, location) {
					self.predicate_exists(name, list.len() - 1, location);
				}
				self.arguments(list, location);
			}
			_ => {}
		}
		if self.out.len() == start {
			self.siblings(list, location);
		}
	}

	fn term(&mut self, element: &Element, location: &ModuleLocation) {
		let Some(list) = self.shape(element, location, Sort::Term) else {
			return;
		};
		let start = self.out.len();
		match list.operator() {
			Operator::Var => {
				if !list.children()[0].is_atom() {
					self.error(codes::ATOM_EXPECTED, &arg(location, 0), "subject variable name must be an atom".to_string());
				}
			}
			Operator::FunVar => {
				self.name_slot(list, location);
				self.arguments(list, location);
			}
			Operator::FunCon => {
				if let Some(name) = self.name_slot(list, location) {
					self.function_exists(name, list.len() - 1, location);
				}
				self.arguments(list, location);
			}
			Operator::Class | Operator::QuantorIntersection | Operator::QuantorUnion => {
				self.require_class_operator(location);
				self.binder(list, location);
			}
			Operator::ClassList => {
				self.require_class_operator(location);
				for (index, child) in list.children().iter().enumerate() {
					self.term(child, &arg(location, index));
				}
			}
			_ => {}
		}
		if self.out.len() == start {
			self.siblings(list, location);
		}
	}

	/// Binder forms: a subject variable, then formulas in its scope.
	fn binder(&mut self, list: &ElementList, location: &ModuleLocation) {
		let Some(variable) = list.children()[0].subject_variable().cloned() else {
			self.error(
				codes::SUBJECT_VARIABLE_EXPECTED,
				&arg(location, 0),
				format!("{} must bind a subject variable", list.operator()),
			);
			return;
		};
		if self.bound.contains(&variable) {
			self.error(
				codes::SUBJECT_VARIABLE_ALREADY_BOUND,
				&arg(location, 0),
				format!("subject variable {variable} is already bound"),
			);
		}
		self.bound.push(variable);
		for (index, child) in list.children().iter().enumerate().skip(1) {
			self.formula(child, &arg(location, index));
		}
		self.bound.pop();
	}

	fn name_slot<'e>(&mut self, list: &'e ElementList, location: &ModuleLocation) -> Option<&'e Atom> {
		let name = list.children()[0].as_atom();
		if name.is_none() {
			self.error(
				codes::ATOM_EXPECTED,
				&arg(location, 0),
				format!("{} needs a name atom as its first argument", list.operator()),
			);
		}
		name
	}

	fn arguments(&mut self, list: &ElementList, location: &ModuleLocation) {
		for (index, child) in list.children().iter().enumerate().skip(1) {
			self.term(child, &arg(location, index));
		}
	}

	/// A variable free in one argument must not be bound in another.
	fn siblings(&mut self, list: &ElementList, location: &ModuleLocation) {
		let skip = usize::from(vars::binder_variable_of(list).is_some());
		let children = &list.children()[skip..];
		if children.len() < 2 {
			return;
		}
		let free: Vec<Vec<&Atom>> = children.iter().map(vars::free_variables).collect();
		let bound: Vec<Vec<&Atom>> = children.iter().map(vars::bound_variables).collect();
		let mut reported: SmallVec<[&Atom; 4]> = SmallVec::new();
		for (i, free) in free.iter().enumerate() {
			for (j, bound) in bound.iter().enumerate() {
				if i == j {
					continue;
				}
				for &variable in free.iter().filter(|var| bound.contains(*var)) {
					if !reported.contains(&variable) {
						reported.push(variable);
						self.out.push(Diagnostic::error(
							codes::FREE_VARIABLE_ALREADY_BOUND,
							arg(location, i + skip),
							format!("subject variable {variable} is free here but bound in argument {}", j + skip),
						));
					}
				}
			}
		}
	}

	fn predicate_exists(&mut self, name: &Atom, arity: usize, location: &ModuleLocation) {
		let Some(existence) = self.existence else {
			return;
		};
		let key = PredicateKey::new(name.as_arc().clone(), arity);
		if existence.predicate_exists(&key) {
			return;
		}
		let hint = hint(existence.predicate_arities(name.as_str()), || existence.suggest_predicate(name.as_str()));
		self.error(codes::UNKNOWN_PREDICATE_CONSTANT, location, format!("unknown predicate constant {key}{hint}"));
	}

	fn function_exists(&mut self, name: &Atom, arity: usize, location: &ModuleLocation) {
		let Some(existence) = self.existence else {
			return;
		};
		let key = FunctionKey::new(name.as_arc().clone(), arity);
		if existence.function_exists(&key) {
			return;
		}
		let hint = hint(existence.function_arities(name.as_str()), || existence.suggest_function(name.as_str()));
		self.error(codes::UNKNOWN_FUNCTION_CONSTANT, location, format!("unknown function constant {key}{hint}"));
	}

	fn require_class_operator(&mut self, location: &ModuleLocation) {
		if let Some(existence) = self.existence
			&& !existence.class_operator_defined()
		{
			self.error(codes::UNDEFINED_CLASS_OPERATOR, location, "class operator is not defined".to_string());
		}
	}

	fn require_identity(&mut self, location: &ModuleLocation) {
		if let Some(existence) = self.existence
			&& existence.identity_operator().is_none()
		{
			self.error(
				codes::IDENTITY_OPERATOR_NOT_DEFINED,
				location,
				"unique existence needs the identity operator, which is not defined".to_string(),
			);
		}
	}
}

fn hint(arities: Vec<usize>, suggest: impl FnOnce() -> Option<String>) -> String {
	if !arities.is_empty() {
		let list: Vec<String> = arities.iter().map(usize::to_string).collect();
		return format!("; it is defined with {} arguments", list.join(" or "));
	}
	match suggest() {
		Some(name) => format!("; did you mean {name:?}?"),
		None => String::new(),
	}
}
