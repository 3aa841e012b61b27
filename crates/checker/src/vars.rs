//! Free and bound subject variable analysis.

use hilbert_primitives::{Atom, Element, ElementList, Operator};
use smallvec::SmallVec;

/// Bound variable of a binder node: `FORALL(VAR(x), ...)` gives `x`.
pub fn binder_variable(element: &Element) -> Option<&Atom> {
	binder_variable_of(element.as_list()?)
}

pub fn binder_variable_of(list: &ElementList) -> Option<&Atom> {
	if !list.operator().is_binder() {
		return None;
	}
	list.child(0)?.subject_variable()
}

fn walk<'e>(element: &'e Element, bound: &mut SmallVec<[&'e Atom; 8]>, free: &mut Vec<&'e Atom>, binders: &mut Vec<&'e Atom>) {
	if let Some(name) = element.subject_variable() {
		if !bound.contains(&name) && !free.contains(&name) {
			free.push(name);
		}
		return;
	}
	if let Some(name) = binder_variable(element) {
		if !binders.contains(&name) {
			binders.push(name);
		}
		bound.push(name);
		for child in &element.children()[1..] {
			walk(child, bound, free, binders);
		}
		bound.pop();
		return;
	}
	for child in element.children() {
		walk(child, bound, free, binders);
	}
}

/// Free subject variables in first-occurrence order.
pub fn free_variables(element: &Element) -> Vec<&Atom> {
	let (mut free, mut binders) = (Vec::new(), Vec::new());
	walk(element, &mut SmallVec::new(), &mut free, &mut binders);
	free
}

/// Variables bound somewhere in `element`, in first-binder order.
pub fn bound_variables(element: &Element) -> Vec<&Atom> {
	let (mut free, mut binders) = (Vec::new(), Vec::new());
	walk(element, &mut SmallVec::new(), &mut free, &mut binders);
	binders
}

pub fn is_free_in(name: &str, element: &Element) -> bool {
	free_variables(element).iter().any(|var| var.as_str() == name)
}

/// Returns true if `VAR(name)` occurs anywhere, free or bound.
pub fn occurs(name: &str, element: &Element) -> bool {
	element.subject_variable().is_some_and(|var| var.as_str() == name) || element.children().iter().any(|child| occurs(name, child))
}

/// Returns true if a schematic `operator(name, ...)` with `arity` arguments occurs.
pub fn schematic_occurs(element: &Element, operator: &Operator, name: &str, arity: usize) -> bool {
	let matches = element.is(operator) && element.symbol_name().is_some_and(|n| n.as_str() == name) && element.arguments().len() == arity;
	matches || element.children().iter().any(|child| schematic_occurs(child, operator, name, arity))
}
