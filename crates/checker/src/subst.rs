//! Substitution and renaming on element trees.
//!
//! These functions assume well-formed input; callers check side conditions
//! (capture, hypothesis restrictions) before applying them.

use hilbert_primitives::element::build::var;
use hilbert_primitives::{Atom, Element, Operator};

use crate::vars::binder_variable;

/// Replaces free occurrences of subject variables simultaneously.
pub fn replace_free_many(element: &Element, replacements: &[(&Atom, &Element)]) -> Element {
	if let Some(name) = element.subject_variable() {
		return match replacements.iter().find(|(var, _)| *var == name) {
			Some((_, term)) => (*term).clone(),
			None => element.clone(),
		};
	}
	if let Some(name) = binder_variable(element) {
		let inner: Vec<(&Atom, &Element)> = replacements.iter().copied().filter(|(var, _)| *var != name).collect();
		let mut children = Vec::with_capacity(element.children().len());
		children.push(element.children()[0].clone());
		children.extend(element.children()[1..].iter().map(|child| replace_free_many(child, &inner)));
		return element.with_children(children);
	}
	if element.is_atom() || replacements.is_empty() {
		return element.clone();
	}
	element.with_children(element.children().iter().map(|child| replace_free_many(child, replacements)).collect())
}

/// Replaces free occurrences of `variable` by `term`.
pub fn replace_free(element: &Element, variable: &Atom, term: &Element) -> Element {
	replace_free_many(element, &[(variable, term)])
}

/// Renames the `occurrence`-th binder of `from` (1-based, pre-order) to `to`.
///
/// `occurrence == 0` renames every binder of `from`. Returns `None` if no
/// binder was renamed.
pub fn rename_bound(element: &Element, from: &Atom, to: &Atom, occurrence: usize) -> Option<Element> {
	let mut seen = 0;
	let mut renamed = false;
	let result = rename(element, from, to, occurrence, &mut seen, &mut renamed);
	renamed.then_some(result)
}

fn rename(element: &Element, from: &Atom, to: &Atom, target: usize, seen: &mut usize, renamed: &mut bool) -> Element {
	if element.is_atom() {
		return element.clone();
	}
	let selected = binder_variable(element) == Some(from) && {
		*seen += 1;
		target == 0 || *seen == target
	};
	let children: Vec<Element> = element.children().iter().map(|child| rename(child, from, to, target, seen, renamed)).collect();
	if !selected {
		return element.with_children(children);
	}
	*renamed = true;
	let replacement = var(to.as_str());
	let mut out = Vec::with_capacity(children.len());
	out.push(replacement.clone());
	out.extend(children[1..].iter().map(|child| replace_free(child, from, &replacement)));
	element.with_children(out)
}

/// A schematic variable `operator(name, params...)` to replace.
#[derive(Debug, Clone, Copy)]
pub struct Schematic<'a> {
	pub operator: &'a Operator,
	pub name: &'a str,
	pub parameters: &'a [&'a Atom],
}

impl Schematic<'_> {
	fn matches(&self, element: &Element) -> bool {
		element.is(self.operator)
			&& element.symbol_name().is_some_and(|name| name.as_str() == self.name)
			&& element.arguments().len() == self.parameters.len()
	}
}

/// Replaces every occurrence of `schematic` by `substitute` with its
/// parameters instantiated to the occurrence's arguments.
pub fn replace_schematic(element: &Element, schematic: &Schematic<'_>, substitute: &Element) -> Element {
	if element.is_atom() {
		return element.clone();
	}
	let children: Vec<Element> = element.children().iter().map(|child| replace_schematic(child, schematic, substitute)).collect();
	if !schematic.matches(element) {
		return element.with_children(children);
	}
	let replacements: Vec<(&Atom, &Element)> = schematic.parameters.iter().copied().zip(children[1..].iter()).collect();
	replace_free_many(substitute, &replacements)
}
