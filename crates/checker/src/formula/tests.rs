use hilbert_primitives::element::build::*;
use hilbert_primitives::{ModuleId, ModulePath};
use hilbert_registry::{Definition, ExistenceRegistry};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use super::*;

fn here() -> ModuleLocation {
	ModuleLocation::new(ModuleId::from("m"), ModulePath::root().label("node", "n").field("formula"))
}

fn definition() -> Definition {
	Definition {
		parameters: Vec::new(),
		definiens: None,
		location: here(),
	}
}

fn full_registry() -> ExistenceRegistry {
	let module = ModuleId::from("m");
	let mut registry = ExistenceRegistry::new(module.clone());
	registry.add_predicate(PredicateKey::new("equal", 2), definition()).expect("fresh");
	registry.add_predicate(PredicateKey::new("in", 2), definition()).expect("fresh");
	registry.add_predicate(PredicateKey::new("q", 2), definition()).expect("fresh");
	registry.add_function(FunctionKey::new("succ", 1), definition()).expect("fresh");
	registry.set_identity_operator("equal", module.clone()).expect("first");
	registry.set_class_operator(module).expect("first");
	registry
}

fn codes_of(diagnostics: &[Diagnostic]) -> Vec<u32> {
	diagnostics.iter().map(|d| d.code).collect()
}

fn check(element: &Element, registry: Option<&ExistenceRegistry>) -> Vec<u32> {
	let existence = registry.map(|r| r as &dyn ExistenceChecker);
	codes_of(&WellFormedChecker.check_formula(element, &here(), existence))
}

#[rstest]
#[case::and_empty(Element::list(Operator::And, []))]
#[case::and_single(Element::list(Operator::And, [predvar("A", [])]))]
#[case::or_single(Element::list(Operator::Or, [predvar("A", [])]))]
#[case::equi_empty(Element::list(Operator::Equi, []))]
#[case::equi_single(Element::list(Operator::Equi, [predvar("A", [])]))]
#[case::not_two(Element::list(Operator::Not, [predvar("A", []), predvar("B", [])]))]
#[case::impl_three(Element::list(Operator::Impl, [predvar("A", []), predvar("B", []), predvar("C", [])]))]
#[case::forall_one(Element::list(Operator::ForAll, [var("x")]))]
#[case::predvar_empty(Element::list(Operator::PredVar, []))]
fn arity_violation_is_one_error(#[case] element: Element) {
	assert_eq!(check(&element, None), vec![codes::WRONG_NUMBER_OF_ARGUMENTS]);
}

#[test]
fn arity_error_names_the_operator() {
	let diagnostics = WellFormedChecker.check_formula(&Element::list(Operator::Or, [predvar("A", [])]), &here(), None);
	assert_eq!(diagnostics[0].message, "OR expects at least 2 arguments but has 1");
	assert_eq!(diagnostics[0].location, here());
}

#[test]
fn structural_errors() {
	assert_eq!(check(&Element::atom("x"), None), vec![codes::LIST_EXPECTED]);
	assert_eq!(check(&Element::list("", []), None), vec![codes::OPERATOR_EMPTY]);
	assert_eq!(check(&Element::list("XOR", [predvar("A", [])]), None), vec![codes::UNKNOWN_OPERATOR]);
	assert_eq!(check(&var("x"), None), vec![codes::FORMULA_EXPECTED]);
	assert_eq!(check(&predvar("A", [predvar("B", [])]), None), vec![codes::TERM_EXPECTED]);
	assert_eq!(check(&predvar("A", [Element::atom("x")]), None), vec![codes::LIST_EXPECTED]);
	assert_eq!(
		check(&Element::list(Operator::PredVar, [var("x")]), None),
		vec![codes::ATOM_EXPECTED]
	);
	assert_eq!(
		check(&Element::list(Operator::ForAll, [predvar("A", []), predvar("B", [])]), None),
		vec![codes::SUBJECT_VARIABLE_EXPECTED]
	);
}

#[test]
fn errors_are_collected_across_siblings() {
	let f = and([Element::atom("x"), not(Element::list("XOR", [])), implies(predvar("A", []), var("y"))]);
	let diagnostics = WellFormedChecker.check_formula(&f, &here(), None);
	assert_eq!(
		codes_of(&diagnostics),
		vec![codes::LIST_EXPECTED, codes::UNKNOWN_OPERATOR, codes::FORMULA_EXPECTED]
	);
	assert_eq!(diagnostics[2].location.path.to_string(), "node(n)/formula/arg[2]/arg[1]");
}

#[test]
fn rebinding_a_bound_variable() {
	let f = forall("x", exists("x", predvar("A", [var("x")])));
	assert_eq!(check(&f, None), vec![codes::SUBJECT_VARIABLE_ALREADY_BOUND]);
}

#[test]
fn free_in_one_argument_bound_in_another() {
	let f = and([predvar("A", [var("x")]), forall("x", predvar("B", [var("x")]))]);
	let diagnostics = WellFormedChecker.check_formula(&f, &here(), None);
	assert_eq!(codes_of(&diagnostics), vec![codes::FREE_VARIABLE_ALREADY_BOUND]);
	assert_eq!(diagnostics[0].location.path.to_string(), "node(n)/formula/arg[0]");
}

#[test]
fn unknown_constants_and_hints() {
	let registry = full_registry();
	assert_eq!(check(&predcon("q", [var("x"), var("y")]), Some(&registry)), Vec::<u32>::new());
	assert_eq!(check(&predcon("q", [var("x"), var("y")]), None), Vec::<u32>::new(), "no registry, no lookup");

	let wrong_arity = WellFormedChecker.check_formula(&predcon("q", [var("x")]), &here(), Some(&registry));
	assert_eq!(codes_of(&wrong_arity), vec![codes::UNKNOWN_PREDICATE_CONSTANT]);
	assert_eq!(wrong_arity[0].message, "unknown predicate constant q/1; it is defined with 2 arguments");

	let typo = WellFormedChecker.check_formula(&predcon("equl", [var("x"), var("y")]), &here(), Some(&registry));
	assert_eq!(typo[0].message, "unknown predicate constant equl/2; did you mean \"equal\"?");

	let function = predcon("q", [funcon("succ", [var("x")]), funcon("zero", [])]);
	assert_eq!(check(&function, Some(&registry)), vec![codes::UNKNOWN_FUNCTION_CONSTANT]);
}

#[test]
fn class_term_needs_the_class_operator() {
	let f = predcon("in", [var("y"), class("x", predvar("phi", [var("x")]))]);

	let mut without = ExistenceRegistry::new(ModuleId::from("m"));
	without.add_predicate(PredicateKey::new("in", 2), definition()).expect("fresh");
	assert_eq!(check(&f, Some(&without)), vec![codes::UNDEFINED_CLASS_OPERATOR]);

	let mut with = without.clone();
	with.set_class_operator(ModuleId::from("m")).expect("first");
	assert_eq!(check(&f, Some(&with)), Vec::<u32>::new());
}

#[test]
fn class_abstraction_as_a_term() {
	let term = class("x", predvar("phi", [var("x")]));
	let without = ExistenceRegistry::new(ModuleId::from("m"));
	let errors = WellFormedChecker.check_term(&term, &here(), Some(&without));
	assert_eq!(codes_of(&errors), vec![codes::UNDEFINED_CLASS_OPERATOR]);

	let registry = full_registry();
	assert!(WellFormedChecker.check_term(&term, &here(), Some(&registry)).is_empty());
	assert!(WellFormedChecker.check_term(&class_list([var("a"), var("b")]), &here(), Some(&registry)).is_empty());
}

#[test]
fn unique_existence_needs_identity() {
	let f = exists_unique("x", predvar("A", [var("x")]));
	assert_eq!(
		check(&f, Some(&ExistenceRegistry::new(ModuleId::from("m")))),
		vec![codes::IDENTITY_OPERATOR_NOT_DEFINED]
	);
	assert_eq!(check(&f, Some(&full_registry())), Vec::<u32>::new());
}

/// Shape of a random closed formula; variables are assigned on conversion.
#[derive(Debug, Clone)]
enum Shape {
	PredVar(Vec<u8>),
	Member(u8, u8),
	Not(Box<Shape>),
	And(Vec<Shape>),
	Impl(Box<Shape>, Box<Shape>),
	ForAll(Box<Shape>),
	ExistsUnique(Box<Shape>),
}

fn shape() -> impl Strategy<Value = Shape> {
	let leaf = prop_oneof![
		prop::collection::vec(any::<u8>(), 0..3).prop_map(Shape::PredVar),
		(any::<u8>(), any::<u8>()).prop_map(|(a, b)| Shape::Member(a, b)),
	];
	leaf.prop_recursive(4, 24, 3, |inner| {
		prop_oneof![
			inner.clone().prop_map(|s| Shape::Not(Box::new(s))),
			prop::collection::vec(inner.clone(), 2..4).prop_map(Shape::And),
			(inner.clone(), inner.clone()).prop_map(|(a, b)| Shape::Impl(Box::new(a), Box::new(b))),
			inner.clone().prop_map(|s| Shape::ForAll(Box::new(s))),
			inner.prop_map(|s| Shape::ExistsUnique(Box::new(s))),
		]
	})
}

fn pick(scope: &[String], index: u8) -> Element {
	match scope {
		[] => funcon("succ", [class_list([])]),
		_ => var(&scope[usize::from(index) % scope.len()]),
	}
}

fn build(shape: &Shape, scope: &mut Vec<String>, fresh: &mut usize) -> Element {
	let bind = |body: &Shape, scope: &mut Vec<String>, fresh: &mut usize| {
		*fresh += 1;
		let name = format!("v{fresh}");
		scope.push(name.clone());
		let inner = build(body, scope, fresh);
		scope.pop();
		(name, inner)
	};
	match shape {
		Shape::PredVar(args) => {
			let scope = scope.as_slice();
			predvar("P", args.iter().map(|i| pick(scope, *i)))
		}
		Shape::Member(a, b) => predcon("in", [pick(scope, *a), pick(scope, *b)]),
		Shape::Not(inner) => not(build(inner, scope, fresh)),
		Shape::And(items) => and(items.iter().map(|s| build(s, scope, fresh)).collect::<Vec<_>>()),
		Shape::Impl(a, b) => {
			let a = build(a, scope, fresh);
			implies(a, build(b, scope, fresh))
		}
		Shape::ForAll(body) => {
			let (name, inner) = bind(body, scope, fresh);
			forall(&name, inner)
		}
		Shape::ExistsUnique(body) => {
			let (name, inner) = bind(body, scope, fresh);
			exists_unique(&name, inner)
		}
	}
}

proptest! {
	#[test]
	fn closed_well_formed_formulas_have_no_errors(shape in shape()) {
		let formula = build(&shape, &mut Vec::new(), &mut 0);
		prop_assert!(crate::vars::free_variables(&formula).is_empty());
		let registry = full_registry();
		let errors = WellFormedChecker.check_formula(&formula, &here(), Some(&registry));
		prop_assert!(errors.is_empty(), "{formula}: {errors:?}");
	}
}
