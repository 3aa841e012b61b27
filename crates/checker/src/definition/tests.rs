use hilbert_primitives::element::build::*;
use hilbert_primitives::module::RuleChange;
use hilbert_primitives::{ModuleId, ModulePath};
use hilbert_registry::ImportedRegistry;
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::formula::WellFormedChecker;

fn at(id: &str) -> ModuleLocation {
	ModuleLocation::new(ModuleId::from("m"), ModulePath::root().label("node", id))
}

fn symbol(name: &str, parameters: Vec<Element>, definiens: Option<Element>) -> SymbolDefinition {
	SymbolDefinition {
		name: name.to_string(),
		arity: parameters.len(),
		parameters,
		definiens,
	}
}

fn rule(name: &str, version: &str, changes: &[(&str, &str)]) -> RuleDeclaration {
	RuleDeclaration {
		name: name.to_string(),
		version: version.to_string(),
		changes: changes
			.iter()
			.map(|(name, version)| RuleChange {
				name: name.to_string(),
				version: version.to_string(),
			})
			.collect(),
	}
}

fn codes_of(diagnostics: &[Diagnostic]) -> Vec<u32> {
	diagnostics.iter().map(|d| d.code).collect()
}

fn predicate(registry: &mut ExistenceRegistry, definition: &SymbolDefinition, settings: &DefinitionSettings) -> DefinitionOutcome {
	check_predicate_definition(definition, &at(&definition.name), registry, &WellFormedChecker, settings)
}

fn with_identity() -> ExistenceRegistry {
	let mut registry = ExistenceRegistry::new(ModuleId::from("m"));
	let outcome = predicate(&mut registry, &symbol("equal", vec![var("x"), var("y")], None), &DefinitionSettings::default());
	assert!(outcome.registered);
	registry
}

#[rstest]
#[case::signature_sound(DefinitionPolicy::SignatureSound, true)]
#[case::strict(DefinitionPolicy::Strict, false)]
fn free_variable_mismatch_registration_follows_policy(#[case] policy: DefinitionPolicy, #[case] registered: bool) {
	let mut registry = ExistenceRegistry::new(ModuleId::from("m"));
	let settings = DefinitionSettings {
		policy,
		..DefinitionSettings::default()
	};
	// p(x) :<-> phi(x, y)
	let definition = symbol("p", vec![var("x")], Some(predvar("phi", [var("x"), var("y")])));

	let outcome = predicate(&mut registry, &definition, &settings);

	assert_eq!(codes_of(&outcome.diagnostics), [codes::NUMBER_OF_FREE_SUBJECT_VARIABLES_NOT_EQUAL]);
	assert_eq!(outcome.registered, registered);
	assert_eq!(registry.predicate_exists(&PredicateKey::new("p", 1)), registered);
}

#[test]
fn parameter_not_free_in_definiens_is_reported_at_the_parameter() {
	let mut registry = ExistenceRegistry::new(ModuleId::from("m"));
	let definition = symbol("p", vec![var("x")], Some(predvar("phi", [var("y")])));

	let outcome = predicate(&mut registry, &definition, &DefinitionSettings::default());

	assert_eq!(codes_of(&outcome.diagnostics), [codes::FREE_SUBJECT_VARIABLE_MISMATCH]);
	assert_eq!(outcome.diagnostics[0].location.path.to_string(), "node(p)/parameters/param[0]");
	assert!(outcome.registered);
}

#[test]
fn well_formed_definition_is_registered() {
	let mut registry = ExistenceRegistry::new(ModuleId::from("m"));
	let definition = symbol("sym", vec![var("x"), var("y")], Some(and([predvar("R", [var("x"), var("y")]), predvar("R", [var("y"), var("x")])])));

	let outcome = predicate(&mut registry, &definition, &DefinitionSettings::default());

	assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
	let stored = registry.predicate(&PredicateKey::new("sym", 2)).expect("registered");
	assert_eq!(stored.location, at("sym"));
	assert_eq!(stored.parameters, vec![var("x"), var("y")]);
}

#[test]
fn parameter_problems() {
	let mut registry = ExistenceRegistry::new(ModuleId::from("m"));
	let bad = SymbolDefinition {
		name: "p".to_string(),
		arity: 3,
		parameters: vec![var("x"), var("x")],
		definiens: None,
	};
	let outcome = predicate(&mut registry, &bad, &DefinitionSettings::default());
	assert_eq!(
		codes_of(&outcome.diagnostics),
		[codes::ARGUMENT_COUNT_MISMATCH, codes::DUPLICATE_PARAMETER]
	);
	assert!(!outcome.registered);

	let atom_parameter = symbol("q", vec![Element::atom("x")], None);
	let outcome = predicate(&mut registry, &atom_parameter, &DefinitionSettings::default());
	assert_eq!(codes_of(&outcome.diagnostics), [codes::SUBJECT_VARIABLE_EXPECTED]);
	assert!(!outcome.registered);
}

#[test]
fn definiens_errors_skip_the_free_variable_comparison() {
	let mut registry = ExistenceRegistry::new(ModuleId::from("m"));
	let definition = symbol("p", vec![var("x")], Some(predcon("undefined", [var("y")])));

	let outcome = predicate(&mut registry, &definition, &DefinitionSettings::default());

	assert_eq!(codes_of(&outcome.diagnostics), [codes::UNKNOWN_PREDICATE_CONSTANT]);
	assert!(!outcome.registered);
}

#[test]
fn redefinition_references_the_first() {
	let mut registry = ExistenceRegistry::new(ModuleId::from("m"));
	let first = symbol("p", vec![var("x")], None);
	assert!(predicate(&mut registry, &first, &DefinitionSettings::default()).registered);

	let again = check_predicate_definition(&first, &at("again"), &mut registry, &WellFormedChecker, &DefinitionSettings::default());

	assert_eq!(codes_of(&again.diagnostics), [codes::PREDICATE_ALREADY_DEFINED]);
	assert_eq!(again.diagnostics[0].reference, Some(at("p")));
	assert!(!again.registered);
}

#[test]
fn qualified_names_are_rejected() {
	let mut registry = ExistenceRegistry::new(ModuleId::from("m"));
	let outcome = predicate(&mut registry, &symbol("l.p", vec![], None), &DefinitionSettings::default());
	assert_eq!(codes_of(&outcome.diagnostics), [codes::QUALIFIED_DEFINITION_NAME]);
	assert!(!outcome.registered);
}

#[test]
fn shadowing_an_import_is_a_warning() {
	let mut base = ExistenceRegistry::new(ModuleId::from("base"));
	base.add_predicate(
		PredicateKey::new("p", 0),
		Definition {
			parameters: Vec::new(),
			definiens: None,
			location: ModuleLocation::module_root(ModuleId::from("base")).label("node", "p"),
		},
	)
	.expect("fresh");
	let (mut registry, problems) = ExistenceRegistry::seed(
		ModuleId::from("m"),
		vec![ImportedRegistry {
			label: "l".into(),
			registry: base.into(),
			location: ModuleLocation::module_root(ModuleId::from("m")).index("import", 0),
		}],
	);
	assert!(problems.is_empty());

	let outcome = predicate(&mut registry, &symbol("p", vec![], None), &DefinitionSettings::default());

	assert_eq!(codes_of(&outcome.diagnostics), [codes::SYMBOL_SHADOWS_IMPORT]);
	assert_eq!(outcome.diagnostics[0].severity, Severity::Warning);
	assert!(outcome.registered);
}

#[test]
fn binary_identity_predicate_establishes_the_identity_operator() {
	let registry = with_identity();
	assert_eq!(registry.identity_operator(), Some("equal"));

	let mut other = ExistenceRegistry::new(ModuleId::from("m"));
	predicate(&mut other, &symbol("equal", vec![var("x")], None), &DefinitionSettings::default());
	assert_eq!(other.identity_operator(), None, "arity 1 is not the identity");
}

#[test]
fn function_definitions_need_identity() {
	let definition = symbol("succ", vec![var("x")], Some(funvar("f", [var("x")])));

	let mut bare = ExistenceRegistry::new(ModuleId::from("m"));
	let outcome = check_function_definition(&definition, &at("succ"), &mut bare, &WellFormedChecker, &DefinitionSettings::default());
	assert_eq!(codes_of(&outcome.diagnostics), [codes::IDENTITY_OPERATOR_NOT_DEFINED]);
	assert!(!outcome.registered);

	let mut registry = with_identity();
	let outcome = check_function_definition(&definition, &at("succ"), &mut registry, &WellFormedChecker, &DefinitionSettings::default());
	assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
	assert!(registry.function_exists(&FunctionKey::new("succ", 1)));
}

#[test]
fn function_definiens_must_be_a_term() {
	let mut registry = with_identity();
	let definition = symbol("f", vec![var("x")], Some(predvar("A", [var("x")])));
	let outcome = check_function_definition(&definition, &at("f"), &mut registry, &WellFormedChecker, &DefinitionSettings::default());
	assert_eq!(codes_of(&outcome.diagnostics), [codes::TERM_EXPECTED]);
}

#[test]
fn rule_declarations() {
	let mut registry = ExistenceRegistry::new(ModuleId::from("m"));
	let settings = DefinitionSettings::default();

	assert!(check_rule_declaration(&rule("MP", "1.00.00", &[]), &at("mp"), &mut registry, &settings).is_empty());
	assert!(registry.rule_declared("MP"));

	let bad = check_rule_declaration(&rule("MP", "one", &[]), &at("bad"), &mut registry, &settings);
	assert_eq!(codes_of(&bad), [codes::INVALID_RULE_VERSION]);

	let again = check_rule_declaration(&rule("MP", "1.0.0", &[]), &at("again"), &mut registry, &settings);
	assert_eq!(codes_of(&again), [codes::RULE_ALREADY_DEFINED]);
	assert_eq!(again[0].reference, Some(at("mp")));

	let missing = check_rule_declaration(&rule("MP", "2.00.00", &[("MP", "1.50.00")]), &at("mp2"), &mut registry, &settings);
	assert_eq!(codes_of(&missing), [codes::CHANGED_RULE_NOT_FOUND]);

	let older = check_rule_declaration(&rule("MP", "0.50.00", &[("MP", "1.00.00")]), &at("mp0"), &mut registry, &settings);
	assert_eq!(codes_of(&older), [codes::RULE_VERSION_NOT_INCREASED]);

	let upgrade = check_rule_declaration(&rule("MP", "1.01.00", &[("MP", "1.00.00")]), &at("mp1"), &mut registry, &settings);
	assert!(upgrade.is_empty(), "{upgrade:?}");
}

#[test]
fn class_rule_establishes_the_class_operator() {
	let mut registry = ExistenceRegistry::new(ModuleId::from("m"));
	let settings = DefinitionSettings::default();
	assert!(!registry.class_operator_defined());

	let out = check_rule_declaration(&rule("CLASS_DEFINITION_BY_FORMULA", "1.00.00", &[]), &at("cl"), &mut registry, &settings);

	assert!(out.is_empty(), "{out:?}");
	assert!(registry.class_operator_defined());
	assert_eq!(registry.class_operator_owner(), Some(&ModuleId::from("m")));
}

#[test]
fn policy_names_in_config() {
	#[derive(Deserialize)]
	struct Wrapper {
		policy: DefinitionPolicy,
	}
	let strict: Wrapper = parse_policy("strict");
	assert_eq!(strict.policy, DefinitionPolicy::Strict);
	let sound: Wrapper = parse_policy("signature-sound");
	assert_eq!(sound.policy, DefinitionPolicy::SignatureSound);

	fn parse_policy<T: serde::de::DeserializeOwned>(value: &str) -> T {
		serde_json::from_str(&format!("{{\"policy\": \"{value}\"}}")).expect("valid policy")
	}
}
