use std::sync::Arc;

use hilbert_primitives::element::build::*;
use hilbert_primitives::{ModulePath, Version, codes};
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

fn loc(module: &str, node: &str) -> ModuleLocation {
	ModuleLocation::new(ModuleId::from(module), ModulePath::root().label("node", node))
}

fn definition(module: &str, node: &str) -> Definition {
	Definition {
		parameters: vec![var("x"), var("y")],
		definiens: None,
		location: loc(module, node),
	}
}

fn rule(name: &str, version: &str) -> RuleKey {
	RuleKey::new(name, version.parse::<Version>().expect("valid version"))
}

fn import(label: &str, registry: ExistenceRegistry, index: usize) -> ImportedRegistry {
	ImportedRegistry {
		label: Arc::from(label),
		registry: Arc::new(registry),
		location: ModuleLocation::new(ModuleId::from("main"), ModulePath::root().field("imports").index("import", index)),
	}
}

fn base_with_identity(module: &str) -> ExistenceRegistry {
	let mut registry = ExistenceRegistry::new(ModuleId::from(module));
	registry.add_predicate(PredicateKey::new("equal", 2), definition(module, "defEqual")).expect("fresh key");
	registry.set_identity_operator("equal", ModuleId::from(module)).expect("first identity");
	registry
}

#[test]
fn qualified_lookup_goes_through_import_label() {
	let (main, diagnostics) = ExistenceRegistry::seed(ModuleId::from("main"), vec![import("base", base_with_identity("base"), 0)]);
	assert!(diagnostics.is_empty());

	assert!(main.predicate_exists(&PredicateKey::new("base.equal", 2)));
	assert!(!main.predicate_exists(&PredicateKey::new("equal", 2)), "unqualified names stay local");
	assert!(!main.predicate_exists(&PredicateKey::new("base.equal", 3)));
	assert!(!main.predicate_exists(&PredicateKey::new("nope.equal", 2)));
	assert_eq!(main.identity_operator(), Some("base.equal"));
	assert_eq!(main.predicate_arities("base.equal"), vec![2]);
}

#[test]
fn qualified_lookup_recurses_one_label_per_level() {
	let (middle, _) = ExistenceRegistry::seed(ModuleId::from("middle"), vec![import("b", base_with_identity("base"), 0)]);
	let (top, _) = ExistenceRegistry::seed(ModuleId::from("top"), vec![import("m", middle, 0)]);

	assert!(top.predicate_exists(&PredicateKey::new("m.b.equal", 2)));
	assert_eq!(top.identity_operator(), Some("m.b.equal"));
	assert!(top.predicate_exists(&PredicateKey::new(top.identity_operator().unwrap_or_default(), 2)));
}

#[test]
fn duplicate_local_predicate_is_rejected() {
	let mut registry = ExistenceRegistry::new(ModuleId::from("m"));
	registry.add_predicate(PredicateKey::new("p", 2), definition("m", "first")).expect("fresh key");
	let err = registry.add_predicate(PredicateKey::new("p", 2), definition("m", "second")).unwrap_err();

	assert_eq!(err.code(), codes::PREDICATE_ALREADY_DEFINED);
	assert_eq!(err.existing(), Some(&loc("m", "first")));
	registry.add_predicate(PredicateKey::new("p", 1), definition("m", "third")).expect("other arity is a new key");
	assert_eq!(registry.predicate_arities("p"), vec![1, 2]);
}

#[test]
fn qualified_definition_names_are_rejected() {
	let mut registry = ExistenceRegistry::new(ModuleId::from("m"));
	let err = registry.add_function(FunctionKey::new("a.f", 1), definition("m", "f")).unwrap_err();
	assert_eq!(err.code(), codes::QUALIFIED_DEFINITION_NAME);
}

#[test]
fn shadowing_reports_the_import() {
	let (main, _) = ExistenceRegistry::seed(ModuleId::from("main"), vec![import("base", base_with_identity("base"), 0)]);
	let shadowed = main.predicate_shadows(&PredicateKey::new("equal", 2)).map(|import| &*import.label);
	assert_eq!(shadowed, Some("base"));
	assert!(main.predicate_shadows(&PredicateKey::new("equal", 3)).is_none());
}

#[test]
fn identity_owner_is_idempotent_but_exclusive() {
	let mut registry = ExistenceRegistry::new(ModuleId::from("m"));
	registry.set_identity_operator("equal", ModuleId::from("m")).expect("first");
	registry.set_identity_operator("equal", ModuleId::from("m")).expect("same owner");
	let err = registry.set_identity_operator("eq", ModuleId::from("other")).unwrap_err();
	assert_eq!(err.code(), codes::IDENTITY_OPERATOR_ALREADY_EXISTS);
}

#[test]
fn conflicting_identity_from_second_import_is_reported_there() {
	let (main, diagnostics) = ExistenceRegistry::seed(
		ModuleId::from("main"),
		vec![import("a", base_with_identity("a"), 0), import("b", base_with_identity("b"), 1)],
	);

	assert_eq!(diagnostics.len(), 1);
	assert_eq!(diagnostics[0].code, codes::IDENTITY_OPERATOR_ALREADY_EXISTS);
	assert_eq!(diagnostics[0].location.path.to_string(), "imports/import[1]");
	assert_eq!(main.identity_operator(), Some("a.equal"));
}

#[test]
fn same_identity_owner_through_two_imports_is_accepted() {
	let (left, _) = ExistenceRegistry::seed(ModuleId::from("left"), vec![import("base", base_with_identity("base"), 0)]);
	let (right, _) = ExistenceRegistry::seed(ModuleId::from("right"), vec![import("base", base_with_identity("base"), 0)]);
	let (main, diagnostics) = ExistenceRegistry::seed(ModuleId::from("main"), vec![import("l", left, 0), import("r", right, 1)]);

	assert!(diagnostics.is_empty());
	assert_eq!(main.identity_owner(), Some(&ModuleId::from("base")));
}

#[test]
fn class_operator_conflict() {
	let mut a = ExistenceRegistry::new(ModuleId::from("a"));
	a.set_class_operator(ModuleId::from("a")).expect("first");
	let mut b = ExistenceRegistry::new(ModuleId::from("b"));
	b.set_class_operator(ModuleId::from("b")).expect("first");

	let (main, diagnostics) = ExistenceRegistry::seed(ModuleId::from("main"), vec![import("a", a, 0), import("b", b, 1)]);
	assert!(main.class_operator_defined());
	assert_eq!(diagnostics.iter().map(|d| d.code).collect::<Vec<_>>(), vec![codes::CLASS_OPERATOR_ALREADY_EXISTS]);
}

#[rstest]
#[case::higher("1.01.00", true)]
#[case::much_higher("2.00.00", true)]
#[case::equal("1.00.00", false)]
#[case::lower("0.09.00", false)]
fn changed_rule_needs_a_higher_version(#[case] version: &str, #[case] accepted: bool) {
	let mut registry = ExistenceRegistry::new(ModuleId::from("m"));
	registry.declare_rule(rule("MP", "1.00.00"), &[], loc("m", "r1")).expect("first declaration");

	let result = registry.declare_rule(rule("MP", version), &[rule("MP", "1.00.00")], loc("m", "r2"));
	if accepted {
		result.expect("strictly higher version");
		assert!(registry.rule_exists(&rule("MP", version)));
	} else {
		let err = result.unwrap_err();
		assert!(matches!(
			err,
			RegistryError::RuleAlreadyDefined { .. } | RegistryError::VersionNotIncreased { .. }
		));
	}
}

#[test]
fn redeclaring_a_reachable_rule_requires_a_change() {
	let mut base = ExistenceRegistry::new(ModuleId::from("base"));
	base.declare_rule(rule("MP", "1.00.00"), &[], loc("base", "r")).expect("fresh");
	let (mut main, _) = ExistenceRegistry::seed(ModuleId::from("main"), vec![import("base", base, 0)]);

	let err = main.declare_rule(rule("MP", "2.00.00"), &[], loc("main", "r")).unwrap_err();
	assert_eq!(err.code(), codes::RULE_ALREADY_DEFINED);
	assert_eq!(err.existing(), Some(&loc("base", "r")));

	let err = main.declare_rule(rule("MP", "2.00.00"), &[rule("MP", "1.05.00")], loc("main", "r")).unwrap_err();
	assert_eq!(err.code(), codes::CHANGED_RULE_NOT_FOUND);

	main.declare_rule(rule("MP", "2.00.00"), &[rule("MP", "1.00.00")], loc("main", "r")).expect("valid change");
	assert_eq!(main.rule_versions("MP"), vec![rule("MP", "1.00.00"), rule("MP", "2.00.00")]);
	assert!(main.rule_declared("MP"));
	assert!(!main.rule_declared("ADD"));
}

#[test]
fn rule_keys_report_owners() {
	let mut base = ExistenceRegistry::new(ModuleId::from("base"));
	base.declare_rule(rule("ADD", "1.00.00"), &[], loc("base", "add")).expect("fresh");
	let (mut main, _) = ExistenceRegistry::seed(ModuleId::from("main"), vec![import("base", base, 0)]);
	main.declare_rule(rule("MP", "1.00.00"), &[], loc("main", "mp")).expect("fresh");

	let owners: Vec<(String, String)> = main
		.rule_keys()
		.into_iter()
		.map(|(key, entry)| (key.to_string(), entry.owner().to_string()))
		.collect();
	assert_eq!(
		owners,
		vec![
			("ADD 1.00.00".to_string(), "base".to_string()),
			("MP 1.00.00".to_string(), "main".to_string())
		]
	);
	assert_eq!(main.local_rules().count(), 1);
	assert_eq!(main.rule_owner(&rule("ADD", "1.0.0")), Some(&ModuleId::from("base")));
	assert_eq!(main.rule_owner(&rule("ADD", "2.00.00")), None);
}

#[test]
fn suggestions_cover_local_and_qualified_names() {
	let (mut main, _) = ExistenceRegistry::seed(ModuleId::from("main"), vec![import("base", base_with_identity("base"), 0)]);
	main.add_function(FunctionKey::new("union", 2), definition("main", "defUnion")).expect("fresh");

	assert_eq!(main.suggest_function("unoin").as_deref(), Some("union"));
	assert_eq!(main.suggest_predicate("base.equl").as_deref(), Some("base.equal"));
	assert_eq!(main.suggest_predicate("completely_different"), None);
}
