use std::io::Write;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn empty_config_uses_defaults() {
	let config = CheckerConfig::from_toml_str("").expect("empty config parses");
	assert_eq!(config, CheckerConfig::default());
	assert_eq!(config.identity_operator, "equal");
	assert_eq!(config.class_rule, "CLASS_DEFINITION_BY_FORMULA");
	assert_eq!(config.definition_policy, DefinitionPolicy::SignatureSound);
	assert_eq!(config.link_severity, LinkSeverity::Warning);
	assert_eq!(config.lock_poll(), Duration::from_millis(25));
}

#[test]
fn overrides() {
	let config = CheckerConfig::from_toml_str(
		r#"
identity_operator = "eq"
definition_policy = "strict"
link_severity = "ignore"
lock_poll_ms = 0
"#,
	)
	.expect("valid config");

	let settings = config.definition_settings();
	assert_eq!(settings.identity_operator, "eq");
	assert_eq!(settings.policy, DefinitionPolicy::Strict);
	assert_eq!(settings.class_rule, "CLASS_DEFINITION_BY_FORMULA");
	assert_eq!(config.link_severity.severity(), None);
	assert_eq!(config.lock_poll(), Duration::from_millis(1));
}

#[test]
fn unknown_keys_are_rejected() {
	let err = CheckerConfig::from_toml_str("identity = \"eq\"").expect_err("unknown key");
	assert!(matches!(err, ConfigError::Toml(_)), "{err}");
}

#[test]
fn load_from_file() {
	let mut file = tempfile::NamedTempFile::new().expect("temp file");
	writeln!(file, "link_severity = \"error\"").expect("write config");

	let config = CheckerConfig::load(file.path()).expect("config loads");
	assert_eq!(config.link_severity, LinkSeverity::Error);
	assert_eq!(config.link_severity.severity(), Some(Severity::Error));
}

#[test]
fn missing_file_names_the_path() {
	let dir = tempfile::tempdir().expect("temp dir");
	let path = dir.path().join("absent.toml");

	let err = CheckerConfig::load(&path).expect_err("file is missing");
	match err {
		ConfigError::Io { path: reported, .. } => assert_eq!(reported, path),
		other => panic!("unexpected error {other}"),
	}
}
