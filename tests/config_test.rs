// tests/config_test.rs
use release_engine::config::{load_config, Config, RawInputs, ReleaseContext, RunSettings};
use release_engine::domain::{Bucket, IncrementKind};
use release_engine::notes::templates;
use release_engine::ReleaseError;
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.default_icon, "📦");
    assert_eq!(config.icon_for("actions/checkout"), "📥");
    assert_eq!(config.notes.upstream_line_limit, 50);
    assert_eq!(config.notes.preview_lines, 20);
    assert_eq!(config.identity.remote, "origin");
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
default_icon = "🧩"

[dependency_icons]
"acme/deploy-action" = "🚢"

[sections]
feature = "Features"

[notes]
upstream_line_limit = 10
action_reference = "acme/release-action"
detect_breaking_footer = true

[identity]
name = "release-bot"
email = "release-bot@example.com"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.icon_for("acme/deploy-action"), "🚢");
    assert_eq!(config.icon_for("other/thing"), "🧩");
    assert_eq!(config.section_heading(Bucket::Feature), "Features");
    assert_eq!(config.section_heading(Bucket::Fix), "🐛 Bug Fixes");
    assert_eq!(config.notes.upstream_line_limit, 10);
    assert_eq!(config.notes.preview_lines, 20);
    assert_eq!(
        config.notes.action_reference.as_deref(),
        Some("acme/release-action")
    );
    assert!(config.notes.detect_breaking_footer);
    assert_eq!(config.identity.name, "release-bot");
    assert_eq!(config.identity.remote, "origin");
}

#[test]
fn test_load_invalid_toml_fails() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[notes\nbroken").unwrap();
    temp_file.flush().unwrap();

    let result = load_config(Some(temp_file.path().to_str().unwrap()));
    assert!(matches!(result, Err(ReleaseError::Toml(_))));
}

#[test]
fn test_load_missing_file_fails() {
    let result = load_config(Some("/nonexistent/release-engine.toml"));
    assert!(matches!(result, Err(ReleaseError::Io(_))));
}

#[test]
#[serial]
fn test_inputs_from_environment() {
    std::env::set_var("TRIGGER_TYPE", "workflow_dispatch");
    std::env::set_var("VERSION_TYPE", "major");
    std::env::set_var("DRY_RUN", "yes");
    std::env::remove_var("GITHUB_TOKEN");
    std::env::set_var("GH_TOKEN", "gh-token");

    let raw = RawInputs::from_env();
    assert_eq!(raw.token.as_deref(), Some("gh-token"));

    let (settings, warnings) = RunSettings::resolve(raw).unwrap();
    assert!(warnings.is_empty());
    assert!(settings.dry_run);
    assert_eq!(settings.requested_kind, IncrementKind::Major);
    assert_eq!(settings.context, ReleaseContext::Manual { custom_notes: None });

    for key in ["TRIGGER_TYPE", "VERSION_TYPE", "DRY_RUN", "GH_TOKEN"] {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_invalid_dry_run_from_environment_is_fatal() {
    std::env::set_var("TRIGGER_TYPE", "workflow_dispatch");
    std::env::set_var("DRY_RUN", "ture");
    std::env::set_var("GITHUB_TOKEN", "token");

    let result = RunSettings::resolve(RawInputs::from_env());
    assert!(matches!(result, Err(ReleaseError::Config(_))));

    for key in ["TRIGGER_TYPE", "DRY_RUN", "GITHUB_TOKEN"] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_notes_templates_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[notes]
custom_template = """
{{ custom_notes }}

Pin with `{{ action_reference }}@{{ major_tag }}`.
"""
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert!(config.notes.custom_template.contains("Pin with"));
    assert_eq!(config.notes.manual_template, templates::MANUAL);
}
