use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::domain::{Bucket, IncrementKind};
use crate::error::{ReleaseError, Result};
use crate::notes::templates;
use crate::warning::ReleaseWarning;

const CONFIG_FILE_NAME: &str = "release-engine.toml";

/// Presentation tables and publishing identity loaded from `release-engine.toml`.
///
/// Every table has a built-in default, so an absent file behaves like an
/// empty one.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_icon")]
    pub default_icon: String,

    #[serde(default = "default_dependency_icons")]
    pub dependency_icons: BTreeMap<String, String>,

    #[serde(default)]
    pub sections: BTreeMap<String, String>,

    #[serde(default)]
    pub notes: NotesConfig,

    #[serde(default)]
    pub identity: IdentityConfig,
}

fn default_icon() -> String {
    "📦".to_string()
}

/// Returns the default dependency → icon table.
fn default_dependency_icons() -> BTreeMap<String, String> {
    [
        ("ossf/scorecard-action", "🔒"),
        ("github/codeql-action", "🛡️"),
        ("actions/upload-artifact", "📤"),
        ("actions/checkout", "📥"),
        ("slackapi/slack-github-action", "🔗"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_section_heading(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Breaking => "💥 Breaking Changes",
        Bucket::Feature => "✨ New Features",
        Bucket::Fix => "🐛 Bug Fixes",
        Bucket::Performance => "⚡ Performance Improvements",
        Bucket::Docs => "📚 Documentation",
        Bucket::Maintenance => "🔧 Maintenance",
    }
}

impl Config {
    /// Icon for a dependency, falling back to `default_icon`.
    pub fn icon_for(&self, package: &str) -> &str {
        self.dependency_icons
            .get(package)
            .map(String::as_str)
            .unwrap_or(self.default_icon.as_str())
    }

    /// Heading for a notes section, `[sections]` entries override the defaults.
    pub fn section_heading(&self, bucket: Bucket) -> &str {
        self.sections
            .get(bucket.key())
            .map(String::as_str)
            .unwrap_or_else(|| default_section_heading(bucket))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_icon: default_icon(),
            dependency_icons: default_dependency_icons(),
            sections: BTreeMap::new(),
            notes: NotesConfig::default(),
            identity: IdentityConfig::default(),
        }
    }
}

fn default_upstream_line_limit() -> usize {
    50
}

fn default_preview_lines() -> usize {
    20
}

/// Release notes rendering options
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NotesConfig {
    #[serde(default = "default_upstream_line_limit")]
    pub upstream_line_limit: usize,

    #[serde(default = "default_preview_lines")]
    pub preview_lines: usize,

    /// `owner/repo` shown in the usage snippet; `GITHUB_REPOSITORY` when unset.
    #[serde(default)]
    pub action_reference: Option<String>,

    #[serde(default)]
    pub detect_breaking_footer: bool,

    /// Tera template for dependency update notes
    #[serde(default = "default_dependency_template")]
    pub dependency_template: String,

    /// Tera template for manual notes built from commits
    #[serde(default = "default_manual_template")]
    pub manual_template: String,

    /// Tera template wrapped around `CUSTOM_NOTES`
    #[serde(default = "default_custom_template")]
    pub custom_template: String,
}

fn default_dependency_template() -> String {
    templates::DEPENDENCY.to_string()
}

fn default_manual_template() -> String {
    templates::MANUAL.to_string()
}

fn default_custom_template() -> String {
    templates::CUSTOM.to_string()
}

impl Default for NotesConfig {
    fn default() -> Self {
        NotesConfig {
            upstream_line_limit: default_upstream_line_limit(),
            preview_lines: default_preview_lines(),
            action_reference: None,
            detect_breaking_footer: false,
            dependency_template: default_dependency_template(),
            manual_template: default_manual_template(),
            custom_template: default_custom_template(),
        }
    }
}

fn default_identity_name() -> String {
    "github-actions[bot]".to_string()
}

fn default_identity_email() -> String {
    "github-actions[bot]@users.noreply.github.com".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Git identity and remote used when tagging
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct IdentityConfig {
    #[serde(default = "default_identity_name")]
    pub name: String,

    #[serde(default = "default_identity_email")]
    pub email: String,

    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        IdentityConfig {
            name: default_identity_name(),
            email: default_identity_email(),
            remote: default_remote(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-engine.toml` in current directory
/// 3. `.release-engine.toml` in user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}

/// Which situation triggered the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseContext {
    /// Automated dependency update PR
    Dependabot { pr_title: String },
    /// Manual release from commit history
    Manual { custom_notes: Option<String> },
}

impl ReleaseContext {
    pub fn name(&self) -> &'static str {
        match self {
            ReleaseContext::Dependabot { .. } => "dependabot",
            ReleaseContext::Manual { .. } => "manual",
        }
    }
}

/// Unvalidated run inputs, one field per environment key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInputs {
    pub trigger_type: Option<String>,
    pub version_type: Option<String>,
    pub dry_run: Option<String>,
    pub custom_notes: Option<String>,
    pub pr_title: Option<String>,
    pub token: Option<String>,
    pub repository: Option<String>,
}

impl RawInputs {
    /// Read inputs from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        RawInputs {
            trigger_type: lookup("TRIGGER_TYPE"),
            version_type: lookup("VERSION_TYPE"),
            dry_run: lookup("DRY_RUN"),
            custom_notes: lookup("CUSTOM_NOTES"),
            pr_title: lookup("PR_TITLE"),
            token: lookup("GITHUB_TOKEN").or_else(|| lookup("GH_TOKEN")),
            repository: lookup("GITHUB_REPOSITORY"),
        }
    }
}

/// Typed run settings, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub context: ReleaseContext,
    pub requested_kind: IncrementKind,
    pub dry_run: bool,
    pub token: Option<String>,
    pub repository: Option<String>,
}

impl RunSettings {
    /// Validate raw inputs.
    ///
    /// Missing required inputs are configuration errors; recoverable oddities
    /// come back as warnings next to the settings.
    pub fn resolve(raw: RawInputs) -> Result<(RunSettings, Vec<ReleaseWarning>)> {
        let mut warnings = Vec::new();

        let dry_run = match non_blank(raw.dry_run) {
            None => false,
            Some(value) => parse_bool(&value).ok_or_else(|| {
                ReleaseError::config(format!(
                    "Invalid DRY_RUN '{}', expected true/false, 1/0 or yes/no",
                    value
                ))
            })?,
        };

        let requested_kind = match non_blank(raw.version_type) {
            None => IncrementKind::Patch,
            Some(value) => match IncrementKind::parse(&value) {
                Some(kind) => kind,
                None => {
                    warnings.push(ReleaseWarning::InvalidVersionType { value });
                    IncrementKind::Patch
                }
            },
        };

        let context = match non_blank(raw.trigger_type).as_deref() {
            Some("pull_request") => {
                let pr_title = non_blank(raw.pr_title).ok_or_else(|| {
                    ReleaseError::config("PR_TITLE is required for pull_request triggers")
                })?;
                ReleaseContext::Dependabot { pr_title }
            }
            Some("workflow_dispatch") => ReleaseContext::Manual {
                custom_notes: non_blank(raw.custom_notes),
            },
            Some(other) => {
                return Err(ReleaseError::config(format!(
                    "Unsupported TRIGGER_TYPE '{}', expected pull_request or workflow_dispatch",
                    other
                )))
            }
            None => return Err(ReleaseError::config("TRIGGER_TYPE is required")),
        };

        let token = non_blank(raw.token);
        if !dry_run && token.is_none() {
            return Err(ReleaseError::config(
                "GITHUB_TOKEN or GH_TOKEN is required unless DRY_RUN is set",
            ));
        }

        let settings = RunSettings {
            context,
            requested_kind,
            dry_run,
            token,
            repository: non_blank(raw.repository),
        };

        Ok((settings, warnings))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(trigger: &str) -> RawInputs {
        RawInputs {
            trigger_type: Some(trigger.to_string()),
            token: Some("ghp_test".to_string()),
            ..RawInputs::default()
        }
    }

    #[test]
    fn test_icon_lookup_with_default() {
        let config = Config::default();
        assert_eq!(config.icon_for("ossf/scorecard-action"), "🔒");
        assert_eq!(config.icon_for("someone/unknown-action"), "📦");
    }

    #[test]
    fn test_section_heading_override() {
        let mut config = Config::default();
        config
            .sections
            .insert("fix".to_string(), "Fixes".to_string());
        assert_eq!(config.section_heading(Bucket::Fix), "Fixes");
        assert_eq!(
            config.section_heading(Bucket::Breaking),
            "💥 Breaking Changes"
        );
    }

    #[test]
    fn test_resolve_dependabot() {
        let mut inputs = raw("pull_request");
        inputs.pr_title = Some("Bump a/b from 1.0.0 to 1.0.1".to_string());
        let (settings, warnings) = RunSettings::resolve(inputs).unwrap();
        assert_eq!(
            settings.context,
            ReleaseContext::Dependabot {
                pr_title: "Bump a/b from 1.0.0 to 1.0.1".to_string()
            }
        );
        assert_eq!(settings.requested_kind, IncrementKind::Patch);
        assert!(!settings.dry_run);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_resolve_dependabot_without_title_is_fatal() {
        let err = RunSettings::resolve(raw("pull_request")).unwrap_err();
        assert!(matches!(err, ReleaseError::Config(_)));
        assert!(err.to_string().contains("PR_TITLE"));
    }

    #[test]
    fn test_resolve_manual_with_custom_notes() {
        let mut inputs = raw("workflow_dispatch");
        inputs.version_type = Some("minor".to_string());
        inputs.custom_notes = Some("Hand written".to_string());
        let (settings, _) = RunSettings::resolve(inputs).unwrap();
        assert_eq!(
            settings.context,
            ReleaseContext::Manual {
                custom_notes: Some("Hand written".to_string())
            }
        );
        assert_eq!(settings.requested_kind, IncrementKind::Minor);
    }

    #[test]
    fn test_blank_custom_notes_are_absent() {
        let mut inputs = raw("workflow_dispatch");
        inputs.custom_notes = Some("   ".to_string());
        let (settings, _) = RunSettings::resolve(inputs).unwrap();
        assert_eq!(settings.context, ReleaseContext::Manual { custom_notes: None });
    }

    #[test]
    fn test_invalid_version_type_falls_back_with_warning() {
        let mut inputs = raw("workflow_dispatch");
        inputs.version_type = Some("huge".to_string());
        let (settings, warnings) = RunSettings::resolve(inputs).unwrap();
        assert_eq!(settings.requested_kind, IncrementKind::Patch);
        assert_eq!(
            warnings,
            vec![ReleaseWarning::InvalidVersionType {
                value: "huge".to_string()
            }]
        );
    }

    #[test]
    fn test_unknown_or_missing_trigger_is_fatal() {
        assert!(RunSettings::resolve(raw("push")).is_err());
        assert!(RunSettings::resolve(RawInputs::default()).is_err());
    }

    #[test]
    fn test_token_required_only_in_live_mode() {
        let mut inputs = raw("workflow_dispatch");
        inputs.token = None;
        assert!(RunSettings::resolve(inputs.clone()).is_err());

        inputs.dry_run = Some("TRUE".to_string());
        let (settings, _) = RunSettings::resolve(inputs).unwrap();
        assert!(settings.dry_run);
    }

    #[test]
    fn test_dry_run_values() {
        assert_eq!(parse_bool("yes"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);

        let mut inputs = raw("workflow_dispatch");
        inputs.dry_run = Some("ture".to_string());
        let err = RunSettings::resolve(inputs).unwrap_err();
        assert!(matches!(err, ReleaseError::Config(_)));
        assert!(err.to_string().contains("DRY_RUN 'ture'"));
    }

    #[test]
    fn test_default_templates_are_built_in() {
        let config = Config::default();
        assert_eq!(config.notes.manual_template, templates::MANUAL);
        assert_eq!(config.notes.dependency_template, templates::DEPENDENCY);
        assert_eq!(config.notes.custom_template, templates::CUSTOM);
    }

    #[test]
    fn test_from_lookup_prefers_github_token() {
        let inputs = RawInputs::from_lookup(|key| match key {
            "GITHUB_TOKEN" => Some("primary".to_string()),
            "GH_TOKEN" => Some("secondary".to_string()),
            _ => None,
        });
        assert_eq!(inputs.token.as_deref(), Some("primary"));

        let inputs = RawInputs::from_lookup(|key| match key {
            "GH_TOKEN" => Some("secondary".to_string()),
            _ => None,
        });
        assert_eq!(inputs.token.as_deref(), Some("secondary"));
    }
}
