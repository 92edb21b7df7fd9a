use crate::warning::ReleaseWarning;
use regex::Regex;

const PACKAGE_PATTERN: &str = r"([a-zA-Z0-9_-]+/[a-zA-Z0-9_-]+)";
const VERSION_PATTERN: &str = r"v?(\d+\.\d+\.\d+)";

/// Placeholder used when the title names no `owner/repo` token.
pub const UNKNOWN_PACKAGE: &str = "unknown";

/// A single dependency bump announced by an automated update PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyUpdate {
    pub package: String,
    pub old_version: String,
    pub new_version: String,
    /// Release notes published upstream for `new_version`; empty when unavailable.
    pub upstream_notes: String,
}

impl DependencyUpdate {
    /// Extract the dependency and versions from a PR title such as
    /// `Bump ossf/scorecard-action from 2.4.0 to 2.4.2`.
    ///
    /// Never fails. Missing parts fall back to placeholders and are reported
    /// as warnings: no version gives `unknown` -> `latest`, a single version
    /// is used for both sides.
    pub fn from_pr_title(title: &str) -> (Self, Vec<ReleaseWarning>) {
        let mut warnings = Vec::new();

        let package = Regex::new(PACKAGE_PATTERN)
            .ok()
            .and_then(|re| re.captures(title))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        let package = match package {
            Some(package) => package,
            None => {
                warnings.push(ReleaseWarning::UnrecognizedPrTitle {
                    title: title.to_string(),
                    reason: "no owner/repo dependency name".to_string(),
                });
                UNKNOWN_PACKAGE.to_string()
            }
        };

        let versions: Vec<String> = Regex::new(VERSION_PATTERN)
            .map(|re| {
                re.captures_iter(title)
                    .filter_map(|c| c.get(1))
                    .map(|m| format!("v{}", m.as_str()))
                    .collect()
            })
            .unwrap_or_default();

        let (old_version, new_version) = match versions.as_slice() {
            [] => {
                warnings.push(ReleaseWarning::UnrecognizedPrTitle {
                    title: title.to_string(),
                    reason: "no major.minor.patch version".to_string(),
                });
                ("unknown".to_string(), "latest".to_string())
            }
            [only] => (only.clone(), only.clone()),
            [old, new, ..] => (old.clone(), new.clone()),
        };

        let update = DependencyUpdate {
            package,
            old_version,
            new_version,
            upstream_notes: String::new(),
        };

        (update, warnings)
    }

    /// Whether the title yielded a real dependency name.
    pub fn has_package(&self) -> bool {
        self.package != UNKNOWN_PACKAGE
    }

    pub fn with_upstream_notes(mut self, notes: impl Into<String>) -> Self {
        self.upstream_notes = notes.into();
        self
    }
}
