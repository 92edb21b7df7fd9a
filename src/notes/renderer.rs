use std::fmt;

use serde::Serialize;
use tera::{Context, Tera};

use crate::config::Config;
use crate::domain::version::suggest_kind;
use crate::domain::{
    Bucket, ChangeSet, CommitType, DependencyUpdate, IncrementKind, VersionDecision,
};
use crate::error::Result;

const DEPENDENCY_TEMPLATE: &str = "dependency.md";
const MANUAL_TEMPLATE: &str = "manual.md";
const CUSTOM_TEMPLATE: &str = "custom.md";

/// Rendered release notes, immutable once produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNotes {
    text: String,
}

impl ReleaseNotes {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// First `max_lines` lines and the number of lines left out.
    pub fn preview(&self, max_lines: usize) -> (String, usize) {
        let total = self.text.lines().count();
        let shown: Vec<&str> = self.text.lines().take(max_lines).collect();
        (shown.join("\n"), total.saturating_sub(max_lines))
    }
}

impl fmt::Display for ReleaseNotes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// What the notes describe
#[derive(Debug, Clone, Copy)]
pub enum NotesInput<'a> {
    /// Automated dependency update
    Dependency(&'a DependencyUpdate),
    /// Manual release; user-supplied text replaces the generated sections
    Changes {
        changes: &'a ChangeSet,
        custom_notes: Option<&'a str>,
    },
}

#[derive(Serialize)]
struct UsageContext<'a> {
    version: String,
    major_tag: String,
    action_reference: &'a str,
}

#[derive(Serialize)]
struct DependencyContext<'a> {
    icon: &'a str,
    package: &'a str,
    old_version: &'a str,
    new_version: &'a str,
    has_package: bool,
    has_upstream_notes: bool,
    upstream_notes: String,
}

#[derive(Serialize)]
struct RecommendationContext {
    since: String,
    recommendation: bool,
    suggested_kind: &'static str,
    requested_kind: &'static str,
    breaking_hint: bool,
    breaking_count: usize,
}

#[derive(Serialize)]
struct EntryContext<'a> {
    scope: Option<&'a str>,
    description: &'a str,
}

#[derive(Serialize)]
struct SectionContext<'a> {
    heading: &'a str,
    entries: Vec<EntryContext<'a>>,
}

#[derive(Serialize)]
struct StatisticContext {
    label: &'static str,
    count: usize,
}

#[derive(Serialize)]
struct ChangesContext<'a> {
    no_changes: bool,
    sections: Vec<SectionContext<'a>>,
    statistics: Vec<StatisticContext>,
    commit_count: usize,
}

#[derive(Serialize)]
struct CustomContext<'a> {
    custom_notes: &'a str,
}

/// Turns a version decision plus its change description into markdown.
///
/// Templates are compiled once per renderer. Rendering is deterministic: the
/// same inputs always give byte-identical notes, ending in one newline.
pub struct NotesRenderer<'a> {
    config: &'a Config,
    action_reference: String,
    tera: Tera,
}

impl<'a> NotesRenderer<'a> {
    /// `action_reference` is the `owner/repo` consumers put in `uses:`.
    ///
    /// Fails when a template from the configuration does not compile.
    pub fn new(config: &'a Config, action_reference: impl Into<String>) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (DEPENDENCY_TEMPLATE, config.notes.dependency_template.as_str()),
            (MANUAL_TEMPLATE, config.notes.manual_template.as_str()),
            (CUSTOM_TEMPLATE, config.notes.custom_template.as_str()),
        ])?;

        Ok(NotesRenderer {
            config,
            action_reference: action_reference.into(),
            tera,
        })
    }

    pub fn render(&self, decision: &VersionDecision, input: NotesInput<'_>) -> Result<ReleaseNotes> {
        let mut context = Context::from_serialize(UsageContext {
            version: decision.next.to_string(),
            major_tag: decision.next.major_tag(),
            action_reference: &self.action_reference,
        })?;

        let template = match input {
            NotesInput::Dependency(update) => {
                context.extend(Context::from_serialize(self.dependency_context(update))?);
                DEPENDENCY_TEMPLATE
            }
            NotesInput::Changes {
                changes,
                custom_notes,
            } => {
                context.extend(Context::from_serialize(recommendation(decision, changes))?);
                match custom_notes {
                    Some(custom) => {
                        context.extend(Context::from_serialize(CustomContext {
                            custom_notes: custom.trim_end(),
                        })?);
                        CUSTOM_TEMPLATE
                    }
                    None => {
                        context.extend(Context::from_serialize(self.changes_context(changes))?);
                        MANUAL_TEMPLATE
                    }
                }
            }
        };

        let rendered = self.tera.render(template, &context)?;
        Ok(ReleaseNotes {
            text: format!("{}\n", rendered.trim_end()),
        })
    }

    fn dependency_context<'u>(&'u self, update: &'u DependencyUpdate) -> DependencyContext<'u> {
        let upstream_notes = truncate_lines(
            &update.upstream_notes,
            self.config.notes.upstream_line_limit,
        );

        DependencyContext {
            icon: self.config.icon_for(&update.package),
            package: &update.package,
            old_version: &update.old_version,
            new_version: &update.new_version,
            has_package: update.has_package(),
            has_upstream_notes: !upstream_notes.trim().is_empty(),
            upstream_notes,
        }
    }

    fn changes_context<'c>(&'c self, changes: &'c ChangeSet) -> ChangesContext<'c> {
        let sections = Bucket::ORDER
            .iter()
            .filter_map(|&bucket| {
                let entries: Vec<EntryContext> = changes
                    .bucket(bucket)
                    .into_iter()
                    .map(|commit| EntryContext {
                        scope: commit.scope.as_deref(),
                        description: &commit.description,
                    })
                    .collect();
                if entries.is_empty() {
                    return None;
                }
                Some(SectionContext {
                    heading: self.config.section_heading(bucket),
                    entries,
                })
            })
            .collect();

        let statistics = CommitType::ALL
            .iter()
            .map(|&commit_type| StatisticContext {
                label: commit_type.label(),
                count: changes.count_of(commit_type),
            })
            .filter(|stat| stat.count > 0)
            .collect();

        ChangesContext {
            no_changes: changes.is_empty(),
            sections,
            statistics,
            commit_count: changes.len(),
        }
    }
}

/// Suggested versus requested increment, shared by both manual templates.
fn recommendation(decision: &VersionDecision, changes: &ChangeSet) -> RecommendationContext {
    let suggested = suggest_kind(changes);
    let mismatch = suggested != decision.increment;

    RecommendationContext {
        since: decision
            .previous
            .map(|tag| tag.to_string())
            .unwrap_or_else(|| "the start of history".to_string()),
        recommendation: mismatch,
        suggested_kind: suggested.as_str(),
        requested_kind: decision.increment.as_str(),
        breaking_hint: mismatch
            && changes.has_breaking()
            && decision.increment != IncrementKind::Major,
        breaking_count: changes.breaking_count(),
    }
}

fn truncate_lines(text: &str, max_lines: usize) -> String {
    text.trim_end()
        .lines()
        .take(max_lines)
        .collect::<Vec<_>>()
        .join("\n")
}
