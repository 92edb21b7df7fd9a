//! Release workflow orchestration
//!
//! Runs one release end to end over the collaborator traits, kept apart from
//! `main` so the whole flow can be driven against in-memory collaborators.
//!
//! The work is split in two phases. [`ReleaseEngine::prepare`] only reads
//! (tag discovery, commit log, one upstream notes lookup) and yields the
//! version decision and rendered notes. [`ReleaseEngine::publish`] performs
//! the side effects. Callers report the prepared outputs in between so they
//! survive a publish failure.

use crate::analyzer::ChangeSetBuilder;
use crate::config::{Config, ReleaseContext, RunSettings};
use crate::domain::version::{decide, latest_version_tag, suggest_kind};
use crate::domain::{CommitClassifier, DependencyUpdate, VersionDecision};
use crate::error::Result;
use crate::git::Repository;
use crate::notes::{NotesFetcher, NotesInput, NotesRenderer, ReleaseNotes};
use crate::publish::{PublishedVersion, ReleaseBackend, ReleasePublisher};
use crate::warning::ReleaseWarning;

const PLACEHOLDER_ACTION_REFERENCE: &str = "OWNER/REPO";

/// Everything decided before any external state is touched
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRelease {
    pub decision: VersionDecision,
    pub notes: ReleaseNotes,
    pub tag_message: String,
    /// Commits since the last release (manual releases only)
    pub commit_count: Option<usize>,
    pub warnings: Vec<ReleaseWarning>,
}

impl PreparedRelease {
    /// `key=value` lines for workflow outputs.
    pub fn output_lines(&self) -> Vec<String> {
        vec![
            format!("version={}", self.decision.next),
            format!(
                "previous_version={}",
                self.decision
                    .previous
                    .map(|tag| tag.to_string())
                    .unwrap_or_else(|| "none".to_string())
            ),
            format!("increment={}", self.decision.increment),
        ]
    }
}

/// The release engine for one run
pub struct ReleaseEngine<'a, R, F, B>
where
    R: Repository,
    F: NotesFetcher,
    B: ReleaseBackend,
{
    settings: &'a RunSettings,
    config: &'a Config,
    repo: &'a R,
    fetcher: &'a F,
    backend: &'a B,
}

impl<'a, R, F, B> ReleaseEngine<'a, R, F, B>
where
    R: Repository,
    F: NotesFetcher,
    B: ReleaseBackend,
{
    pub fn new(
        settings: &'a RunSettings,
        config: &'a Config,
        repo: &'a R,
        fetcher: &'a F,
        backend: &'a B,
    ) -> Self {
        ReleaseEngine {
            settings,
            config,
            repo,
            fetcher,
            backend,
        }
    }

    /// Decide the version and render the notes.
    pub fn prepare(&self) -> Result<PreparedRelease> {
        let tags = self.repo.list_tags()?;
        let last = latest_version_tag(&tags);
        let decision = decide(last, self.settings.requested_kind)?;
        log::info!(
            "{} release: {} -> {} ({})",
            self.settings.context.name(),
            last.map(|t| t.to_string())
                .unwrap_or_else(|| "none".to_string()),
            decision.next,
            decision.increment
        );

        let renderer = NotesRenderer::new(self.config, self.action_reference())?;
        let mut warnings = Vec::new();

        let prepared = match &self.settings.context {
            ReleaseContext::Dependabot { pr_title } => {
                let (update, title_warnings) = DependencyUpdate::from_pr_title(pr_title);
                warnings.extend(title_warnings);

                let upstream = self.upstream_notes(&update, &mut warnings);
                let update = update.with_upstream_notes(upstream);
                let notes = renderer.render(&decision, NotesInput::Dependency(&update))?;

                PreparedRelease {
                    decision,
                    notes,
                    tag_message: format!("chore: update {} dependency", update.package),
                    commit_count: None,
                    warnings,
                }
            }
            ReleaseContext::Manual { custom_notes } => {
                let builder = ChangeSetBuilder::new(CommitClassifier::new(
                    self.config.notes.detect_breaking_footer,
                ));
                let changes = builder.build_since(self.repo, last)?;

                if let (true, Some(latest)) = (changes.is_empty(), last) {
                    warnings.push(ReleaseWarning::NoNewCommits { latest });
                }

                let suggested = suggest_kind(&changes);
                if suggested != decision.increment {
                    warnings.push(ReleaseWarning::IncrementMismatch {
                        suggested,
                        requested: decision.increment,
                    });
                }

                let notes = renderer.render(
                    &decision,
                    NotesInput::Changes {
                        changes: &changes,
                        custom_notes: custom_notes.as_deref(),
                    },
                )?;

                PreparedRelease {
                    decision,
                    notes,
                    tag_message: format!("chore: release {}", decision.next),
                    commit_count: Some(changes.len()),
                    warnings,
                }
            }
        };

        Ok(prepared)
    }

    /// Tag and publish a prepared release, or simulate it in dry run.
    pub fn publish(&self, prepared: &PreparedRelease) -> Result<PublishedVersion> {
        let mut publisher = ReleasePublisher::new(
            self.repo,
            self.backend,
            self.config.identity.remote.clone(),
            self.config.notes.preview_lines,
        );

        if !self.settings.dry_run {
            publisher.setup_identity(&self.config.identity)?;
        }

        publisher
            .publish(
                prepared.decision.next,
                &prepared.notes,
                &prepared.tag_message,
                self.settings.dry_run,
            )
            .map_err(|e| {
                log::error!("publish halted in state {}", publisher.state());
                e
            })
    }

    fn action_reference(&self) -> String {
        self.config
            .notes
            .action_reference
            .clone()
            .or_else(|| self.settings.repository.clone())
            .unwrap_or_else(|| PLACEHOLDER_ACTION_REFERENCE.to_string())
    }

    /// Best-effort upstream lookup; an empty string selects the generated fallback.
    fn upstream_notes(&self, update: &DependencyUpdate, warnings: &mut Vec<ReleaseWarning>) -> String {
        if self.settings.dry_run {
            log::debug!("dry run: skipping upstream notes lookup");
            return String::new();
        }
        if !update.has_package() {
            return String::new();
        }

        match self.fetcher.fetch(&update.package, &update.new_version) {
            Ok(notes) => notes,
            Err(e) => {
                log::debug!("upstream notes lookup failed: {}", e);
                warnings.push(ReleaseWarning::UpstreamNotesUnavailable {
                    package: update.package.clone(),
                    version: update.new_version.clone(),
                });
                String::new()
            }
        }
    }
}
