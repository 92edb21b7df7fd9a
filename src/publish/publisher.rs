use std::fmt;

use crate::config::IdentityConfig;
use crate::domain::VersionTag;
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::notes::ReleaseNotes;
use crate::publish::ReleaseBackend;

/// Progress of a publish attempt.
///
/// A failure leaves the publisher in the last completed state; nothing is
/// rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    Pending,
    Tagged,
    Published,
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PublishState::Pending => "pending",
            PublishState::Tagged => "tagged",
            PublishState::Published => "published",
        };
        f.write_str(name)
    }
}

/// Result of a publish call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedVersion {
    pub version: VersionTag,
    /// Commit the version tag points (or would point) at
    pub commit: String,
    pub dry_run: bool,
}

/// Tags the current commit, moves the floating major tag and creates the
/// remote release.
pub struct ReleasePublisher<'a, R: Repository, B: ReleaseBackend> {
    repo: &'a R,
    backend: &'a B,
    remote: String,
    preview_lines: usize,
    state: PublishState,
}

impl<'a, R: Repository, B: ReleaseBackend> ReleasePublisher<'a, R, B> {
    pub fn new(repo: &'a R, backend: &'a B, remote: impl Into<String>, preview_lines: usize) -> Self {
        ReleasePublisher {
            repo,
            backend,
            remote: remote.into(),
            preview_lines,
            state: PublishState::Pending,
        }
    }

    pub fn state(&self) -> PublishState {
        self.state
    }

    /// Write the tagging identity to the repository config.
    ///
    /// Must run once, before [`publish`](Self::publish) in live mode.
    pub fn setup_identity(&self, identity: &IdentityConfig) -> Result<()> {
        log::debug!("configuring git identity {} <{}>", identity.name, identity.email);
        self.repo.configure_identity(&identity.name, &identity.email)
    }

    /// Publish `version` at the current HEAD.
    ///
    /// Re-publishing a version whose tag already points at HEAD is safe; a
    /// tag pointing elsewhere is a [`ReleaseError::PublishConflict`]. Local
    /// tags are checked in dry run too; the remote's tags only in live mode.
    /// Dry run only reads from the local repository and never calls the
    /// backend.
    pub fn publish(
        &mut self,
        version: VersionTag,
        notes: &ReleaseNotes,
        tag_message: &str,
        dry_run: bool,
    ) -> Result<PublishedVersion> {
        let target = self.repo.head_oid()?;
        let tag = version.to_string();
        let existing = self.repo.find_tag_target(&tag)?;

        if let Some(existing) = existing {
            if existing != target {
                return Err(ReleaseError::PublishConflict {
                    tag,
                    existing: existing.to_string(),
                    target: target.to_string(),
                });
            }
        }

        let published = PublishedVersion {
            version,
            commit: target.to_string(),
            dry_run,
        };

        if dry_run {
            let (preview, hidden) = notes.preview(self.preview_lines);
            log::info!("dry run: would tag {} at {} and publish:", tag, target);
            for line in preview.lines() {
                log::info!("  {}", line);
            }
            if hidden > 0 {
                log::info!("  ... {} more lines", hidden);
            }
            return Ok(published);
        }

        if let Some(remote_existing) = self.repo.remote_tag_target(&self.remote, &tag)? {
            if remote_existing != target {
                return Err(ReleaseError::PublishConflict {
                    tag,
                    existing: remote_existing.to_string(),
                    target: target.to_string(),
                });
            }
        }

        match existing {
            Some(_) => log::info!("tag {} already points at {}, reusing it", tag, target),
            None => self.repo.create_annotated_tag(&tag, target, tag_message)?,
        }
        self.repo.push_tags(&self.remote, &[tag.as_str()], false)?;

        let major_tag = version.major_tag();
        self.repo.force_tag(&major_tag, target)?;
        self.repo.push_tags(&self.remote, &[major_tag.as_str()], true)?;
        self.state = PublishState::Tagged;
        log::info!("pushed {} and moved {} to {}", tag, major_tag, target);

        if self.backend.release_exists(&tag)? {
            log::info!("release {} already exists, leaving it as is", tag);
        } else {
            let title = format!("Release {}", tag);
            self.backend.create_release(&tag, &title, notes.as_str())?;
        }
        self.state = PublishState::Published;

        Ok(published)
    }
}
