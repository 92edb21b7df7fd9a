use std::cell::RefCell;

use crate::error::Result;
use crate::process::CommandRunner;

/// Remote release records (GitHub releases)
pub trait ReleaseBackend {
    /// Whether a release already exists for `tag`.
    fn release_exists(&self, tag: &str) -> Result<bool>;

    /// Create a release for `tag` and mark it as the latest one.
    fn create_release(&self, tag: &str, title: &str, notes: &str) -> Result<()>;
}

/// Creates releases with the `gh` CLI
pub struct GhReleaseBackend {
    runner: CommandRunner,
}

impl GhReleaseBackend {
    pub fn new(runner: CommandRunner) -> Self {
        GhReleaseBackend { runner }
    }
}

impl ReleaseBackend for GhReleaseBackend {
    fn release_exists(&self, tag: &str) -> Result<bool> {
        let output = self.runner.capture("gh", &["release", "view", tag])?;
        Ok(output.success)
    }

    fn create_release(&self, tag: &str, title: &str, notes: &str) -> Result<()> {
        self.runner.run(
            "gh",
            &[
                "release", "create", tag, "--title", title, "--notes", notes, "--latest",
            ],
        )?;
        Ok(())
    }
}

/// A release record captured by [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRelease {
    pub tag: String,
    pub title: String,
    pub notes: String,
}

/// In-memory backend that records every call, for tests.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    releases: RefCell<Vec<RecordedRelease>>,
    calls: RefCell<Vec<String>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        RecordingBackend::default()
    }

    pub fn releases(&self) -> Vec<RecordedRelease> {
        self.releases.borrow().clone()
    }

    /// Names of the trait methods called, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl ReleaseBackend for RecordingBackend {
    fn release_exists(&self, tag: &str) -> Result<bool> {
        self.calls.borrow_mut().push(format!("release_exists {}", tag));
        Ok(self.releases.borrow().iter().any(|r| r.tag == tag))
    }

    fn create_release(&self, tag: &str, title: &str, notes: &str) -> Result<()> {
        self.calls.borrow_mut().push(format!("create_release {}", tag));
        self.releases.borrow_mut().push(RecordedRelease {
            tag: tag.to_string(),
            title: title.to_string(),
            notes: notes.to_string(),
        });
        Ok(())
    }
}
