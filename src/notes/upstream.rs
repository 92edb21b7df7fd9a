use crate::error::{ReleaseError, Result};
use crate::process::CommandRunner;

/// Looks up the release notes a dependency published for a version.
pub trait NotesFetcher {
    /// Notes body for `package` at `version`; any error means "unavailable".
    fn fetch(&self, package: &str, version: &str) -> Result<String>;
}

/// Fetches notes through `gh api repos/{package}/releases/tags/{version}`
pub struct GhNotesFetcher {
    runner: CommandRunner,
}

impl GhNotesFetcher {
    pub fn new(runner: CommandRunner) -> Self {
        GhNotesFetcher { runner }
    }
}

impl NotesFetcher for GhNotesFetcher {
    fn fetch(&self, package: &str, version: &str) -> Result<String> {
        let endpoint = format!("repos/{}/releases/tags/{}", package, version);
        let output = self
            .runner
            .capture("gh", &["api", endpoint.as_str(), "--jq", ".body"])?;

        if !output.success {
            return Err(ReleaseError::fetch(format!(
                "gh api {} exited with code {}: {}",
                endpoint,
                output.code,
                output.stderr.trim()
            )));
        }

        body_or_error(&output.stdout)
    }
}

/// Reject the empty and `null` bodies GitHub returns for note-less releases.
fn body_or_error(stdout: &str) -> Result<String> {
    let body = stdout.trim();
    if body.is_empty() || body == "null" {
        return Err(ReleaseError::fetch("release has no notes body"));
    }
    Ok(body.to_string())
}
