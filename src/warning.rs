use std::fmt;

use crate::domain::{IncrementKind, VersionTag};

/// Non-fatal conditions reported to the user.
///
/// None of these change the exit status of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// PR title did not match the dependency update grammar
    UnrecognizedPrTitle { title: String, reason: String },
    /// `VERSION_TYPE` held something other than major/minor/patch
    InvalidVersionType { value: String },
    /// Upstream release notes could not be fetched
    UpstreamNotesUnavailable { package: String, version: String },
    /// Commits suggest a different increment than the one requested
    IncrementMismatch {
        suggested: IncrementKind,
        requested: IncrementKind,
    },
    /// No commits since the last release
    NoNewCommits { latest: VersionTag },
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::UnrecognizedPrTitle { title, reason } => {
                write!(f, "Could not parse PR title '{}': {}", title, reason)
            }
            ReleaseWarning::InvalidVersionType { value } => {
                write!(f, "Invalid VERSION_TYPE '{}', using patch", value)
            }
            ReleaseWarning::UpstreamNotesUnavailable { package, version } => {
                write!(
                    f,
                    "Could not fetch upstream notes for {} {}, using generated notes",
                    package, version
                )
            }
            ReleaseWarning::IncrementMismatch {
                suggested,
                requested,
            } => {
                write!(
                    f,
                    "Commits suggest a {} release but {} was requested",
                    suggested, requested
                )
            }
            ReleaseWarning::NoNewCommits { latest } => {
                write!(f, "No new commits since {}", latest)
            }
        }
    }
}
