use crate::domain::ChangeSet;
use crate::error::{ReleaseError, Result};
use std::fmt;

/// Release version in canonical `v{major}.{minor}.{patch}` form.
///
/// Ordering is the numeric `(major, minor, patch)` tuple, so `v1.10.0`
/// sorts after `v1.9.3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionTag {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl VersionTag {
    /// Version used when the repository has no release yet.
    pub const INITIAL: VersionTag = VersionTag {
        major: 1,
        minor: 0,
        patch: 0,
    };

    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        VersionTag {
            major,
            minor,
            patch,
        }
    }

    /// Parse a release tag such as `v1.2.3`.
    ///
    /// The `v` prefix is mandatory and pre-release or build metadata is
    /// rejected; floating tags like `v1` are not versions.
    pub fn parse(tag: &str) -> Result<Self> {
        let numeric = tag.strip_prefix('v').ok_or_else(|| {
            ReleaseError::version(format!("Tag '{}' is missing the 'v' prefix", tag))
        })?;

        let parsed = semver::Version::parse(numeric)
            .map_err(|e| ReleaseError::version(format!("Invalid version tag '{}': {}", tag, e)))?;

        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(ReleaseError::version(format!(
                "Tag '{}' carries pre-release or build metadata",
                tag
            )));
        }

        Ok(VersionTag::new(parsed.major, parsed.minor, parsed.patch))
    }

    /// Increment one component and reset the lower ones to zero.
    ///
    /// Fails when the component is already `u64::MAX`.
    pub fn bump(&self, kind: IncrementKind) -> Result<Self> {
        let component = match kind {
            IncrementKind::Major => self.major,
            IncrementKind::Minor => self.minor,
            IncrementKind::Patch => self.patch,
        };
        let bumped = component.checked_add(1).ok_or_else(|| {
            ReleaseError::version(format!("Cannot apply a {} increment to {}", kind, self))
        })?;

        Ok(match kind {
            IncrementKind::Major => VersionTag::new(bumped, 0, 0),
            IncrementKind::Minor => VersionTag::new(self.major, bumped, 0),
            IncrementKind::Patch => VersionTag::new(self.major, self.minor, bumped),
        })
    }

    /// Name of the floating tag that tracks this major line, e.g. `v1`.
    pub fn major_tag(&self) -> String {
        format!("v{}", self.major)
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Semantic version component to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IncrementKind {
    Patch,
    Minor,
    Major,
}

impl IncrementKind {
    /// Parse a `VERSION_TYPE` value. Returns `None` for anything unrecognised.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "major" => Some(IncrementKind::Major),
            "minor" => Some(IncrementKind::Minor),
            "patch" => Some(IncrementKind::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IncrementKind::Major => "major",
            IncrementKind::Minor => "minor",
            IncrementKind::Patch => "patch",
        }
    }
}

impl fmt::Display for IncrementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a version decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionDecision {
    pub increment: IncrementKind,
    pub previous: Option<VersionTag>,
    pub next: VersionTag,
}

/// Decide the next version.
///
/// Without a previous release the answer is always `v1.0.0`. Otherwise the
/// requested component of `last` is incremented; the change set never
/// overrides the requested kind, see [`suggest_kind`]. A component that
/// cannot grow any further is a [`ReleaseError::Version`].
pub fn decide(last: Option<VersionTag>, requested: IncrementKind) -> Result<VersionDecision> {
    let next = match last {
        Some(tag) => tag.bump(requested)?,
        None => VersionTag::INITIAL,
    };

    Ok(VersionDecision {
        increment: requested,
        previous: last,
        next,
    })
}

/// Increment kind implied by the commits in a change set.
pub fn suggest_kind(changes: &ChangeSet) -> IncrementKind {
    if changes.has_breaking() {
        IncrementKind::Major
    } else if changes.has_features() {
        IncrementKind::Minor
    } else {
        IncrementKind::Patch
    }
}

/// Pick the greatest well-formed version tag.
///
/// Malformed names (floating `v1`, `release-3`, `v1.2.3-rc.1`) are skipped.
pub fn latest_version_tag<S: AsRef<str>>(tags: &[S]) -> Option<VersionTag> {
    tags.iter()
        .filter_map(|name| match VersionTag::parse(name.as_ref()) {
            Ok(tag) => Some(tag),
            Err(e) => {
                log::debug!("ignoring tag during discovery: {}", e);
                None
            }
        })
        .max()
}
