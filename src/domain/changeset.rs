use crate::domain::{ClassifiedCommit, CommitType};

/// Release-notes section a commit is rendered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Breaking,
    Feature,
    Fix,
    Performance,
    Docs,
    Maintenance,
}

impl Bucket {
    /// Sections in rendering order.
    pub const ORDER: [Bucket; 6] = [
        Bucket::Breaking,
        Bucket::Feature,
        Bucket::Fix,
        Bucket::Performance,
        Bucket::Docs,
        Bucket::Maintenance,
    ];

    /// Key used for this bucket in the `[sections]` config table.
    pub fn key(&self) -> &'static str {
        match self {
            Bucket::Breaking => "breaking",
            Bucket::Feature => "feature",
            Bucket::Fix => "fix",
            Bucket::Performance => "performance",
            Bucket::Docs => "docs",
            Bucket::Maintenance => "maintenance",
        }
    }

    /// Bucket for a commit. Breaking commits go to [`Bucket::Breaking`]
    /// whatever their type.
    pub fn of(commit: &ClassifiedCommit) -> Self {
        if commit.breaking {
            return Bucket::Breaking;
        }
        match commit.r#type {
            CommitType::Feature => Bucket::Feature,
            CommitType::Fix => Bucket::Fix,
            CommitType::Performance => Bucket::Performance,
            CommitType::Docs => Bucket::Docs,
            CommitType::Refactor
            | CommitType::Chore
            | CommitType::Ci
            | CommitType::Build
            | CommitType::Style
            | CommitType::Test
            | CommitType::Revert => Bucket::Maintenance,
        }
    }
}

/// Classified commits of one release, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    commits: Vec<ClassifiedCommit>,
}

impl ChangeSet {
    pub fn new(commits: Vec<ClassifiedCommit>) -> Self {
        ChangeSet { commits }
    }

    pub fn commits(&self) -> &[ClassifiedCommit] {
        &self.commits
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn has_breaking(&self) -> bool {
        self.commits.iter().any(|c| c.breaking)
    }

    pub fn has_features(&self) -> bool {
        self.commits.iter().any(|c| c.r#type == CommitType::Feature)
    }

    /// Commits rendered under `bucket`, preserving input order.
    pub fn bucket(&self, bucket: Bucket) -> Vec<&ClassifiedCommit> {
        self.commits
            .iter()
            .filter(|c| Bucket::of(c) == bucket)
            .collect()
    }

    /// Commits of the given type, breaking ones included.
    pub fn count_of(&self, commit_type: CommitType) -> usize {
        self.commits
            .iter()
            .filter(|c| c.r#type == commit_type)
            .count()
    }

    pub fn breaking_count(&self) -> usize {
        self.commits.iter().filter(|c| c.breaking).count()
    }
}
