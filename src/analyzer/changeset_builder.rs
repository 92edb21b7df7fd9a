use crate::domain::{ChangeSet, CommitClassifier, VersionTag};
use crate::error::Result;
use crate::git::{CommitInfo, Repository};

/// Collects the commits of the next release into a [`ChangeSet`]
pub struct ChangeSetBuilder {
    classifier: CommitClassifier,
}

impl ChangeSetBuilder {
    /// Create a new builder
    pub fn new(classifier: CommitClassifier) -> Self {
        ChangeSetBuilder { classifier }
    }

    /// Classify `(hash, message)` pairs; display order follows input order.
    pub fn build(&self, commits: &[CommitInfo]) -> ChangeSet {
        ChangeSet::new(
            commits
                .iter()
                .map(|c| self.classifier.classify(&c.message, &c.hash))
                .collect(),
        )
    }

    /// Build the change set for `(last, HEAD]`, or all of history without a last release.
    pub fn build_since<R: Repository>(&self, repo: &R, last: Option<VersionTag>) -> Result<ChangeSet> {
        let head = repo.head_oid()?;
        let last_tag = last.map(|tag| tag.to_string());
        let commits = repo.get_commits_since(last_tag.as_deref(), head)?;
        log::debug!(
            "{} commit(s) since {}",
            commits.len(),
            last_tag.as_deref().unwrap_or("the start of history")
        );
        Ok(self.build(&commits))
    }
}

impl Default for ChangeSetBuilder {
    fn default() -> Self {
        Self::new(CommitClassifier::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bucket, CommitType};
    use crate::git::MockRepository;

    fn info(hash: &str, message: &str) -> CommitInfo {
        CommitInfo {
            hash: hash.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_build_classifies_every_commit() {
        let builder = ChangeSetBuilder::default();
        let changes = builder.build(&[
            info("aaaaaaaaaa", "feat(api): add retry"),
            info("bbbbbbbbbb", "Random commit message"),
            info("cccccccccc", ""),
        ]);
        assert_eq!(changes.len(), 3);
        assert_eq!(changes.commits()[0].hash, "aaaaaaa");
        assert_eq!(changes.commits()[1].r#type, CommitType::Chore);
    }

    #[test]
    fn test_input_order_preserved_in_either_direction() {
        let builder = ChangeSetBuilder::default();
        let forward = [info("1", "fix: one"), info("2", "fix: two")];
        let backward = [info("2", "fix: two"), info("1", "fix: one")];

        let f = builder.build(&forward);
        let b = builder.build(&backward);
        assert_eq!(f.bucket(Bucket::Fix)[0].description, "one");
        assert_eq!(b.bucket(Bucket::Fix)[0].description, "two");
        assert_eq!(f.bucket(Bucket::Fix).len(), b.bucket(Bucket::Fix).len());
    }

    #[test]
    fn test_build_since_last_tag() {
        let mut repo = MockRepository::new();
        let tagged = repo.add_commit("feat: shipped already");
        repo.add_tag("v1.0.0", tagged);
        repo.add_commit("fix: after release");

        let builder = ChangeSetBuilder::default();
        let changes = builder
            .build_since(&repo, Some(VersionTag::new(1, 0, 0)))
            .unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes.commits()[0].description, "after release");

        let everything = builder.build_since(&repo, None).unwrap();
        assert_eq!(everything.len(), 2);
    }
}
