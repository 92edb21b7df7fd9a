use crate::error::{ReleaseError, Result};
use crate::git::{CommitInfo, Repository};
use git2::Oid;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// A state-changing call observed by [`MockRepository`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAction {
    ConfigureIdentity { name: String, email: String },
    CreateTag { name: String, oid: Oid },
    ForceTag { name: String, oid: Oid },
    Push { tags: Vec<String>, force: bool },
}

/// In-memory repository with a linear history, for tests.
///
/// Records every mutating call so tests can assert that a dry run left the
/// repository untouched.
pub struct MockRepository {
    commits: Vec<(Oid, CommitInfo)>,
    tags: RefCell<BTreeMap<String, Oid>>,
    remote_tags: RefCell<BTreeMap<String, Oid>>,
    actions: RefCell<Vec<MockAction>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: Vec::new(),
            tags: RefCell::new(BTreeMap::new()),
            remote_tags: RefCell::new(BTreeMap::new()),
            actions: RefCell::new(Vec::new()),
        }
    }

    /// Append a commit on top of the current head and return its id.
    pub fn add_commit(&mut self, message: impl Into<String>) -> Oid {
        let n = self.commits.len() + 1;
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&(n as u64).to_be_bytes());
        let oid = Oid::from_bytes(&bytes).unwrap_or_else(|_| Oid::zero());

        self.commits.push((
            oid,
            CommitInfo {
                hash: oid.to_string(),
                message: message.into(),
            },
        ));
        oid
    }

    /// Add a tag pointing to an OID
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.tags.get_mut().insert(name.into(), oid);
    }

    /// Add a tag that exists only on the remote.
    pub fn add_remote_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.remote_tags.get_mut().insert(name.into(), oid);
    }

    /// Mutating calls made so far, in order.
    pub fn actions(&self) -> Vec<MockAction> {
        self.actions.borrow().clone()
    }

    /// Tags as seen by the remote after pushes.
    pub fn remote_tags(&self) -> BTreeMap<String, Oid> {
        self.remote_tags.borrow().clone()
    }

    fn record(&self, action: MockAction) {
        self.actions.borrow_mut().push(action);
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.borrow().keys().cloned().collect())
    }

    fn head_oid(&self) -> Result<Oid> {
        self.commits
            .last()
            .map(|(oid, _)| *oid)
            .ok_or_else(|| ReleaseError::Git(git2::Error::from_str("repository has no commits")))
    }

    fn find_tag_target(&self, tag_name: &str) -> Result<Option<Oid>> {
        Ok(self.tags.borrow().get(tag_name).copied())
    }

    fn get_commits_since(&self, tag_name: Option<&str>, to_oid: Oid) -> Result<Vec<CommitInfo>> {
        let end = self
            .commits
            .iter()
            .position(|(oid, _)| *oid == to_oid)
            .map(|i| i + 1)
            .unwrap_or(self.commits.len());

        let start = match tag_name.and_then(|t| self.tags.borrow().get(t).copied()) {
            Some(tag_oid) => self
                .commits
                .iter()
                .position(|(oid, _)| *oid == tag_oid)
                .map(|i| i + 1)
                .unwrap_or(0),
            None => 0,
        };

        Ok(self.commits[start.min(end)..end]
            .iter()
            .map(|(_, info)| info.clone())
            .collect())
    }

    fn configure_identity(&self, name: &str, email: &str) -> Result<()> {
        self.record(MockAction::ConfigureIdentity {
            name: name.to_string(),
            email: email.to_string(),
        });
        Ok(())
    }

    fn create_annotated_tag(&self, name: &str, oid: Oid, _message: &str) -> Result<()> {
        if self.tags.borrow().contains_key(name) {
            return Err(ReleaseError::Git(git2::Error::from_str(&format!(
                "tag '{}' already exists",
                name
            ))));
        }
        self.tags.borrow_mut().insert(name.to_string(), oid);
        self.record(MockAction::CreateTag {
            name: name.to_string(),
            oid,
        });
        Ok(())
    }

    fn force_tag(&self, name: &str, oid: Oid) -> Result<()> {
        self.tags.borrow_mut().insert(name.to_string(), oid);
        self.record(MockAction::ForceTag {
            name: name.to_string(),
            oid,
        });
        Ok(())
    }

    fn remote_tag_target(&self, _remote: &str, tag_name: &str) -> Result<Option<Oid>> {
        Ok(self.remote_tags.borrow().get(tag_name).copied())
    }

    fn push_tags(&self, _remote: &str, tag_names: &[&str], force: bool) -> Result<()> {
        for name in tag_names {
            let local = self.tags.borrow().get(*name).copied().ok_or_else(|| {
                ReleaseError::remote(format!("tag '{}' does not exist locally", name))
            })?;

            let mut remote = self.remote_tags.borrow_mut();
            if let Some(existing) = remote.get(*name) {
                if *existing != local && !force {
                    return Err(ReleaseError::remote(format!(
                        "remote rejected {}: already exists",
                        name
                    )));
                }
            }
            remote.insert(name.to_string(), local);
        }

        self.record(MockAction::Push {
            tags: tag_names.iter().map(|t| t.to_string()).collect(),
            force,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_history() {
        let mut repo = MockRepository::new();
        let first = repo.add_commit("Initial commit");
        let second = repo.add_commit("feat: thing");
        repo.add_tag("v1.0.0", first);

        assert_eq!(repo.head_oid().unwrap(), second);
        let commits = repo.get_commits_since(Some("v1.0.0"), second).unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, "feat: thing");
        assert_eq!(repo.get_commits_since(None, second).unwrap().len(), 2);
    }

    #[test]
    fn test_mock_repository_tags() {
        let mut repo = MockRepository::new();
        let oid = repo.add_commit("one");
        repo.add_tag("v1.0.0", oid);

        assert_eq!(repo.find_tag_target("v1.0.0").unwrap(), Some(oid));
        assert_eq!(repo.find_tag_target("v2.0.0").unwrap(), None);
        assert!(repo.create_annotated_tag("v1.0.0", oid, "again").is_err());
    }

    #[test]
    fn test_mock_records_mutations() {
        let mut repo = MockRepository::new();
        let oid = repo.add_commit("one");
        repo.create_annotated_tag("v1.0.0", oid, "release").unwrap();
        repo.push_tags("origin", &["v1.0.0"], false).unwrap();

        assert_eq!(repo.actions().len(), 2);
        assert_eq!(repo.remote_tags().get("v1.0.0"), Some(&oid));
    }

    #[test]
    fn test_mock_push_rejects_moved_tag_without_force() {
        let mut repo = MockRepository::new();
        let first = repo.add_commit("one");
        let second = repo.add_commit("two");
        repo.force_tag("v1", first).unwrap();
        repo.push_tags("origin", &["v1"], false).unwrap();
        repo.force_tag("v1", second).unwrap();

        assert!(repo.push_tags("origin", &["v1"], false).is_err());
        assert!(repo.push_tags("origin", &["v1"], true).is_ok());
        assert_eq!(repo.remote_tags().get("v1"), Some(&second));
    }

    #[test]
    fn test_mock_remote_only_tag() {
        let mut repo = MockRepository::new();
        let oid = repo.add_commit("one");
        repo.add_remote_tag("v1.0.0", oid);

        assert_eq!(repo.find_tag_target("v1.0.0").unwrap(), None);
        assert_eq!(repo.remote_tag_target("origin", "v1.0.0").unwrap(), Some(oid));
        assert!(repo.actions().is_empty());
    }

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert!(repo.list_tags().unwrap().is_empty());
        assert!(repo.head_oid().is_err());
    }
}
