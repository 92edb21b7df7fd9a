use crate::error::{ReleaseError, Result};
use crate::git::CommitInfo;
use git2::{Oid, Repository as Git2Repo, Sort};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    token: Option<String>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo, token: None })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo, token: None }
    }

    /// Authenticate HTTPS pushes with a GitHub token.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn remote_callbacks(&self) -> git2::RemoteCallbacks<'_> {
        let mut callbacks = git2::RemoteCallbacks::new();
        let token = self.token.clone();

        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            if let Some(token) = &token {
                if allowed_types.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
                    return git2::Cred::userpass_plaintext("x-access-token", token);
                }
            }

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                {
                    return Ok(cred);
                }
            }

            git2::Cred::default()
        });

        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "Push rejected for {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        callbacks
    }
}

impl super::Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn head_oid(&self) -> Result<Oid> {
        let head = self.repo.head()?.peel_to_commit()?;
        Ok(head.id())
    }

    fn find_tag_target(&self, tag_name: &str) -> Result<Option<Oid>> {
        let reference_name = format!("refs/tags/{}", tag_name);

        match self.repo.find_reference(&reference_name) {
            Ok(reference) => Ok(Some(reference.peel_to_commit()?.id())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn get_commits_since(&self, tag_name: Option<&str>, to_oid: Oid) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        revwalk.push(to_oid)?;

        if let Some(tag_name) = tag_name {
            match self.find_tag_target(tag_name)? {
                Some(tag_oid) => revwalk.hide(tag_oid)?,
                None => log::warn!("tag {} not found, reading full history", tag_name),
            }
        }

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;

            commits.push(CommitInfo {
                hash: oid.to_string(),
                message: commit.message().unwrap_or("").to_string(),
            });
        }

        Ok(commits)
    }

    fn configure_identity(&self, name: &str, email: &str) -> Result<()> {
        let mut config = self.repo.config()?;
        config.set_str("user.name", name)?;
        config.set_str("user.email", email)?;
        Ok(())
    }

    fn create_annotated_tag(&self, name: &str, oid: Oid, message: &str) -> Result<()> {
        let object = self.repo.find_object(oid, None)?;
        let tagger = self.repo.signature()?;

        self.repo.tag(name, &object, &tagger, message, false)?;
        Ok(())
    }

    fn force_tag(&self, name: &str, oid: Oid) -> Result<()> {
        let object = self.repo.find_object(oid, None)?;

        self.repo.tag_lightweight(name, &object, true)?;
        Ok(())
    }

    fn remote_tag_target(&self, remote: &str, tag_name: &str) -> Result<Option<Oid>> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::remote(format!("Cannot find remote: {}", e)))?;

        let connection = remote
            .connect_auth(git2::Direction::Fetch, Some(self.remote_callbacks()), None)
            .map_err(|e| ReleaseError::remote(format!("Cannot connect to remote: {}", e)))?;

        let reference = format!("refs/tags/{}", tag_name);
        let peeled = format!("{}^{{}}", reference);
        let mut target = None;
        for head in connection.list()? {
            if head.name() == peeled {
                return Ok(Some(head.oid()));
            }
            if head.name() == reference {
                target = Some(head.oid());
            }
        }

        Ok(target)
    }

    fn push_tags(&self, remote: &str, tag_names: &[&str], force: bool) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::remote(format!("Cannot find remote: {}", e)))?;

        let prefix = if force { "+" } else { "" };
        let refspecs: Vec<String> = tag_names
            .iter()
            .map(|tag| format!("{}refs/tags/{}:refs/tags/{}", prefix, tag, tag))
            .collect();

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(self.remote_callbacks());

        remote
            .push(&refspecs, Some(&mut push_options))
            .map_err(|e| ReleaseError::remote(format!("Push failed: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use std::fs;
    use tempfile::TempDir;

    fn commit(repo: &Git2Repo, dir: &Path, message: &str) -> Oid {
        fs::write(dir.join("README.md"), message).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("README.md")).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = repo.signature().unwrap();
        let parents: Vec<git2::Commit> = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    fn setup() -> (TempDir, Git2Repository, Vec<Oid>) {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        let oids = vec![
            commit(&repo, dir.path(), "Initial commit"),
            commit(&repo, dir.path(), "feat(api): add retry"),
            commit(&repo, dir.path(), "fix: null pointer"),
        ];
        (dir, Git2Repository::from_git2(repo), oids)
    }

    #[test]
    fn test_commits_since_tag_are_oldest_first() {
        let (_dir, repo, oids) = setup();
        repo.force_tag("v1.0.0", oids[0]).unwrap();

        let commits = repo.get_commits_since(Some("v1.0.0"), oids[2]).unwrap();
        let messages: Vec<&str> = commits.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["feat(api): add retry", "fix: null pointer"]);
        assert_eq!(commits[0].hash, oids[1].to_string());
    }

    #[test]
    fn test_commits_without_tag_reads_everything() {
        let (_dir, repo, oids) = setup();
        let commits = repo.get_commits_since(None, oids[2]).unwrap();
        assert_eq!(commits.len(), 3);
        assert_eq!(commits[0].message, "Initial commit");
    }

    #[test]
    fn test_annotated_tag_peels_to_commit() {
        let (_dir, repo, oids) = setup();
        assert_eq!(repo.head_oid().unwrap(), oids[2]);

        repo.create_annotated_tag("v1.1.0", oids[2], "chore: release v1.1.0")
            .unwrap();
        assert_eq!(repo.find_tag_target("v1.1.0").unwrap(), Some(oids[2]));
        assert_eq!(repo.find_tag_target("v9.9.9").unwrap(), None);
        assert!(repo
            .create_annotated_tag("v1.1.0", oids[1], "again")
            .is_err());
    }

    #[test]
    fn test_force_tag_moves_existing_tag() {
        let (_dir, repo, oids) = setup();
        repo.force_tag("v1", oids[0]).unwrap();
        repo.force_tag("v1", oids[2]).unwrap();
        assert_eq!(repo.find_tag_target("v1").unwrap(), Some(oids[2]));
        assert!(repo.list_tags().unwrap().contains(&"v1".to_string()));
    }

    #[test]
    fn test_push_tags_to_bare_remote() {
        let (dir, repo, oids) = setup();
        let remote_dir = TempDir::new().unwrap();
        let remote = Git2Repo::init_bare(remote_dir.path()).unwrap();
        Git2Repo::open(dir.path())
            .unwrap()
            .remote("origin", remote_dir.path().to_str().unwrap())
            .unwrap();

        repo.create_annotated_tag("v1.0.0", oids[1], "chore: release v1.0.0")
            .unwrap();
        repo.force_tag("v1", oids[1]).unwrap();
        repo.push_tags("origin", &["v1.0.0"], false).unwrap();
        repo.push_tags("origin", &["v1"], true).unwrap();

        repo.force_tag("v1", oids[2]).unwrap();
        repo.push_tags("origin", &["v1"], true).unwrap();

        let remote_v1 = remote
            .find_reference("refs/tags/v1")
            .unwrap()
            .peel_to_commit()
            .unwrap()
            .id();
        assert_eq!(remote_v1, oids[2]);
        assert!(remote.find_reference("refs/tags/v1.0.0").is_ok());
    }

    #[test]
    fn test_remote_tag_target_reads_advertised_tags() {
        let (dir, repo, oids) = setup();
        let remote_dir = TempDir::new().unwrap();
        Git2Repo::init_bare(remote_dir.path()).unwrap();
        Git2Repo::open(dir.path())
            .unwrap()
            .remote("origin", remote_dir.path().to_str().unwrap())
            .unwrap();

        repo.create_annotated_tag("v1.0.0", oids[1], "chore: release v1.0.0")
            .unwrap();
        repo.force_tag("v1", oids[2]).unwrap();
        repo.push_tags("origin", &["v1.0.0", "v1"], false).unwrap();

        assert_eq!(repo.remote_tag_target("origin", "v1.0.0").unwrap(), Some(oids[1]));
        assert_eq!(repo.remote_tag_target("origin", "v1").unwrap(), Some(oids[2]));
        assert_eq!(repo.remote_tag_target("origin", "v2.0.0").unwrap(), None);
        assert!(repo.remote_tag_target("upstream", "v1.0.0").is_err());
    }

    #[test]
    fn test_configure_identity() {
        let (_dir, repo, _) = setup();
        repo.configure_identity("github-actions[bot]", "bot@example.com")
            .unwrap();
        let sig = repo.repo.signature().unwrap();
        assert_eq!(sig.name(), Some("github-actions[bot]"));
    }
}
