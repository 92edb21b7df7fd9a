//! Git operations abstraction layer
//!
//! The engine only talks to git through the [Repository] trait so the same
//! release flow runs against a real repository ([repository::Git2Repository])
//! or an in-memory one in tests ([mock::MockRepository]).
//!
//! ```rust
//! # use release_engine::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> release_engine::Result<()> {
//! let head = repo.head_oid()?;
//! let commits = repo.get_commits_since(Some("v1.2.0"), head)?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The commit message
    pub message: String,
}

/// Git operations needed to discover, tag and push a release.
///
/// Read-only methods (`list_tags`, `head_oid`, `find_tag_target`,
/// `get_commits_since`) are the only ones a dry run may call.
pub trait Repository {
    /// All tag names in the repository, in no particular order.
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Commit currently checked out.
    fn head_oid(&self) -> Result<Oid>;

    /// Commit a tag points at, peeling annotated tags.
    ///
    /// # Returns
    /// * `Ok(Some(Oid))` - The tagged commit
    /// * `Ok(None)` - If the tag doesn't exist
    fn find_tag_target(&self, tag_name: &str) -> Result<Option<Oid>>;

    /// Commits reachable from `to_oid` but not from `tag_name`, oldest first.
    ///
    /// With no tag, every commit reachable from `to_oid` is returned.
    fn get_commits_since(&self, tag_name: Option<&str>, to_oid: Oid) -> Result<Vec<CommitInfo>>;

    /// Set the committer identity used for tags created afterwards.
    fn configure_identity(&self, name: &str, email: &str) -> Result<()>;

    /// Create an annotated tag. Fails if the tag already exists.
    fn create_annotated_tag(&self, name: &str, oid: Oid, message: &str) -> Result<()>;

    /// Create or move a lightweight tag.
    fn force_tag(&self, name: &str, oid: Oid) -> Result<()>;

    /// Commit a tag points at on `remote`, peeling annotated tags.
    ///
    /// Reads the remote's advertised refs; nothing is fetched.
    fn remote_tag_target(&self, remote: &str, tag_name: &str) -> Result<Option<Oid>>;

    /// Push tags to a remote, overwriting remote tags when `force` is set.
    fn push_tags(&self, remote: &str, tag_names: &[&str], force: bool) -> Result<()>;
}
