//! Domain logic - pure release rules independent of git and the network

pub mod changeset;
pub mod commit;
pub mod dependency;
pub mod version;

pub use changeset::{Bucket, ChangeSet};
pub use commit::{ClassifiedCommit, CommitClassifier, CommitType};
pub use dependency::DependencyUpdate;
pub use version::{IncrementKind, VersionDecision, VersionTag};
