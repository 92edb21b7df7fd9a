//! Tagging and release publication

pub mod backend;
pub mod publisher;

pub use backend::{GhReleaseBackend, RecordedRelease, RecordingBackend, ReleaseBackend};
pub use publisher::{PublishState, PublishedVersion, ReleasePublisher};
