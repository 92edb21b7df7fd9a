//! Commit history analysis for manual releases

pub mod changeset_builder;

pub use changeset_builder::ChangeSetBuilder;
