pub mod analyzer;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod notes;
pub mod process;
pub mod publish;
pub mod ui;
pub mod warning;

pub use error::{ReleaseError, Result};
