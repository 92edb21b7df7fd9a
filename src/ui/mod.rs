//! User interface module
//!
//! The engine runs unattended in CI, so there are no prompts; this module
//! only formats progress for the terminal.

pub mod formatter;

pub use formatter::{
    display_decision, display_error, display_notes_preview, display_published, display_status,
    display_success, display_warning,
};
