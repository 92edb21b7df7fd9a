//! Release notes: rendering and upstream notes lookup

pub mod renderer;
pub mod templates;
pub mod upstream;

pub use renderer::{NotesInput, NotesRenderer, ReleaseNotes};
pub use upstream::{GhNotesFetcher, NotesFetcher};
