pub mod orchestration;

pub use orchestration::{PreparedRelease, ReleaseEngine};
