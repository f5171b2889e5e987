pub mod commit;
pub mod log;

pub use commit::{Commit, CommitSource, LoadError};
pub use log::GitLog;
