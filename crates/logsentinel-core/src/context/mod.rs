mod files;
mod repo;

pub use files::{read_log_file, FileKind, FileSet, LogFile};
pub use repo::{RepoContext, RepoContextStore, RepoField};
