pub mod error;
pub mod path;
pub mod process;

pub use error::{Result, VRunError};
pub use path::{child_search_path, compose_search_path, SEARCH_PATH_VAR};
pub use process::{CommandExec, ExecOutcome, ProcessExecutor};
