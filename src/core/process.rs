use crate::core::path::SEARCH_PATH_VAR;
use std::ffi::OsString;
use std::process::Command;
use tracing::debug;

/// Result of handing the process over to a command.
///
/// On Unix a successful exec never comes back, so only `Failed` is ever
/// observed there. Platforms without image replacement run the command to
/// completion and report `Exited` with its status.
#[derive(Debug)]
pub enum ExecOutcome {
    Exited(i32),
    Failed(std::io::Error),
}

impl ExecOutcome {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExecOutcome::Failed(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

pub trait CommandExec {
    /// Replace the current process with `argv`, using `search_path` as the
    /// child's search path.
    fn exec(&self, argv: &[String], search_path: &OsString) -> ExecOutcome;
}

pub struct ProcessExecutor;

impl ProcessExecutor {
    fn command(argv: &[String], search_path: &OsString) -> Option<Command> {
        let (program, args) = argv.split_first()?;
        let mut command = Command::new(program);
        command.args(args).env(SEARCH_PATH_VAR, search_path);
        Some(command)
    }
}

impl CommandExec for ProcessExecutor {
    #[cfg(unix)]
    fn exec(&self, argv: &[String], search_path: &OsString) -> ExecOutcome {
        use std::os::unix::process::CommandExt;

        let Some(mut command) = Self::command(argv, search_path) else {
            return ExecOutcome::Failed(std::io::ErrorKind::InvalidInput.into());
        };

        debug!("exec {:?}", argv);
        ExecOutcome::Failed(command.exec())
    }

    #[cfg(not(unix))]
    fn exec(&self, argv: &[String], search_path: &OsString) -> ExecOutcome {
        let Some(mut command) = Self::command(argv, search_path) else {
            return ExecOutcome::Failed(std::io::ErrorKind::InvalidInput.into());
        };

        debug!("spawn {:?}", argv);
        match command.status() {
            Ok(status) => ExecOutcome::Exited(status.code().unwrap_or(1)),
            Err(e) => ExecOutcome::Failed(e),
        }
    }
}
