use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VRunError {
    #[error("No virtual environments found in {}", .0.display())]
    NoEnvironmentFound(PathBuf),

    #[error("{}", ambiguous_message(.0))]
    AmbiguousEnvironment(Vec<PathBuf>),

    #[error("{0}: command not found")]
    ExecutableNotFound(String),

    #[error("{command}: command not found (also tried '{interpreter} {command}')")]
    ExecutableNotFoundAfterGuess {
        command: String,
        interpreter: String,
    },

    #[error("Failed to spawn shell {shell}: {reason}")]
    SpawnFailure { shell: String, reason: String },

    #[error("Failed to execute {program}: {source}")]
    Execution {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VRunError {
    /// Exit status used by the binary when this error ends the run.
    pub fn exit_code(&self) -> i32 {
        match self {
            VRunError::ExecutableNotFound(_) | VRunError::ExecutableNotFoundAfterGuess { .. } => {
                127
            }
            VRunError::Execution { source, .. }
                if source.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                126
            }
            _ => 1,
        }
    }
}

fn ambiguous_message(candidates: &[PathBuf]) -> String {
    let mut msg = String::from("More than one virtual environment found:");
    for path in candidates {
        msg.push_str("\n  ");
        msg.push_str(&path.display().to_string());
    }
    msg.push_str("\nPlease, use the --venv option.");
    msg
}

pub type Result<T> = std::result::Result<T, VRunError>;
