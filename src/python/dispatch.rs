use crate::core::error::{Result, VRunError};
use crate::core::process::{CommandExec, ExecOutcome};
use std::ffi::OsString;
use tracing::{debug, info};

const SEPARATOR: &str = "--";
const SHELL_TOKEN: &str = "shell";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    ExplicitCommand,
    DefaultInterpreter,
    InteractiveShell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPlan {
    pub mode: DispatchMode,
    pub tokens: Vec<String>,
}

impl DispatchPlan {
    pub fn from_args(mut args: Vec<String>, interpreter: &str) -> Self {
        if args.first().map(String::as_str) == Some(SEPARATOR) {
            args.remove(0);
        }

        if args.is_empty() {
            return Self {
                mode: DispatchMode::DefaultInterpreter,
                tokens: vec![interpreter.to_string()],
            };
        }

        if args.len() == 1 && args[0] == SHELL_TOKEN {
            return Self {
                mode: DispatchMode::InteractiveShell,
                tokens: args,
            };
        }

        Self {
            mode: DispatchMode::ExplicitCommand,
            tokens: args,
        }
    }

    /// Tokens to run inside the shell after activation.
    pub fn shell_follow_up(&self) -> &[String] {
        match self.mode {
            DispatchMode::InteractiveShell => &self.tokens[1..],
            _ => &[],
        }
    }
}

/// Settings for the "prepend the interpreter on not-found" retry.
#[derive(Debug, Clone)]
pub struct GuessPolicy {
    pub enabled: bool,
    pub interpreter: String,
    pub source_suffixes: Vec<String>,
}

impl GuessPolicy {
    pub fn applies_to(&self, first: &str) -> bool {
        first.starts_with('-')
            || self
                .source_suffixes
                .iter()
                .any(|suffix| first.ends_with(suffix.as_str()))
    }
}

/// Run `tokens` through `exec`, retrying once with the interpreter prepended
/// when the command is missing and looks like interpreter arguments.
/// Returns the exit status when the platform reports one.
pub fn execute_with_guess<E: CommandExec>(
    exec: &E,
    tokens: &[String],
    policy: &GuessPolicy,
    search_path: &OsString,
) -> Result<i32> {
    let program = tokens.first().cloned().unwrap_or_default();

    match exec.exec(tokens, search_path) {
        ExecOutcome::Exited(code) => return Ok(code),
        outcome if outcome.is_not_found() => {
            if !policy.enabled || !policy.applies_to(&program) {
                debug!("{} not found, guessing skipped", program);
                return Err(VRunError::ExecutableNotFound(program));
            }
        }
        ExecOutcome::Failed(source) => return Err(VRunError::Execution { program, source }),
    }

    let mut guessed = Vec::with_capacity(tokens.len() + 1);
    guessed.push(policy.interpreter.clone());
    guessed.extend_from_slice(tokens);
    info!("{} not found, retrying as {:?}", program, guessed);

    match exec.exec(&guessed, search_path) {
        ExecOutcome::Exited(code) => Ok(code),
        outcome if outcome.is_not_found() => Err(VRunError::ExecutableNotFoundAfterGuess {
            command: program,
            interpreter: policy.interpreter.clone(),
        }),
        ExecOutcome::Failed(source) => Err(VRunError::Execution {
            program: policy.interpreter.clone(),
            source,
        }),
    }
}
