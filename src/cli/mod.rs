pub mod commands;

use crate::config::GlobalConfigManager;
use crate::core::error::Result;
use crate::python::{resolve_venv, DispatchMode, DispatchPlan, GuessPolicy};
use clap::Parser;
use std::env;
use std::path::PathBuf;
use tracing::debug;

const LONG_ABOUT: &str = "\
Run command from an existing python virtual environment (that is, with the
environment's bin directory prepended to PATH). By default the location of the
virtual environment directory is searched from your current working directory
and used if only one match is found. This behavior can be overridden with the
--venv option.

CMD contains the command line to execute. You can prepend CMD with -- to avoid
conflict with v-run's own options. If CMD is omitted then the environment's
python interpreter is run without arguments. If CMD is the single word 'shell',
an interactive shell is started with the environment activated.

v-run tries to guess if you want to run the python interpreter so that you do
not need to start CMD with 'python'. For that it first tries to run CMD. If
that fails because the executable for CMD can not be found and the first word
of CMD begins with '-' or ends with '.py', then 'python' is prepended to CMD
and the execution is retried. If you do not desire such a behavior, pass the
--no-guess option.";

#[derive(Parser, Debug)]
#[command(
    name = "v-run",
    about = "Run commands using a Python virtual environment",
    long_about = LONG_ABOUT,
    override_usage = "v-run [OPTIONS] [--] [CMD]..."
)]
pub struct Cli {
    /// Use this virtual environment instead of searching for one
    #[arg(long, value_name = "PATH")]
    pub venv: Option<PathBuf>,

    /// Do not try to prepend 'python' when execution fails because the command is not found
    #[arg(long)]
    pub no_guess: bool,

    /// Command line to execute (default: python)
    #[arg(value_name = "CMD", trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = GlobalConfigManager::new()?.load().await?;
    let current_dir = env::current_dir()?;

    let venv = resolve_venv(cli.venv, &current_dir, &config.run.interpreter)?;
    let plan = DispatchPlan::from_args(cli.command, &config.run.interpreter);
    debug!("dispatch plan: {:?}", plan);

    match plan.mode {
        DispatchMode::InteractiveShell => {
            commands::shell::execute(&venv, &plan, &config.shell).await
        }
        DispatchMode::ExplicitCommand | DispatchMode::DefaultInterpreter => {
            let policy = GuessPolicy {
                enabled: config.run.guess && !cli.no_guess,
                interpreter: config.run.interpreter,
                source_suffixes: config.run.source_suffixes,
            };
            commands::run::execute(&venv, &plan, &policy)
        }
    }
}
