use crate::config::ShellConfig;
use crate::core::child_search_path;
use crate::core::error::Result;
use crate::python::{DispatchPlan, VirtualEnv};
use crate::shell::{watch_resizes, RawModeGuard, ShellRequest, ShellSession, TerminalSize};
use std::env;

pub async fn execute(venv: &VirtualEnv, plan: &DispatchPlan, config: &ShellConfig) -> Result<()> {
    let request = ShellRequest {
        program: config.resolve_program(),
        args: config.args.clone(),
        cwd: env::current_dir()?,
        search_path: child_search_path(&venv.bin_dir()),
        size: TerminalSize::current(),
    };

    let resizes = watch_resizes()?;
    let mut session = ShellSession::spawn(&request)?;
    session.inject_activation(venv, plan.shell_follow_up())?;

    let exit_code = {
        let _raw = RawModeGuard::enable_if_terminal()?;
        session
            .interact(std::io::stdin(), std::io::stdout(), resizes)
            .await?
    };

    std::process::exit(exit_code as i32);
}
