use crate::core::error::Result;
use crate::core::{child_search_path, ProcessExecutor};
use crate::python::{execute_with_guess, DispatchPlan, GuessPolicy, VirtualEnv};

pub fn execute(venv: &VirtualEnv, plan: &DispatchPlan, policy: &GuessPolicy) -> Result<()> {
    let search_path = child_search_path(&venv.bin_dir());

    let exit_code = execute_with_guess(&ProcessExecutor, &plan.tokens, policy, &search_path)?;

    std::process::exit(exit_code);
}
