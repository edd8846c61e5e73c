pub mod dispatch;
pub mod locator;
pub mod venv;

pub use dispatch::{execute_with_guess, DispatchMode, DispatchPlan, GuessPolicy};
pub use locator::{resolve_venv, VenvLocator};
pub use venv::{VirtualEnv, VENV_BIN_DIR};
