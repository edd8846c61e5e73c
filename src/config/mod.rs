pub mod global;
pub mod schema;
pub mod validation;

pub use global::GlobalConfigManager;
pub use schema::{GlobalConfig, RunConfig, ShellConfig, DEFAULT_INTERPRETER};
pub use validation::{validate_global_config, validate_interpreter_name};
