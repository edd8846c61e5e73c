use serde::Deserialize;

pub const DEFAULT_INTERPRETER: &str = "python";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub shell: ShellConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_true")]
    pub guess: bool,
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    #[serde(default = "default_source_suffixes")]
    pub source_suffixes: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            guess: default_true(),
            interpreter: default_interpreter(),
            source_suffixes: default_source_suffixes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShellConfig {
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default = "default_shell_args")]
    pub args: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: None,
            args: default_shell_args(),
        }
    }
}

impl ShellConfig {
    /// Configured program, then `$SHELL`, then `/bin/bash`.
    pub fn resolve_program(&self) -> String {
        self.resolve_program_with(std::env::var("SHELL").ok())
    }

    fn resolve_program_with(&self, env_shell: Option<String>) -> String {
        if let Some(program) = &self.program {
            return program.clone();
        }
        env_shell
            .filter(|shell| !shell.trim().is_empty())
            .unwrap_or_else(|| "/bin/bash".to_string())
    }
}

fn default_true() -> bool {
    true
}

fn default_interpreter() -> String {
    DEFAULT_INTERPRETER.to_string()
}

fn default_source_suffixes() -> Vec<String> {
    vec![".py".to_string()]
}

fn default_shell_args() -> Vec<String> {
    vec!["-i".to_string()]
}
