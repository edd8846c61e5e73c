use std::path::{Path, PathBuf};

#[cfg(windows)]
pub const VENV_BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
pub const VENV_BIN_DIR: &str = "bin";

const ACTIVATE_SCRIPT: &str = "activate";

/// A virtual environment root: the directory holding `bin/` (or `Scripts\`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEnv {
    root: PathBuf,
}

impl VirtualEnv {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(VENV_BIN_DIR)
    }

    pub fn executable_path(&self, command: &str) -> PathBuf {
        let bin_dir = self.bin_dir();
        if cfg!(windows) {
            bin_dir.join(format!("{}.exe", command))
        } else {
            bin_dir.join(command)
        }
    }

    pub fn activate_script(&self) -> PathBuf {
        self.bin_dir().join(ACTIVATE_SCRIPT)
    }

    /// Shell line that sources the activation script.
    pub fn activation_line(&self) -> String {
        format!(". {}", shell_quote(&self.activate_script().to_string_lossy()))
    }
}

fn shell_quote(word: &str) -> String {
    let plain = word
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "/._-+:@%,".contains(c));
    if plain && !word.is_empty() {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', "'\\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executable_path() {
        let venv = VirtualEnv::new("/tmp/test/.venv");
        let path = venv.executable_path("python");

        #[cfg(unix)]
        assert!(path.ends_with(".venv/bin/python"));

        #[cfg(windows)]
        assert!(path.ends_with(".venv\\Scripts\\python.exe"));
    }

    #[cfg(unix)]
    #[test]
    fn activation_line_sources_script_from_root() {
        let venv = VirtualEnv::new("/work/env");
        assert_eq!(venv.activation_line(), ". /work/env/bin/activate");
    }

    #[cfg(unix)]
    #[test]
    fn activation_line_quotes_awkward_paths() {
        let venv = VirtualEnv::new("/work/my env's");
        assert_eq!(
            venv.activation_line(),
            ". '/work/my env'\\''s/bin/activate'"
        );
    }
}
