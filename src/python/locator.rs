use crate::core::error::{Result, VRunError};
use crate::python::venv::VirtualEnv;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Scans a working directory for `*/bin/<interpreter>` and `.*/bin/<interpreter>`.
pub struct VenvLocator<'a> {
    interpreter: &'a str,
}

impl<'a> VenvLocator<'a> {
    pub fn new(interpreter: &'a str) -> Self {
        Self { interpreter }
    }

    /// Every directory under `dir` whose interpreter exists and is executable.
    /// Hidden directories come first, each group sorted by name.
    pub fn candidates(&self, dir: &Path) -> Result<Vec<VirtualEnv>> {
        let mut hidden = Vec::new();
        let mut visible = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let venv = VirtualEnv::new(dir.join(&name));
            let interpreter = venv.executable_path(self.interpreter);

            if !is_executable_file(&interpreter) {
                continue;
            }

            debug!("candidate interpreter {}", interpreter.display());
            if name.to_string_lossy().starts_with('.') {
                hidden.push(venv);
            } else {
                visible.push(venv);
            }
        }

        hidden.sort_by(|a, b| a.root().cmp(b.root()));
        visible.sort_by(|a, b| a.root().cmp(b.root()));
        hidden.extend(visible);
        Ok(hidden)
    }

    /// Exactly one candidate, or a diagnosable failure.
    pub fn locate(&self, dir: &Path) -> Result<VirtualEnv> {
        let mut found = self.candidates(dir)?;

        match found.len() {
            0 => Err(VRunError::NoEnvironmentFound(dir.to_path_buf())),
            1 => {
                let venv = found.remove(0);
                info!("using virtual environment {}", venv.root().display());
                Ok(venv)
            }
            _ => Err(VRunError::AmbiguousEnvironment(
                found.iter().map(|v| v.root().to_path_buf()).collect(),
            )),
        }
    }
}

/// `--venv` wins over discovery and is taken verbatim.
pub fn resolve_venv(
    override_path: Option<PathBuf>,
    working_dir: &Path,
    interpreter: &str,
) -> Result<VirtualEnv> {
    match override_path {
        Some(path) => {
            debug!("using --venv {}", path.display());
            Ok(VirtualEnv::new(path))
        }
        None => VenvLocator::new(interpreter).locate(working_dir),
    }
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(path) {
        Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}
