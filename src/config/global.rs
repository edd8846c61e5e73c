use crate::config::schema::GlobalConfig;
use crate::config::validate_global_config;
use crate::core::error::Result;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

const GLOBAL_CONFIG_FILE: &str = "config.toml";
const CONFIG_PATH_ENV: &str = "VRUN_CONFIG";

pub struct GlobalConfigManager {
    config_path: PathBuf,
}

impl GlobalConfigManager {
    pub fn new() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(Self::with_path(PathBuf::from(path)));
        }

        let config_dir = Self::get_config_dir()?;
        Ok(Self::with_path(config_dir.join(GLOBAL_CONFIG_FILE)))
    }

    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    fn get_config_dir() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "v-run") {
            Ok(proj_dirs.config_dir().to_path_buf())
        } else {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            Ok(PathBuf::from(home).join(".v-run"))
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub async fn load(&self) -> Result<GlobalConfig> {
        if !self.config_path.exists() {
            debug!("no config at {}, using defaults", self.config_path.display());
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&self.config_path).await?;
        let config: GlobalConfig = toml::from_str(&content)?;
        validate_global_config(&config)?;
        debug!("loaded config from {}", self.config_path.display());
        Ok(config)
    }
}
