use crate::config::schema::GlobalConfig;
use crate::core::error::{Result, VRunError};

pub fn validate_interpreter_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(VRunError::Config(
            "run.interpreter cannot be empty".to_string(),
        ));
    }

    if name.starts_with('-') {
        return Err(VRunError::Config(
            "run.interpreter cannot start with '-'".to_string(),
        ));
    }

    if name.chars().any(|c| c == '/' || c == '\\') {
        return Err(VRunError::Config(
            "run.interpreter must be a file name (no path separators)".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_global_config(config: &GlobalConfig) -> Result<()> {
    validate_interpreter_name(&config.run.interpreter)?;

    for suffix in &config.run.source_suffixes {
        if suffix.len() < 2 || !suffix.starts_with('.') {
            return Err(VRunError::Config(format!(
                "run.source_suffixes entries must look like \".py\", got {:?}",
                suffix
            )));
        }
    }

    if let Some(program) = config.shell.program.as_deref() {
        if program.trim().is_empty() {
            return Err(VRunError::Config(
                "shell.program cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        validate_global_config(&GlobalConfig::default()).unwrap();
    }

    #[test]
    fn interpreter_must_be_a_bare_name() {
        assert!(validate_interpreter_name("python3").is_ok());
        assert!(validate_interpreter_name("").is_err());
        assert!(validate_interpreter_name("-python").is_err());
        assert!(validate_interpreter_name("/usr/bin/python").is_err());
    }

    #[test]
    fn suffix_needs_leading_dot() {
        let mut config = GlobalConfig::default();
        config.run.source_suffixes = vec!["py".to_string()];

        let msg = validate_global_config(&config).unwrap_err().to_string();
        assert!(msg.contains("run.source_suffixes"), "unexpected error: {}", msg);
    }
}
