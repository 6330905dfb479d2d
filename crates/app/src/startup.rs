use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::LlmshConfig;
use crate::{AppError, Result};

const DATA_DIR_NAME: &str = ".llmsh";

/// Default locations under `~/.llmsh`.
#[derive(Clone, Debug)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub config_file: PathBuf,
    pub log_file: PathBuf,
}

impl AppPaths {
    pub fn new(data_dir: PathBuf) -> Self {
        let config_file = data_dir.join("config.toml");
        let log_file = data_dir.join("llmsh.log");
        Self {
            data_dir,
            config_file,
            log_file,
        }
    }

    pub fn from_home() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Config("home directory not found".to_string()))?;
        Ok(Self::new(home.join(DATA_DIR_NAME)))
    }

    /// Same paths, with the config file replaced by an explicit override.
    pub fn with_config_file(mut self, config_file: Option<PathBuf>) -> Self {
        if let Some(path) = config_file {
            self.config_file = path;
        }
        self
    }
}

/// Creates `~/.llmsh` so the log, cache and ledger have somewhere to live.
pub fn ensure_data_dir(paths: &AppPaths) -> Result<()> {
    fs::create_dir_all(&paths.data_dir)?;
    Ok(())
}

/// Writes the default configuration. Refuses to overwrite an existing file.
pub fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let contents = LlmshConfig::default().to_toml_string()?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|err| match err.kind() {
            std::io::ErrorKind::AlreadyExists => {
                AppError::Config(format!("config file already exists at {}", path.display()))
            }
            _ => AppError::Io(err),
        })?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_live_under_data_dir() {
        let paths = AppPaths::new(PathBuf::from("/home/dev/.llmsh"));
        assert_eq!(paths.config_file, PathBuf::from("/home/dev/.llmsh/config.toml"));
        assert_eq!(paths.log_file, PathBuf::from("/home/dev/.llmsh/llmsh.log"));

        let paths = paths.with_config_file(Some(PathBuf::from("/etc/llmsh.toml")));
        assert_eq!(paths.config_file, PathBuf::from("/etc/llmsh.toml"));
    }

    #[test]
    fn data_dir_is_created_on_demand() {
        let dir = tempfile::tempdir().expect("temp dir");
        let paths = AppPaths::new(dir.path().join("nested").join(".llmsh"));
        ensure_data_dir(&paths).expect("create data dir");
        assert!(paths.data_dir.is_dir());
        ensure_data_dir(&paths).expect("existing data dir");
    }

    #[test]
    fn default_config_is_written_once() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("config.toml");
        write_default_config(&path).expect("write config");

        let written = fs::read_to_string(&path).expect("read config");
        assert_eq!(
            LlmshConfig::from_toml(&written).expect("parse"),
            LlmshConfig::default()
        );

        let err = write_default_config(&path).expect_err("second write");
        assert!(err.to_string().contains("already exists"));
    }
}
