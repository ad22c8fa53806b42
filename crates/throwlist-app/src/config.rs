use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use throwlist_core::Band;

use crate::task_store::DEFAULT_MAX_BATCH_SIZE;

const CONFIG_DIR: &str = "throwlist";
const CONFIG_FILE: &str = "config.toml";
const STORE_FILE: &str = "tasks.json";

/// User configuration loaded from `<config dir>/throwlist/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Owner whose task list is shown and modified.
    pub owner: String,
    /// Task store file; defaults to `<data dir>/throwlist/tasks.json`.
    pub store_path: Option<PathBuf>,
    /// Band given to new tasks when none is chosen.
    pub default_band: u8,
    /// Number of task writes per atomic chunk.
    pub batch_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            owner: "me".into(),
            store_path: None,
            default_band: Band::LOWEST.get(),
            batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl AppConfig {
    /// Load configuration from the standard location under `config_dir`.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read, parsed or validated.
    pub fn from_config_dir(config_dir: impl AsRef<Path>) -> Result<Self> {
        Self::from_file(config_dir.as_ref().join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load configuration from an explicit file. A missing file yields defaults.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read, parsed or validated.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Band for new tasks.
    #[must_use]
    pub fn default_band(&self) -> Band {
        Band::clamped(i64::from(self.default_band))
    }

    /// Configured store file, or the default location under `data_dir`.
    #[must_use]
    pub fn store_path_or(&self, data_dir: &Path) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| data_dir.join(CONFIG_DIR).join(STORE_FILE))
    }

    fn validate(&self) -> Result<()> {
        if self.owner.trim().is_empty() {
            bail!("owner must not be empty");
        }
        if !(Band::HIGHEST.get()..=Band::LOWEST.get()).contains(&self.default_band) {
            bail!(
                "default_band must be between {} and {}, got {}",
                Band::HIGHEST,
                Band::LOWEST,
                self.default_band
            );
        }
        if !(1..=DEFAULT_MAX_BATCH_SIZE).contains(&self.batch_size) {
            bail!(
                "batch_size must be between 1 and {DEFAULT_MAX_BATCH_SIZE}, got {}",
                self.batch_size
            );
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(contents: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join(CONFIG_DIR).join(CONFIG_FILE);
        fs::create_dir_all(path.parent().expect("config file has parent")).expect("create dir");
        fs::write(&path, contents).expect("write config");
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().expect("create temp dir");
        let config = AppConfig::from_config_dir(dir.path()).expect("defaults");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.default_band(), Band::LOWEST);
        assert_eq!(
            config.store_path_or(Path::new("/data")),
            PathBuf::from("/data/throwlist/tasks.json")
        );
    }

    #[test]
    fn reads_partial_file_over_defaults() {
        let (dir, _path) = write_config("owner = \"kai\"\ndefault_band = 6\n");
        let config = AppConfig::from_config_dir(dir.path()).expect("valid config");
        assert_eq!(config.owner, "kai");
        assert_eq!(config.default_band().get(), 6);
        assert_eq!(config.batch_size, DEFAULT_MAX_BATCH_SIZE);
    }

    #[test]
    fn explicit_store_path_wins() {
        let (_dir, path) = write_config("store_path = \"/srv/tasks.json\"\n");
        let config = AppConfig::from_file(&path).expect("valid config");
        assert_eq!(
            config.store_path_or(Path::new("/data")),
            PathBuf::from("/srv/tasks.json")
        );
    }

    #[test]
    fn rejects_out_of_range_values() {
        let (_dir, path) = write_config("default_band = 30\n");
        let err = AppConfig::from_file(&path).expect_err("band out of range");
        assert!(format!("{err:#}").contains("default_band"));

        let (_dir, path) = write_config("batch_size = 1000\n");
        let err = AppConfig::from_file(&path).expect_err("batch too large");
        assert!(format!("{err:#}").contains("batch_size"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let (_dir, path) = write_config("colour = \"blue\"\n");
        assert!(AppConfig::from_file(&path).is_err());
    }
}
