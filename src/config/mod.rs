// src/config/mod.rs
mod schema;

use std::path::{Path, PathBuf};

use config::{Config as ConfigLoader, FileFormat};
use tracing::{info, warn};

pub use schema::{LogSettings, OutputSettings, PlanSettings, RuntimeFlavor, RuntimeSettings, Settings};

use crate::error::{TaskError, TaskExecResult};

const ENV_PREFIX: &str = "TASKEXEC";

impl Settings {
    /// Load settings: built-in defaults, then the user file, then
    /// `TASKEXEC_*` environment variables
    pub fn load(config_path: Option<&Path>) -> TaskExecResult<Self> {
        Self::load_with_env(config_path, ENV_PREFIX)
    }

    fn load_with_env(config_path: Option<&Path>, env_prefix: &str) -> TaskExecResult<Self> {
        info!("Loading settings");

        let mut config_builder = ConfigLoader::builder();

        // Default configuration
        config_builder = config_builder.add_source(config::File::from_str(
            include_str!("../../config/default.toml"),
            FileFormat::Toml,
        ));

        // User-provided configuration
        match config_path {
            Some(path) if path.exists() => {
                config_builder = config_builder.add_source(config::File::from(path));
                info!("Loading user settings from: {}", path.display());
            }
            Some(path) => {
                return Err(TaskError::Io {
                    path: path.to_path_buf(),
                    message: "Settings file not found".to_string(),
                });
            }
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    config_builder = config_builder.add_source(config::File::from(default_path.as_path()));
                    info!("Loading settings from: {}", default_path.display());
                } else {
                    info!("No settings file found, using built-in defaults");
                }
            }
        }

        // Environment variables, e.g. TASKEXEC_LOG__LEVEL=debug
        config_builder = config_builder.add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        config_builder
            .build()
            .map_err(|e| TaskError::Config(format!("Failed to build settings: {}", e)))?
            .try_deserialize()
            .map_err(|e| TaskError::Config(format!("Failed to parse settings: {}", e)))
    }

    /// The settings file `load` reads for `config_path`, if any
    pub fn source(config_path: Option<&Path>) -> Option<PathBuf> {
        match config_path {
            Some(path) => Some(path.to_path_buf()),
            None => Some(Self::default_path()).filter(|path| path.exists()),
        }
    }

    /// `~/.taskexec/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".taskexec/config.toml")
    }

    /// Write the default settings to the default location
    pub fn init(force: bool) -> TaskExecResult<PathBuf> {
        let path = Self::default_path();
        Self::init_at(&path, force)?;
        Ok(path)
    }

    /// Write the default settings to `path`, refusing to overwrite an
    /// existing file unless `force` is set
    pub fn init_at(path: &Path, force: bool) -> TaskExecResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| TaskError::Io {
                path: parent.to_path_buf(),
                message: format!("Failed to create directory: {}", e),
            })?;
        }

        if path.exists() && !force {
            return Err(TaskError::Config(format!(
                "Settings already exist at {}. Use --force to overwrite.",
                path.display()
            )));
        }
        if path.exists() {
            warn!("Overwriting settings at {}", path.display());
        }

        Settings::default().save(path)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> TaskExecResult<()> {
        let settings_str = toml::to_string_pretty(self)
            .map_err(|e| TaskError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(path, settings_str).map_err(|e| TaskError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write settings: {}", e),
        })?;

        info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// The configured log level
    pub fn log_level(&self) -> TaskExecResult<tracing::Level> {
        self.log
            .level
            .parse()
            .map_err(|_| TaskError::Config(format!("Invalid log level: {}", self.log.level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    const NO_ENV: &str = "TASKEXEC_TEST_UNSET";

    #[test]
    fn test_builtin_defaults_match_default_impl() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();

        let settings = Settings::load_with_env(Some(&path), NO_ENV).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.log_level().unwrap(), tracing::Level::INFO);
    }

    #[test]
    fn test_user_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[runtime]\nflavor = \"current-thread\"\nworker_threads = 2\n\n[plan]\ndefault_delay_ms = 25\n",
        )
        .unwrap();

        let settings = Settings::load_with_env(Some(&path), NO_ENV).unwrap();
        assert_eq!(settings.runtime.flavor, RuntimeFlavor::CurrentThread);
        assert_eq!(settings.runtime.worker_threads(), 2);
        assert_eq!(settings.plan.default_delay_ms, 25);
        assert!(settings.output.pretty);
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[log]\nlevel = \"warn\"\n").unwrap();

        std::env::set_var("TASKEXEC_ENVTEST_LOG__LEVEL", "debug");
        let settings = Settings::load_with_env(Some(&path), "TASKEXEC_ENVTEST").unwrap();
        std::env::remove_var("TASKEXEC_ENVTEST_LOG__LEVEL");

        assert_eq!(settings.log_level().unwrap(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_explicit_source_wins() {
        let path = Path::new("/tmp/taskexec-settings.toml");
        assert_eq!(Settings::source(Some(path)), Some(path.to_path_buf()));
    }

    #[test]
    fn test_missing_user_file() {
        let err = Settings::load_with_env(Some(Path::new("/nonexistent/taskexec.toml")), NO_ENV).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_invalid_flavor_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[runtime]\nflavor = \"sideways\"\n").unwrap();

        let err = Settings::load_with_env(Some(&path), NO_ENV).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");

        Settings::init_at(&path, false).unwrap();
        let saved = Settings::load_with_env(Some(&path), NO_ENV).unwrap();
        assert_eq!(saved, Settings::default());

        let err = Settings::init_at(&path, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        Settings::init_at(&path, true).unwrap();
    }

    #[test]
    fn test_invalid_log_level() {
        let mut settings = Settings::default();
        settings.log.level = "loud".to_string();
        assert!(settings.log_level().is_err());
    }
}
