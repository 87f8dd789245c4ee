use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Runtime configuration
///
/// Sources, later ones winning: built-in defaults, an optional
/// `lockerwatch.toml` in the working directory (or an explicit file), then
/// `LOCKERWATCH_*` environment variables (e.g. `LOCKERWATCH_DATABASE_PATH`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// SQLite file holding lockers and parcels
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// `tracing` filter used when no `-v` flag is given
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("lockerwatch.db")
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and optional `lockerwatch.toml`
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, reading `file` instead of `lockerwatch.toml` when given
    pub fn load_from(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file_source = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("lockerwatch").required(false),
        };

        let builder = config::Config::builder()
            .set_default("database_path", "lockerwatch.db")?
            .set_default("log_filter", "warn")?
            .add_source(file_source)
            .add_source(config::Environment::with_prefix("LOCKERWATCH").try_parsing(true));

        builder.build()?.try_deserialize()
    }

    /// Settle a load result
    ///
    /// A file named with `file` must load. Without one, a broken implicit
    /// configuration falls back to defaults with a warning.
    pub fn or_defaults(
        loaded: Result<Self, config::ConfigError>,
        file: Option<&Path>,
    ) -> anyhow::Result<Self> {
        match (loaded, file) {
            (Ok(config), _) => Ok(config),
            (Err(e), Some(path)) => {
                Err(e).context(format!("Failed to load config from {}", path.display()))
            }
            (Err(e), None) => {
                warn!("Failed to load config, using defaults: {}", e);
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database_path, PathBuf::from("lockerwatch.db"));
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "database_path = \"/tmp/parcels.db\"").unwrap();

        let config = AppConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/parcels.db"));
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(AppConfig::load_from(Some(&missing)).is_err());
    }

    #[test]
    fn test_or_defaults_rejects_broken_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "database_path = \"/tmp/intended.db\"").unwrap();
        writeln!(file, "log_filter = [unterminated").unwrap();

        let loaded = AppConfig::load_from(Some(file.path()));
        let err = AppConfig::or_defaults(loaded, Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to load config from"));
    }

    #[test]
    fn test_or_defaults_rejects_missing_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");

        let loaded = AppConfig::load_from(Some(&missing));
        assert!(AppConfig::or_defaults(loaded, Some(&missing)).is_err());
    }

    #[test]
    fn test_or_defaults_falls_back_without_explicit_file() {
        let loaded = Err(config::ConfigError::Message("unreadable".to_string()));
        assert_eq!(
            AppConfig::or_defaults(loaded, None).unwrap(),
            AppConfig::default()
        );
    }

    #[test]
    fn test_or_defaults_keeps_loaded_config() {
        let config = AppConfig {
            database_path: PathBuf::from("/tmp/parcels.db"),
            log_filter: "info".to_string(),
        };
        let path = Path::new("lockerwatch.toml");
        assert_eq!(
            AppConfig::or_defaults(Ok(config.clone()), Some(path)).unwrap(),
            config
        );
    }
}
