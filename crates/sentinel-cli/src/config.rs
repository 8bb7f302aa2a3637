//! Layered CLI configuration
//!
//! Lowest to highest precedence: built-in defaults, the config file
//! (`sentinel.toml` in the working directory, or `--config`), `SENTINEL_*`
//! environment variables (after `.env` is loaded), then explicit flags.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use sentinel_core::logging_facility::Profile;
use sentinel_core::NormalizeOptions;
use sentinel_store::CollisionPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "sentinel";
const ENV_PREFIX: &str = "SENTINEL";

/// Effective settings for one CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentinelConfig {
    pub db_path: PathBuf,
    pub election: String,
    pub source: String,
    pub year: u32,
    pub collision_policy: CollisionPolicy,
    pub log_profile: String,
}

impl SentinelConfig {
    /// Load from process environment, `.env`, and the config file.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        // A missing .env is normal
        let _ = dotenvy::dotenv();
        Self::load_from(config_file, None)
    }

    /// Load with an explicit environment map in place of the process
    /// environment (`None` reads the process environment).
    pub fn load_from(
        config_file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let defaults = NormalizeOptions::default();

        let file_source = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .set_default("db_path", ".sentinel/ledger.db")?
            .set_default("election", defaults.election)?
            .set_default("source", defaults.source)?
            .set_default("year", i64::from(defaults.year))?
            .set_default("collision_policy", "replace")?
            .set_default("log_profile", "development")?
            .add_source(file_source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .context("failed to read configuration")?;

        settings
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Apply the `--db` flag.
    pub fn with_db_override(mut self, db: Option<PathBuf>) -> Self {
        if let Some(db) = db {
            self.db_path = db;
        }
        self
    }

    pub fn profile(&self) -> Result<Profile> {
        self.log_profile
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("invalid log_profile")
    }

    pub fn normalize_options(&self, year: Option<u32>) -> NormalizeOptions {
        NormalizeOptions {
            election: self.election.clone(),
            source: self.source.clone(),
            year: year.unwrap_or(self.year),
        }
    }

    /// Render as TOML, the same shape the config file accepts.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("failed to render configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn no_env() -> Option<config::Map<String, String>> {
        Some(config::Map::new())
    }

    #[test]
    fn test_defaults() {
        let config = SentinelConfig::load_from(None, no_env()).unwrap();

        assert_eq!(config.election, "HN-PRESIDENTIAL");
        assert_eq!(config.source, "CNE");
        assert_eq!(config.year, 2025);
        assert_eq!(config.collision_policy, CollisionPolicy::Replace);
        assert_eq!(config.profile().unwrap(), Profile::Development);
    }

    #[test]
    fn test_file_then_env_precedence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(
            &path,
            "db_path = \"/var/lib/sentinel/ledger.db\"\nyear = 2029\ncollision_policy = \"reject\"\nsource = \"MIRROR\"\n",
        )
        .unwrap();

        let env = config::Map::from([
            ("SENTINEL_YEAR".to_string(), "2030".to_string()),
            ("SENTINEL_LOG_PROFILE".to_string(), "production".to_string()),
        ]);
        let config = SentinelConfig::load_from(Some(&path), Some(env)).unwrap();

        assert_eq!(config.db_path, PathBuf::from("/var/lib/sentinel/ledger.db"));
        assert_eq!(config.source, "MIRROR");
        assert_eq!(config.collision_policy, CollisionPolicy::Reject);
        assert_eq!(config.year, 2030);
        assert_eq!(config.profile().unwrap(), Profile::Production);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(SentinelConfig::load_from(Some(&missing), no_env()).is_err());
    }

    #[test]
    fn test_db_flag_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.toml");
        fs::write(&path, "db_path = \"from-file.db\"\n").unwrap();

        let config = SentinelConfig::load_from(Some(&path), no_env())
            .unwrap()
            .with_db_override(Some(PathBuf::from("from-flag.db")));
        assert_eq!(config.db_path, PathBuf::from("from-flag.db"));
    }

    #[test]
    fn test_year_flag_overrides_config_year() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.toml");
        fs::write(&path, "year = 2029\n").unwrap();
        let config = SentinelConfig::load_from(Some(&path), no_env()).unwrap();

        assert_eq!(config.normalize_options(None).year, 2029);
        assert_eq!(config.normalize_options(Some(2031)).year, 2031);
    }

    #[test]
    fn test_toml_rendering_reloads() {
        let dir = TempDir::new().unwrap();
        let first_path = dir.path().join("first.toml");
        fs::write(&first_path, "election = \"HN-MUNICIPAL\"\n").unwrap();
        let first = SentinelConfig::load_from(Some(&first_path), no_env()).unwrap();

        let path = dir.path().join("rendered.toml");
        fs::write(&path, first.to_toml().unwrap()).unwrap();
        let second = SentinelConfig::load_from(Some(&path), no_env()).unwrap();
        assert_eq!(first, second);
    }
}
