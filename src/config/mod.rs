use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    currency::DEFAULT_SYMBOL,
    errors::LedgerError,
    storage::StoreSettings,
    utils::{
        paths::{config_file_in, database_file_in, fallback_file_in},
        persistence::{ensure_dir, write_atomic},
    },
};

/// Categories offered when no configuration overrides them.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Housing",
    "Take out food",
    "Groceries",
    "Household utilities",
    "Transportation",
    "Entertainment",
];

/// User-configurable preferences for the ledger and its storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_categories")]
    pub categories: Vec<String>,
    /// Primary expense database. Defaults to `expenses.sqlite3` in the data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    /// Local fallback document. Defaults to `expenses.json` in the data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_path: Option<PathBuf>,
    #[serde(default = "Config::default_seed_demo_data")]
    pub seed_demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency_symbol: Self::default_currency_symbol(),
            categories: Self::default_categories(),
            database_path: None,
            fallback_path: None,
            seed_demo_data: Self::default_seed_demo_data(),
        }
    }
}

impl Config {
    fn default_currency_symbol() -> String {
        DEFAULT_SYMBOL.to_string()
    }

    fn default_categories() -> Vec<String> {
        DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
    }

    fn default_seed_demo_data() -> bool {
        true
    }

    /// Resolves storage locations, filling unset paths relative to `base`.
    pub fn store_settings(&self, base: &Path) -> StoreSettings {
        StoreSettings {
            database_path: Some(
                self.database_path
                    .clone()
                    .unwrap_or_else(|| database_file_in(base)),
            ),
            fallback_path: Some(
                self.fallback_path
                    .clone()
                    .unwrap_or_else(|| fallback_file_in(base)),
            ),
            seed_demo_data: self.seed_demo_data,
        }
    }
}

/// Loads and saves [`Config`] as JSON inside the application data directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base).map_err(config_error)?;
        let path = config_file_in(&base);
        Ok(Self { base, path })
    }

    pub fn load(&self) -> Result<Config, LedgerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path).map_err(config_error)?;
            let config: Config = serde_json::from_str(&data).map_err(config_error)?;
            tracing::debug!(path = %self.path.display(), "configuration loaded");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(config).map_err(config_error)?;
        write_atomic(&self.path, &json).map_err(config_error)?;
        tracing::info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn config_error(err: impl std::fmt::Display) -> LedgerError {
    LedgerError::Config(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.categories.len(), DEFAULT_CATEGORIES.len());
    }

    #[test]
    fn partial_documents_fill_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"locale":"en-GB"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.locale, "en-GB");
        assert_eq!(config.currency_symbol, "$");
        assert!(config.seed_demo_data);
    }

    #[test]
    fn malformed_documents_are_config_errors() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "{ not json").unwrap();
        assert!(matches!(manager.load(), Err(LedgerError::Config(_))));
    }

    #[test]
    fn store_settings_default_into_base_dir() {
        let base = PathBuf::from("/tmp/shared");
        let settings = Config::default().store_settings(&base);
        assert_eq!(
            settings.database_path,
            Some(base.join("expenses.sqlite3"))
        );
        assert_eq!(settings.fallback_path, Some(base.join("expenses.json")));
    }
}
