use dirs::home_dir;
use std::{
    env,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".shared_expenses";
const HOME_ENV: &str = "SHARED_EXPENSES_HOME";
const CONFIG_FILE: &str = "config.json";
const DATABASE_FILE: &str = "expenses.sqlite3";
const FALLBACK_FILE: &str = "expenses.json";

/// Returns the application-specific data directory, defaulting to `~/.shared_expenses`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Path of the persisted configuration inside `base`.
pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Default location of the relational expense database inside `base`.
pub fn database_file_in(base: &Path) -> PathBuf {
    base.join(DATABASE_FILE)
}

/// Default location of the local fallback document inside `base`.
pub fn fallback_file_in(base: &Path) -> PathBuf {
    base.join(FALLBACK_FILE)
}
