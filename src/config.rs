//! Runtime configuration.
//!
//! Values come from the process environment, with a `.env` file loaded once
//! beforehand when present.

use std::path::PathBuf;
use std::sync::Once;

use crate::error::{AppError, AppResult};

pub const DEFAULT_BASE_URL: &str = "http://192.168.10.15:5000";
pub const DEFAULT_PLACEHOLDER_USER: &str = "aaa";

static DOTENV: Once = Once::new();

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Product server root, without a trailing slash
    pub base_url: String,
    /// SQLite catalog holding the wishlist and cellar tables
    pub db_path: PathBuf,
    /// User identifier a fresh install starts with
    pub placeholder_user: String,
    /// Identifiers the user directory accepts
    pub known_users: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        DOTENV.call_once(|| {
            let _ = dotenv::dotenv();
        });
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get("VINOBLE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let db_path = match get("VINOBLE_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        let placeholder_user =
            get("VINOBLE_PLACEHOLDER_USER").unwrap_or_else(|| DEFAULT_PLACEHOLDER_USER.to_string());

        let known_users = get("VINOBLE_KNOWN_USERS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            base_url,
            db_path,
            placeholder_user,
            known_users,
        })
    }
}

/// Catalog location in the user's data directory:
/// - Linux: ~/.local/share/vinoble/vinoble.db
/// - macOS: ~/Library/Application Support/vinoble/vinoble.db
/// - Windows: %APPDATA%\vinoble\vinoble.db
fn default_db_path() -> AppResult<PathBuf> {
    let mut path = dirs::data_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| AppError::Config("could not determine user data directory".into()))?;

    path.push("vinoble");
    path.push("vinoble.db");
    Ok(path)
}
