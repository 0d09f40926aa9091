// config.rs — Runtime settings read from the environment.
//
//   MOTOENGINE_DB         path to the SQLite file
//   MOTOENGINE_TOP_LIMIT  default leaderboard size

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::stats::DEFAULT_LIMIT;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path:   PathBuf,
    pub top_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path:   default_db_path(),
            top_limit: DEFAULT_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value lookup, so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup("MOTOENGINE_DB").filter(|p| !p.trim().is_empty()) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup("MOTOENGINE_TOP_LIMIT") {
            config.top_limit = raw.trim().parse().map_err(|e| Error::InvalidEnvValue {
                var:    "MOTOENGINE_TOP_LIMIT".to_string(),
                reason: format!("{e}"),
            })?;
        }
        Ok(config)
    }
}

/// Resolve motoengine.db inside the OS-appropriate data directory.
/// e.g. on Linux: ~/.local/share/motoengine/motoengine.db
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("motoengine")
        .join("motoengine.db")
}
