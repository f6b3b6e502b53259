//! Data directory layout.
//!
//! Everything the client persists lives under one directory:
//! `config.toml` and the `urna.db` session database.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "URNA_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `URNA_DATA_DIR` environment variable
/// 2. `~/.urna`
/// 3. `./.urna` when no home directory is known
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".urna");
    }

    PathBuf::from(".urna")
}
