//! Server configuration from environment variables

use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8000;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database file (`REQCHAT_DB_PATH`)
    pub db_path: PathBuf,
    /// Listen port on all interfaces (`REQCHAT_PORT`)
    pub port: u16,
    /// Optional JSON file of suppliers loaded at startup (`REQCHAT_SUPPLIER_SEED`)
    pub supplier_seed: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = var("REQCHAT_DB_PATH").map_or_else(
            || {
                let home = var("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".requisition-chat/requisitions.db")
            },
            PathBuf::from,
        );

        let port = var("REQCHAT_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let supplier_seed = var("REQCHAT_SUPPLIER_SEED")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Self {
            db_path,
            port,
            supplier_seed,
        }
    }
}
