/// Which [`MovieStore`](cinedash_db::store::MovieStore) implementation to
/// serve from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL via `DATABASE_URL`.
    Postgres,
    /// Process memory; data is lost on restart.
    Memory,
}

impl StoreBackend {
    /// Parse a backend name. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Some(Self::Postgres),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on closing the store after the server stops (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Storage backend (default: `postgres`).
    pub store: StoreBackend,
    /// Maximum PostgreSQL pool size (default: `20`).
    pub db_max_connections: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `MOVIE_STORE`          | `postgres`                 |
    /// | `DB_MAX_CONNECTIONS`   | `20`                       |
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = get("HOST", "0.0.0.0");

        let port: u16 = get("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = get("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = get("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = get("SHUTDOWN_TIMEOUT_SECS", "30")
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let store = StoreBackend::from_str(&get("MOVIE_STORE", "postgres"))
            .expect("MOVIE_STORE must be 'postgres' or 'memory'");

        let db_max_connections: u32 = get("DB_MAX_CONNECTIONS", "20")
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            store,
            db_max_connections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.store, StoreBackend::Postgres);
        assert_eq!(config.db_max_connections, 20);
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = config_from(&[("CORS_ORIGINS", "http://a.test, http://b.test,,")]);
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn memory_backend_is_selectable() {
        let config = config_from(&[("MOVIE_STORE", "Memory"), ("PORT", "8080")]);
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.port, 8080);
    }

    #[test]
    #[should_panic(expected = "MOVIE_STORE")]
    fn unknown_backend_panics() {
        config_from(&[("MOVIE_STORE", "mongo")]);
    }
}
