//! Application configuration loaded from environment variables.

use std::env;

#[cfg(feature = "d1")]
use blog_infra::D1Config;
#[cfg(feature = "sqlite")]
use blog_infra::SqliteConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Route prefix, either empty or `/segment` without a trailing slash.
    pub base_path: String,
    pub api_version: String,
    pub storage: StorageConfig,
}

/// Which backend serves the repositories.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Memory,
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteConfig),
    #[cfg(feature = "d1")]
    D1(D1Config),
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let backend = env::var("STORAGE_BACKEND").unwrap_or_default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            base_path: normalize_base_path(&env::var("BASE_PATH").unwrap_or_default()),
            api_version: env::var("API_VERSION").unwrap_or_else(|_| "1.0.0".to_string()),
            storage: StorageConfig::from_name(&backend),
        }
    }
}

impl StorageConfig {
    fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "" | "memory" => StorageConfig::Memory,
            "sqlite" => Self::sqlite(),
            "d1" => Self::d1(),
            other => {
                tracing::warn!(backend = other, "Unknown STORAGE_BACKEND, using in-memory storage");
                StorageConfig::Memory
            }
        }
    }

    #[cfg(feature = "sqlite")]
    fn sqlite() -> Self {
        let path = env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/database.db".to_string());
        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        StorageConfig::Sqlite(SqliteConfig::file(&path, max_connections))
    }

    #[cfg(not(feature = "sqlite"))]
    fn sqlite() -> Self {
        tracing::warn!("Built without the sqlite feature, using in-memory storage");
        StorageConfig::Memory
    }

    #[cfg(feature = "d1")]
    fn d1() -> Self {
        let credentials = (
            env::var("CLOUDFLARE_ACCOUNT_ID"),
            env::var("D1_DATABASE_ID"),
            env::var("CLOUDFLARE_API_TOKEN"),
        );

        match credentials {
            (Ok(account_id), Ok(database_id), Ok(api_token)) => StorageConfig::D1(D1Config {
                api_base: env::var("D1_API_BASE")
                    .unwrap_or_else(|_| D1Config::DEFAULT_API_BASE.to_string()),
                account_id,
                database_id,
                api_token,
            }),
            _ => {
                tracing::warn!(
                    "CLOUDFLARE_ACCOUNT_ID, D1_DATABASE_ID and CLOUDFLARE_API_TOKEN are required for D1. Using in-memory storage."
                );
                StorageConfig::Memory
            }
        }
    }

    #[cfg(not(feature = "d1"))]
    fn d1() -> Self {
        tracing::warn!("Built without the d1 feature, using in-memory storage");
        StorageConfig::Memory
    }
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_path_normalization() {
        assert_eq!(normalize_base_path(""), "");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path("api"), "/api");
        assert_eq!(normalize_base_path("/api/v1/"), "/api/v1");
    }

    #[test]
    fn test_unknown_backend_falls_back_to_memory() {
        assert!(matches!(StorageConfig::from_name("mongo"), StorageConfig::Memory));
        assert!(matches!(StorageConfig::from_name(" Memory "), StorageConfig::Memory));
    }
}
