//! Runtime configuration
//!
//! Everything is read from environment variables with safe fallbacks,
//! so the binary starts with no configuration at all.

use crate::learning::quiz::DEFAULT_PASSING_SCORE;
use std::path::PathBuf;
use std::time::Duration;

/// Storage key of the serialized learning state
pub const LEARNING_DATA_KEY: &str = "learningData";

/// Configuration for the learning engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum quiz score (percent) that counts as a pass
    pub passing_score: f64,
    /// Key the state snapshot is stored under
    pub storage_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            passing_score: DEFAULT_PASSING_SCORE,
            storage_key: LEARNING_DATA_KEY.to_string(),
        }
    }
}

/// Configuration for the hosting binary
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file for persisted state; `None` uses `skillspark.db`
    pub database_path: Option<PathBuf>,
    /// Simulated delay of the catalog fetch
    pub catalog_latency: Duration,
    /// Simulated delay of identity provider calls
    pub identity_latency: Duration,
    pub engine: EngineConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_path: None,
            catalog_latency: Duration::ZERO,
            identity_latency: Duration::ZERO,
            engine: EngineConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable lookup; unparseable values keep the default
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let database_path = lookup("SKILLSPARK_DB").map(PathBuf::from);
        let catalog_latency = lookup("SKILLSPARK_CATALOG_LATENCY_MS")
            .and_then(|ms| ms.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.catalog_latency);
        let identity_latency = lookup("SKILLSPARK_IDENTITY_LATENCY_MS")
            .and_then(|ms| ms.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.identity_latency);
        let passing_score = lookup("SKILLSPARK_PASSING_SCORE")
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|s| (0.0..=100.0).contains(s))
            .unwrap_or(defaults.engine.passing_score);

        Self {
            host,
            port,
            database_path,
            catalog_latency,
            identity_latency,
            engine: EngineConfig {
                passing_score,
                ..defaults.engine
            },
        }
    }
}
