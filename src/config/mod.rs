//! Configuration for the liquidity agent

pub mod rpc;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// Re-export RPC config
pub use rpc::RpcConfig;

/// Supported blockchain networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    Ethereum,
    Base,
    Arbitrum,
    Optimism,
    Polygon,
    Solana,
}

impl Chain {
    pub const ALL: [Chain; 6] = [
        Chain::Ethereum,
        Chain::Base,
        Chain::Arbitrum,
        Chain::Optimism,
        Chain::Polygon,
        Chain::Solana,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Base => "base",
            Chain::Arbitrum => "arbitrum",
            Chain::Optimism => "optimism",
            Chain::Polygon => "polygon",
            Chain::Solana => "solana",
        }
    }
}

/// Retry settings for RPC calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Base backoff; attempt `n` waits `n * initial_delay_ms`
    pub initial_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1_000,
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Retry settings
    pub retry: RetryConfig,
    /// Per-request HTTP timeout (milliseconds)
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            request_timeout_ms: 30_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn retry_settings_deserialize_defaults() {
        let value = serde_json::json!({});
        let parsed: Config = serde_json::from_value(value).expect("parse config");
        assert_eq!(parsed.retry.max_attempts, 3);
        assert_eq!(parsed.retry.initial_delay_ms, 1_000);
        assert_eq!(parsed.request_timeout_ms, 30_000);
    }

    #[test]
    fn retry_settings_deserialize_explicit() {
        let value = serde_json::json!({
            "retry": {
                "max_attempts": 5,
                "initial_delay_ms": 0
            },
            "request_timeout_ms": 5000
        });
        let parsed: Config = serde_json::from_value(value).expect("parse config");
        assert_eq!(parsed.retry.max_attempts, 5);
        assert_eq!(parsed.retry.initial_delay_ms, 0);
        assert_eq!(parsed.request_timeout_ms, 5000);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"retry": {{"max_attempts": 2}}}}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.request_timeout_ms, 30_000);
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.initial_delay_ms, 1_000);
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let err = Config::load(Path::new("/nonexistent/liquidity-agent.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn chain_names_are_unique() {
        let mut names: Vec<_> = Chain::ALL.iter().map(Chain::name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Chain::ALL.len());
    }
}
