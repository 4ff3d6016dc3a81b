//! RPC endpoint configuration
//!
//! Resolution order per chain:
//! 1. Per-chain env vars (SOLANA_RPC_URL, ETH_RPC_URL, BASE_RPC_URL, ...)
//! 2. Provider API keys (HELIUS_API_KEY for Solana, ALCHEMY_API_KEY for EVM chains)
//! 3. Public RPC fallbacks - for testing only
//!
//! # Examples
//!
//! ```bash
//! export SOLANA_RPC_URL="https://mainnet.helius-rpc.com/?api-key=YOUR_KEY"
//! export BASE_RPC_URL="https://base-mainnet.g.alchemy.com/v2/YOUR_KEY"
//! ```

use super::Chain;
use std::collections::HashMap;

/// RPC configuration for multiple chains
#[derive(Debug, Clone)]
pub struct RpcConfig {
    urls: HashMap<Chain, String>,
}

/// Environment variable names
mod env_vars {
    pub const SOLANA_RPC_URL: &str = "SOLANA_RPC_URL";
    pub const ETH_RPC_URL: &str = "ETH_RPC_URL";
    pub const BASE_RPC_URL: &str = "BASE_RPC_URL";
    pub const ARBITRUM_RPC_URL: &str = "ARBITRUM_RPC_URL";
    pub const OPTIMISM_RPC_URL: &str = "OPTIMISM_RPC_URL";
    pub const POLYGON_RPC_URL: &str = "POLYGON_RPC_URL";

    pub const HELIUS_API_KEY: &str = "HELIUS_API_KEY";
    pub const ALCHEMY_API_KEY: &str = "ALCHEMY_API_KEY";
}

/// Public RPC endpoints (rate limited, for testing only)
mod public_rpcs {
    pub const SOLANA: &str = "https://api.mainnet-beta.solana.com";
    pub const ETHEREUM: &str = "https://eth.llamarpc.com";
    pub const BASE: &str = "https://mainnet.base.org";
    pub const ARBITRUM: &str = "https://arb1.arbitrum.io/rpc";
    pub const OPTIMISM: &str = "https://mainnet.optimism.io";
    pub const POLYGON: &str = "https://polygon-rpc.com";
}

fn url_env_var(chain: Chain) -> &'static str {
    match chain {
        Chain::Solana => env_vars::SOLANA_RPC_URL,
        Chain::Ethereum => env_vars::ETH_RPC_URL,
        Chain::Base => env_vars::BASE_RPC_URL,
        Chain::Arbitrum => env_vars::ARBITRUM_RPC_URL,
        Chain::Optimism => env_vars::OPTIMISM_RPC_URL,
        Chain::Polygon => env_vars::POLYGON_RPC_URL,
    }
}

fn public_rpc(chain: Chain) -> &'static str {
    match chain {
        Chain::Solana => public_rpcs::SOLANA,
        Chain::Ethereum => public_rpcs::ETHEREUM,
        Chain::Base => public_rpcs::BASE,
        Chain::Arbitrum => public_rpcs::ARBITRUM,
        Chain::Optimism => public_rpcs::OPTIMISM,
        Chain::Polygon => public_rpcs::POLYGON,
    }
}

fn alchemy_url(chain: Chain, key: &str) -> Option<String> {
    let network = match chain {
        Chain::Ethereum => "eth-mainnet",
        Chain::Base => "base-mainnet",
        Chain::Arbitrum => "arb-mainnet",
        Chain::Optimism => "opt-mainnet",
        Chain::Polygon => "polygon-mainnet",
        Chain::Solana => return None,
    };
    Some(format!("https://{}.g.alchemy.com/v2/{}", network, key))
}

impl RpcConfig {
    /// Create RPC config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut urls = HashMap::new();

        // Priority 1: per-chain URLs
        for chain in Chain::ALL {
            let var = url_env_var(chain);
            if let Some(url) = lookup(var) {
                tracing::debug!(chain = chain.name(), "Using {} for {}", var, chain.name());
                urls.insert(chain, url);
            }
        }

        // Priority 2: provider keys for chains still missing
        if !urls.contains_key(&Chain::Solana) {
            if let Some(key) = lookup(env_vars::HELIUS_API_KEY) {
                tracing::info!("Building Solana RPC URL from HELIUS_API_KEY");
                urls.insert(
                    Chain::Solana,
                    format!("https://mainnet.helius-rpc.com/?api-key={}", key),
                );
            }
        }
        if let Some(key) = lookup(env_vars::ALCHEMY_API_KEY) {
            for chain in Chain::ALL {
                if urls.contains_key(&chain) {
                    continue;
                }
                if let Some(url) = alchemy_url(chain, &key) {
                    tracing::debug!(chain = chain.name(), "Using ALCHEMY_API_KEY");
                    urls.insert(chain, url);
                }
            }
        }

        // Priority 3: public fallbacks
        for chain in Chain::ALL {
            urls.entry(chain).or_insert_with(|| {
                tracing::warn!(
                    chain = chain.name(),
                    "No RPC configured, using public RPC (rate limited)"
                );
                public_rpc(chain).to_string()
            });
        }

        Self { urls }
    }

    /// Create with explicit RPC URLs
    pub fn with_urls(urls: HashMap<Chain, String>) -> Self {
        Self { urls }
    }

    /// Get RPC URL for a chain
    pub fn get(&self, chain: Chain) -> Option<&str> {
        self.urls.get(&chain).map(|s| s.as_str())
    }

    /// Check if a chain is configured
    pub fn has_chain(&self, chain: Chain) -> bool {
        self.urls.contains_key(&chain)
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(vars: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        move |name| vars.get(name).map(|v| v.to_string())
    }

    #[test]
    fn test_public_fallbacks_cover_all_chains() {
        let config = RpcConfig::from_lookup(lookup_from(&[]));

        for chain in Chain::ALL {
            assert!(config.has_chain(chain));
        }
        assert_eq!(config.get(Chain::Solana), Some(public_rpcs::SOLANA));
        assert_eq!(config.get(Chain::Base), Some(public_rpcs::BASE));
    }

    #[test]
    fn test_per_chain_url_wins_over_provider_key() {
        let config = RpcConfig::from_lookup(lookup_from(&[
            ("SOLANA_RPC_URL", "https://custom.solana"),
            ("HELIUS_API_KEY", "helius"),
            ("BASE_RPC_URL", "https://custom.base"),
            ("ALCHEMY_API_KEY", "alchemy"),
        ]));

        assert_eq!(config.get(Chain::Solana), Some("https://custom.solana"));
        assert_eq!(config.get(Chain::Base), Some("https://custom.base"));
        assert_eq!(
            config.get(Chain::Ethereum),
            Some("https://eth-mainnet.g.alchemy.com/v2/alchemy")
        );
    }

    #[test]
    fn test_helius_key_builds_solana_url() {
        let config = RpcConfig::from_lookup(lookup_from(&[("HELIUS_API_KEY", "abc")]));
        assert_eq!(
            config.get(Chain::Solana),
            Some("https://mainnet.helius-rpc.com/?api-key=abc")
        );
    }

    #[test]
    fn test_with_urls() {
        let mut urls = HashMap::new();
        urls.insert(Chain::Solana, "http://localhost:8899".to_string());
        let config = RpcConfig::with_urls(urls);

        assert_eq!(config.get(Chain::Solana), Some("http://localhost:8899"));
        assert_eq!(config.get(Chain::Polygon), None);
    }
}
