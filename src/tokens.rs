//! Shared token registry
//!
//! Well-known Solana SPL mints with their symbols and decimals, so callers can
//! name tokens by symbol wherever a mint is expected.

use std::collections::HashMap;

/// Token metadata
#[derive(Debug, Clone, Copy)]
pub struct TokenInfo {
    /// Token symbol (e.g., "USDC", "SOL")
    pub symbol: &'static str,
    /// Mint address (base58)
    pub mint: &'static str,
    /// Number of decimals
    pub decimals: u8,
}

impl TokenInfo {
    pub const fn new(symbol: &'static str, mint: &'static str, decimals: u8) -> Self {
        Self {
            symbol,
            mint,
            decimals,
        }
    }
}

/// Well-known mint addresses
pub mod mints {
    /// Wrapped SOL
    pub const SOL: &str = "So11111111111111111111111111111111111111112";
    pub const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
    pub const USDT: &str = "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB";
    pub const JUP: &str = "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN";
    pub const BONK: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";
}

/// Token registry providing lookups by symbol or mint
pub struct TokenRegistry {
    by_mint: HashMap<&'static str, TokenInfo>,
    by_symbol: HashMap<String, &'static str>,
}

impl TokenRegistry {
    /// Create a new token registry with all known tokens
    pub fn new() -> Self {
        let tokens = [
            TokenInfo::new("SOL", mints::SOL, 9),
            TokenInfo::new("USDC", mints::USDC, 6),
            TokenInfo::new("USDT", mints::USDT, 6),
            TokenInfo::new("JUP", mints::JUP, 6),
            TokenInfo::new("BONK", mints::BONK, 5),
        ];

        let mut by_mint = HashMap::new();
        let mut by_symbol = HashMap::new();
        for info in tokens {
            by_mint.insert(info.mint, info);
            by_symbol.insert(info.symbol.to_lowercase(), info.mint);
        }
        // wSOL is the same mint
        by_symbol.insert("wsol".to_string(), mints::SOL);

        Self { by_mint, by_symbol }
    }

    /// Get token info by mint address
    pub fn get(&self, mint: &str) -> Option<&TokenInfo> {
        self.by_mint.get(mint)
    }

    /// Get token info by symbol (case-insensitive)
    pub fn get_by_symbol(&self, symbol: &str) -> Option<&TokenInfo> {
        let mint = self.by_symbol.get(&symbol.to_lowercase())?;
        self.by_mint.get(mint)
    }

    /// Resolve a symbol or mint to a mint address. Unknown inputs are
    /// assumed to already be mint addresses and are returned unchanged.
    pub fn resolve_mint<'a>(&self, symbol_or_mint: &'a str) -> &'a str {
        self.get_by_symbol(symbol_or_mint)
            .map(|info| info.mint)
            .unwrap_or(symbol_or_mint)
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global token registry (lazy initialized)
static REGISTRY: std::sync::OnceLock<TokenRegistry> = std::sync::OnceLock::new();

/// Get the global token registry
pub fn registry() -> &'static TokenRegistry {
    REGISTRY.get_or_init(TokenRegistry::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_symbol() {
        let registry = TokenRegistry::new();

        let sol = registry.get_by_symbol("sol").unwrap();
        assert_eq!(sol.mint, mints::SOL);
        assert_eq!(sol.decimals, 9);

        let usdc = registry.get_by_symbol("USDC").unwrap();
        assert_eq!(usdc.mint, mints::USDC);
        assert_eq!(usdc.decimals, 6);

        assert_eq!(registry.get_by_symbol("wsol").unwrap().symbol, "SOL");
        assert!(registry.get_by_symbol("doge").is_none());
    }

    #[test]
    fn test_lookup_by_mint() {
        let registry = TokenRegistry::new();
        assert_eq!(registry.get(mints::BONK).unwrap().decimals, 5);
        assert!(registry.get("11111111111111111111111111111111").is_none());
    }

    #[test]
    fn test_resolve_mint() {
        let registry = TokenRegistry::new();
        assert_eq!(registry.resolve_mint("usdc"), mints::USDC);
        assert_eq!(registry.resolve_mint(mints::JUP), mints::JUP);
        assert_eq!(registry.resolve_mint("SomeUnknownMint111"), "SomeUnknownMint111");
    }

    #[test]
    fn test_global_registry() {
        assert!(registry().get(mints::USDC).is_some());
    }
}
