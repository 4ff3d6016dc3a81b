//! DeFi Liquidity Agent
//!
//! Core logic behind an agent that provides liquidity on Meteora DLMM pools:
//! - Resolve deposit amounts into base units, inferring one side from the
//!   active bin price when it is given as `auto`
//! - Extract liquidity removed and fees claimed from withdrawal receipts
//! - Retry RPC calls that fail with timeouts or connection errors
//!
//! Everything here is read-only. Nothing builds, signs or sends transactions.

pub mod config;
pub mod meteora;
pub mod retry;
pub mod solana;
pub mod tokens;
pub mod tools;
pub mod units;

mod error;

// Re-export commonly used types
pub use config::{Chain, Config, RpcConfig};
pub use error::{Error, Result};
pub use meteora::{BalanceChangeResult, LiquidityAmountRequest, ReceiptAnalyzer, ResolvedAmounts};
pub use retry::{with_retry, RetryPolicy};
