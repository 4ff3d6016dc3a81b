//! Meteora DLMM utilities
//!
//! - `amounts`: base-unit amounts for dual-sided deposits, one side may be `auto`
//! - `receipt`: liquidity removed and fees claimed by a withdrawal transaction
//! - `instruction`: DLMM instruction identification by Anchor discriminator

pub mod amounts;
pub mod instruction;
pub mod receipt;

pub use amounts::{resolve, Amount, LiquidityAmountRequest, ResolvedAmounts};
pub use receipt::{analyze_receipt, BalanceChangeResult, ReceiptAnalyzer};

/// Meteora DLMM program id on mainnet
pub const DLMM_PROGRAM_ID: &str = "LBUZKhRxPF3XUpBCjp4YzTKgLccjZhTSDM9YuVaPwxo";
