//! Solana transaction access
//!
//! The analyzer only needs one capability from the chain: fetching a parsed
//! transaction by signature. That capability is the `TransactionFetcher`
//! trait; `SolanaRpcClient` is the JSON-RPC implementation.

mod client;
pub mod transaction;

use crate::Result;
use async_trait::async_trait;

pub use client::SolanaRpcClient;
pub use transaction::{
    DecodedInstruction, OuterInstruction, ParsedTransaction, TokenTransfer,
    TransactionReceiptView,
};

/// Source of parsed transactions
#[async_trait]
pub trait TransactionFetcher: Send + Sync {
    /// Fetch a transaction by signature; `Ok(None)` when the node has no record of it
    async fn get_parsed_transaction(&self, signature: &str) -> Result<Option<ParsedTransaction>>;
}
