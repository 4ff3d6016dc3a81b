//! Solana JSON-RPC client
//!
//! Read-only: fetches parsed transactions by signature. Signing and sending
//! are handled elsewhere.

use super::transaction::ParsedTransaction;
use super::TransactionFetcher;
use crate::config::{Chain, RpcConfig};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// Minimal Solana RPC client over HTTP
#[derive(Debug, Clone)]
pub struct SolanaRpcClient {
    http: reqwest::Client,
    url: url::Url,
}

impl SolanaRpcClient {
    /// Create a client for `rpc_url` with a per-request timeout
    pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| Error::Config(format!("Invalid Solana RPC URL: {}", e)))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, url })
    }

    /// Create a client from the Solana entry of an RPC config
    pub fn from_rpc_config(config: &RpcConfig, timeout: Duration) -> Result<Self> {
        let url = config
            .get(Chain::Solana)
            .ok_or_else(|| Error::Config("No RPC URL configured for solana".to_string()))?;
        Self::new(url, timeout)
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    fn get_transaction_request(signature: &str) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getTransaction",
            "params": [
                signature,
                {
                    "encoding": "jsonParsed",
                    "maxSupportedTransactionVersion": 0,
                    "commitment": "confirmed"
                }
            ]
        })
    }
}

/// Interpret a JSON-RPC response body for `getTransaction`
fn parse_get_transaction_response(body: Value) -> Result<Option<ParsedTransaction>> {
    if let Some(error) = body.get("error") {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(Error::Rpc(message));
    }

    match body.get("result") {
        None => Err(Error::Rpc("Invalid RPC response format".to_string())),
        Some(Value::Null) => Ok(None),
        Some(result) => Ok(Some(serde_json::from_value(result.clone())?)),
    }
}

#[async_trait]
impl TransactionFetcher for SolanaRpcClient {
    async fn get_parsed_transaction(&self, signature: &str) -> Result<Option<ParsedTransaction>> {
        tracing::debug!(signature = %signature, rpc = %self.url, "Fetching parsed transaction");

        let response = self
            .http
            .post(self.url.clone())
            .json(&Self::get_transaction_request(signature))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // 408/504 bodies rarely say "timeout" themselves
            let text = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                408 | 504 => Error::Timeout(format!("HTTP {}: {}", status, text)),
                _ => Error::Rpc(format!("HTTP {}: {}", status, text)),
            });
        }

        let body: Value = response.json().await?;
        parse_get_transaction_response(body)
    }
}
