//! Meteora DLMM liquidity tool
//!
//! Read-only: computes deposit amounts and inspects withdrawal receipts.
//! It never builds or signs transactions.

use super::{Tool, TOOL_METEORA_LIQUIDITY};
use crate::meteora::{resolve, LiquidityAmountRequest, ReceiptAnalyzer};
use crate::solana::TransactionFetcher;
use crate::tokens::registry;
use crate::units::format_units;
use crate::{Error, Result};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MeteoraAction {
    CalculateAmounts,
    ExtractBalanceChanges,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MeteoraInput {
    pub action: Option<MeteoraAction>,
    /// Amount of the first token, or "auto"
    pub amount: Option<String>,
    /// Amount of the second token, or "auto"
    pub amount_b: Option<String>,
    /// Price of one first token in second tokens at the active bin
    pub active_bin_price_per_token: Option<String>,
    pub token_x_decimals: Option<u8>,
    pub token_y_decimals: Option<u8>,
    /// Withdrawal transaction signature
    pub signature: Option<String>,
    /// First token, symbol or mint
    pub asset: Option<String>,
    /// Second token, symbol or mint
    pub asset_b: Option<String>,
}

/// Tool for Meteora DLMM positions
///
/// Actions:
/// - `calculate_amounts`: base-unit deposit amounts, one side may be "auto"
/// - `extract_balance_changes`: liquidity removed and fees claimed by a withdrawal
pub struct MeteoraTool<F> {
    analyzer: ReceiptAnalyzer<F>,
}

impl<F: TransactionFetcher> MeteoraTool<F> {
    pub fn new(analyzer: ReceiptAnalyzer<F>) -> Self {
        Self { analyzer }
    }

    fn calculate_amounts(&self, args: &MeteoraInput) -> Result<Value> {
        let token_x_decimals =
            decimals_for(args.token_x_decimals, args.asset.as_deref(), "token_x_decimals")?;
        let token_y_decimals =
            decimals_for(args.token_y_decimals, args.asset_b.as_deref(), "token_y_decimals")?;

        let request = LiquidityAmountRequest {
            amount: args.amount.clone().unwrap_or_default(),
            amount_b: args.amount_b.clone().unwrap_or_default(),
            active_bin_price_per_token: args.active_bin_price_per_token.clone().unwrap_or_default(),
            token_x_decimals,
            token_y_decimals,
        };
        let resolved = resolve(&request)?;

        Ok(json!({
            "action": "calculate_amounts",
            "total_x_amount": resolved.total_x_amount.to_string(),
            "total_y_amount": resolved.total_y_amount.to_string(),
            "total_x_formatted": format_units(resolved.total_x_amount, token_x_decimals),
            "total_y_formatted": format_units(resolved.total_y_amount, token_y_decimals),
        }))
    }

    async fn extract_balance_changes(&self, args: &MeteoraInput) -> Result<Value> {
        let signature = required(&args.signature, "signature")?;
        let token_x_mint = registry().resolve_mint(required(&args.asset, "asset")?);
        let token_y_mint = registry().resolve_mint(required(&args.asset_b, "asset_b")?);

        let changes = self
            .analyzer
            .extract_balance_changes(signature, token_x_mint, token_y_mint)
            .await?;

        Ok(json!({
            "action": "extract_balance_changes",
            "signature": signature,
            "token_x_mint": token_x_mint,
            "token_y_mint": token_y_mint,
            "liquidity_removed": changes.liquidity_removed,
            "fees_claimed": changes.fees_claimed,
        }))
    }
}

fn required<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str> {
    field
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| Error::InvalidInput(format!("Missing '{}'", name)))
}

/// Explicit decimals, or the registry's for a known token
fn decimals_for(explicit: Option<u8>, asset: Option<&str>, name: &str) -> Result<u8> {
    explicit
        .or_else(|| {
            let asset = asset?;
            registry()
                .get_by_symbol(asset)
                .or_else(|| registry().get(asset))
                .map(|token| token.decimals)
        })
        .ok_or_else(|| {
            Error::InvalidInput(format!("Missing '{}' and asset is not a known token", name))
        })
}

#[async_trait]
impl<F: TransactionFetcher> Tool for MeteoraTool<F> {
    const NAME: &'static str = TOOL_METEORA_LIQUIDITY;
    type Input = MeteoraInput;

    fn description(&self) -> &'static str {
        "Meteora DLMM liquidity helper. Actions: 'calculate_amounts' (base-unit deposit \
         amounts; one of amount/amount_b may be 'auto' and is derived from \
         active_bin_price_per_token), 'extract_balance_changes' (liquidity removed and \
         fees claimed by a withdrawal transaction). Read-only."
    }

    async fn execute(&self, args: Self::Input) -> Result<Value> {
        let action = args
            .action
            .clone()
            .ok_or_else(|| Error::InvalidInput("Missing 'action' field".to_string()))?;

        tracing::debug!(action = ?action, "Executing meteora tool");

        match action {
            MeteoraAction::CalculateAmounts => self.calculate_amounts(&args),
            MeteoraAction::ExtractBalanceChanges => self.extract_balance_changes(&args).await,
        }
    }
}
