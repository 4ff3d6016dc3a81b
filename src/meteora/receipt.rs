//! Balance changes from remove-liquidity receipts
//!
//! A DLMM withdrawal transaction carries a remove-liquidity instruction and a
//! claim-fee instruction. The tokens each one paid out show up as SPL Token
//! `transferChecked` inner instructions beneath it.

use super::instruction::{classify, DlmmInstructionKind};
use super::DLMM_PROGRAM_ID;
use crate::retry::RetryPolicy;
use crate::solana::{DecodedInstruction, TransactionFetcher, TransactionReceiptView};
use crate::{Error, Result};
use serde::Serialize;
use tracing::{debug, warn};

/// Amounts paid out by a withdrawal, as `(token_x, token_y)` in UI units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BalanceChangeResult {
    pub liquidity_removed: (f64, f64),
    pub fees_claimed: (f64, f64),
}

/// Extracts balance changes from withdrawal transactions
pub struct ReceiptAnalyzer<F> {
    fetcher: F,
    retry: RetryPolicy,
}

impl<F: TransactionFetcher> ReceiptAnalyzer<F> {
    /// Create an analyzer with the default retry policy
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy used around the transaction fetch
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch `signature` and extract what it removed and claimed
    ///
    /// # Errors
    /// * `Error::TransactionNotFound` if the node has no parsed record with metadata
    /// * `Error::TransactionFailed` if the transaction executed with an error
    /// * `Error::InsufficientProtocolInstructions` if fewer than two DLMM instructions are present
    /// * `Error::RetryExhausted` if the fetch kept timing out
    pub async fn extract_balance_changes(
        &self,
        signature: &str,
        token_x_mint: &str,
        token_y_mint: &str,
    ) -> Result<BalanceChangeResult> {
        let tx = self
            .retry
            .run("Fetch parsed transaction", || {
                self.fetcher.get_parsed_transaction(signature)
            })
            .await?;

        let not_found = || Error::TransactionNotFound(signature.to_string());
        let tx = tx.ok_or_else(not_found)?;

        // A failed withdrawal moved nothing; don't report it as (0, 0)
        if let Some(err) = tx.execution_error() {
            return Err(Error::TransactionFailed {
                signature: signature.to_string(),
                reason: err.to_string(),
            });
        }

        let view = tx.receipt_view().ok_or_else(not_found)?;

        let result = analyze_receipt(&view, token_x_mint, token_y_mint)?;
        debug!(
            signature = %signature,
            liquidity_removed = ?result.liquidity_removed,
            fees_claimed = ?result.fees_claimed,
            "Extracted balance changes"
        );
        Ok(result)
    }
}

/// Extract balance changes from an already-fetched receipt
pub fn analyze_receipt(
    view: &TransactionReceiptView,
    token_x_mint: &str,
    token_y_mint: &str,
) -> Result<BalanceChangeResult> {
    let (remove_index, claim_index) = select_instructions(view)?;

    let side_amounts = |index: usize| {
        let group = view.inner_group(index);
        (
            first_transfer_amount(group, token_x_mint),
            first_transfer_amount(group, token_y_mint),
        )
    };

    Ok(BalanceChangeResult {
        liquidity_removed: side_amounts(remove_index),
        fees_claimed: side_amounts(claim_index),
    })
}

/// Pick the outer indices of the remove-liquidity and claim-fee instructions.
///
/// Instruction data identifies them when available; otherwise the first two
/// DLMM instructions are taken in order.
fn select_instructions(view: &TransactionReceiptView) -> Result<(usize, usize)> {
    let matches: Vec<(usize, Option<DlmmInstructionKind>)> = view
        .outer_instructions
        .iter()
        .enumerate()
        .filter(|(_, ix)| ix.program_id == DLMM_PROGRAM_ID)
        .map(|(index, ix)| (index, ix.data.as_deref().map(classify)))
        .collect();

    if matches.len() < 2 {
        return Err(Error::InsufficientProtocolInstructions {
            expected: 2,
            found: matches.len(),
        });
    }

    let first_of = |kind: DlmmInstructionKind| {
        matches
            .iter()
            .find(|(_, k)| *k == Some(kind))
            .map(|(index, _)| *index)
    };

    match (
        first_of(DlmmInstructionKind::RemoveLiquidity),
        first_of(DlmmInstructionKind::ClaimFee),
    ) {
        (Some(remove), Some(claim)) => Ok((remove, claim)),
        _ => {
            let positional = (matches[0].0, matches[1].0);
            if matches.iter().any(|(_, kind)| kind.is_some()) {
                warn!(
                    remove_index = positional.0,
                    claim_index = positional.1,
                    "Could not identify DLMM remove-liquidity and claim-fee instructions from data, falling back to instruction order"
                );
            } else {
                debug!("No DLMM instruction data available, using instruction order");
            }
            Ok(positional)
        }
    }
}

fn first_transfer_amount(group: &[DecodedInstruction], mint: &str) -> f64 {
    group
        .iter()
        .filter_map(DecodedInstruction::as_token_transfer)
        .find(|transfer| transfer.mint == mint)
        .map(|transfer| transfer.ui_amount)
        .unwrap_or(0.0)
}
