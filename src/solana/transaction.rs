//! Parsed transaction model
//!
//! Serde mirror of the `jsonParsed` shape returned by `getTransaction`, and
//! the decoded view the receipt analyzer works on. Only the fields we read
//! are modelled; everything else is ignored.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Program tag the RPC node puts on parsed SPL Token instructions
pub const SPL_TOKEN_PROGRAM: &str = "spl-token";

/// Parsed instruction type of a checked token transfer
pub const TRANSFER_CHECKED: &str = "transferChecked";

/// Transaction as returned by `getTransaction` with `jsonParsed` encoding
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransaction {
    #[serde(default)]
    pub meta: Option<TransactionMeta>,
    pub transaction: TransactionBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionBody {
    pub message: Message,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub instructions: Vec<RawInstruction>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    /// Execution error; `None` when the transaction succeeded
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub inner_instructions: Option<Vec<InnerInstructionGroup>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InnerInstructionGroup {
    pub index: usize,
    #[serde(default)]
    pub instructions: Vec<RawInstruction>,
}

/// Either a parsed instruction (`program` + `parsed`) or a partially
/// decoded one (`data` in base58)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInstruction {
    #[serde(default)]
    pub program_id: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub parsed: Option<Value>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferCheckedInfo {
    mint: String,
    token_amount: UiTokenAmount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UiTokenAmount {
    #[serde(default)]
    ui_amount: Option<f64>,
    #[serde(default)]
    ui_amount_string: Option<String>,
}

/// Inner instruction after decoding
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedInstruction {
    TokenTransfer(TokenTransfer),
    Unknown,
}

/// A `transferChecked` of an SPL token
#[derive(Debug, Clone, PartialEq)]
pub struct TokenTransfer {
    pub mint: String,
    /// Human-scaled amount as reported by the node
    pub ui_amount: f64,
}

impl DecodedInstruction {
    pub fn as_token_transfer(&self) -> Option<&TokenTransfer> {
        match self {
            DecodedInstruction::TokenTransfer(transfer) => Some(transfer),
            DecodedInstruction::Unknown => None,
        }
    }
}

impl RawInstruction {
    /// Decode into a tagged instruction. Anything that is not a well-formed
    /// SPL Token `transferChecked` becomes `Unknown`.
    pub fn decode(&self) -> DecodedInstruction {
        self.decode_transfer()
            .map(DecodedInstruction::TokenTransfer)
            .unwrap_or(DecodedInstruction::Unknown)
    }

    fn decode_transfer(&self) -> Option<TokenTransfer> {
        if self.program.as_deref() != Some(SPL_TOKEN_PROGRAM) {
            return None;
        }
        let parsed = self.parsed.as_ref()?;
        if parsed.get("type").and_then(|v| v.as_str()) != Some(TRANSFER_CHECKED) {
            return None;
        }

        let info: TransferCheckedInfo = serde_json::from_value(parsed.get("info")?.clone()).ok()?;
        let ui_amount = match info.token_amount.ui_amount {
            Some(amount) => amount,
            None => info.token_amount.ui_amount_string?.parse().ok()?,
        };

        Some(TokenTransfer {
            mint: info.mint,
            ui_amount,
        })
    }

    /// Raw instruction bytes, when the node returned them
    pub fn data_bytes(&self) -> Option<Vec<u8>> {
        let data = self.data.as_deref()?;
        bs58::decode(data).into_vec().ok()
    }
}

/// Top-level instruction as seen by the analyzer
#[derive(Debug, Clone, PartialEq)]
pub struct OuterInstruction {
    pub program_id: String,
    /// Raw instruction data; `None` for instructions the node parsed itself
    pub data: Option<Vec<u8>>,
}

/// Decoded view of a finalized transaction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionReceiptView {
    pub outer_instructions: Vec<OuterInstruction>,
    pub inner_instruction_groups: HashMap<usize, Vec<DecodedInstruction>>,
}

impl TransactionReceiptView {
    /// Inner instructions of the outer instruction at `index` (empty if none)
    pub fn inner_group(&self, index: usize) -> &[DecodedInstruction] {
        self.inner_instruction_groups
            .get(&index)
            .map(|group| group.as_slice())
            .unwrap_or(&[])
    }
}

impl ParsedTransaction {
    /// Execution error reported by the node, if the transaction failed
    pub fn execution_error(&self) -> Option<&Value> {
        self.meta.as_ref()?.err.as_ref()
    }

    /// Build the analyzer view; `None` when the node returned no metadata.
    pub fn receipt_view(&self) -> Option<TransactionReceiptView> {
        let meta = self.meta.as_ref()?;

        let outer_instructions = self
            .transaction
            .message
            .instructions
            .iter()
            .map(|ix| OuterInstruction {
                program_id: ix.program_id.clone().unwrap_or_default(),
                data: ix.data_bytes(),
            })
            .collect();

        // A repeated index replaces the earlier group
        let inner_instruction_groups = meta
            .inner_instructions
            .iter()
            .flatten()
            .map(|group| {
                let decoded = group.instructions.iter().map(RawInstruction::decode).collect();
                (group.index, decoded)
            })
            .collect();

        Some(TransactionReceiptView {
            outer_instructions,
            inner_instruction_groups,
        })
    }
}
