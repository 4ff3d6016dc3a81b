//! DLMM instruction identification
//!
//! DLMM is an Anchor program: the first 8 bytes of instruction data are
//! `sha256("global:<instruction_name>")[..8]`.

use sha2::{Digest, Sha256};
use std::sync::OnceLock;

/// Instruction names that withdraw liquidity from a position
pub const REMOVE_LIQUIDITY_INSTRUCTIONS: &[&str] = &[
    "remove_liquidity",
    "remove_liquidity2",
    "remove_liquidity_by_range",
    "remove_liquidity_by_range2",
    "remove_all_liquidity",
];

/// Instruction names that claim swap fees
pub const CLAIM_FEE_INSTRUCTIONS: &[&str] = &["claim_fee", "claim_fee2"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DlmmInstructionKind {
    RemoveLiquidity,
    ClaimFee,
    Other,
}

/// Anchor discriminator for a global instruction
pub fn discriminator(name: &str) -> [u8; 8] {
    let hash = Sha256::digest(format!("global:{}", name).as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash[..8]);
    out
}

fn known_discriminators() -> &'static [([u8; 8], DlmmInstructionKind)] {
    static TABLE: OnceLock<Vec<([u8; 8], DlmmInstructionKind)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let removes = REMOVE_LIQUIDITY_INSTRUCTIONS
            .iter()
            .map(|name| (discriminator(name), DlmmInstructionKind::RemoveLiquidity));
        let claims = CLAIM_FEE_INSTRUCTIONS
            .iter()
            .map(|name| (discriminator(name), DlmmInstructionKind::ClaimFee));
        removes.chain(claims).collect()
    })
}

/// Classify raw DLMM instruction data
pub fn classify(data: &[u8]) -> DlmmInstructionKind {
    let Some(prefix) = data.get(..8) else {
        return DlmmInstructionKind::Other;
    };
    known_discriminators()
        .iter()
        .find(|(disc, _)| disc.as_slice() == prefix)
        .map(|(_, kind)| *kind)
        .unwrap_or(DlmmInstructionKind::Other)
}
