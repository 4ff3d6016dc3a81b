//! Liquidity amount resolution
//!
//! One side of a dual-sided deposit may be `auto`; it is then derived from
//! the other side and the active bin price. Results are in base units.

use crate::units::Decimal;
use crate::{Error, Result};
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sentinel accepted in place of an amount. Matched exactly: `"AUTO"` or
/// `" auto"` are not numbers and are rejected.
pub const AUTO: &str = "auto";

/// One side of a deposit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Amount {
    Fixed(Decimal),
    Auto,
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == AUTO {
            Ok(Amount::Auto)
        } else {
            Ok(Amount::Fixed(s.parse()?))
        }
    }
}

/// Deposit request as received from the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidityAmountRequest {
    /// Amount of token X, or `auto`
    pub amount: String,
    /// Amount of token Y, or `auto`
    pub amount_b: String,
    /// Price of one X in Y at the pool's active bin
    pub active_bin_price_per_token: String,
    pub token_x_decimals: u8,
    pub token_y_decimals: u8,
}

/// Deposit amounts in base units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAmounts {
    pub total_x_amount: U256,
    pub total_y_amount: U256,
}

/// Resolve both deposit amounts into base units
pub fn resolve(request: &LiquidityAmountRequest) -> Result<ResolvedAmounts> {
    if request.amount == AUTO && request.amount_b == AUTO {
        return Err(Error::InvalidInput(
            "Amount for both first asset and second asset cannot be 'auto' for Meteora liquidity provision"
                .to_string(),
        ));
    }
    if request.amount.trim().is_empty() || request.amount_b.trim().is_empty() {
        return Err(Error::InvalidInput(
            "Both amounts must be specified for Meteora liquidity provision".to_string(),
        ));
    }

    let amount: Amount = request
        .amount
        .parse()
        .map_err(|e| with_context("Invalid amount value for first token", e))?;
    let amount_b: Amount = request
        .amount_b
        .parse()
        .map_err(|e| with_context("Invalid amountB value for second token", e))?;

    resolve_amounts(
        &amount,
        &amount_b,
        &request.active_bin_price_per_token,
        request.token_x_decimals,
        request.token_y_decimals,
    )
}

/// Resolve already-parsed amounts. `price` is only parsed when one side is
/// `Auto`.
pub fn resolve_amounts(
    amount: &Amount,
    amount_b: &Amount,
    price: &str,
    token_x_decimals: u8,
    token_y_decimals: u8,
) -> Result<ResolvedAmounts> {
    let (total_x_amount, total_y_amount) = match (amount, amount_b) {
        (Amount::Auto, Amount::Fixed(b)) => {
            let price = parse_price(price)?;
            (
                b.div_to_base_units(&price, token_x_decimals)?,
                b.to_base_units(token_y_decimals)?,
            )
        }
        (Amount::Fixed(a), Amount::Auto) => {
            let price = parse_price(price)?;
            (
                a.to_base_units(token_x_decimals)?,
                a.mul_to_base_units(&price, token_y_decimals)?,
            )
        }
        (Amount::Fixed(a), Amount::Fixed(b)) => (
            a.to_base_units(token_x_decimals)?,
            b.to_base_units(token_y_decimals)?,
        ),
        (Amount::Auto, Amount::Auto) => {
            return Err(Error::InvalidInput(
                "Both amounts must be numbers or 'auto' for Meteora liquidity provision"
                    .to_string(),
            ))
        }
    };

    tracing::debug!(
        total_x_amount = %total_x_amount,
        total_y_amount = %total_y_amount,
        "Resolved liquidity amounts"
    );

    Ok(ResolvedAmounts {
        total_x_amount,
        total_y_amount,
    })
}

/// Prefix the message of an input error without repeating its own prefix
fn with_context(context: &str, err: Error) -> Error {
    match err {
        Error::InvalidInput(msg) => Error::InvalidInput(format!("{}: {}", context, msg)),
        other => other,
    }
}

fn parse_price(price: &str) -> Result<Decimal> {
    let price: Decimal = price
        .parse()
        .map_err(|e| with_context("Invalid active bin price", e))?;
    if price.is_zero() {
        return Err(Error::InvalidInput(
            "Active bin price must be greater than zero".to_string(),
        ));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: &str, amount_b: &str, price: &str) -> LiquidityAmountRequest {
        LiquidityAmountRequest {
            amount: amount.to_string(),
            amount_b: amount_b.to_string(),
            active_bin_price_per_token: price.to_string(),
            token_x_decimals: 9,
            token_y_decimals: 6,
        }
    }

    fn expected() -> ResolvedAmounts {
        ResolvedAmounts {
            total_x_amount: U256::from(50_000_000_000u64),
            total_y_amount: U256::from(100_000_000u64),
        }
    }

    #[test]
    fn test_auto_first_amount() {
        let result = resolve(&request("auto", "100", "2")).unwrap();
        assert_eq!(result, expected());
    }

    #[test]
    fn test_auto_second_amount() {
        let result = resolve(&request("50", "auto", "2")).unwrap();
        assert_eq!(result, expected());
    }

    #[test]
    fn test_direct_amounts_ignore_price() {
        assert_eq!(resolve(&request("50", "100", "2")).unwrap(), expected());
        // price is never consulted, even if unparseable
        assert_eq!(resolve(&request("50", "100", "n/a")).unwrap(), expected());
    }

    #[test]
    fn test_both_auto_rejected() {
        let err = resolve(&request("auto", "auto", "2")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(msg) if msg.contains("cannot be 'auto'")));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let err = resolve(&request("invalid", "100", "2")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = resolve(&request("auto", "lots", "2")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_missing_amount_rejected() {
        assert!(matches!(
            resolve(&request("", "100", "2")),
            Err(Error::InvalidInput(msg)) if msg.contains("Both amounts must be specified")
        ));
        assert!(matches!(
            resolve(&request("1", "  ", "2")),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_negative_rejected() {
        assert!(resolve(&request("-1", "auto", "2")).is_err());
    }

    #[test]
    fn test_bad_price_rejected_for_auto() {
        assert!(resolve(&request("auto", "100", "zero")).is_err());
        assert!(resolve(&request("auto", "100", "0")).is_err());
        assert!(resolve(&request("1", "auto", "-3")).is_err());
    }

    #[test]
    fn test_auto_sentinel_is_exact() {
        for sentinel in ["AUTO", "Auto", " auto"] {
            let err = resolve(&request(sentinel, "100", "2")).unwrap_err();
            assert!(
                matches!(&err, Error::InvalidInput(msg) if msg.contains("not a valid decimal amount")),
                "accepted {:?}: {:?}",
                sentinel,
                err
            );
        }
        // surrounding whitespace is fine for numbers
        assert_eq!(resolve(&request(" 50 ", "auto", "2")).unwrap(), expected());
    }

    #[test]
    fn test_error_message_has_single_prefix() {
        let err = resolve(&request("invalid", "100", "2")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: Invalid amount value for first token: 'invalid' is not a valid decimal amount"
        );

        let err = resolve(&request("auto", "100", "x")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: Invalid active bin price: 'x' is not a valid decimal amount"
        );
    }

    #[test]
    fn test_trailing_zeros_and_tiny_amounts() {
        let one = format!("1.{}", "0".repeat(80));
        let result = resolve(&request(&one, "auto", "2")).unwrap();
        assert_eq!(result.total_x_amount, U256::from(1_000_000_000u64));
        assert_eq!(result.total_y_amount, U256::from(2_000_000u64));

        let result = resolve(&request("1e-65", "100", "2")).unwrap();
        assert_eq!(result.total_x_amount, U256::ZERO);
        assert_eq!(result.total_y_amount, U256::from(100_000_000u64));
    }

    #[test]
    fn test_exact_arithmetic() {
        // 10 USDC at 0.3 USDC/SOL must be exactly 33.333333333 SOL, truncated
        let mut req = request("auto", "10", "0.3");
        req.token_x_decimals = 9;
        let result = resolve(&req).unwrap();
        assert_eq!(result.total_x_amount, U256::from(33_333_333_333u64));
        assert_eq!(result.total_y_amount, U256::from(10_000_000u64));

        // 0.1 * 0.7 in 6 decimals: float math would give 69999
        let result = resolve(&request("0.1", "auto", "0.7")).unwrap();
        assert_eq!(result.total_y_amount, U256::from(70_000u64));
    }

    #[test]
    fn test_large_decimals() {
        let mut req = request("1234567.123456789012345678", "auto", "3500.5");
        req.token_x_decimals = 18;
        req.token_y_decimals = 18;
        let result = resolve(&req).unwrap();
        assert_eq!(
            result.total_x_amount,
            U256::from(1_234_567_123_456_789_012_345_678u128)
        );
        // 1234567.123456789012345678 * 3500.5 = 4321602215.660489937716045839
        assert_eq!(
            result.total_y_amount,
            U256::from(4_321_602_215_660_489_937_716_045_839u128)
        );
    }

    #[test]
    fn test_idempotent() {
        let req = request("auto", "3.1415926", "1.41421356");
        let first = resolve(&req).unwrap();
        let second = resolve(&req).unwrap();
        assert_eq!(first, second);
    }
}
