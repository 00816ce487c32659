//! Boundary validation for payment input.

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::error::LedgerError;
use super::types::{PaymentCommand, PaymentKind};

/// Number of fractional digits money is kept at.
pub const CURRENCY_SCALE: u32 = 2;

/// Largest amount or balance storage holds (`decimal(14, 2)`).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Validates an amount and rescales it to [`CURRENCY_SCALE`].
///
/// # Errors
///
/// Returns `InvalidAmount` if the amount is negative, exceeds [`MAX_AMOUNT`]
/// or has more than two significant fractional digits.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(format!(
            "{amount} must not be negative"
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(LedgerError::InvalidAmount(format!(
            "{amount} exceeds the maximum of {MAX_AMOUNT}"
        )));
    }
    if amount.normalize().scale() > CURRENCY_SCALE {
        return Err(LedgerError::InvalidAmount(format!(
            "{amount} has more than {CURRENCY_SCALE} decimal places"
        )));
    }

    let mut rescaled = amount.normalize();
    rescaled.rescale(CURRENCY_SCALE);
    Ok(rescaled)
}

/// Parses and validates an amount given as text.
///
/// # Errors
///
/// Returns `InvalidAmount` for non-numeric input or any rule of [`validate_amount`].
pub fn parse_amount(raw: &str) -> Result<Decimal, LedgerError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidAmount("empty amount".to_string()));
    }
    let amount = Decimal::from_str(trimmed)
        .map_err(|_| LedgerError::InvalidAmount(format!("'{trimmed}' is not a number")))?;
    validate_amount(amount)
}

/// Validates the value carried by a payment kind.
///
/// # Errors
///
/// Returns `InvalidAmount` if the amount or target balance is invalid.
pub fn validate_kind(kind: PaymentKind) -> Result<PaymentKind, LedgerError> {
    let value = validate_amount(kind.value())?;
    Ok(PaymentKind::from_parts(kind.payment_type(), value))
}

/// Truncates a timestamp to the microsecond precision storage keeps.
#[must_use]
pub fn normalize_timestamp(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(6)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validates and normalizes a payment command before it reaches storage.
///
/// # Errors
///
/// Returns `InvalidAmount` if the payment value is invalid.
pub fn validate_command(command: PaymentCommand) -> Result<PaymentCommand, LedgerError> {
    Ok(PaymentCommand {
        kind: validate_kind(command.kind)?,
        paid_at: normalize_timestamp(command.paid_at),
        concept: non_empty(command.concept),
        receipt_number: non_empty(command.receipt_number),
        local_id: non_empty(command.local_id),
        ..command
    })
}
