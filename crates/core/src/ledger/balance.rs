//! Client balance arithmetic.
//!
//! - Regular: `after = max(0, before - amount)`, excess reported as overpayment
//! - Moratory: `after = before`
//! - Adjustment: `after = target`, recorded amount is `|target - before|`

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::PaymentKind;

/// Result of applying one payment event to a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChange {
    /// Balance before the event.
    pub balance_before: Decimal,
    /// Balance after the event.
    pub balance_after: Decimal,
    /// Amount stored on the payment record.
    pub amount: Decimal,
    /// Part of a regular payment that exceeded the balance and was discarded.
    pub overpayment: Decimal,
}

impl BalanceChange {
    /// Returns true if the event moves the stored balance.
    #[must_use]
    pub fn balance_changed(&self) -> bool {
        self.balance_after != self.balance_before
    }

    /// Returns true if part of the payment was absorbed by the zero clamp.
    #[must_use]
    pub fn has_overpayment(&self) -> bool {
        self.overpayment > Decimal::ZERO
    }
}

/// Applies a payment kind to `balance_before`.
///
/// Inputs are expected to have passed validation (non-negative, 2dp).
#[must_use]
pub fn apply_payment(balance_before: Decimal, kind: &PaymentKind) -> BalanceChange {
    match *kind {
        PaymentKind::Regular { amount } => {
            let remaining = balance_before - amount;
            let (balance_after, overpayment) = if remaining < Decimal::ZERO {
                (Decimal::ZERO, -remaining)
            } else {
                (remaining, Decimal::ZERO)
            };
            BalanceChange {
                balance_before,
                balance_after,
                amount,
                overpayment,
            }
        }
        PaymentKind::Moratory { amount } => BalanceChange {
            balance_before,
            balance_after: balance_before,
            amount,
            overpayment: Decimal::ZERO,
        },
        PaymentKind::Adjustment { target_balance } => BalanceChange {
            balance_before,
            balance_after: target_balance,
            amount: (target_balance - balance_before).abs(),
            overpayment: Decimal::ZERO,
        },
    }
}
