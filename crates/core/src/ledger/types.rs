//! Ledger domain types for payment recording.
//!
//! A payment event reaches the ledger as a [`PaymentCommand`] whose
//! [`PaymentKind`] carries only the fields relevant to that kind.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use collecta_shared::types::{ClientId, CollectorId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Payment type as persisted on a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    /// Reduces the principal balance.
    #[serde(rename = "regular")]
    Regular,
    /// Late fee, informational only.
    #[serde(rename = "moratorio")]
    Moratory,
    /// Administrative correction that sets the balance directly.
    #[serde(rename = "abono")]
    Adjustment,
}

impl PaymentType {
    /// Returns the persisted name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Moratory => "moratorio",
            Self::Adjustment => "abono",
        }
    }

    /// Returns true if records of this type move the client balance.
    #[must_use]
    pub const fn affects_balance(&self) -> bool {
        matches!(self, Self::Regular | Self::Adjustment)
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "regular" => Ok(Self::Regular),
            "moratorio" | "moratory" => Ok(Self::Moratory),
            "abono" | "ajuste" | "adjustment" => Ok(Self::Adjustment),
            _ => Err(LedgerError::InvalidPaymentType(s.to_string())),
        }
    }
}

/// The balance-relevant part of a payment event.
///
/// Tagged with the persisted payment type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PaymentKind {
    /// Principal payment of `amount`.
    #[serde(rename = "regular")]
    Regular {
        /// Amount collected.
        amount: Decimal,
    },
    /// Late-fee payment of `amount`.
    #[serde(rename = "moratorio")]
    Moratory {
        /// Amount collected.
        amount: Decimal,
    },
    /// Balance correction to `target_balance`.
    #[serde(rename = "abono")]
    Adjustment {
        /// Balance the client must hold after the correction.
        target_balance: Decimal,
    },
}

impl PaymentKind {
    /// Builds a kind from a loosely typed `(type, value)` pair.
    ///
    /// For adjustments `value` is the target balance, otherwise the amount.
    #[must_use]
    pub const fn from_parts(payment_type: PaymentType, value: Decimal) -> Self {
        match payment_type {
            PaymentType::Regular => Self::Regular { amount: value },
            PaymentType::Moratory => Self::Moratory { amount: value },
            PaymentType::Adjustment => Self::Adjustment {
                target_balance: value,
            },
        }
    }

    /// Returns the persisted payment type.
    #[must_use]
    pub const fn payment_type(&self) -> PaymentType {
        match self {
            Self::Regular { .. } => PaymentType::Regular,
            Self::Moratory { .. } => PaymentType::Moratory,
            Self::Adjustment { .. } => PaymentType::Adjustment,
        }
    }

    /// Returns the carried value: amount, or target balance for adjustments.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        match self {
            Self::Regular { amount } | Self::Moratory { amount } => *amount,
            Self::Adjustment { target_balance } => *target_balance,
        }
    }
}

/// How the collector received the money.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash in hand.
    #[default]
    #[serde(rename = "efectivo")]
    Cash,
    /// Bank transfer.
    #[serde(rename = "transferencia")]
    Transfer,
    /// Card terminal.
    #[serde(rename = "tarjeta")]
    Card,
}

impl PaymentMethod {
    /// Returns the persisted name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "efectivo",
            Self::Transfer => "transferencia",
            Self::Card => "tarjeta",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "efectivo" | "cash" => Ok(Self::Cash),
            "transferencia" | "transfer" => Ok(Self::Transfer),
            "tarjeta" | "card" => Ok(Self::Card),
            _ => Err(LedgerError::InvalidPaymentMethod(s.to_string())),
        }
    }
}

/// A single payment event addressed to the ledger.
///
/// The acting collector is always explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCommand {
    /// Client whose balance is affected.
    pub client_id: ClientId,
    /// Collector recording the event.
    pub collector_id: CollectorId,
    /// Balance-relevant payload.
    pub kind: PaymentKind,
    /// When the payment happened (device time for offline payments).
    pub paid_at: DateTime<Utc>,
    /// Free-text concept or adjustment reason.
    pub concept: Option<String>,
    /// Payment method.
    pub method: PaymentMethod,
    /// Receipt number; generated when absent.
    pub receipt_number: Option<String>,
    /// Identifier assigned by the device while offline.
    pub local_id: Option<String>,
    /// Whether a receipt was already printed on the device.
    pub printed: bool,
    /// Whether the record arrived through offline sync.
    pub synchronized: bool,
}

impl PaymentCommand {
    /// Creates a command with default method and flags.
    #[must_use]
    pub const fn new(
        client_id: ClientId,
        collector_id: CollectorId,
        kind: PaymentKind,
        paid_at: DateTime<Utc>,
    ) -> Self {
        Self {
            client_id,
            collector_id,
            kind,
            paid_at,
            concept: None,
            method: PaymentMethod::Cash,
            receipt_number: None,
            local_id: None,
            printed: false,
            synchronized: false,
        }
    }

    /// Sets the concept.
    #[must_use]
    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = Some(concept.into());
        self
    }

    /// Sets the payment method.
    #[must_use]
    pub fn with_method(mut self, method: PaymentMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the device-local identifier.
    #[must_use]
    pub fn with_local_id(mut self, local_id: impl Into<String>) -> Self {
        self.local_id = Some(local_id.into());
        self
    }

    /// Marks the command as arriving through offline sync.
    #[must_use]
    pub fn synchronized(mut self) -> Self {
        self.synchronized = true;
        self
    }

    /// Records whether a receipt was already printed.
    #[must_use]
    pub fn printed(mut self, printed: bool) -> Self {
        self.printed = printed;
        self
    }

    /// Returns the natural key of this submission.
    ///
    /// The key carries the submitted value, so a re-sent adjustment matches
    /// even after the balance already moved to its target.
    #[must_use]
    pub const fn duplicate_key(&self) -> DuplicateKey {
        DuplicateKey {
            client_id: self.client_id,
            collector_id: self.collector_id,
            amount: self.kind.value(),
            paid_at: self.paid_at,
        }
    }
}

/// Natural key used to recognise re-submitted payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DuplicateKey {
    /// Client id.
    pub client_id: ClientId,
    /// Recording collector.
    pub collector_id: CollectorId,
    /// Submitted amount (target balance for adjustments).
    pub amount: Decimal,
    /// Payment timestamp.
    pub paid_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payment_type_parse() {
        assert_eq!("regular".parse::<PaymentType>().unwrap(), PaymentType::Regular);
        assert_eq!("Moratorio".parse::<PaymentType>().unwrap(), PaymentType::Moratory);
        assert_eq!("abono".parse::<PaymentType>().unwrap(), PaymentType::Adjustment);
        assert_eq!(" ajuste ".parse::<PaymentType>().unwrap(), PaymentType::Adjustment);
        assert_eq!(
            "refund".parse::<PaymentType>(),
            Err(LedgerError::InvalidPaymentType("refund".to_string()))
        );
    }

    #[test]
    fn test_payment_type_affects_balance() {
        assert!(PaymentType::Regular.affects_balance());
        assert!(PaymentType::Adjustment.affects_balance());
        assert!(!PaymentType::Moratory.affects_balance());
    }

    #[test]
    fn test_payment_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&PaymentType::Moratory).unwrap(),
            "\"moratorio\""
        );
        assert_eq!(PaymentType::Adjustment.to_string(), "abono");
    }

    #[test]
    fn test_payment_kind_from_parts() {
        let kind = PaymentKind::from_parts(PaymentType::Adjustment, dec!(500));
        assert_eq!(
            kind,
            PaymentKind::Adjustment {
                target_balance: dec!(500)
            }
        );
        assert_eq!(kind.payment_type(), PaymentType::Adjustment);
        assert_eq!(kind.value(), dec!(500));
    }

    #[test]
    fn test_payment_kind_tagged_json() {
        let kind: PaymentKind =
            serde_json::from_str(r#"{"type":"regular","amount":"150.00"}"#).unwrap();
        assert_eq!(kind, PaymentKind::Regular { amount: dec!(150) });

        // Adjustments carry a target balance, not an amount.
        let invalid = serde_json::from_str::<PaymentKind>(r#"{"type":"abono","amount":"1"}"#);
        assert!(invalid.is_err());
    }

    #[test]
    fn test_payment_kind_tags_match_persisted_names() {
        for kind in [
            PaymentKind::Regular { amount: dec!(1) },
            PaymentKind::Moratory { amount: dec!(1) },
            PaymentKind::Adjustment {
                target_balance: dec!(1),
            },
        ] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json["type"], kind.payment_type().as_str());
        }
    }

    #[test]
    fn test_duplicate_key_uses_submitted_value() {
        let at = chrono::Utc::now();
        let command = PaymentCommand::new(
            ClientId::new(),
            CollectorId::new(),
            PaymentKind::Adjustment {
                target_balance: dec!(500),
            },
            at,
        );
        let key = command.duplicate_key();
        assert_eq!(key.amount, dec!(500));
        assert_eq!(key.paid_at, at);
        assert_eq!(key.client_id, command.client_id);
    }

    #[test]
    fn test_sync_flags_are_independent() {
        let command = PaymentCommand::new(
            ClientId::new(),
            CollectorId::new(),
            PaymentKind::Regular { amount: dec!(1) },
            chrono::Utc::now(),
        );
        let synced = command.clone().synchronized();
        assert!(synced.synchronized);
        assert!(!synced.printed);

        let printed = command.printed(true);
        assert!(printed.printed);
        assert!(!printed.synchronized);
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!(
            "Transferencia".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::Transfer
        );
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }
}
