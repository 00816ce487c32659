//! Client balance ledger logic.
//!
//! This module implements the pure part of the ledger:
//! - Payment kinds and commands
//! - Balance arithmetic with the zero clamp
//! - Boundary validation of amounts and timestamps
//! - Payment history chain verification
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod history;
pub mod types;
pub mod validation;

#[cfg(test)]
mod balance_props;

pub use balance::{BalanceChange, apply_payment};
pub use error::LedgerError;
pub use history::{HistoryBreak, HistoryStep, verify_history};
pub use types::{DuplicateKey, PaymentCommand, PaymentKind, PaymentMethod, PaymentType};
pub use validation::{
    CURRENCY_SCALE, MAX_AMOUNT, normalize_timestamp, parse_amount, validate_amount, validate_command,
    validate_kind,
};
