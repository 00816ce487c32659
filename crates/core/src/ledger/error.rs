//! Ledger error types for validation and storage failures.
//!
//! Duplicate submissions are not errors: they are reported through the
//! ledger outcome so sync callers can tally them separately.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Lookup Errors ==========
    /// Client id does not resolve.
    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    /// Client code does not resolve.
    #[error("Client not found for code '{0}'")]
    ClientCodeNotFound(String),

    /// Collector id does not resolve.
    #[error("Collector not found: {0}")]
    CollectorNotFound(Uuid),

    // ========== Validation Errors ==========
    /// Amount is negative, non-numeric or finer than currency precision.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Payment type is not one of regular, moratorio or abono.
    #[error("Invalid payment type: {0}")]
    InvalidPaymentType(String),

    /// Payment method is not one of efectivo, transferencia or tarjeta.
    #[error("Invalid payment method: {0}")]
    InvalidPaymentMethod(String),

    /// A required input field was absent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    // ========== Storage Errors ==========
    /// The client row changed between read and write.
    #[error("Concurrent modification detected for client {0}, please retry")]
    ConcurrentModification(Uuid),

    /// The persistence layer could not commit.
    #[error("Transaction failed: {0}")]
    TransactionFailure(String),
}

impl LedgerError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ClientNotFound(_) | Self::ClientCodeNotFound(_) => "CLIENT_NOT_FOUND",
            Self::CollectorNotFound(_) => "COLLECTOR_NOT_FOUND",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidPaymentType(_) => "INVALID_PAYMENT_TYPE",
            Self::InvalidPaymentMethod(_) => "INVALID_PAYMENT_METHOD",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::ConcurrentModification(_) => "CONCURRENT_MODIFICATION",
            Self::TransactionFailure(_) => "TRANSACTION_FAILURE",
        }
    }

    /// Returns true if repeating the same call may succeed.
    ///
    /// The ledger never retries on its own.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConcurrentModification(_) | Self::TransactionFailure(_)
        )
    }

    /// Returns true if the error stems from caller input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::InvalidPaymentType(_)
                | Self::InvalidPaymentMethod(_)
                | Self::MissingField(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::ClientNotFound(Uuid::nil()).error_code(),
            "CLIENT_NOT_FOUND"
        );
        assert_eq!(
            LedgerError::ClientCodeNotFound("CLI404".into()).error_code(),
            "CLIENT_NOT_FOUND"
        );
        assert_eq!(
            LedgerError::InvalidAmount("-1".into()).error_code(),
            "INVALID_AMOUNT"
        );
        assert_eq!(
            LedgerError::InvalidPaymentType("cash".into()).error_code(),
            "INVALID_PAYMENT_TYPE"
        );
        assert_eq!(
            LedgerError::MissingField("client_code").error_code(),
            "MISSING_FIELD"
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(LedgerError::ConcurrentModification(Uuid::nil()).is_retryable());
        assert!(LedgerError::TransactionFailure("connection reset".into()).is_retryable());
        assert!(!LedgerError::ClientNotFound(Uuid::nil()).is_retryable());
        assert!(!LedgerError::InvalidAmount("abc".into()).is_retryable());
    }

    #[test]
    fn test_validation_errors() {
        assert!(LedgerError::InvalidAmount("abc".into()).is_validation());
        assert!(LedgerError::MissingField("new_balance").is_validation());
        assert!(!LedgerError::CollectorNotFound(Uuid::nil()).is_validation());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            LedgerError::ClientCodeNotFound("DOES_NOT_EXIST".into()).to_string(),
            "Client not found for code 'DOES_NOT_EXIST'"
        );
        assert_eq!(
            LedgerError::InvalidPaymentType("refund".into()).to_string(),
            "Invalid payment type: refund"
        );
        assert_eq!(
            LedgerError::MissingField("client_code").to_string(),
            "Missing required field: client_code"
        );
    }
}
