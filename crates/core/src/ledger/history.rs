//! Payment history chain verification.
//!
//! Records are ordered by `sequence`. Each record's `balance_before` must equal
//! the previous record's `balance_after`, sequences must be contiguous, and the
//! last `balance_after` must equal the stored client balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The balance-relevant projection of one payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStep {
    /// Client version after the record was written.
    pub sequence: i64,
    /// Balance stamped before the record.
    pub balance_before: Decimal,
    /// Balance stamped after the record.
    pub balance_after: Decimal,
}

/// One inconsistency found in a client's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryBreak {
    /// Sequence numbers are not contiguous.
    SequenceGap {
        /// Sequence that should have followed.
        expected: i64,
        /// Sequence found instead.
        found: i64,
    },
    /// A record does not start where the previous one ended.
    BalanceGap {
        /// Sequence of the offending record.
        sequence: i64,
        /// `balance_after` of the previous record.
        expected: Decimal,
        /// `balance_before` of the offending record.
        found: Decimal,
    },
    /// The stored client balance differs from the last record.
    StoredBalanceMismatch {
        /// `balance_after` of the last record.
        expected: Decimal,
        /// Balance stored on the client.
        stored: Decimal,
    },
}

/// Checks a history ordered by ascending sequence against the stored balance.
///
/// An empty history is always consistent.
#[must_use]
pub fn verify_history(steps: &[HistoryStep], stored_balance: Decimal) -> Vec<HistoryBreak> {
    let mut breaks = Vec::new();

    for pair in steps.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.sequence != prev.sequence + 1 {
            breaks.push(HistoryBreak::SequenceGap {
                expected: prev.sequence + 1,
                found: next.sequence,
            });
        }
        if next.balance_before != prev.balance_after {
            breaks.push(HistoryBreak::BalanceGap {
                sequence: next.sequence,
                expected: prev.balance_after,
                found: next.balance_before,
            });
        }
    }

    if let Some(last) = steps.last()
        && last.balance_after != stored_balance
    {
        breaks.push(HistoryBreak::StoredBalanceMismatch {
            expected: last.balance_after,
            stored: stored_balance,
        });
    }

    breaks
}
