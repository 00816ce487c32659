//! Property-based tests for balance arithmetic.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::apply_payment;
use super::history::{HistoryStep, verify_history};
use super::types::PaymentKind;
use super::validation::validate_amount;

/// Strategy to generate a valid amount (0.00 to 1,000,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a payment kind with a valid value.
fn kind_strategy() -> impl Strategy<Value = PaymentKind> {
    prop_oneof![
        amount().prop_map(|amount| PaymentKind::Regular { amount }),
        amount().prop_map(|amount| PaymentKind::Moratory { amount }),
        amount().prop_map(|target_balance| PaymentKind::Adjustment { target_balance }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A regular payment no larger than the balance subtracts exactly.
    #[test]
    fn prop_regular_within_balance_subtracts(
        (balance_cents, payment_cents) in (0i64..100_000_000i64).prop_flat_map(|b| (Just(b), 0i64..=b))
    ) {
        let balance = Decimal::new(balance_cents, 2);
        let payment = Decimal::new(payment_cents, 2);
        let change = apply_payment(balance, &PaymentKind::Regular { amount: payment });
        prop_assert_eq!(change.balance_after, balance - payment);
        prop_assert_eq!(change.overpayment, Decimal::ZERO);
    }

    /// A regular payment larger than the balance leaves zero, never negative.
    #[test]
    fn prop_regular_over_balance_clamps(balance in amount(), extra in 1i64..10_000_000i64) {
        let payment = balance + Decimal::new(extra, 2);
        let change = apply_payment(balance, &PaymentKind::Regular { amount: payment });
        prop_assert_eq!(change.balance_after, Decimal::ZERO);
        prop_assert_eq!(change.overpayment, payment - balance);
    }

    /// Moratory payments of any amount leave the balance untouched.
    #[test]
    fn prop_moratory_never_moves_balance(balance in amount(), fee in amount()) {
        let change = apply_payment(balance, &PaymentKind::Moratory { amount: fee });
        prop_assert_eq!(change.balance_after, balance);
        prop_assert!(!change.balance_changed());
    }

    /// Adjustments land on the target and record the absolute delta.
    #[test]
    fn prop_adjustment_records_absolute_delta(balance in amount(), target in amount()) {
        let change = apply_payment(balance, &PaymentKind::Adjustment { target_balance: target });
        prop_assert_eq!(change.balance_after, target);
        prop_assert_eq!(change.amount, (target - balance).abs());
        prop_assert!(change.amount >= Decimal::ZERO);
    }

    /// Any sequence of valid events yields a non-negative, chain-consistent history.
    #[test]
    fn prop_event_sequence_keeps_chain(
        opening in amount(),
        kinds in prop::collection::vec(kind_strategy(), 0..25),
    ) {
        let mut balance = opening;
        let mut steps = Vec::with_capacity(kinds.len());
        for (i, kind) in kinds.iter().enumerate() {
            let change = apply_payment(balance, kind);
            prop_assert!(change.balance_after >= Decimal::ZERO);
            steps.push(HistoryStep {
                sequence: i64::try_from(i).unwrap() + 1,
                balance_before: change.balance_before,
                balance_after: change.balance_after,
            });
            balance = change.balance_after;
        }
        prop_assert!(verify_history(&steps, balance).is_empty());
    }

    /// Validated amounts always carry exactly two decimal places.
    #[test]
    fn prop_validated_amount_has_currency_scale(value in amount()) {
        let validated = validate_amount(value).unwrap();
        prop_assert_eq!(validated, value);
        prop_assert_eq!(validated.scale(), 2);
    }
}
