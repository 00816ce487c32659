//! Overdue-days calculation.
//!
//! A client is overdue once more days have elapsed since the last regular
//! payment than its payment cycle allows.

pub mod days;
pub mod periodicity;

pub use days::{overdue_days, overdue_days_from_str, parse_payment_date};
pub use periodicity::Periodicity;
