//! Core collections logic for Collecta.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//!
//! # Modules
//!
//! - `ledger` - Payment kinds, balance arithmetic, validation and history checks
//! - `overdue` - Overdue-days calculation from the payment cadence
//! - `client` - Client and collector attributes

pub mod client;
pub mod ledger;
pub mod overdue;

pub use client::{ClientStatus, CollectorRole};
pub use ledger::LedgerError;
pub use overdue::Periodicity;
