//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod client;
pub mod collector;
pub mod ledger;
pub mod overdue;
pub mod payment;

pub use client::{ClientError, ClientRepository, CreateClientInput};
pub use collector::{CollectorRepository, CreateCollectorInput};
pub use ledger::{
    BalanceAdjustment, BalanceImportItem, BatchFailure, BatchImportResult, HistoryReport,
    LedgerRepository, OfflinePayment, PaymentOutcome, SyncFailure, SyncReport,
};
pub use overdue::{OverdueClient, OverdueFilter, OverdueRepository};
pub use payment::PaymentRepository;
