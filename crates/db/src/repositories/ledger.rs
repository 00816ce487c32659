//! Client balance ledger.
//!
//! Every write runs inside its own database transaction:
//! 1. the client row is locked and re-read,
//! 2. the duplicate-submission key is checked,
//! 3. the payment record is inserted stamped with `balance_before`,
//!    `balance_after` and `sequence = version + 1`,
//! 4. the client `version` is bumped with a compare-and-set, together with the
//!    new balance when the payment type moves it.
//!
//! Recognised re-submissions are reported as [`PaymentOutcome::Duplicate`] and
//! leave storage untouched. The duplicate key carries the submitted value, so
//! an adjustment is keyed on its target balance. Nothing is retried
//! automatically.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use collecta_core::ledger::{
    BalanceChange, DuplicateKey, HistoryBreak, HistoryStep, LedgerError, PaymentCommand,
    PaymentKind, PaymentMethod, PaymentType, apply_payment, validate_command, verify_history,
};
use collecta_shared::types::{ClientId, CollectorId, PageRequest, PageResponse, PaymentId};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, DbErr, EntityTrait, QueryFilter, QuerySelect, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::payment::{PaymentRepository, find_duplicate};
use crate::entities::{clients, collectors, payments};

/// Concept stamped on balance imports that carry no reason.
pub const DEFAULT_ADJUSTMENT_CONCEPT: &str = "Ajuste de saldo";

/// Result of a single ledger write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// A new record was written.
    Recorded {
        /// The inserted payment record.
        record: payments::Model,
        /// Client balance after the write.
        balance: Decimal,
        /// Part of a regular payment discarded by the zero clamp.
        overpayment: Decimal,
    },
    /// The same submission was already recorded; nothing was written.
    Duplicate {
        /// The previously recorded payment.
        record: payments::Model,
        /// Current client balance.
        balance: Decimal,
    },
}

impl PaymentOutcome {
    /// Returns the new or pre-existing payment record.
    #[must_use]
    pub const fn record(&self) -> &payments::Model {
        match self {
            Self::Recorded { record, .. } | Self::Duplicate { record, .. } => record,
        }
    }

    /// Consumes the outcome and returns its payment record.
    #[must_use]
    pub fn into_record(self) -> payments::Model {
        match self {
            Self::Recorded { record, .. } | Self::Duplicate { record, .. } => record,
        }
    }

    /// Returns the client balance reported with the outcome.
    #[must_use]
    pub const fn balance(&self) -> Decimal {
        match self {
            Self::Recorded { balance, .. } | Self::Duplicate { balance, .. } => *balance,
        }
    }

    /// Returns true if the submission had already been recorded.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// A successful balance import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceAdjustment {
    /// Code of the adjusted client.
    pub client_code: String,
    /// Balance before the adjustment.
    pub balance_before: Decimal,
    /// Balance after the adjustment.
    pub balance_after: Decimal,
    /// The adjustment record.
    pub record: payments::Model,
    /// True if the same import had already been recorded.
    pub duplicate: bool,
}

/// One row of a batch balance import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceImportItem {
    /// Client code.
    pub client_code: Option<String>,
    /// Balance the client must hold afterwards.
    pub new_balance: Option<Decimal>,
    /// Reason stamped as the record concept.
    pub reason: Option<String>,
}

impl BalanceImportItem {
    /// Creates an import row.
    #[must_use]
    pub fn new(client_code: impl Into<String>, new_balance: Decimal) -> Self {
        Self {
            client_code: Some(client_code.into()),
            new_balance: Some(new_balance),
            reason: None,
        }
    }
}

/// A batch item that was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    /// Position of the item in the submitted batch.
    pub index: usize,
    /// Client code as submitted.
    pub client_code: Option<String>,
    /// Human readable reason.
    pub reason: String,
    /// Stable error code.
    pub error_code: &'static str,
}

impl BatchFailure {
    fn new(index: usize, client_code: Option<String>, err: &LedgerError) -> Self {
        Self {
            index,
            client_code,
            reason: err.to_string(),
            error_code: err.error_code(),
        }
    }
}

/// Result of a batch balance import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchImportResult {
    /// Applied adjustments, in submission order.
    pub succeeded: Vec<BalanceAdjustment>,
    /// Items that had already been imported.
    pub duplicates: Vec<BalanceAdjustment>,
    /// Items that were rejected.
    pub failed: Vec<BatchFailure>,
}

/// A payment captured on a collector's device while offline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflinePayment {
    /// Client id.
    pub client_id: ClientId,
    /// Amount collected, or target balance for `abono`.
    pub amount: Decimal,
    /// Payment type name as captured on the device.
    pub payment_type: String,
    /// Device timestamp of the payment.
    pub paid_at: DateTime<Utc>,
    /// Free-text concept.
    #[serde(default)]
    pub concept: Option<String>,
    /// Payment method name; cash when absent.
    #[serde(default)]
    pub method: Option<String>,
    /// Device-assigned identifier.
    #[serde(default)]
    pub local_id: Option<String>,
    /// Whether the receipt was printed on the device.
    #[serde(default)]
    pub printed: bool,
}

impl OfflinePayment {
    fn into_command(self, collector_id: CollectorId) -> Result<PaymentCommand, LedgerError> {
        let payment_type = PaymentType::from_str(&self.payment_type)?;
        let method = match self.method.as_deref() {
            Some(raw) => PaymentMethod::from_str(raw)?,
            None => PaymentMethod::default(),
        };

        let mut command = PaymentCommand::new(
            self.client_id,
            collector_id,
            PaymentKind::from_parts(payment_type, self.amount),
            self.paid_at,
        )
        .with_method(method)
        .synchronized()
        .printed(self.printed);
        command.concept = self.concept;
        command.local_id = self.local_id;
        Ok(command)
    }
}

/// An offline payment that was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncFailure {
    /// Position of the payment in the upload.
    pub index: usize,
    /// Device-assigned identifier, if any.
    pub local_id: Option<String>,
    /// Human readable reason.
    pub reason: String,
    /// Stable error code.
    pub error_code: &'static str,
}

/// Tally of an offline sync upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Newly written records.
    pub created: Vec<payments::Model>,
    /// Records that had already been uploaded.
    pub duplicates: Vec<payments::Model>,
    /// Payments that were rejected.
    pub failed: Vec<SyncFailure>,
}

/// Result of checking a client's history chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryReport {
    /// Client id.
    pub client_id: ClientId,
    /// Balance stored on the client.
    pub stored_balance: Decimal,
    /// Number of payment records.
    pub records: usize,
    /// Inconsistencies, empty when the chain is sound.
    pub breaks: Vec<HistoryBreak>,
}

impl HistoryReport {
    /// Returns true if no inconsistency was found.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.breaks.is_empty()
    }
}

/// Outcome of the work done inside the transaction.
enum Applied {
    Recorded {
        record: payments::Model,
        change: BalanceChange,
    },
    Duplicate {
        record: payments::Model,
        balance: Decimal,
    },
}

/// Why the transaction did not produce an outcome.
enum WriteFailure {
    Rejected(LedgerError),
    /// A unique index fired on insert.
    Conflict(DuplicateKey),
    Storage(DbErr),
}

impl From<DbErr> for WriteFailure {
    fn from(err: DbErr) -> Self {
        Self::Storage(err)
    }
}

impl From<LedgerError> for WriteFailure {
    fn from(err: LedgerError) -> Self {
        Self::Rejected(err)
    }
}

fn storage_error(err: DbErr) -> LedgerError {
    LedgerError::TransactionFailure(err.to_string())
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Timestamp of the `index`-th item of a batch stamped `at`.
fn item_timestamp(at: DateTime<Utc>, index: usize) -> DateTime<Utc> {
    i64::try_from(index)
        .ok()
        .and_then(|micros| at.checked_add_signed(Duration::microseconds(micros)))
        .unwrap_or(at)
}

/// The ledger updater for client balances.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records one payment event against a client balance.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount or target balance is invalid (nothing is touched)
    /// - The collector or client does not exist
    /// - The client changed concurrently (`ConcurrentModification`)
    /// - The database cannot commit (`TransactionFailure`)
    #[tracing::instrument(
        skip(self, command),
        fields(
            client_id = %command.client_id,
            collector_id = %command.collector_id,
            payment_type = %command.kind.payment_type(),
        )
    )]
    pub async fn record_payment(
        &self,
        command: PaymentCommand,
    ) -> Result<PaymentOutcome, LedgerError> {
        let command = validate_command(command)?;
        let txn = self.db.begin().await.map_err(storage_error)?;
        let written = Self::write_payment(&txn, &command).await;
        self.settle(txn, written).await
    }

    /// Commits or rolls back the transaction and maps the result.
    async fn settle(
        &self,
        txn: DatabaseTransaction,
        written: Result<Applied, WriteFailure>,
    ) -> Result<PaymentOutcome, LedgerError> {
        match written {
            Ok(Applied::Recorded { record, change }) => {
                txn.commit().await.map_err(storage_error)?;
                if change.has_overpayment() {
                    warn!(
                        payment_id = %record.id,
                        overpayment = %change.overpayment,
                        "payment exceeded balance, balance clamped to zero"
                    );
                }
                info!(
                    payment_id = %record.id,
                    sequence = record.sequence,
                    balance_before = %change.balance_before,
                    balance_after = %change.balance_after,
                    "payment recorded"
                );
                Ok(PaymentOutcome::Recorded {
                    record,
                    balance: change.balance_after,
                    overpayment: change.overpayment,
                })
            }
            Ok(Applied::Duplicate { record, balance }) => {
                Self::rollback(txn).await;
                info!(payment_id = %record.id, "duplicate submission ignored");
                Ok(PaymentOutcome::Duplicate { record, balance })
            }
            Err(WriteFailure::Rejected(err)) => {
                Self::rollback(txn).await;
                Err(err)
            }
            Err(WriteFailure::Conflict(key)) => {
                Self::rollback(txn).await;
                self.resolve_conflict(&key).await
            }
            Err(WriteFailure::Storage(err)) => {
                Self::rollback(txn).await;
                warn!(error = %err, "payment transaction failed");
                Err(storage_error(err))
            }
        }
    }

    async fn rollback(txn: DatabaseTransaction) {
        if let Err(err) = txn.rollback().await {
            warn!(error = %err, "rollback failed");
        }
    }

    async fn write_payment(
        txn: &DatabaseTransaction,
        command: &PaymentCommand,
    ) -> Result<Applied, WriteFailure> {
        let collector_id = command.collector_id.into_inner();
        collectors::Entity::find_by_id(collector_id)
            .one(txn)
            .await?
            .ok_or(LedgerError::CollectorNotFound(collector_id))?;

        let client_id = command.client_id.into_inner();
        // SQLite has no row locks; its writers are already serialized.
        let mut select = clients::Entity::find_by_id(client_id);
        if txn.get_database_backend() != DbBackend::Sqlite {
            select = select.lock_exclusive();
        }
        let client = select
            .one(txn)
            .await?
            .ok_or(LedgerError::ClientNotFound(client_id))?;

        Self::apply_to(txn, command, &client).await
    }

    /// Applies the command on top of the `client` snapshot.
    async fn apply_to(
        txn: &DatabaseTransaction,
        command: &PaymentCommand,
        client: &clients::Model,
    ) -> Result<Applied, WriteFailure> {
        let key = command.duplicate_key();
        if let Some(record) = find_duplicate(txn, &key).await? {
            return Ok(Applied::Duplicate {
                record,
                balance: client.balance,
            });
        }

        let change = apply_payment(client.balance, &command.kind);
        let record = Self::store(txn, command, client, &change, key).await?;
        Ok(Applied::Recorded { record, change })
    }

    /// Inserts the record and bumps the client version from the snapshot.
    async fn store(
        txn: &DatabaseTransaction,
        command: &PaymentCommand,
        client: &clients::Model,
        change: &BalanceChange,
        key: DuplicateKey,
    ) -> Result<payments::Model, WriteFailure> {
        let payment_type = command.kind.payment_type();
        let sequence = client.version + 1;
        let payment_id = PaymentId::new().into_inner();
        let now: DateTimeWithTimeZone = Utc::now().into();

        let record = payments::ActiveModel {
            id: Set(payment_id),
            client_id: Set(client.id),
            collector_id: Set(command.collector_id.into_inner()),
            amount: Set(change.amount),
            submitted_amount: Set(key.amount),
            concept: Set(command.concept.clone()),
            payment_type: Set(payment_type.into()),
            paid_at: Set(command.paid_at.into()),
            balance_before: Set(change.balance_before),
            balance_after: Set(change.balance_after),
            method: Set(command.method.into()),
            receipt_number: Set(command
                .receipt_number
                .clone()
                .unwrap_or_else(|| format!("REC-{}", payment_id.simple()))),
            local_id: Set(command.local_id.clone()),
            printed: Set(command.printed),
            synchronized: Set(command.synchronized),
            sequence: Set(sequence),
            created_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                WriteFailure::Conflict(key)
            } else {
                WriteFailure::Storage(err)
            }
        })?;

        let mut update = clients::Entity::update_many()
            .col_expr(clients::Column::Version, Expr::value(sequence))
            .col_expr(clients::Column::UpdatedAt, Expr::value(now))
            .filter(clients::Column::Id.eq(client.id))
            .filter(clients::Column::Version.eq(client.version));
        if payment_type.affects_balance() {
            update = update.col_expr(clients::Column::Balance, Expr::value(change.balance_after));
        }

        let result = update.exec(txn).await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::ConcurrentModification(client.id).into());
        }

        Ok(record)
    }

    /// Maps a unique-index hit raised by a concurrent writer to an outcome.
    async fn resolve_conflict(&self, key: &DuplicateKey) -> Result<PaymentOutcome, LedgerError> {
        let client_id = key.client_id.into_inner();
        let Some(record) = find_duplicate(&self.db, key)
            .await
            .map_err(storage_error)?
        else {
            // The sequence index fired: another write took this version.
            return Err(LedgerError::ConcurrentModification(client_id));
        };

        let client = clients::Entity::find_by_id(client_id)
            .one(&self.db)
            .await
            .map_err(storage_error)?
            .ok_or(LedgerError::ClientNotFound(client_id))?;

        info!(payment_id = %record.id, "duplicate submission detected on insert");
        Ok(PaymentOutcome::Duplicate {
            record,
            balance: client.balance,
        })
    }

    /// Sets a client's balance to `new_balance`, resolving the client by code.
    ///
    /// Recorded as an `abono` record whose amount is the absolute difference.
    /// Re-sending the same import at the same `at` is reported with
    /// `duplicate` set and leaves the balance untouched.
    ///
    /// # Errors
    ///
    /// Returns `ClientCodeNotFound` for an unknown code, otherwise any error of
    /// [`record_payment`](Self::record_payment).
    #[tracing::instrument(skip(self, reason))]
    pub async fn import_balance(
        &self,
        actor: CollectorId,
        client_code: &str,
        new_balance: Decimal,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<BalanceAdjustment, LedgerError> {
        let code = client_code.trim();
        if code.is_empty() {
            return Err(LedgerError::MissingField("client_code"));
        }

        let client = clients::Entity::find()
            .filter(clients::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| LedgerError::ClientCodeNotFound(code.to_string()))?;

        let concept = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_ADJUSTMENT_CONCEPT.to_string());

        let command = PaymentCommand::new(
            ClientId::from_uuid(client.id),
            actor,
            PaymentKind::Adjustment {
                target_balance: new_balance,
            },
            at,
        )
        .with_concept(concept);

        let outcome = self.record_payment(command).await?;
        let duplicate = outcome.is_duplicate();
        let record = outcome.into_record();
        Ok(BalanceAdjustment {
            client_code: client.code,
            balance_before: record.balance_before,
            balance_after: record.balance_after,
            record,
            duplicate,
        })
    }

    /// Applies a list of balance imports, each in its own transaction.
    ///
    /// Item `i` is stamped `at + i` microseconds, so two items for the same
    /// client stay distinct submissions while a re-sent batch is recognised.
    /// A failing item is collected and never rolls back another.
    #[tracing::instrument(skip(self, items), fields(items = items.len()))]
    pub async fn import_balance_batch(
        &self,
        actor: CollectorId,
        items: Vec<BalanceImportItem>,
        at: DateTime<Utc>,
    ) -> BatchImportResult {
        let mut result = BatchImportResult::default();

        for (index, item) in items.into_iter().enumerate() {
            let client_code = item.client_code.clone();
            match self.import_item(actor, item, item_timestamp(at, index)).await {
                Ok(adjustment) if adjustment.duplicate => result.duplicates.push(adjustment),
                Ok(adjustment) => result.succeeded.push(adjustment),
                Err(err) => {
                    warn!(
                        index,
                        client_code = client_code.as_deref().unwrap_or_default(),
                        error = %err,
                        "balance import item failed"
                    );
                    result.failed.push(BatchFailure::new(index, client_code, &err));
                }
            }
        }

        info!(
            succeeded = result.succeeded.len(),
            duplicates = result.duplicates.len(),
            failed = result.failed.len(),
            "balance import finished"
        );
        result
    }

    async fn import_item(
        &self,
        actor: CollectorId,
        item: BalanceImportItem,
        at: DateTime<Utc>,
    ) -> Result<BalanceAdjustment, LedgerError> {
        let code = item
            .client_code
            .filter(|c| !c.trim().is_empty())
            .ok_or(LedgerError::MissingField("client_code"))?;
        let new_balance = item
            .new_balance
            .ok_or(LedgerError::MissingField("new_balance"))?;

        self.import_balance(actor, &code, new_balance, item.reason, at)
            .await
    }

    /// Uploads payments captured offline by one collector.
    ///
    /// Payments whose `local_id` or duplicate key is already stored are
    /// tallied as duplicates.
    ///
    /// # Errors
    ///
    /// Returns `CollectorNotFound` if the collector does not exist, or
    /// `TransactionFailure` if it cannot be looked up. Per-payment errors are
    /// collected in the report.
    #[tracing::instrument(skip(self, payments), fields(payments = payments.len()))]
    pub async fn sync_offline_payments(
        &self,
        collector_id: CollectorId,
        payments: Vec<OfflinePayment>,
    ) -> Result<SyncReport, LedgerError> {
        collectors::Entity::find_by_id(collector_id.into_inner())
            .one(&self.db)
            .await
            .map_err(storage_error)?
            .ok_or(LedgerError::CollectorNotFound(collector_id.into_inner()))?;

        let lookup = PaymentRepository::new(self.db.clone());
        let mut report = SyncReport::default();

        for (index, payment) in payments.into_iter().enumerate() {
            let local_id = payment.local_id.clone();

            if let Some(ref id) = local_id {
                match lookup.find_by_local_id(collector_id, id).await {
                    Ok(Some(record)) => {
                        report.duplicates.push(record);
                        continue;
                    }
                    Ok(None) => {}
                    Err(err) => {
                        let err = storage_error(err);
                        report.failed.push(SyncFailure {
                            index,
                            local_id,
                            reason: err.to_string(),
                            error_code: err.error_code(),
                        });
                        continue;
                    }
                }
            }

            let outcome = match payment.into_command(collector_id) {
                Ok(command) => self.record_payment(command).await,
                Err(err) => Err(err),
            };

            match outcome {
                Ok(PaymentOutcome::Recorded { record, .. }) => report.created.push(record),
                Ok(PaymentOutcome::Duplicate { record, .. }) => report.duplicates.push(record),
                Err(err) => {
                    warn!(index, error = %err, "offline payment rejected");
                    report.failed.push(SyncFailure {
                        index,
                        local_id,
                        reason: err.to_string(),
                        error_code: err.error_code(),
                    });
                }
            }
        }

        info!(
            created = report.created.len(),
            duplicates = report.duplicates.len(),
            failed = report.failed.len(),
            "offline sync finished"
        );
        Ok(report)
    }

    /// Returns one page of a client's history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound` for an unknown client or `TransactionFailure`
    /// if the query fails.
    pub async fn payment_history(
        &self,
        client_id: ClientId,
        page: PageRequest,
    ) -> Result<PageResponse<payments::Model>, LedgerError> {
        self.load_client(client_id).await?;
        PaymentRepository::new(self.db.clone())
            .history(client_id, page)
            .await
            .map_err(storage_error)
    }

    /// Checks that the stored balance agrees with the payment history.
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound` for an unknown client or `TransactionFailure`
    /// if the query fails.
    pub async fn verify_history(&self, client_id: ClientId) -> Result<HistoryReport, LedgerError> {
        let client = self.load_client(client_id).await?;
        let records = PaymentRepository::new(self.db.clone())
            .chain(client_id)
            .await
            .map_err(storage_error)?;

        let steps: Vec<HistoryStep> = records
            .iter()
            .map(|r| HistoryStep {
                sequence: r.sequence,
                balance_before: r.balance_before,
                balance_after: r.balance_after,
            })
            .collect();
        let breaks = verify_history(&steps, client.balance);
        if !breaks.is_empty() {
            warn!(%client_id, breaks = breaks.len(), "payment history is inconsistent");
        }

        Ok(HistoryReport {
            client_id,
            stored_balance: client.balance,
            records: records.len(),
            breaks,
        })
    }

    async fn load_client(&self, client_id: ClientId) -> Result<clients::Model, LedgerError> {
        clients::Entity::find_by_id(client_id.into_inner())
            .one(&self.db)
            .await
            .map_err(storage_error)?
            .ok_or(LedgerError::ClientNotFound(client_id.into_inner()))
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
