//! Read access to the payment history.
//!
//! Payment records are written only by the ledger and never updated.

use collecta_core::ledger::DuplicateKey;
use collecta_shared::types::{ClientId, CollectorId, PageRequest, PageResponse};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::payments;

/// Repository for payment records.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns one page of a client's history, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn history(
        &self,
        client_id: ClientId,
        page: PageRequest,
    ) -> Result<PageResponse<payments::Model>, DbErr> {
        let query = payments::Entity::find()
            .filter(payments::Column::ClientId.eq(client_id.into_inner()));

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_desc(payments::Column::Sequence)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page, total))
    }

    /// Finds a previously recorded payment with the same natural key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_duplicate(
        &self,
        key: &DuplicateKey,
    ) -> Result<Option<payments::Model>, DbErr> {
        find_duplicate(&self.db, key).await
    }

    /// Finds a payment uploaded from a collector's device by its local id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_local_id(
        &self,
        collector_id: CollectorId,
        local_id: &str,
    ) -> Result<Option<payments::Model>, DbErr> {
        payments::Entity::find()
            .filter(payments::Column::CollectorId.eq(collector_id.into_inner()))
            .filter(payments::Column::LocalId.eq(local_id))
            .one(&self.db)
            .await
    }

    /// Returns a client's full history in sequence order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn chain(&self, client_id: ClientId) -> Result<Vec<payments::Model>, DbErr> {
        payments::Entity::find()
            .filter(payments::Column::ClientId.eq(client_id.into_inner()))
            .order_by_asc(payments::Column::Sequence)
            .all(&self.db)
            .await
    }
}

/// Looks up a payment by duplicate key on any connection or transaction.
pub(crate) async fn find_duplicate<C>(
    conn: &C,
    key: &DuplicateKey,
) -> Result<Option<payments::Model>, DbErr>
where
    C: ConnectionTrait,
{
    let paid_at: DateTimeWithTimeZone = key.paid_at.into();
    payments::Entity::find()
        .filter(payments::Column::ClientId.eq(key.client_id.into_inner()))
        .filter(payments::Column::CollectorId.eq(key.collector_id.into_inner()))
        .filter(payments::Column::SubmittedAmount.eq(key.amount))
        .filter(payments::Column::PaidAt.eq(paid_at))
        .one(conn)
        .await
}
