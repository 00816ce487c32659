//! Collector repository.

use chrono::Utc;
use collecta_core::CollectorRole;
use collecta_shared::types::CollectorId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::collectors;

/// Input for registering a collector.
#[derive(Debug, Clone)]
pub struct CreateCollectorInput {
    /// Display name.
    pub name: String,
    /// Role on the route.
    pub role: CollectorRole,
}

/// Repository for collector accounts.
#[derive(Debug, Clone)]
pub struct CollectorRepository {
    db: DatabaseConnection,
}

impl CollectorRepository {
    /// Creates a new collector repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a new active collector.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create(&self, input: CreateCollectorInput) -> Result<collectors::Model, DbErr> {
        let now = Utc::now().into();
        collectors::ActiveModel {
            id: Set(CollectorId::new().into_inner()),
            name: Set(input.name),
            role: Set(input.role.into()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Finds a collector by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: CollectorId) -> Result<Option<collectors::Model>, DbErr> {
        collectors::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
    }

    /// Lists active collectors by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(&self) -> Result<Vec<collectors::Model>, DbErr> {
        collectors::Entity::find()
            .filter(collectors::Column::IsActive.eq(true))
            .order_by_asc(collectors::Column::Name)
            .all(&self.db)
            .await
    }
}
