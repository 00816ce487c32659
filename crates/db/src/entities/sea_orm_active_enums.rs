//! String-backed active enums shared by the entities.
//!
//! Each enum mirrors a `collecta-core` type; conversions live here so the core
//! crate stays free of database dependencies.

#![allow(missing_docs)]

use collecta_core::ledger::{PaymentMethod as CorePaymentMethod, PaymentType as CorePaymentType};
use collecta_core::{
    ClientStatus as CoreClientStatus, CollectorRole as CoreCollectorRole,
    Periodicity as CorePeriodicity,
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored payment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PaymentType {
    #[sea_orm(string_value = "regular")]
    Regular,
    #[sea_orm(string_value = "moratorio")]
    Moratorio,
    #[sea_orm(string_value = "abono")]
    Abono,
}

/// Stored payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "efectivo")]
    Efectivo,
    #[sea_orm(string_value = "transferencia")]
    Transferencia,
    #[sea_orm(string_value = "tarjeta")]
    Tarjeta,
}

/// Stored payment cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Periodicity {
    #[sea_orm(string_value = "semanal")]
    Semanal,
    #[sea_orm(string_value = "quincenal")]
    Quincenal,
    #[sea_orm(string_value = "mensual")]
    Mensual,
}

/// Stored client status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ClientStatus {
    #[sea_orm(string_value = "activo")]
    Activo,
    #[sea_orm(string_value = "inactivo")]
    Inactivo,
}

/// Stored collector role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum CollectorRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "cobrador")]
    Cobrador,
}

impl From<CorePaymentType> for PaymentType {
    fn from(value: CorePaymentType) -> Self {
        match value {
            CorePaymentType::Regular => Self::Regular,
            CorePaymentType::Moratory => Self::Moratorio,
            CorePaymentType::Adjustment => Self::Abono,
        }
    }
}

impl From<PaymentType> for CorePaymentType {
    fn from(value: PaymentType) -> Self {
        match value {
            PaymentType::Regular => Self::Regular,
            PaymentType::Moratorio => Self::Moratory,
            PaymentType::Abono => Self::Adjustment,
        }
    }
}

impl From<CorePaymentMethod> for PaymentMethod {
    fn from(value: CorePaymentMethod) -> Self {
        match value {
            CorePaymentMethod::Cash => Self::Efectivo,
            CorePaymentMethod::Transfer => Self::Transferencia,
            CorePaymentMethod::Card => Self::Tarjeta,
        }
    }
}

impl From<CorePeriodicity> for Periodicity {
    fn from(value: CorePeriodicity) -> Self {
        match value {
            CorePeriodicity::Weekly => Self::Semanal,
            CorePeriodicity::Biweekly => Self::Quincenal,
            CorePeriodicity::Monthly => Self::Mensual,
        }
    }
}

impl From<Periodicity> for CorePeriodicity {
    fn from(value: Periodicity) -> Self {
        match value {
            Periodicity::Semanal => Self::Weekly,
            Periodicity::Quincenal => Self::Biweekly,
            Periodicity::Mensual => Self::Monthly,
        }
    }
}

impl From<CoreClientStatus> for ClientStatus {
    fn from(value: CoreClientStatus) -> Self {
        match value {
            CoreClientStatus::Active => Self::Activo,
            CoreClientStatus::Inactive => Self::Inactivo,
        }
    }
}

impl From<CoreCollectorRole> for CollectorRole {
    fn from(value: CoreCollectorRole) -> Self {
        match value {
            CoreCollectorRole::Admin => Self::Admin,
            CoreCollectorRole::Collector => Self::Cobrador,
        }
    }
}
