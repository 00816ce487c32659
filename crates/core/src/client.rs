//! Client account attributes shared by the ledger and reporting.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account status. Clients are never deleted, only deactivated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientStatus {
    /// Account is being collected.
    #[default]
    #[serde(rename = "activo")]
    Active,
    /// Account is closed or suspended.
    #[serde(rename = "inactivo")]
    Inactive,
}

impl ClientStatus {
    /// Returns the persisted name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "activo",
            Self::Inactive => "inactivo",
        }
    }
}

impl FromStr for ClientStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "activo" | "active" => Ok(Self::Active),
            "inactivo" | "inactive" => Ok(Self::Inactive),
            _ => Err(format!("Unknown client status: {s}")),
        }
    }
}

/// Role of a collector account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectorRole {
    /// Office administrator; performs balance imports.
    #[serde(rename = "admin")]
    Admin,
    /// Field collector.
    #[default]
    #[serde(rename = "cobrador")]
    Collector,
}
