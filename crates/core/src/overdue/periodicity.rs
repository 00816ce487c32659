//! Agreed payment cadence.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Payment cadence agreed with the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Periodicity {
    /// Every 7 days.
    #[serde(rename = "semanal")]
    Weekly,
    /// Every 15 days.
    #[serde(rename = "quincenal")]
    Biweekly,
    /// Every 30 days.
    #[serde(rename = "mensual")]
    Monthly,
}

impl Periodicity {
    /// Length of one payment cycle in days.
    #[must_use]
    pub const fn cycle_days(&self) -> i64 {
        match self {
            Self::Weekly => 7,
            Self::Biweekly => 15,
            Self::Monthly => 30,
        }
    }

    /// Returns the persisted name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "semanal",
            Self::Biweekly => "quincenal",
            Self::Monthly => "mensual",
        }
    }
}

impl std::fmt::Display for Periodicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Periodicity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "semanal" | "weekly" => Ok(Self::Weekly),
            "quincenal" | "biweekly" => Ok(Self::Biweekly),
            "mensual" | "monthly" => Ok(Self::Monthly),
            _ => Err(format!("Unknown periodicity: {s}")),
        }
    }
}
