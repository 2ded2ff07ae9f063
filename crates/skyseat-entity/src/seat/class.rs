//! Seat cabin class enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cabin class of a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "seat_class", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SeatClass {
    /// Economy cabin.
    Economy,
    /// Premium economy cabin.
    PremiumEconomy,
    /// Business cabin.
    Business,
    /// First class cabin.
    First,
}

impl SeatClass {
    /// Return the class as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economy => "economy",
            Self::PremiumEconomy => "premium_economy",
            Self::Business => "business",
            Self::First => "first",
        }
    }
}

impl fmt::Display for SeatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "economy" => Ok(Self::Economy),
            "premium_economy" => Ok(Self::PremiumEconomy),
            "business" => Ok(Self::Business),
            "first" => Ok(Self::First),
            other => Err(format!("unknown seat class '{other}'")),
        }
    }
}
