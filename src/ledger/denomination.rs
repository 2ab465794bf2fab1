//! Coin denominations and their fixed exchange rates to copper.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::BaseValue;

/// A coin type. Declaration order is highest value first.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Denomination {
    Pp,
    Gp,
    Ep,
    Sp,
    Cp,
}

impl Denomination {
    /// All denominations from highest to lowest value.
    pub const DESCENDING: [Denomination; 5] = [
        Denomination::Pp,
        Denomination::Gp,
        Denomination::Ep,
        Denomination::Sp,
        Denomination::Cp,
    ];

    /// All denominations from lowest to highest value.
    pub const ASCENDING: [Denomination; 5] = [
        Denomination::Cp,
        Denomination::Sp,
        Denomination::Ep,
        Denomination::Gp,
        Denomination::Pp,
    ];

    /// Exchange rate to the base unit.
    pub const fn rate(self) -> BaseValue {
        match self {
            Denomination::Pp => 500,
            Denomination::Gp => 100,
            Denomination::Ep => 50,
            Denomination::Sp => 10,
            Denomination::Cp => 1,
        }
    }

    /// Short currency code, e.g. `gp`.
    pub const fn code(self) -> &'static str {
        match self {
            Denomination::Pp => "pp",
            Denomination::Gp => "gp",
            Denomination::Ep => "ep",
            Denomination::Sp => "sp",
            Denomination::Cp => "cp",
        }
    }

    /// Base value of `count` coins of this denomination.
    pub fn value_of(self, count: u64) -> BaseValue {
        count.saturating_mul(self.rate())
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a currency code does not name a known denomination.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown currency code: {0}")]
pub struct UnknownDenomination(pub String);

impl FromStr for Denomination {
    type Err = UnknownDenomination;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pp" => Ok(Denomination::Pp),
            "gp" => Ok(Denomination::Gp),
            "ep" => Ok(Denomination::Ep),
            "sp" => Ok(Denomination::Sp),
            "cp" => Ok(Denomination::Cp),
            _ => Err(UnknownDenomination(s.to_string())),
        }
    }
}

impl TryFrom<String> for Denomination {
    type Error = UnknownDenomination;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
