//! Reference currency metadata used when a holder needs a brand-new coin stack.
use std::{collections::HashMap, future::Future};

use crate::ledger::Denomination;

/// Display data copied onto newly created stacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyMetadata {
    pub name: String,
    pub icon: String,
}

/// Looks up reference metadata for a denomination.
pub trait ReferenceCatalog {
    /// Returns `None` when no reference item exists for the denomination.
    fn lookup(
        &self,
        denomination: Denomination,
    ) -> impl Future<Output = Option<CurrencyMetadata>> + Send;
}

/// A catalog backed by a fixed in-memory table.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: HashMap<Denomination, CurrencyMetadata>,
}

impl StaticCatalog {
    /// The standard coin items for all five denominations.
    pub fn standard() -> Self {
        let entries = Denomination::DESCENDING
            .into_iter()
            .map(|denomination| {
                let (name, icon) = match denomination {
                    Denomination::Pp => (
                        "Platinum Coins",
                        "icons/commodities/currency/coin-inset-compass-silver.webp",
                    ),
                    Denomination::Gp => (
                        "Gold Coins",
                        "icons/commodities/currency/coin-embossed-cobra-gold.webp",
                    ),
                    Denomination::Ep => (
                        "Electrum Coins",
                        "icons/commodities/currency/coin-engraved-oval-steel.webp",
                    ),
                    Denomination::Sp => (
                        "Silver Coins",
                        "icons/commodities/currency/coin-embossed-unicorn-silver.webp",
                    ),
                    Denomination::Cp => (
                        "Copper Coins",
                        "icons/commodities/currency/coin-oval-rune-copper.webp",
                    ),
                };
                let metadata = CurrencyMetadata {
                    name: name.to_string(),
                    icon: icon.to_string(),
                };
                (denomination, metadata)
            })
            .collect();
        StaticCatalog { entries }
    }

    /// Removes the entry for a denomination.
    pub fn without(mut self, denomination: Denomination) -> Self {
        self.entries.remove(&denomination);
        self
    }
}

impl ReferenceCatalog for StaticCatalog {
    async fn lookup(&self, denomination: Denomination) -> Option<CurrencyMetadata> {
        self.entries.get(&denomination).cloned()
    }
}
