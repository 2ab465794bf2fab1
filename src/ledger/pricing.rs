//! Prices: costs, per-merchant buy/sell multipliers and cart totals.
use std::collections::HashMap;

use crate::ledger::{BaseValue, Denomination};

/// Item categories a merchant can price separately.
pub const CATEGORIES: [&str; 15] = [
    "Ammunition",
    "Animal",
    "Armor",
    "Clothing",
    "Container",
    "Daily Food and Lodging",
    "Gear",
    "Gem",
    MAGIC_CATEGORY,
    "Provisions",
    "Service",
    "Tack and Harness",
    "Tool",
    "Transport",
    "Weapon",
];

/// Category whose multiplier applies to every magic item.
pub const MAGIC_CATEGORY: &str = "Magic";

/// Default multiplier for purchases from a merchant.
pub const DEFAULT_BUY_MULTIPLIER: f64 = 1.0;

/// Default multiplier for sales to a merchant.
pub const DEFAULT_SELL_MULTIPLIER: f64 = 0.5;

/// Multiplier used for categories without an entry.
const FALLBACK_MULTIPLIER: f64 = 1.0;

/// A price in a given denomination. The amount may be fractional after multiplier math.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cost {
    pub amount: f64,
    pub denomination: Denomination,
}

impl Cost {
    /// Creates a new cost.
    pub fn new(amount: f64, denomination: Denomination) -> Self {
        Cost {
            amount,
            denomination,
        }
    }

    /// A cost already expressed in the base unit.
    pub fn copper(amount: BaseValue) -> Self {
        Cost::new(amount as f64, Denomination::Cp)
    }

    /// Converts the cost to the base unit, rounding to the nearest whole copper.
    /// Negative or non-finite amounts are treated as zero.
    pub fn base_value(&self) -> BaseValue {
        let value = self.amount * self.denomination.rate() as f64;
        if value.is_finite() && value > 0.0 {
            value.round() as BaseValue
        } else {
            0
        }
    }
}

/// One line of a shopping cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartLine {
    pub cost: Cost,
    pub quantity: u64,
}

/// Total of a cart in the base unit.
pub fn cart_total(lines: &[CartLine]) -> BaseValue {
    lines
        .iter()
        .map(|line| line.cost.base_value().saturating_mul(line.quantity))
        .fold(0, BaseValue::saturating_add)
}

/// Per-category price multipliers configured on a merchant.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMultipliers {
    buy: HashMap<String, f64>,
    sell: HashMap<String, f64>,
}

impl Default for PriceMultipliers {
    fn default() -> Self {
        let table = |value: f64| {
            CATEGORIES
                .iter()
                .map(|category| (category.to_string(), value))
                .collect()
        };
        PriceMultipliers {
            buy: table(DEFAULT_BUY_MULTIPLIER),
            sell: table(DEFAULT_SELL_MULTIPLIER),
        }
    }
}

impl PriceMultipliers {
    /// Replaces the default multipliers with the given entries.
    /// Negative multipliers are clamped to zero.
    pub fn with_overrides(
        mut self,
        buy: &HashMap<String, f64>,
        sell: &HashMap<String, f64>,
    ) -> Self {
        for (category, value) in buy {
            self.buy.insert(category.clone(), value.max(0.0));
        }
        for (category, value) in sell {
            self.sell.insert(category.clone(), value.max(0.0));
        }
        self
    }

    /// Multiplier applied when a player buys an item of the given category.
    pub fn buy_multiplier(&self, category: &str, magic: bool) -> f64 {
        lookup(&self.buy, category, magic)
    }

    /// Multiplier applied when a player sells an item of the given category.
    pub fn sell_multiplier(&self, category: &str, magic: bool) -> f64 {
        lookup(&self.sell, category, magic)
    }

    /// Price a player pays for an item, rounded up to a whole coin.
    pub fn buy_price(&self, price: f64, category: &str, magic: bool) -> f64 {
        (price * self.buy_multiplier(category, magic)).ceil()
    }

    /// Price a merchant pays for an item, rounded up to a whole coin.
    pub fn sell_price(&self, price: f64, category: &str, magic: bool) -> f64 {
        (price * self.sell_multiplier(category, magic)).ceil()
    }
}

fn lookup(table: &HashMap<String, f64>, category: &str, magic: bool) -> f64 {
    let key = if magic { MAGIC_CATEGORY } else { category };
    table.get(key).copied().unwrap_or(FALLBACK_MULTIPLIER)
}
