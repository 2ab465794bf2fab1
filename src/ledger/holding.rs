//! Holdings: per-denomination coin counts and their base-unit value.
use std::collections::BTreeMap;

use tracing::warn;

use crate::ledger::{BaseValue, CoinStack, Cost, Denomination};

/// Coins possessed by a holder, keyed by denomination. Absent denominations count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Holding {
    counts: BTreeMap<Denomination, u64>,
}

impl Holding {
    /// Creates an empty holding.
    pub fn new() -> Self {
        Holding::default()
    }

    /// Builds a holding from raw `(currency code, count)` pairs.
    /// Unknown codes are skipped and logged rather than rejected.
    pub fn from_codes<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let mut holding = Holding::new();
        for (code, count) in entries {
            match code.parse::<Denomination>() {
                Ok(denomination) => holding.add(denomination, count),
                Err(err) => warn!(%code, count, "Ignoring holding entry: {err}"),
            }
        }
        holding
    }

    /// Sums the quantities of the given stacks per denomination.
    pub fn from_stacks(stacks: &[CoinStack]) -> Self {
        let mut holding = Holding::new();
        for stack in stacks {
            holding.add(stack.denomination, stack.quantity);
        }
        holding
    }

    /// Number of coins of the given denomination.
    pub fn get(&self, denomination: Denomination) -> u64 {
        self.counts.get(&denomination).copied().unwrap_or(0)
    }

    /// Adds `count` coins of the given denomination.
    pub fn add(&mut self, denomination: Denomination, count: u64) {
        if count == 0 {
            return;
        }
        let entry = self.counts.entry(denomination).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    /// Iterates over the non-zero entries, highest denomination first.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, u64)> + '_ {
        self.counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(denomination, count)| (*denomination, *count))
    }

    /// Returns true if the holding contains no coins.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Total value of the holding in the base unit.
    pub fn base_value(&self) -> BaseValue {
        compute_base_value(self)
    }
}

impl FromIterator<(Denomination, u64)> for Holding {
    fn from_iter<T: IntoIterator<Item = (Denomination, u64)>>(iter: T) -> Self {
        let mut holding = Holding::new();
        for (denomination, count) in iter {
            holding.add(denomination, count);
        }
        holding
    }
}

/// Sums `count × rate` over every denomination present in the holding.
pub fn compute_base_value(holding: &Holding) -> BaseValue {
    holding
        .iter()
        .map(|(denomination, count)| denomination.value_of(count))
        .fold(0, BaseValue::saturating_add)
}

/// Outcome of comparing a holding against a cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordability {
    /// The total value of the holding in the base unit.
    pub available: BaseValue,
    /// The cost converted to the base unit.
    pub cost_base: BaseValue,
    /// Whether the holding covers the cost.
    pub can_buy: bool,
}

/// Converts both sides to the base unit and checks whether the holding covers the cost.
pub fn evaluate_affordability(holding: &Holding, cost: &Cost) -> Affordability {
    let available = compute_base_value(holding);
    let cost_base = cost.base_value();
    Affordability {
        available,
        cost_base,
        can_buy: available >= cost_base,
    }
}
