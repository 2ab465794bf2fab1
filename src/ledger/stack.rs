//! Coin stacks: persisted, identity-bearing quantities of a single denomination.
use crate::ledger::{BaseValue, CurrencyMetadata, Denomination, StackId};

/// A physical stack of coins held by an actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinStack {
    /// The opaque identifier assigned by the store.
    pub id: StackId,
    /// The denomination of every coin in the stack.
    pub denomination: Denomination,
    /// The number of coins in the stack.
    pub quantity: u64,
    /// Display name, e.g. "Gold Coins".
    pub name: String,
    /// Icon path shown next to the stack.
    pub icon: String,
}

impl CoinStack {
    /// Value of the whole stack in the base unit.
    pub fn base_value(&self) -> BaseValue {
        self.denomination.value_of(self.quantity)
    }
}

/// A stack that has not been persisted yet and so has no identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoinStack {
    pub denomination: Denomination,
    pub quantity: u64,
    pub metadata: CurrencyMetadata,
}

impl NewCoinStack {
    /// Attaches the identifier assigned on creation.
    pub fn into_stack(self, id: StackId) -> CoinStack {
        CoinStack {
            id,
            denomination: self.denomination,
            quantity: self.quantity,
            name: self.metadata.name,
            icon: self.metadata.icon,
        }
    }
}

/// A single change to a holder's coin stacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackMutation {
    /// Remove the stack entirely.
    Delete(StackId),
    /// Set the stack's quantity to a new value.
    Update { id: StackId, quantity: u64 },
    /// Persist a brand-new stack.
    Create(NewCoinStack),
}
