//! Holder storage: the persistence boundary for coin stacks.
use std::{
    collections::{BTreeMap, HashMap},
    future::Future,
};

use thiserror::Error;
use tokio::sync::Mutex;

use crate::ledger::{
    CoinStack, CurrencyMetadata, Denomination, HolderId, NewCoinStack, StackId, StackMutation,
};

/// Persistence for holders' coin stacks.
pub trait HolderStore {
    /// Lists the holder's coin stacks in stored order. Unknown holders have no stacks.
    fn list_stacks(
        &self,
        holder: HolderId,
    ) -> impl Future<Output = Result<Vec<CoinStack>, StoreError>> + Send;

    /// Applies all mutations in order as one unit: either every mutation lands or none does.
    fn apply(
        &self,
        holder: HolderId,
        mutations: Vec<StackMutation>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Errors raised by a holder store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Stack {stack} does not exist for holder {holder}")]
    UnknownStack { holder: HolderId, stack: StackId },
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Default)]
struct Inner {
    holders: HashMap<HolderId, Vec<CoinStack>>,
    next_id: StackId,
}

impl Inner {
    fn allocate_id(&mut self) -> StackId {
        self.next_id += 1;
        self.next_id
    }
}

/// An in-memory store. Each batch is validated against a copy and swapped in on success.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Appends a stack with standard naming to a holder and returns its identifier.
    pub async fn seed(&self, holder: HolderId, denomination: Denomination, quantity: u64) -> StackId {
        let mut inner = self.inner.lock().await;
        let id = inner.allocate_id();
        let stack = NewCoinStack {
            denomination,
            quantity,
            metadata: CurrencyMetadata {
                name: format!("{} coins", denomination.code()),
                icon: String::new(),
            },
        }
        .into_stack(id);
        inner.holders.entry(holder).or_default().push(stack);
        id
    }

    /// Copies every holder's stacks, ordered by holder.
    pub async fn snapshot(&self) -> BTreeMap<HolderId, Vec<CoinStack>> {
        let inner = self.inner.lock().await;
        inner
            .holders
            .iter()
            .map(|(holder, stacks)| (*holder, stacks.clone()))
            .collect()
    }
}

impl HolderStore for MemoryStore {
    async fn list_stacks(&self, holder: HolderId) -> Result<Vec<CoinStack>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.holders.get(&holder).cloned().unwrap_or_default())
    }

    async fn apply(&self, holder: HolderId, mutations: Vec<StackMutation>) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let mut stacks = inner.holders.get(&holder).cloned().unwrap_or_default();
        let mut next_id = inner.next_id;

        for mutation in mutations {
            match mutation {
                StackMutation::Delete(id) => {
                    let index = stacks
                        .iter()
                        .position(|s| s.id == id)
                        .ok_or(StoreError::UnknownStack { holder, stack: id })?;
                    stacks.remove(index);
                }
                StackMutation::Update { id, quantity } => {
                    let stack = stacks
                        .iter_mut()
                        .find(|s| s.id == id)
                        .ok_or(StoreError::UnknownStack { holder, stack: id })?;
                    stack.quantity = quantity;
                }
                StackMutation::Create(new) => {
                    next_id += 1;
                    stacks.push(new.into_stack(next_id));
                }
            }
        }

        inner.next_id = next_id;
        inner.holders.insert(holder, stacks);
        Ok(())
    }
}
