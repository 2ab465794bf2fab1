//! The ledger engine: affordability, settlement and deposits against a holder store.
use thiserror::Error;
use tracing::info;

use crate::ledger::{
    BaseValue, CartLine, ChangeOrder, Cost, HolderId, HolderStore, Holding, PaymentResult,
    ReferenceCatalog, Settlement, StoreError, breakdown, cart_total, evaluate_affordability,
    plan_deposit, project, settle_payment,
};

/// Errors that can occur while processing a ledger operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient funds: {available} cp available, {cost} cp required")]
    InsufficientFunds { available: BaseValue, cost: BaseValue },
    #[error("Transaction failed: {0}")]
    Persistence(#[from] StoreError),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Settles payments and deposits coins for holders kept in a [`HolderStore`].
pub struct Ledger<S, C> {
    store: S,
    catalog: C,
    change_order: ChangeOrder,
}

impl<S: HolderStore, C: ReferenceCatalog> Ledger<S, C> {
    /// Creates a new ledger.
    pub fn new(store: S, catalog: C, change_order: ChangeOrder) -> Self {
        Ledger {
            store,
            catalog,
            change_order,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current holding of a holder.
    pub async fn holding(&self, holder: HolderId) -> Result<Holding, LedgerError> {
        let stacks = self.store.list_stacks(holder).await?;
        Ok(Holding::from_stacks(&stacks))
    }

    /// Pays `cost` from the holder's coin stacks and returns the change.
    ///
    /// Spend and change deposit are sent to the store as one batch, so a failed payment
    /// leaves the holder untouched. Returns `InsufficientFunds` without settling if the
    /// holder cannot cover the cost.
    pub async fn purchase(&self, holder: HolderId, cost: Cost) -> Result<PaymentResult, LedgerError> {
        let stacks = self.store.list_stacks(holder).await?;
        let holding = Holding::from_stacks(&stacks);
        let affordability = evaluate_affordability(&holding, &cost);
        if !affordability.can_buy {
            return Err(LedgerError::InsufficientFunds {
                available: affordability.available,
                cost: affordability.cost_base,
            });
        }

        let settlement = settle_payment(&stacks, affordability.cost_base, self.change_order);
        let remaining = project(&stacks, &settlement.mutations);
        let (deposit, _) = plan_deposit(&remaining, &settlement.change, &self.catalog).await;

        let Settlement {
            spent,
            change,
            mut mutations,
        } = settlement;
        mutations.extend(deposit);
        self.store.apply(holder, mutations).await?;

        let result = PaymentResult { spent, change };
        info!(
            holder,
            cost = affordability.cost_base,
            spent = ?result.spent,
            change = ?result.change,
            "Payment completed"
        );
        Ok(result)
    }

    /// Pays for every line of a cart as a single copper-denominated purchase.
    pub async fn purchase_cart(
        &self,
        holder: HolderId,
        lines: &[CartLine],
    ) -> Result<PaymentResult, LedgerError> {
        self.purchase(holder, Cost::copper(cart_total(lines))).await
    }

    /// Deposits a base-unit amount onto the holder, largest denominations first.
    /// Returns the coins actually deposited.
    pub async fn grant(&self, holder: HolderId, amount: BaseValue) -> Result<Holding, LedgerError> {
        let coins = breakdown(amount, ChangeOrder::Descending);
        let stacks = self.store.list_stacks(holder).await?;
        let (mutations, deposited) = plan_deposit(&stacks, &coins, &self.catalog).await;
        if !mutations.is_empty() {
            self.store.apply(holder, mutations).await?;
        }
        info!(holder, amount, deposited = ?deposited, "Currency granted");
        Ok(deposited)
    }
}
