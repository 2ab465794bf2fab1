//! Payment settlement: greedy coin selection, change breakdown and deposit planning.
use serde::Deserialize;
use tracing::{debug, warn};

use crate::ledger::{
    BaseValue, CoinStack, Denomination, Holding, NewCoinStack, ReferenceCatalog, StackMutation,
};

/// Order in which denominations are visited when breaking change into coins.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOrder {
    /// Copper first. Copper absorbs the whole amount, so change is paid out in copper.
    #[default]
    Ascending,
    /// Platinum first, giving the fewest coins.
    Descending,
}

impl ChangeOrder {
    /// Denominations in the order they are visited.
    pub fn denominations(self) -> [Denomination; 5] {
        match self {
            ChangeOrder::Ascending => Denomination::ASCENDING,
            ChangeOrder::Descending => Denomination::DESCENDING,
        }
    }
}

/// Coins consumed and returned by a settlement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentResult {
    pub spent: Holding,
    pub change: Holding,
}

/// The outcome of selecting coins for a payment, before anything is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settlement {
    /// Coins taken from the holder.
    pub spent: Holding,
    /// Coins owed back to the holder.
    pub change: Holding,
    /// Deletions and reductions to apply to the holder's stacks, in order.
    pub mutations: Vec<StackMutation>,
}

/// Selects coin stacks to pay `cost_base`, largest denomination first, and computes change.
///
/// Within a denomination stacks are visited in the order given. A stack worth no more than
/// the remaining cost is consumed whole; otherwise just enough coins are taken from it
/// (rounded up) and the remainder is kept. Scanning stops as soon as the cost is covered.
/// The caller must have checked affordability first.
///
/// Coin values are summed in `u128`, so stacks whose value exceeds `u64::MAX` still settle
/// exactly.
pub fn settle_payment(stacks: &[CoinStack], cost_base: BaseValue, order: ChangeOrder) -> Settlement {
    let mut spent = Holding::new();
    let mut mutations = Vec::new();
    let mut remaining = u128::from(cost_base);
    let mut total_used: u128 = 0;

    debug!(cost_base, "Starting payment");

    'denominations: for denomination in Denomination::DESCENDING {
        let rate = u128::from(denomination.rate());
        for stack in stacks.iter().filter(|s| s.denomination == denomination) {
            if remaining == 0 {
                break 'denominations;
            }
            let value = u128::from(stack.quantity) * rate;
            if value <= remaining {
                spent.add(denomination, stack.quantity);
                total_used += value;
                remaining -= value;
                mutations.push(StackMutation::Delete(stack.id));
                debug!(stack = stack.id, quantity = stack.quantity, %denomination, %remaining, "Used whole stack");
            } else {
                // needed <= quantity because quantity * rate > remaining
                let needed = remaining.div_ceil(rate) as u64;
                let left = stack.quantity - needed;
                spent.add(denomination, needed);
                total_used += u128::from(needed) * rate;
                remaining = 0;
                if left > 0 {
                    mutations.push(StackMutation::Update {
                        id: stack.id,
                        quantity: left,
                    });
                } else {
                    mutations.push(StackMutation::Delete(stack.id));
                }
                debug!(stack = stack.id, quantity = needed, %denomination, left, "Split stack");
            }
        }
        if remaining == 0 {
            break;
        }
    }

    if remaining > 0 {
        warn!(cost_base, %remaining, "Stacks do not cover the cost");
    }

    // Overpayment comes only from rounding up one split stack, so it is below one coin's rate.
    let overpaid = total_used.saturating_sub(u128::from(cost_base));
    let change_remaining = BaseValue::try_from(overpaid).unwrap_or(BaseValue::MAX);
    let change = if change_remaining > 0 {
        breakdown(change_remaining, order)
    } else {
        Holding::new()
    };
    debug!(%total_used, cost_base, change_remaining, "Payment selected");

    Settlement {
        spent,
        change,
        mutations,
    }
}

/// Splits a base-unit amount into coins, taking as many of each denomination as fit
/// in the given order. Any residue left after the last denomination is dropped.
pub fn breakdown(amount: BaseValue, order: ChangeOrder) -> Holding {
    let mut remaining = amount;
    let mut coins = Holding::new();
    for denomination in order.denominations() {
        let count = remaining / denomination.rate();
        coins.add(denomination, count);
        remaining -= count * denomination.rate();
    }
    if remaining > 0 {
        warn!(amount, remaining, "Dropped unrepresentable remainder");
    }
    coins
}

/// Applies mutations to a local copy of a holder's stacks.
/// Created stacks are not included since they have no identifier yet.
pub fn project(stacks: &[CoinStack], mutations: &[StackMutation]) -> Vec<CoinStack> {
    let mut projected = stacks.to_vec();
    for mutation in mutations {
        match mutation {
            StackMutation::Delete(id) => projected.retain(|s| s.id != *id),
            StackMutation::Update { id, quantity } => {
                if let Some(stack) = projected.iter_mut().find(|s| s.id == *id) {
                    stack.quantity = *quantity;
                }
            }
            StackMutation::Create(_) => {}
        }
    }
    projected
}

/// Plans the mutations that deposit `coins` onto a holder.
///
/// Coins merge into the first existing stack of their denomination. Otherwise a new stack
/// is created from the catalog's reference metadata; denominations the catalog does not know
/// are not deposited. Returns the mutations and the coins they actually deposit.
pub async fn plan_deposit<C: ReferenceCatalog>(
    stacks: &[CoinStack],
    coins: &Holding,
    catalog: &C,
) -> (Vec<StackMutation>, Holding) {
    let mut mutations = Vec::new();
    let mut deposited = Holding::new();

    for (denomination, count) in coins.iter() {
        if let Some(stack) = stacks.iter().find(|s| s.denomination == denomination) {
            let quantity = stack.quantity.saturating_add(count);
            debug!(stack = stack.id, %denomination, from = stack.quantity, to = quantity, "Merging coins");
            mutations.push(StackMutation::Update {
                id: stack.id,
                quantity,
            });
            deposited.add(denomination, count);
        } else if let Some(metadata) = catalog.lookup(denomination).await {
            debug!(%denomination, count, name = %metadata.name, "Creating coin stack");
            mutations.push(StackMutation::Create(NewCoinStack {
                denomination,
                quantity: count,
                metadata,
            }));
            deposited.add(denomination, count);
        } else {
            warn!(%denomination, count, "No reference currency item, coins not deposited");
        }
    }

    (mutations, deposited)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::ledger::{
        ChangeOrder, CoinStack, Denomination, Holding, StackMutation, StaticCatalog, breakdown,
        plan_deposit, project, settle_payment,
    };

    fn stack(id: u64, denomination: Denomination, quantity: u64) -> CoinStack {
        CoinStack {
            id,
            denomination,
            quantity,
            name: format!("{denomination} coins"),
            icon: String::new(),
        }
    }

    fn value(holding: &Holding) -> u64 {
        holding.base_value()
    }

    #[test]
    fn test_breakdown_ascending_is_all_copper() {
        let coins = breakdown(37, ChangeOrder::Ascending);
        assert_eq!(coins.get(Denomination::Cp), 37);
        assert_eq!(coins.iter().count(), 1);
    }

    #[test]
    fn test_breakdown_descending() {
        let coins = breakdown(1370, ChangeOrder::Descending);
        assert_eq!(coins.get(Denomination::Pp), 2);
        assert_eq!(coins.get(Denomination::Gp), 3);
        assert_eq!(coins.get(Denomination::Ep), 1);
        assert_eq!(coins.get(Denomination::Sp), 2);
        assert_eq!(coins.get(Denomination::Cp), 0);
    }

    #[test]
    fn test_breakdown_zero() {
        assert!(breakdown(0, ChangeOrder::Descending).is_empty());
    }

    #[test]
    fn test_settle_splits_gold_and_returns_copper_change() {
        let stacks = vec![
            stack(1, Denomination::Gp, 2),
            stack(2, Denomination::Sp, 3),
            stack(3, Denomination::Cp, 7),
        ];
        let settlement = settle_payment(&stacks, 150, ChangeOrder::Ascending);
        assert_eq!(settlement.spent.get(Denomination::Gp), 2);
        assert_eq!(value(&settlement.spent), 200);
        assert_eq!(settlement.change.get(Denomination::Cp), 50);
        assert_eq!(settlement.change.get(Denomination::Sp), 0);
        assert_eq!(settlement.mutations, vec![StackMutation::Delete(1)]);
    }

    #[test]
    fn test_settle_descending_change() {
        let stacks = vec![stack(1, Denomination::Gp, 2)];
        let settlement = settle_payment(&stacks, 150, ChangeOrder::Descending);
        assert_eq!(settlement.change.get(Denomination::Ep), 1);
        assert_eq!(value(&settlement.change), 50);
    }

    #[test]
    fn test_settle_reduces_partially_used_stack() {
        let stacks = vec![stack(1, Denomination::Gp, 10)];
        let settlement = settle_payment(&stacks, 250, ChangeOrder::Ascending);
        assert_eq!(settlement.spent.get(Denomination::Gp), 3);
        assert_eq!(settlement.change.get(Denomination::Cp), 50);
        assert_eq!(
            settlement.mutations,
            vec![StackMutation::Update { id: 1, quantity: 7 }]
        );
    }

    #[test]
    fn test_settle_consumes_whole_stacks_in_order() {
        let stacks = vec![
            stack(1, Denomination::Cp, 40),
            stack(2, Denomination::Sp, 2),
            stack(3, Denomination::Sp, 5),
            stack(4, Denomination::Gp, 1),
        ];
        let settlement = settle_payment(&stacks, 185, ChangeOrder::Ascending);
        assert_eq!(
            settlement.mutations,
            vec![
                StackMutation::Delete(4),
                StackMutation::Delete(2),
                StackMutation::Delete(3),
                StackMutation::Update { id: 1, quantity: 25 },
            ]
        );
        assert!(settlement.change.is_empty());
    }

    #[test]
    fn test_settle_stops_once_covered() {
        let stacks = vec![
            stack(1, Denomination::Pp, 1),
            stack(2, Denomination::Gp, 5),
            stack(3, Denomination::Cp, 100),
        ];
        let settlement = settle_payment(&stacks, 500, ChangeOrder::Ascending);
        assert_eq!(settlement.mutations, vec![StackMutation::Delete(1)]);
        assert_eq!(settlement.spent.get(Denomination::Gp), 0);
        assert_eq!(settlement.spent.get(Denomination::Cp), 0);
    }

    #[test]
    fn test_settle_deletes_empty_stack_while_cost_remains() {
        let stacks = vec![stack(1, Denomination::Gp, 0), stack(2, Denomination::Sp, 5)];
        let settlement = settle_payment(&stacks, 30, ChangeOrder::Ascending);
        assert_eq!(
            settlement.mutations,
            vec![
                StackMutation::Delete(1),
                StackMutation::Update { id: 2, quantity: 2 },
            ]
        );
        assert_eq!(settlement.spent.get(Denomination::Gp), 0);
        assert_eq!(settlement.spent.get(Denomination::Sp), 3);
    }

    #[test]
    fn test_settle_stack_worth_more_than_u64() {
        let quantity = u64::MAX / 500 + 1;
        let stacks = vec![stack(1, Denomination::Pp, quantity)];
        let settlement = settle_payment(&stacks, u64::MAX, ChangeOrder::Ascending);
        assert_eq!(settlement.mutations, vec![StackMutation::Delete(1)]);
        assert_eq!(settlement.spent.get(Denomination::Pp), quantity);
        let paid = u128::from(quantity) * 500 - u128::from(settlement.change.base_value());
        assert_eq!(paid, u128::from(u64::MAX));
        assert_eq!(settlement.change.get(Denomination::Cp), 385);
    }

    #[test]
    fn test_settle_zero_cost_touches_nothing() {
        let stacks = vec![stack(1, Denomination::Gp, 3)];
        let settlement = settle_payment(&stacks, 0, ChangeOrder::Ascending);
        assert!(settlement.mutations.is_empty());
        assert!(settlement.spent.is_empty());
        assert!(settlement.change.is_empty());
    }

    #[test]
    fn test_project() {
        let stacks = vec![stack(1, Denomination::Gp, 3), stack(2, Denomination::Cp, 9)];
        let projected = project(
            &stacks,
            &[
                StackMutation::Delete(1),
                StackMutation::Update { id: 2, quantity: 4 },
            ],
        );
        assert_eq!(projected, vec![stack(2, Denomination::Cp, 4)]);
    }

    #[tokio::test]
    async fn test_deposit_merges_into_existing_stack() {
        let stacks = vec![stack(7, Denomination::Cp, 5)];
        let coins = Holding::from_iter([(Denomination::Cp, 50)]);
        let (mutations, deposited) =
            plan_deposit(&stacks, &coins, &StaticCatalog::standard()).await;
        assert_eq!(mutations, vec![StackMutation::Update { id: 7, quantity: 55 }]);
        assert_eq!(deposited, coins);
    }

    #[tokio::test]
    async fn test_deposit_creates_missing_stack() {
        let coins = Holding::from_iter([(Denomination::Gp, 4)]);
        let (mutations, _) = plan_deposit(&[], &coins, &StaticCatalog::standard()).await;
        match mutations.as_slice() {
            [StackMutation::Create(new)] => {
                assert_eq!(new.denomination, Denomination::Gp);
                assert_eq!(new.quantity, 4);
                assert_eq!(new.metadata.name, "Gold Coins");
            }
            other => panic!("unexpected mutations: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_deposit_drops_denomination_without_metadata() {
        let catalog = StaticCatalog::standard().without(Denomination::Ep);
        let coins = Holding::from_iter([(Denomination::Ep, 1), (Denomination::Sp, 2)]);
        let (mutations, deposited) = plan_deposit(&[], &coins, &catalog).await;
        assert_eq!(mutations.len(), 1);
        assert_eq!(deposited.get(Denomination::Ep), 0);
        assert_eq!(deposited.get(Denomination::Sp), 2);
    }

    fn stacks_strategy() -> impl Strategy<Value = Vec<CoinStack>> {
        prop::collection::vec(
            (prop::sample::select(Denomination::DESCENDING.to_vec()), 0..200u64),
            1..10,
        )
        .prop_map(|entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(i, (denomination, quantity))| stack(i as u64, denomination, quantity))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_spent_minus_change_equals_cost(
            stacks in stacks_strategy(),
            fraction in 0.0..=1.0f64,
            descending in any::<bool>(),
        ) {
            let available = Holding::from_stacks(&stacks).base_value();
            let cost = (available as f64 * fraction) as u64;
            let order = if descending { ChangeOrder::Descending } else { ChangeOrder::Ascending };
            let settlement = settle_payment(&stacks, cost, order);
            prop_assert_eq!(value(&settlement.spent) - value(&settlement.change), cost);
        }

        #[test]
        fn prop_spent_never_exceeds_holding(stacks in stacks_strategy(), fraction in 0.0..=1.0f64) {
            let holding = Holding::from_stacks(&stacks);
            let cost = (holding.base_value() as f64 * fraction) as u64;
            let settlement = settle_payment(&stacks, cost, ChangeOrder::Ascending);
            for (denomination, count) in settlement.spent.iter() {
                prop_assert!(count <= holding.get(denomination));
            }
        }
    }
}
