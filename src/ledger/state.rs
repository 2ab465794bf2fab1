//! The `State` module owns the ledger and processes incoming requests in order.
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::ledger::{
    CartLine, HolderStore, Ledger, LedgerError, PriceMultipliers, ReferenceCatalog, Request,
    RequestType, cart_total,
};

/// Processing state: the ledger, the merchant's multipliers and the request channel.
pub struct State<S, C> {
    /// The ledger requests are applied to.
    ledger: Ledger<S, C>,
    /// The multipliers applied to buy and sell prices.
    multipliers: PriceMultipliers,
    /// A channel receiver for incoming requests.
    receiver: mpsc::Receiver<Request>,
}

impl<S: HolderStore, C: ReferenceCatalog> State<S, C> {
    /// Creates a new instance of `State`.
    pub fn new(
        ledger: Ledger<S, C>,
        multipliers: PriceMultipliers,
        receiver: mpsc::Receiver<Request>,
    ) -> Self {
        State {
            ledger,
            multipliers,
            receiver,
        }
    }

    /// The ledger owned by this state.
    pub fn ledger(&self) -> &Ledger<S, C> {
        &self.ledger
    }

    /// Applies a single request to the ledger.
    async fn process_request(&self, request: Request) -> Result<(), LedgerError> {
        let holder = request.get_holder();
        let mut cost = request.get_cost()?;
        match request.get_type() {
            RequestType::Grant => {
                self.ledger.grant(holder, cost.base_value()).await?;
            }
            RequestType::Buy => {
                cost.amount =
                    self.multipliers
                        .buy_price(cost.amount, request.get_category(), request.is_magic());
                let line = CartLine {
                    cost,
                    quantity: request.get_quantity(),
                };
                self.ledger.purchase_cart(holder, &[line]).await?;
            }
            RequestType::Sell => {
                cost.amount =
                    self.multipliers
                        .sell_price(cost.amount, request.get_category(), request.is_magic());
                let line = CartLine {
                    cost,
                    quantity: request.get_quantity(),
                };
                info!(
                    holder,
                    price = cost.amount,
                    currency = %cost.denomination,
                    quantity = line.quantity,
                    "Item sold"
                );
                self.ledger.grant(holder, cart_total(&[line])).await?;
            }
        }
        Ok(())
    }

    /// Runs the processing loop until the sending side of the channel is closed.
    pub async fn run(&mut self) {
        while let Some(request) = self.receiver.recv().await {
            if let Err(e) = self.process_request(request).await {
                error!("Error processing request: {e}");
            }
        }
    }
}
