//! Requests fed to the ledger, one per CSV row.
use serde::Deserialize;

use crate::ledger::{Cost, Denomination, HolderId, LedgerError};

/// Currency assumed when a request does not name one.
const DEFAULT_CURRENCY: Denomination = Denomination::Gp;

/// Enum representing the kind of request.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    /// Deposit currency onto the holder.
    Grant,
    /// Holder buys an item from a merchant.
    Buy,
    /// Holder sells an item to a merchant.
    Sell,
}

/// A single ledger request.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Request {
    /// The kind of request.
    #[serde(rename = "type")]
    kind: RequestType,

    /// The holder the request applies to.
    holder: HolderId,

    /// The listed price or granted amount.
    amount: Option<f64>,

    /// The currency of the amount.
    #[serde(default)]
    currency: Option<Denomination>,

    /// The item category, used to pick a price multiplier.
    #[serde(default)]
    category: Option<String>,

    /// Whether the item is magic.
    #[serde(default)]
    magic: Option<bool>,

    /// How many of the item change hands.
    #[serde(default)]
    quantity: Option<u64>,
}

impl Request {
    /// Creates a new request.
    pub fn new(kind: RequestType, holder: HolderId, amount: f64, currency: Denomination) -> Self {
        Request {
            kind,
            holder,
            amount: Some(amount),
            currency: Some(currency),
            category: None,
            magic: None,
            quantity: None,
        }
    }

    /// Sets the item category and magic flag.
    pub fn with_item(mut self, category: &str, magic: bool) -> Self {
        self.category = Some(category.to_string());
        self.magic = Some(magic);
        self
    }

    /// Sets how many of the item change hands.
    pub fn with_quantity(mut self, quantity: u64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Gets the kind of request.
    pub fn get_type(&self) -> RequestType {
        self.kind
    }

    /// Gets the holder ID.
    pub fn get_holder(&self) -> HolderId {
        self.holder
    }

    /// Gets the item category, empty when none was given.
    pub fn get_category(&self) -> &str {
        self.category.as_deref().unwrap_or_default()
    }

    /// Whether the item is magic.
    pub fn is_magic(&self) -> bool {
        self.magic.unwrap_or(false)
    }

    /// Gets the item quantity, one when none was given.
    pub fn get_quantity(&self) -> u64 {
        self.quantity.unwrap_or(1)
    }

    /// Gets the listed price, defaulting the currency to gold.
    /// Returns an error if no amount was given.
    pub fn get_cost(&self) -> Result<Cost, LedgerError> {
        let amount = self.amount.ok_or_else(|| {
            LedgerError::InvalidRequest(format!("missing amount for holder {}", self.holder))
        })?;
        Ok(Cost::new(amount, self.currency.unwrap_or(DEFAULT_CURRENCY)))
    }
}
