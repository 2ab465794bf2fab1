//! Currency engine for shop transactions between player characters and merchants.
pub mod ledger;
