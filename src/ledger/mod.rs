//! Currency ledger for shop transactions: coin normalization, payment settlement and deposits.
mod catalog;
mod config;
mod denomination;
mod engine;
mod holding;
mod pricing;
mod request;
mod settlement;
mod stack;
mod state;
mod store;
mod types;

pub use catalog::*;
pub use config::*;
pub use denomination::*;
pub use engine::*;
pub use holding::*;
pub use pricing::*;
pub use request::*;
pub use settlement::*;
pub use stack::*;
pub use state::*;
pub use store::*;
pub use types::*;
