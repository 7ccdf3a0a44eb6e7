//! Pausable, date-keyed token price ledger built as upgradeable registry
//! modules.
//!
//! [`TokenPrice`] comes in three versions that share [`TokenPriceStorage`];
//! upgrading from one to the next is a Replace or Add cut on the registry, and
//! stored prices survive every upgrade.

mod client;
pub mod date;
mod error;
mod events;
mod facet;
mod storage;

pub use client::TokenPriceClient;
pub use error::TokenPriceError;
pub use events::{Paused, SetTokenPrice, Unpaused};
pub use facet::{
	GET_AVG_TOKEN_PRICE, GET_PRICE, PAUSE, PAUSED, SET_PRICE, SET_TODAY_PRICE, TokenPrice, UNPAUSE, Version,
};
pub use storage::TokenPriceStorage;
