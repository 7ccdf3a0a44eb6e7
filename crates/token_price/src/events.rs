use diamond_primitives::Address;
use diamond_registry::Event;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paused {
	pub account: Address,
}

impl Event for Paused {
	const SIGNATURE: &'static str = "Paused(address)";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unpaused {
	pub account: Address,
}

impl Event for Unpaused {
	const SIGNATURE: &'static str = "Unpaused(address)";
}

/// A price was recorded for one epoch day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetTokenPrice {
	pub setter: Address,
	pub price: u128,
	pub epoch_day: i64,
}

impl Event for SetTokenPrice {
	const SIGNATURE: &'static str = "SetTokenPrice(address,uint256,int256)";
}
