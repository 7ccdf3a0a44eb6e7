//! Price ledger record shared by every token price version.
//!
//! All versions read and write this one layout at one fixed slot, so swapping
//! the module behind `setPrice` keeps every stored price.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use diamond_primitives::StorageSlot;
use diamond_registry::StorageLayout;
use serde::{Deserialize, Serialize};

use crate::error::TokenPriceError;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPriceStorage {
	pub paused: bool,
	/// Epoch day -> price.
	pub prices: BTreeMap<i64, u128>,
}

impl StorageLayout for TokenPriceStorage {
	const NAMESPACE: &'static str = "diamond.token.price.storage";
	const SLOT: StorageSlot = StorageSlot::from_bytes([
		0xd6, 0x62, 0xa7, 0xf0, 0x72, 0xb2, 0x3e, 0xed, 0x47, 0xdc, 0xa1, 0xba, 0xce, 0x6d, 0xca, 0x56, 0x6a, 0xd2, 0xed,
		0x02, 0x62, 0xc7, 0xbe, 0x9e, 0x85, 0x6e, 0xc3, 0x92, 0xd1, 0xa6, 0xfe, 0x71,
	]);
}

impl TokenPriceStorage {
	pub fn require_not_paused(&self) -> Result<(), TokenPriceError> {
		if self.paused {
			return Err(TokenPriceError::ContractPaused);
		}
		Ok(())
	}

	/// Active -> Paused.
	pub fn pause(&mut self) -> Result<(), TokenPriceError> {
		if self.paused {
			return Err(TokenPriceError::AlreadyPaused);
		}
		self.paused = true;
		Ok(())
	}

	/// Paused -> Active.
	pub fn unpause(&mut self) -> Result<(), TokenPriceError> {
		if !self.paused {
			return Err(TokenPriceError::NotPaused);
		}
		self.paused = false;
		Ok(())
	}

	/// Records `price` for `epoch_day`, overwriting any earlier price. Fails
	/// while paused.
	pub fn set_price(&mut self, epoch_day: i64, price: u128) -> Result<Option<u128>, TokenPriceError> {
		self.require_not_paused()?;
		Ok(self.prices.insert(epoch_day, price))
	}

	pub fn price_on(&self, epoch_day: i64) -> Result<u128, TokenPriceError> {
		self.prices
			.get(&epoch_day)
			.copied()
			.ok_or(TokenPriceError::PriceNotSet)
	}

	/// Mean of the prices inside `days`, divided by the number of days that
	/// carry a price rather than the span length.
	pub fn average(&self, days: RangeInclusive<i64>) -> Result<u128, TokenPriceError> {
		if days.start() > days.end() {
			return Err(TokenPriceError::InvalidRange);
		}
		let mut count = 0u128;
		let mut sum = 0u128;
		for price in self.prices.range(days).map(|(_, price)| *price) {
			sum = sum.checked_add(price).ok_or(TokenPriceError::PriceOverflow)?;
			count += 1;
		}
		if count == 0 {
			return Err(TokenPriceError::NoPricesInRange);
		}
		Ok(sum / count)
	}
}
