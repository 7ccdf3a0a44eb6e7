use diamond_registry::{Caller, DiamondError, Receipt};

use crate::facet::{GET_AVG_TOKEN_PRICE, GET_PRICE, PAUSE, PAUSED, SET_PRICE, SET_TODAY_PRICE, UNPAUSE};

/// Typed calls into whichever token price version is bound.
#[derive(Clone, Copy)]
pub struct TokenPriceClient<'d> {
	caller: Caller<'d>,
}

impl<'d> TokenPriceClient<'d> {
	pub fn new(caller: Caller<'d>) -> Self {
		Self { caller }
	}

	pub fn caller(&self) -> Caller<'d> {
		self.caller
	}

	pub fn set_price(&self, price: u128, year: i64, month: i64, day: i64) -> Result<Receipt, DiamondError> {
		self.caller.transact(SET_PRICE, &(price, year, month, day))
	}

	/// Stores `price` for today. Requires the V3 function to be bound.
	pub fn set_today_price(&self, price: u128) -> Result<Receipt, DiamondError> {
		self.caller.transact(SET_TODAY_PRICE, &price)
	}

	pub fn get_price(&self, year: i64, month: i64, day: i64) -> Result<u128, DiamondError> {
		self.caller.query(GET_PRICE, &(year, month, day))
	}

	pub fn avg_token_price(
		&self,
		from_year: i64,
		from_month: i64,
		to_year: i64,
		to_month: i64,
	) -> Result<u128, DiamondError> {
		self.caller
			.query(GET_AVG_TOKEN_PRICE, &(from_year, from_month, to_year, to_month))
	}

	pub fn pause(&self) -> Result<Receipt, DiamondError> {
		self.caller.transact(PAUSE, &())
	}

	pub fn unpause(&self) -> Result<Receipt, DiamondError> {
		self.caller.transact(UNPAUSE, &())
	}

	pub fn paused(&self) -> Result<bool, DiamondError> {
		self.caller.query(PAUSED, &())
	}
}
