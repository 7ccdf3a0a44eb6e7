//! Token price modules.
//!
//! Three versions of one module, all bound against [`TokenPriceStorage`]:
//!
//! | Version | `setPrice(uint,int,int,int)` | `setPrice(uint)` |
//! |---|---|---|
//! | V1 | any caller | - |
//! | V2 | owner only | - |
//! | V3 | owner only | owner only, stores today's price |
//!
//! Every version exposes `getPrice`, `getAvgTokenPrice`, `pause`, `unpause`
//! and `paused`.

use diamond_primitives::{Selector, decode, encode};
use diamond_registry::{Abi, CallContext, DiamondError, Facet, FunctionSig};

use crate::date;
use crate::events::{Paused, SetTokenPrice, Unpaused};
use crate::storage::TokenPriceStorage;

pub const SET_PRICE: &str = "setPrice(uint,int,int,int)";
pub const SET_TODAY_PRICE: &str = "setPrice(uint)";
pub const GET_PRICE: &str = "getPrice(int,int,int)";
pub const GET_AVG_TOKEN_PRICE: &str = "getAvgTokenPrice(int,int,int,int)";
pub const PAUSE: &str = "pause()";
pub const UNPAUSE: &str = "unpause()";
pub const PAUSED: &str = "paused()";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
	V1,
	V2,
	V3,
}

impl Version {
	pub fn name(self) -> &'static str {
		match self {
			Self::V1 => "TokenPriceV1",
			Self::V2 => "TokenPriceV2",
			Self::V3 => "TokenPriceV3",
		}
	}

	fn owner_sets_price(self) -> bool {
		self != Self::V1
	}
}

#[derive(Debug, Clone, Copy)]
enum Function {
	SetPrice,
	SetTodayPrice,
	GetPrice,
	GetAvgTokenPrice,
	Pause,
	Unpause,
	Paused,
}

pub struct TokenPrice {
	version: Version,
	abi: Abi<Function>,
}

impl TokenPrice {
	pub fn new(version: Version) -> Self {
		let mut functions = vec![
			(SET_PRICE, Function::SetPrice),
			(GET_PRICE, Function::GetPrice),
			(GET_AVG_TOKEN_PRICE, Function::GetAvgTokenPrice),
			(PAUSE, Function::Pause),
			(UNPAUSE, Function::Unpause),
			(PAUSED, Function::Paused),
		];
		if version == Version::V3 {
			functions.push((SET_TODAY_PRICE, Function::SetTodayPrice));
		}
		Self {
			version,
			abi: Abi::new(&functions),
		}
	}

	pub fn v1() -> Self {
		Self::new(Version::V1)
	}

	pub fn v2() -> Self {
		Self::new(Version::V2)
	}

	pub fn v3() -> Self {
		Self::new(Version::V3)
	}

	pub fn version(&self) -> Version {
		self.version
	}

	/// Access and pause checks run before the date is validated.
	fn guard_setter(&self, ctx: &CallContext<'_>) -> Result<(), DiamondError> {
		if self.version.owner_sets_price() {
			ctx.require_owner()?;
		}
		Ok(ctx.load::<TokenPriceStorage>()?.require_not_paused()?)
	}

	fn record_price(&self, ctx: &mut CallContext<'_>, price: u128, epoch_day: i64) -> Result<(), DiamondError> {
		let previous = ctx.update(|ledger: &mut TokenPriceStorage| Ok(ledger.set_price(epoch_day, price)?))?;
		tracing::debug!(
			version = self.version.name(),
			epoch_day,
			price,
			?previous,
			"token price set"
		);
		ctx.emit(&SetTokenPrice {
			setter: ctx.caller(),
			price,
			epoch_day,
		})
	}
}

impl Facet for TokenPrice {
	fn name(&self) -> &'static str {
		self.version.name()
	}

	fn functions(&self) -> &[FunctionSig] {
		self.abi.functions()
	}

	fn invoke(&self, ctx: &mut CallContext<'_>, selector: Selector, input: &[u8]) -> Result<Vec<u8>, DiamondError> {
		let function = self
			.abi
			.resolve(selector)
			.ok_or(DiamondError::FunctionNotFound { selector })?;
		match function {
			Function::SetPrice => {
				let (price, year, month, day): (u128, i64, i64, i64) = decode(input)?;
				self.guard_setter(ctx)?;
				let epoch_day = date::epoch_day(year, month, day)?;
				self.record_price(ctx, price, epoch_day)?;
				Ok(Vec::new())
			}
			Function::SetTodayPrice => {
				let price: u128 = decode(input)?;
				self.guard_setter(ctx)?;
				let epoch_day = date::epoch_day_of(ctx.today())?;
				self.record_price(ctx, price, epoch_day)?;
				Ok(Vec::new())
			}
			Function::GetPrice => {
				let (year, month, day): (i64, i64, i64) = decode(input)?;
				let epoch_day = date::epoch_day(year, month, day)?;
				let price = ctx.load::<TokenPriceStorage>()?.price_on(epoch_day)?;
				Ok(encode(&price)?)
			}
			Function::GetAvgTokenPrice => {
				let (from_year, from_month, to_year, to_month): (i64, i64, i64, i64) = decode(input)?;
				let days = date::month_span(from_year, from_month, to_year, to_month)?;
				let average = ctx.load::<TokenPriceStorage>()?.average(days)?;
				Ok(encode(&average)?)
			}
			Function::Pause => {
				ctx.require_owner()?;
				ctx.update(|ledger: &mut TokenPriceStorage| Ok(ledger.pause()?))?;
				tracing::info!(account = %ctx.caller(), "token price paused");
				ctx.emit(&Paused { account: ctx.caller() })?;
				Ok(Vec::new())
			}
			Function::Unpause => {
				ctx.require_owner()?;
				ctx.update(|ledger: &mut TokenPriceStorage| Ok(ledger.unpause()?))?;
				tracing::info!(account = %ctx.caller(), "token price unpaused");
				ctx.emit(&Unpaused { account: ctx.caller() })?;
				Ok(Vec::new())
			}
			Function::Paused => Ok(encode(&ctx.load::<TokenPriceStorage>()?.paused)?),
		}
	}
}
