use diamond_registry::{DiamondError, RevertReason};
use serde::{Deserialize, Serialize};

/// Failure reasons of the token price modules.
///
/// Raised through the router as [`DiamondError::Revert`]; recover the typed
/// value with [`DiamondError::revert_reason`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum TokenPriceError {
	#[error("Pausable: paused")]
	ContractPaused,
	#[error("Pausable: paused")]
	AlreadyPaused,
	#[error("Pausable: not paused")]
	NotPaused,
	#[error("date should be after 1970-01-01")]
	DateBeforeEpoch,
	#[error("price not set on this day")]
	PriceNotSet,
	#[error("no prices set")]
	NoPricesInRange,
	#[error("start date later than end")]
	InvalidRange,
	#[error("invalid date {year}-{month}-{day}")]
	InvalidDate { year: i64, month: i64, day: i64 },
	#[error("price sum overflows")]
	PriceOverflow,
}

impl RevertReason for TokenPriceError {
	const DOMAIN: &'static str = "token-price";
}

impl From<TokenPriceError> for DiamondError {
	fn from(err: TokenPriceError) -> Self {
		DiamondError::revert(&err)
	}
}
