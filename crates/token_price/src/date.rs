//! Calendar arithmetic for the price ledger.
//!
//! Ledger keys are epoch days: days elapsed since 1970-01-01.

use std::ops::RangeInclusive;

use chrono::{Datelike, Months, NaiveDate};

use crate::error::TokenPriceError;

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Epoch day of a calendar date, which must not precede 1970-01-01.
pub fn epoch_day(year: i64, month: i64, day: i64) -> Result<i64, TokenPriceError> {
	epoch_day_of(calendar_date(year, month, day)?)
}

/// Epoch day of `date`, rejecting dates before 1970-01-01.
pub fn epoch_day_of(date: NaiveDate) -> Result<i64, TokenPriceError> {
	let days = days_since_epoch(date);
	if days < 0 {
		return Err(TokenPriceError::DateBeforeEpoch);
	}
	Ok(days)
}

/// Signed day offset of `date` from 1970-01-01.
pub fn days_since_epoch(date: NaiveDate) -> i64 {
	i64::from(date.num_days_from_ce()) - EPOCH_DAYS_FROM_CE
}

/// Epoch days from the first day of `from` month through the last day of
/// `to` month, inclusive.
pub fn month_span(
	from_year: i64,
	from_month: i64,
	to_year: i64,
	to_month: i64,
) -> Result<RangeInclusive<i64>, TokenPriceError> {
	let first = calendar_date(from_year, from_month, 1)?;
	let last = calendar_date(to_year, to_month, 1)?
		.checked_add_months(Months::new(1))
		.and_then(|next| next.pred_opt())
		.ok_or(TokenPriceError::InvalidDate {
			year: to_year,
			month: to_month,
			day: 1,
		})?;
	if last < first {
		return Err(TokenPriceError::InvalidRange);
	}
	Ok(days_since_epoch(first)..=days_since_epoch(last))
}

fn calendar_date(year: i64, month: i64, day: i64) -> Result<NaiveDate, TokenPriceError> {
	let invalid = TokenPriceError::InvalidDate { year, month, day };
	let (Ok(y), Ok(m), Ok(d)) = (i32::try_from(year), u32::try_from(month), u32::try_from(day)) else {
		return Err(invalid);
	};
	NaiveDate::from_ymd_opt(y, m, d).ok_or(invalid)
}
