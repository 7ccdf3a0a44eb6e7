//! Tally modules and a deployed registry for unit tests.

use std::fmt;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use diamond_primitives::{Address, FacetHandle, Selector, StorageSlot, decode, encode};
use serde::{Deserialize, Serialize};

use crate::clock::FixedClock;
use crate::code::{Abi, Facet, FunctionSig};
use crate::config::DiamondConfig;
use crate::context::CallContext;
use crate::deploy::{DiamondDeployer, Deployment};
use crate::error::{DiamondError, RevertReason};
use crate::event::Event;
use crate::storage::StorageLayout;

pub(crate) const INCREMENT: &str = "increment()";
pub(crate) const VALUE: &str = "value()";
pub(crate) const SET_VALUE: &str = "setValue(uint)";
pub(crate) const FAIL: &str = "fail()";
pub(crate) const INCREMENT_THEN_FAIL: &str = "incrementThenFail()";
pub(crate) const REENTER: &str = "reenter(bytes4)";
pub(crate) const REENTER_AND_SWALLOW: &str = "reenterAndSwallow(bytes4)";
pub(crate) const RECURSE: &str = "recurse()";
pub(crate) const WHO_CALLS: &str = "whoCalls()";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TallyStorage {
	pub value: u64,
}

impl StorageLayout for TallyStorage {
	const NAMESPACE: &'static str = "diamond.test.tally.storage";
	const SLOT: StorageSlot = StorageSlot::from_bytes([
		0xee, 0x83, 0xcd, 0x0f, 0x22, 0x70, 0x01, 0x51, 0x93, 0xfb, 0xfc, 0x1c, 0xdd, 0x81, 0x6e, 0x3b, 0x2b, 0x50, 0xb5,
		0xb8, 0x13, 0xef, 0xaa, 0xf9, 0x1b, 0x3a, 0x19, 0xc5, 0xab, 0x16, 0xc2, 0x70,
	]);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Incremented {
	pub value: u64,
}

impl Event for Incremented {
	const SIGNATURE: &'static str = "Incremented(uint256)";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum TallyError {
	Refused,
}

impl fmt::Display for TallyError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("tally: refused")
	}
}

impl RevertReason for TallyError {
	const DOMAIN: &'static str = "tally";
}

#[derive(Debug, Clone, Copy)]
enum Function {
	Increment,
	Value,
	SetValue,
	Fail,
	IncrementThenFail,
	Reenter,
	ReenterAndSwallow,
	Recurse,
	WhoCalls,
}

/// Counter module; `step` distinguishes versions.
pub(crate) struct Tally {
	name: &'static str,
	step: u64,
	abi: Abi<Function>,
}

impl Tally {
	pub(crate) fn new(name: &'static str, step: u64) -> Self {
		Self {
			name,
			step,
			abi: Abi::new(&[
				(INCREMENT, Function::Increment),
				(VALUE, Function::Value),
				(SET_VALUE, Function::SetValue),
				(FAIL, Function::Fail),
				(INCREMENT_THEN_FAIL, Function::IncrementThenFail),
				(REENTER, Function::Reenter),
				(REENTER_AND_SWALLOW, Function::ReenterAndSwallow),
				(RECURSE, Function::Recurse),
				(WHO_CALLS, Function::WhoCalls),
			]),
		}
	}

	pub(crate) fn v1() -> Self {
		Self::new("TallyV1", 1)
	}

	pub(crate) fn v2() -> Self {
		Self::new("TallyV2", 10)
	}

	fn increment(&self, ctx: &mut CallContext<'_>) -> Result<u64, DiamondError> {
		let step = self.step;
		let value = ctx.update(|record: &mut TallyStorage| {
			record.value += step;
			Ok(record.value)
		})?;
		ctx.emit(&Incremented { value })?;
		Ok(value)
	}
}

impl Facet for Tally {
	fn name(&self) -> &'static str {
		self.name
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
			Function::Increment => Ok(encode(&self.increment(ctx)?)?),
			Function::Value => Ok(encode(&ctx.load::<TallyStorage>()?.value)?),
			Function::SetValue => {
				let value: u64 = decode(input)?;
				ctx.store(&TallyStorage { value })?;
				Ok(Vec::new())
			}
			Function::Fail => Err(DiamondError::revert(&TallyError::Refused)),
			Function::IncrementThenFail => {
				self.increment(ctx)?;
				Err(DiamondError::revert(&TallyError::Refused))
			}
			Function::Reenter => {
				let target: Selector = decode(input)?;
				ctx.call(target, &[])
			}
			Function::ReenterAndSwallow => {
				let target: Selector = decode(input)?;
				let succeeded = ctx.call(target, &[]).is_ok();
				Ok(encode(&succeeded)?)
			}
			Function::Recurse => ctx.call(selector, &[]),
			Function::WhoCalls => Ok(encode(&(ctx.caller(), ctx.depth()))?),
		}
	}
}

/// Module with no functions bound anywhere, used as an initializer.
pub(crate) struct TallyInit {
	abi: Abi<InitFunction>,
}

pub(crate) const INIT_WITH: &str = "initWith(uint)";
pub(crate) const INIT_FAIL: &str = "initFail()";

#[derive(Debug, Clone, Copy)]
enum InitFunction {
	InitWith,
	InitFail,
}

impl TallyInit {
	pub(crate) fn new() -> Self {
		Self {
			abi: Abi::new(&[(INIT_WITH, InitFunction::InitWith), (INIT_FAIL, InitFunction::InitFail)]),
		}
	}
}

impl Facet for TallyInit {
	fn name(&self) -> &'static str {
		"TallyInit"
	}

	fn functions(&self) -> &[FunctionSig] {
		self.abi.functions()
	}

	fn invoke(&self, ctx: &mut CallContext<'_>, selector: Selector, input: &[u8]) -> Result<Vec<u8>, DiamondError> {
		match self.abi.resolve(selector) {
			Some(InitFunction::InitWith) => {
				let value: u64 = decode(input)?;
				ctx.store(&TallyStorage { value })?;
				Ok(Vec::new())
			}
			Some(InitFunction::InitFail) => {
				ctx.store(&TallyStorage { value: u64::MAX })?;
				Err(DiamondError::revert(&TallyError::Refused))
			}
			None => Err(DiamondError::FunctionNotFound { selector }),
		}
	}
}

pub(crate) fn sel(signature: &str) -> Selector {
	Selector::of(signature).unwrap()
}

pub(crate) fn owner() -> Address {
	Address::from_seed("owner")
}

pub(crate) fn stranger() -> Address {
	Address::from_seed("stranger")
}

/// A deployed registry with `TallyV1` bound, plus an unbound `TallyV2` and
/// `TallyInit`.
pub(crate) struct Fixture {
	pub deployment: Deployment,
	pub tally_v1: FacetHandle,
	pub tally_v2: FacetHandle,
	pub tally_init: FacetHandle,
}

impl Fixture {
	pub(crate) fn diamond(&self) -> &crate::Diamond {
		&self.deployment.diamond
	}
}

pub(crate) fn fixture() -> Fixture {
	fixture_with(DiamondConfig::default())
}

pub(crate) fn fixture_with(config: DiamondConfig) -> Fixture {
	let clock = FixedClock(Utc.with_ymd_and_hms(2022, 2, 15, 12, 0, 0).unwrap());
	let deployment = DiamondDeployer::new(owner())
		.config(config)
		.clock(Arc::new(clock))
		.facet(Tally::v1())
		.deploy()
		.unwrap();
	let code = deployment.diamond.code();
	let tally_v2 = code.deploy(Tally::v2());
	let tally_init = code.deploy(TallyInit::new());
	let tally_v1 = deployment.handle("TallyV1").unwrap();
	Fixture {
		deployment,
		tally_v1,
		tally_v2,
		tally_init,
	}
}
