//! Typed callers.
//!
//! A [`Caller`] encodes arguments, dispatches through [`Diamond::call`] and
//! decodes the result, so tests and tooling never handle raw payloads.

use diamond_primitives::{Address, FacetHandle, InterfaceId, Selector, decode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cut::{Calldata, FacetCut, Initializer};
use crate::diamond::Diamond;
use crate::error::DiamondError;
use crate::event::{Event, EventRecord};
use crate::loupe::FacetEntry;
use crate::standard;

/// Outcome of a committed call unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Receipt {
	pub output: Vec<u8>,
	/// Events in emission order. Failed call units produce no receipt.
	pub events: Vec<EventRecord>,
}

impl Receipt {
	pub fn decode<T: DeserializeOwned>(&self) -> Result<T, DiamondError> {
		Ok(decode(&self.output)?)
	}

	/// First event of type `E`.
	pub fn find<E: Event>(&self) -> Option<E> {
		self.events.iter().find_map(EventRecord::decode::<E>)
	}

	pub fn emitted<E: Event>(&self) -> bool {
		self.events.iter().any(EventRecord::is::<E>)
	}
}

/// Issues calls to a [`Diamond`] as one account.
#[derive(Clone, Copy)]
pub struct Caller<'d> {
	diamond: &'d Diamond,
	account: Address,
}

impl<'d> Caller<'d> {
	pub(crate) fn new(diamond: &'d Diamond, account: Address) -> Self {
		Self { diamond, account }
	}

	pub fn account(&self) -> Address {
		self.account
	}

	pub fn diamond(&self) -> &'d Diamond {
		self.diamond
	}

	/// Same diamond, different account.
	pub fn connect(&self, account: Address) -> Self {
		Self::new(self.diamond, account)
	}

	pub fn transact<A: Serialize + ?Sized>(&self, signature: &str, args: &A) -> Result<Receipt, DiamondError> {
		let calldata = Calldata::encode(signature, args)?;
		self.diamond.call(self.account, calldata.selector, &calldata.input)
	}

	pub fn query<A, R>(&self, signature: &str, args: &A) -> Result<R, DiamondError>
	where
		A: Serialize + ?Sized,
		R: DeserializeOwned,
	{
		self.transact(signature, args)?.decode()
	}

	pub fn diamond_cut(&self, cuts: Vec<FacetCut>, init: Option<Initializer>) -> Result<Receipt, DiamondError> {
		self.transact(standard::DIAMOND_CUT, &(cuts, init))
	}

	pub fn facets(&self) -> Result<Vec<FacetEntry>, DiamondError> {
		self.query(standard::FACETS, &())
	}

	pub fn facet_addresses(&self) -> Result<Vec<FacetHandle>, DiamondError> {
		self.query(standard::FACET_ADDRESSES, &())
	}

	pub fn facet_function_selectors(&self, facet: FacetHandle) -> Result<Vec<Selector>, DiamondError> {
		self.query(standard::FACET_FUNCTION_SELECTORS, &facet)
	}

	/// Handle bound to `selector`, [`FacetHandle::NULL`] if unbound.
	pub fn facet_address(&self, selector: Selector) -> Result<FacetHandle, DiamondError> {
		self.query(standard::FACET_ADDRESS, &selector)
	}

	pub fn supports_interface(&self, id: InterfaceId) -> Result<bool, DiamondError> {
		self.query(standard::SUPPORTS_INTERFACE, &id)
	}

	pub fn owner(&self) -> Result<Address, DiamondError> {
		self.query(standard::OWNER, &())
	}

	pub fn transfer_ownership(&self, new_owner: Address) -> Result<Receipt, DiamondError> {
		self.transact(standard::TRANSFER_OWNERSHIP, &new_owner)
	}
}
