//! Registry container with atomic publication.
//!
//! # Purpose
//!
//! The single stable entry point. Every call, business or upgrade, is routed
//! through [`Diamond::call`] and runs as one call unit against the committed
//! [`State`].
//!
//! # Mental model
//!
//! * Readers pin an `Arc<State>` (see [`Diamond::snapshot`], [`Diamond::loupe`])
//!   and observe an immutable view.
//! * A call unit clones the committed state into a private frame, runs the
//!   bound module against it and, on success, publishes the frame's state with
//!   one pointer swap. On failure the frame is dropped.
//!
//! # Key types
//!
//! | Type | Meaning | Constraints | Constructed / mutated in |
//! |---|---|---|---|
//! | [`Diamond`] | Registry wrapper | Committed state only changes by swap | [`Diamond::call`] |
//! | [`State`] | Immutable published state | Never mutated after publish | [`crate::CallContext`] frames |
//! | [`Receipt`] | Result of a committed call unit | Events only present on success | [`Diamond::call`] |
//!
//! # Invariants
//!
//! * A failed call unit leaves the committed state exactly as it was.
//!   - Tested by: [`crate::invariants::test_failed_batch_is_atomic`]
//! * Call units never interleave: the writer lock is held from the state
//!   clone to the publish.
//!
//! # Concurrency & ordering
//!
//! * Readers are wait-free (`ArcSwap` load).
//! * Writers serialize on a `parking_lot::Mutex`; there is exactly one logical
//!   writer per call unit.

use std::sync::Arc;

use arc_swap::ArcSwap;
use diamond_primitives::{Address, FacetHandle, Selector};
use parking_lot::Mutex;

use crate::client::{Caller, Receipt};
use crate::clock::{Clock, SystemClock};
use crate::code::CodeStore;
use crate::config::DiamondConfig;
use crate::context::{CallContext, Env, Frame};
use crate::cut::{self, DiamondCut, FacetCut, Initializer};
use crate::error::DiamondError;
use crate::event::EventRecord;
use crate::guard::OwnershipTransferred;
use crate::loupe::Loupe;
use crate::router;
use crate::state::State;

pub struct Diamond {
	env: Env,
	state: ArcSwap<State>,
	writer: Mutex<()>,
	genesis: Vec<EventRecord>,
}

impl Diamond {
	/// Creates a registry owned by `owner` with every function of `cut_facet`
	/// bound, using the default configuration and the system clock.
	pub fn new(code: Arc<CodeStore>, owner: Address, cut_facet: FacetHandle) -> Result<Self, DiamondError> {
		Self::with_config(code, owner, cut_facet, DiamondConfig::default(), Arc::new(SystemClock))
	}

	pub fn with_config(
		code: Arc<CodeStore>,
		owner: Address,
		cut_facet: FacetHandle,
		config: DiamondConfig,
		clock: Arc<dyn Clock>,
	) -> Result<Self, DiamondError> {
		if owner.is_zero() {
			return Err(DiamondError::InvalidOwner);
		}
		let module = cut::resolve_module(cut_facet, &code)?;
		let bootstrap = vec![FacetCut::add(cut_facet, module.selectors())];
		let table = cut::stage_cuts(&Default::default(), &bootstrap, &code)?;

		let address = code.allocate_address();
		let genesis = vec![
			EventRecord::new(address, cut_facet, &OwnershipTransferred {
				previous_owner: Address::ZERO,
				new_owner: owner,
			})?,
			EventRecord::new(address, cut_facet, &DiamondCut {
				cuts: bootstrap,
				init: None,
			})?,
		];
		tracing::info!(diamond = %address, %owner, cut_facet = %cut_facet, "diamond created");

		Ok(Self {
			env: Env {
				address,
				code,
				clock,
				config,
			},
			state: ArcSwap::from_pointee(State {
				table,
				owner,
				storage: Default::default(),
			}),
			writer: Mutex::new(()),
			genesis,
		})
	}

	/// Events of construction: the initial owner assignment, then the
	/// `DiamondCut` binding the cut module.
	pub fn genesis(&self) -> &[EventRecord] {
		&self.genesis
	}

	pub fn address(&self) -> Address {
		self.env.address
	}

	pub fn code(&self) -> &Arc<CodeStore> {
		&self.env.code
	}

	pub fn config(&self) -> &DiamondConfig {
		&self.env.config
	}

	pub fn owner(&self) -> Address {
		self.state.load().owner
	}

	/// Pins the last committed state.
	pub fn snapshot(&self) -> Arc<State> {
		self.state.load_full()
	}

	/// Introspection over the last committed state.
	pub fn loupe(&self) -> Loupe {
		Loupe::new(self.snapshot())
	}

	/// Dispatches `selector` as one call unit issued by `caller`.
	pub fn call(&self, caller: Address, selector: Selector, input: &[u8]) -> Result<Receipt, DiamondError> {
		self.transact(caller, |ctx| router::route(ctx, selector, input))
	}

	/// Applies an upgrade batch directly, without going through a bound cut
	/// module.
	pub fn apply_cuts(
		&self,
		caller: Address,
		cuts: Vec<FacetCut>,
		init: Option<Initializer>,
	) -> Result<Receipt, DiamondError> {
		self.transact(caller, |ctx| ctx.diamond_cut(cuts, init).map(|()| Vec::new()))
	}

	/// Transfers ownership directly, without going through a bound module.
	pub fn transfer_owner(&self, caller: Address, new_owner: Address) -> Result<Receipt, DiamondError> {
		self.transact(caller, |ctx| ctx.transfer_ownership(new_owner).map(|()| Vec::new()))
	}

	/// Typed client issuing calls as `account`.
	pub fn connect(&self, account: Address) -> Caller<'_> {
		Caller::new(self, account)
	}

	fn transact<F>(&self, caller: Address, f: F) -> Result<Receipt, DiamondError>
	where
		F: FnOnce(&mut CallContext<'_>) -> Result<Vec<u8>, DiamondError>,
	{
		let _writer = self.writer.lock();
		let mut frame = Frame::new(State::clone(&self.state.load()));
		let output = {
			let mut ctx = CallContext::new(&self.env, &mut frame, caller);
			f(&mut ctx)?
		};
		let Frame { state, events } = frame;
		self.state.store(Arc::new(state));
		Ok(Receipt { output, events })
	}
}

impl std::fmt::Debug for Diamond {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state.load();
		f.debug_struct("Diamond")
			.field("address", &self.env.address)
			.field("owner", &state.owner)
			.field("selectors", &state.table.len())
			.field("facets", &state.table.facet_count())
			.finish()
	}
}
