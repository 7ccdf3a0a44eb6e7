//! Call context handed to every module invocation.
//!
//! # Purpose
//!
//! A [`CallContext`] is the only way module code touches registry state. It
//! exposes the shared storage, the caller identity, the clock, event emission,
//! re-entrant calls, and the guarded mutations (cuts, ownership transfer).
//!
//! # Invariants
//!
//! - All reads observe the call unit's own working state, which starts as the
//!   last committed state. A half-applied batch is never observable: cuts are
//!   staged on a copy and installed whole.
//! - A nested call (re-entry or initializer) that fails restores the working
//!   state and event list to their values before the nested call.
//!   - Tested by: [`crate::invariants::test_failed_reentry_restores_frame`]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use diamond_primitives::{Address, FacetHandle, Selector};

use crate::clock::Clock;
use crate::code::{CodeStore, Facet};
use crate::config::DiamondConfig;
use crate::cut::{self, DiamondCut, FacetCut, Initializer};
use crate::error::DiamondError;
use crate::event::{Event, EventRecord};
use crate::guard;
use crate::router;
use crate::state::State;
use crate::storage::StorageLayout;
use crate::table::SelectorTable;

/// Registry environment shared by every call unit.
pub(crate) struct Env {
	pub(crate) address: Address,
	pub(crate) code: Arc<CodeStore>,
	pub(crate) clock: Arc<dyn Clock>,
	pub(crate) config: DiamondConfig,
}

/// Working state of one call unit.
pub(crate) struct Frame {
	pub(crate) state: State,
	pub(crate) events: Vec<EventRecord>,
}

impl Frame {
	pub(crate) fn new(state: State) -> Self {
		Self {
			state,
			events: Vec::new(),
		}
	}
}

struct Checkpoint {
	state: State,
	events: usize,
}

pub struct CallContext<'a> {
	env: &'a Env,
	frame: &'a mut Frame,
	caller: Address,
	facet: FacetHandle,
	depth: usize,
}

impl<'a> CallContext<'a> {
	pub(crate) fn new(env: &'a Env, frame: &'a mut Frame, caller: Address) -> Self {
		Self {
			env,
			frame,
			caller,
			facet: FacetHandle::NULL,
			depth: 0,
		}
	}

	/// Identity that issued the current call.
	pub fn caller(&self) -> Address {
		self.caller
	}

	/// Address of the registry itself.
	pub fn diamond(&self) -> Address {
		self.env.address
	}

	/// Module currently executing.
	pub fn facet(&self) -> FacetHandle {
		self.facet
	}

	pub fn depth(&self) -> usize {
		self.depth
	}

	pub fn now(&self) -> DateTime<Utc> {
		self.env.clock.now()
	}

	/// Current UTC date.
	pub fn today(&self) -> NaiveDate {
		self.now().date_naive()
	}

	pub fn owner(&self) -> Address {
		self.frame.state.owner
	}

	pub fn table(&self) -> &SelectorTable {
		&self.frame.state.table
	}

	pub fn state(&self) -> &State {
		&self.frame.state
	}

	pub fn require_owner(&self) -> Result<(), DiamondError> {
		guard::require_owner(&self.frame.state, self.caller)
	}

	pub fn load<L: StorageLayout>(&self) -> Result<L, DiamondError> {
		Ok(self.frame.state.storage.load()?)
	}

	pub fn store<L: StorageLayout>(&mut self, value: &L) -> Result<(), DiamondError> {
		Ok(self.frame.state.storage.store(value)?)
	}

	/// Loads a record, mutates it, and stores it back if `f` succeeds.
	pub fn update<L, R, F>(&mut self, f: F) -> Result<R, DiamondError>
	where
		L: StorageLayout,
		F: FnOnce(&mut L) -> Result<R, DiamondError>,
	{
		let mut record = self.load::<L>()?;
		let result = f(&mut record)?;
		self.store(&record)?;
		Ok(result)
	}

	pub fn emit<E: Event>(&mut self, event: &E) -> Result<(), DiamondError> {
		let record = EventRecord::new(self.env.address, self.facet, event)?;
		self.frame.events.push(record);
		Ok(())
	}

	/// Re-enters the registry, dispatching `selector` with the registry itself
	/// as caller.
	pub fn call(&mut self, selector: Selector, input: &[u8]) -> Result<Vec<u8>, DiamondError> {
		let (facet, module) = self.resolve(selector)?;
		let caller = self.env.address;
		self.nested(caller, facet, |ctx| module.invoke(ctx, selector, input))
	}

	/// Applies an upgrade batch. Owner only.
	///
	/// Either every cut and the initializer take effect, or the working state
	/// is left as it was.
	pub fn diamond_cut(&mut self, cuts: Vec<FacetCut>, init: Option<Initializer>) -> Result<(), DiamondError> {
		self.require_owner()?;

		let staged = match cut::stage_cuts(&self.frame.state.table, &cuts, &self.env.code) {
			Ok(staged) => staged,
			Err(err) => {
				tracing::debug!(%err, cuts = cuts.len(), "upgrade batch rejected");
				return Err(err);
			}
		};

		let checkpoint = self.checkpoint();
		self.frame.state.table = staged;

		if let Some(init) = &init
			&& let Err(source) = self.run_initializer(init)
		{
			self.restore(checkpoint);
			tracing::warn!(initializer = %init.facet, err = %source, "initializer failed, upgrade rolled back");
			return Err(DiamondError::InitializerFailed {
				facet: init.facet,
				source: Box::new(source),
			});
		}

		tracing::info!(
			cuts = cuts.len(),
			selectors = self.frame.state.table.len(),
			facets = self.frame.state.table.facet_count(),
			initializer = ?init.as_ref().map(|i| i.facet),
			"diamond cut applied"
		);
		self.emit(&DiamondCut { cuts, init })
	}

	/// Transfers ownership. Owner only; the null identity is rejected.
	pub fn transfer_ownership(&mut self, new_owner: Address) -> Result<(), DiamondError> {
		let event = guard::transfer_ownership(&mut self.frame.state, self.caller, new_owner)?;
		self.emit(&event)
	}

	fn run_initializer(&mut self, init: &Initializer) -> Result<(), DiamondError> {
		let module = cut::resolve_module(init.facet, &self.env.code)?;
		let Initializer { facet, calldata } = init;
		self.nested(self.caller, *facet, |ctx| {
			module.invoke(ctx, calldata.selector, &calldata.input).map(|_| ())
		})
	}

	pub(crate) fn resolve(&self, selector: Selector) -> Result<(FacetHandle, Arc<dyn Facet>), DiamondError> {
		router::resolve(&self.frame.state, &self.env.code, selector)
	}

	pub(crate) fn enter(&mut self, facet: FacetHandle) {
		self.facet = facet;
	}

	fn nested<R, F>(&mut self, caller: Address, facet: FacetHandle, f: F) -> Result<R, DiamondError>
	where
		F: FnOnce(&mut CallContext<'_>) -> Result<R, DiamondError>,
	{
		let depth = self.depth + 1;
		let limit = self.env.config.max_call_depth;
		if depth > limit {
			return Err(DiamondError::CallDepthExceeded { limit });
		}

		let checkpoint = self.checkpoint();
		let result = {
			let mut child = CallContext {
				env: self.env,
				frame: &mut *self.frame,
				caller,
				facet,
				depth,
			};
			f(&mut child)
		};
		if result.is_err() {
			self.restore(checkpoint);
		}
		result
	}

	fn checkpoint(&self) -> Checkpoint {
		Checkpoint {
			state: self.frame.state.clone(),
			events: self.frame.events.len(),
		}
	}

	fn restore(&mut self, checkpoint: Checkpoint) {
		self.frame.state = checkpoint.state;
		self.frame.events.truncate(checkpoint.events);
	}
}
