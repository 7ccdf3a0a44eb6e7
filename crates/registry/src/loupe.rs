//! Introspection (Loupe) Reader.
//!
//! Read-only queries over a pinned [`State`]. A `Loupe` never observes a later
//! commit; take a fresh one from [`crate::Diamond::loupe`] to see new bindings.

use std::sync::Arc;

use diamond_primitives::{Address, FacetHandle, InterfaceId, Selector};
use serde::{Deserialize, Serialize};

use crate::standard::InterfaceStorage;
use crate::state::State;

/// A bound facet and its selectors, in binding order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetEntry {
	pub facet: FacetHandle,
	pub selectors: Vec<Selector>,
}

#[derive(Debug, Clone)]
pub struct Loupe {
	state: Arc<State>,
}

impl Loupe {
	pub fn new(state: Arc<State>) -> Self {
		Self { state }
	}

	pub fn facets(&self) -> Vec<FacetEntry> {
		facet_entries(&self.state)
	}

	pub fn list_facets(&self) -> Vec<FacetHandle> {
		self.state.table.facet_handles()
	}

	/// Selectors bound to `facet`; empty for an unknown facet.
	pub fn selectors_of(&self, facet: FacetHandle) -> Vec<Selector> {
		self.state.table.selectors_of(facet).to_vec()
	}

	pub fn facet_of(&self, selector: Selector) -> Option<FacetHandle> {
		self.state.table.facet_of(selector)
	}

	pub fn supports_interface(&self, id: InterfaceId) -> bool {
		supports_interface(&self.state, id)
	}

	pub fn owner(&self) -> Address {
		self.state.owner
	}
}

pub(crate) fn facet_entries(state: &State) -> Vec<FacetEntry> {
	state
		.table
		.facets()
		.map(|(facet, selectors)| FacetEntry {
			facet,
			selectors: selectors.to_vec(),
		})
		.collect()
}

/// An unreadable interface record reports nothing as supported.
pub(crate) fn supports_interface(state: &State, id: InterfaceId) -> bool {
	state
		.storage
		.load::<InterfaceStorage>()
		.is_ok_and(|record| record.supported.contains(&id))
}
