//! Selector-addressed module registry.
//!
//! A [`Diamond`] routes every call, identified by a [`Selector`], to the
//! module ("facet") currently bound to it. All modules share one persistent
//! state area, so replacing the module behind a selector never moves state.
//! Bindings change only through owner-gated, all-or-nothing upgrade batches.
//!
//! # Components
//!
//! - [`storage`]: shared state store and fixed-slot layouts
//! - [`table`]: selector table and reverse index
//! - [`guard`]: single-owner access check
//! - `router`: dispatch
//! - [`cut`]: upgrade processor
//! - [`loupe`]: read-only introspection
//! - [`standard`]: the registry's own public modules
//! - [`deploy`]: the initial deploy sequence

mod client;
mod clock;
mod code;
mod config;
mod context;
pub mod cut;
pub mod deploy;
mod diamond;
mod error;
mod event;
pub mod guard;
pub mod loupe;
mod router;
pub mod standard;
mod state;
pub mod storage;
pub mod table;

#[cfg(any(test, doc))]
mod invariants;
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use client::{Caller, Receipt};
pub use clock::{Clock, FixedClock, SystemClock};
pub use code::{Abi, CodeStore, Facet, FunctionSig};
pub use config::{ConfigError, DiamondConfig};
pub use context::CallContext;
pub use cut::{Calldata, DiamondCut, FacetCut, FacetCutAction, Initializer};
pub use deploy::{DeployedFacet, DiamondDeployer, Deployment};
pub use diamond::Diamond;
pub use error::{DiamondError, InvalidFacet, Revert, RevertReason};
pub use event::{Event, EventRecord};
pub use guard::OwnershipTransferred;
pub use loupe::{FacetEntry, Loupe};
pub use state::State;
pub use storage::{StateStore, StorageLayout};
pub use table::SelectorTable;

pub use diamond_primitives::{
	Address, FacetHandle, InterfaceId, Selector, Signature, SignatureError, StorageSlot,
};
