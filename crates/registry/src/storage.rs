//! Shared State Store.
//!
//! # Purpose
//!
//! One persistent state area addressed identically by every module. Records
//! live at fixed [`StorageSlot`]s; a module reads and writes a record through
//! its [`StorageLayout`], never through module-local storage, so rebinding a
//! selector to another module cannot orphan or duplicate state.
//!
//! # Invariants
//!
//! - A layout's slot is a constant derived once from its namespace and never
//!   recomputed at runtime.
//!   - Tested by: [`layout_slot_matches_namespace`] in each layout's tests.
//! - A slot that was never written loads as the layout's `Default`.

use std::sync::Arc;

use diamond_primitives::{CodecError, StorageSlot, decode, encode};
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A typed view of one storage record.
pub trait StorageLayout: Default + Serialize + DeserializeOwned {
	/// Namespace the slot was derived from.
	const NAMESPACE: &'static str;
	/// `StorageSlot::derive(NAMESPACE)`, precomputed.
	const SLOT: StorageSlot;
}

/// Returns true when `L::SLOT` is the derivation of `L::NAMESPACE`.
pub fn layout_slot_matches_namespace<L: StorageLayout>() -> bool {
	StorageSlot::derive(L::NAMESPACE) == L::SLOT
}

/// Slot-addressed record map.
///
/// Cloning is cheap; the first write after a clone copies the map.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct StateStore {
	records: Arc<FxHashMap<StorageSlot, Arc<[u8]>>>,
}

impl StateStore {
	pub fn load<L: StorageLayout>(&self) -> Result<L, CodecError> {
		match self.records.get(&L::SLOT) {
			Some(bytes) => decode(bytes),
			None => Ok(L::default()),
		}
	}

	pub fn store<L: StorageLayout>(&mut self, value: &L) -> Result<(), CodecError> {
		let bytes = encode(value)?;
		Arc::make_mut(&mut self.records).insert(L::SLOT, bytes.into());
		Ok(())
	}

	pub fn raw(&self, slot: StorageSlot) -> Option<&[u8]> {
		self.records.get(&slot).map(|bytes| &bytes[..])
	}

	pub fn slots(&self) -> impl Iterator<Item = StorageSlot> + '_ {
		self.records.keys().copied()
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}
