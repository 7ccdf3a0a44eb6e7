use diamond_primitives::Address;

use crate::storage::StateStore;
use crate::table::SelectorTable;

/// Everything the registry persists: bindings, owner and shared storage.
///
/// A committed `State` is immutable; call units work on a clone and publish it
/// whole on success.
#[derive(Clone, Debug, Default)]
pub struct State {
	pub(crate) table: SelectorTable,
	pub(crate) owner: Address,
	pub(crate) storage: StateStore,
}

impl State {
	pub fn table(&self) -> &SelectorTable {
		&self.table
	}

	pub fn owner(&self) -> Address {
		self.owner
	}

	pub fn storage(&self) -> &StateStore {
		&self.storage
	}
}
