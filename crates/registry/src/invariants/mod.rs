//! Machine-checkable invariants of the selector table and call units.
#![allow(dead_code)]

/// Any sequence of binds, unbinds and rebinds keeps the forward map and the
/// reverse index mutually derivable.
#[cfg(doc)]
pub(crate) fn test_table_stays_consistent() {}

/// A batch containing any invalid cut leaves table, owner and storage
/// exactly as they were.
#[cfg(doc)]
pub(crate) fn test_failed_batch_is_atomic() {}

/// A re-entrant call that fails restores the caller's working state and
/// event list before the error reaches the calling module.
#[cfg(doc)]
pub(crate) fn test_failed_reentry_restores_frame() {}

/// Replacing the module bound to a selector never changes records written
/// before the replace.
#[cfg(doc)]
pub(crate) fn test_replace_preserves_storage() {}

#[cfg(test)]
mod proofs;

#[cfg(test)]
#[allow(unused_imports)]
pub(crate) use proofs::{
	test_failed_batch_is_atomic, test_failed_reentry_restores_frame, test_replace_preserves_storage,
	test_table_stays_consistent,
};
