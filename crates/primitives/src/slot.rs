use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Fixed 32-byte location of a storage record.
///
/// Storage layouts declare their slot as a constant computed once from a
/// namespace string; see [`StorageSlot::derive`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StorageSlot([u8; 32]);

impl StorageSlot {
	pub const fn from_bytes(bytes: [u8; 32]) -> Self {
		Self(bytes)
	}

	/// `sha256(namespace)`.
	pub fn derive(namespace: &str) -> Self {
		Self(Sha256::digest(namespace.as_bytes()).into())
	}

	pub const fn as_bytes(&self) -> &[u8; 32] {
		&self.0
	}
}

impl fmt::Display for StorageSlot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(self.0))
	}
}

impl fmt::Debug for StorageSlot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "StorageSlot(0x{})", hex::encode(self.0))
	}
}

/// Identifier of an event kind: `sha256(event_signature)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventTopic([u8; 32]);

impl EventTopic {
	pub fn of(signature: &str) -> Self {
		Self(Sha256::digest(signature.as_bytes()).into())
	}

	pub const fn as_bytes(&self) -> &[u8; 32] {
		&self.0
	}
}

impl fmt::Debug for EventTopic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "EventTopic(0x{})", hex::encode(self.0))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn derive_matches_sha256() {
		let slot = StorageSlot::derive("diamond.token.price.storage");
		assert_eq!(
			slot.to_string(),
			"0xd662a7f072b23eed47dca1bace6dca566ad2ed0262c7be9e856ec392d1a6fe71"
		);
	}

	#[test]
	fn distinct_namespaces_get_distinct_slots() {
		assert_ne!(StorageSlot::derive("a"), StorageSlot::derive("b"));
		assert_ne!(EventTopic::of("Paused(address)"), EventTopic::of("Unpaused(address)"));
	}
}
