use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A 20-byte identity.
///
/// Callers, the contract owner, the registry itself and every deployed module
/// are all addressed by an `Address`. [`Address::ZERO`] is the null identity.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address([u8; 20]);

impl Address {
	/// The null identity.
	pub const ZERO: Self = Self([0; 20]);

	pub const fn new(bytes: [u8; 20]) -> Self {
		Self(bytes)
	}

	/// Derives a deterministic address from a human label.
	///
	/// The address is the low 20 bytes of `sha256(label)`.
	pub fn from_seed(label: &str) -> Self {
		Self::from_digest(&Sha256::digest(label.as_bytes()))
	}

	/// Takes the low 20 bytes of a 32-byte digest.
	pub fn from_digest(digest: &[u8]) -> Self {
		let mut bytes = [0; 20];
		let start = digest.len().saturating_sub(20);
		let tail = &digest[start..];
		bytes[20 - tail.len()..].copy_from_slice(tail);
		Self(bytes)
	}

	pub fn is_zero(&self) -> bool {
		self.0 == [0; 20]
	}

	pub const fn as_bytes(&self) -> &[u8; 20] {
		&self.0
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(self.0))
	}
}

impl fmt::Debug for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}

/// Failure to parse a `0x`-prefixed 40-digit hex address.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AddressParseError {
	#[error("address must start with 0x: {0:?}")]
	MissingPrefix(String),
	#[error("address must have 40 hex digits, got {0}")]
	Length(usize),
	#[error("invalid hex in address: {0}")]
	Hex(#[from] hex::FromHexError),
}

impl FromStr for Address {
	type Err = AddressParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let digits = s
			.strip_prefix("0x")
			.or_else(|| s.strip_prefix("0X"))
			.ok_or_else(|| AddressParseError::MissingPrefix(s.to_string()))?;
		if digits.len() != 40 {
			return Err(AddressParseError::Length(digits.len()));
		}
		let mut bytes = [0; 20];
		hex::decode_to_slice(digits, &mut bytes)?;
		Ok(Self(bytes))
	}
}

/// Stable handle of a deployed logic module.
///
/// Handles are opaque to the registry: a handle only identifies which module
/// code executes a bound selector.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FacetHandle(Address);

impl FacetHandle {
	/// The null handle. Only valid as the target of a Remove cut.
	pub const NULL: Self = Self(Address::ZERO);

	pub const fn new(address: Address) -> Self {
		Self(address)
	}

	pub fn is_null(&self) -> bool {
		self.0.is_zero()
	}

	pub const fn address(&self) -> Address {
		self.0
	}
}

impl From<Address> for FacetHandle {
	fn from(address: Address) -> Self {
		Self(address)
	}
}

impl fmt::Display for FacetHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

impl fmt::Debug for FacetHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "FacetHandle({})", self.0)
	}
}

impl FromStr for FacetHandle {
	type Err = AddressParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		s.parse().map(Self)
	}
}
