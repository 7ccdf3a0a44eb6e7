//! Payload codec.
//!
//! Call data, return data, event data and stored records all travel as
//! `postcard`-encoded bytes, so the registry never needs to know the concrete
//! types a module reads or writes.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Payload encode/decode failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
	#[error("failed to encode payload: {0}")]
	Encode(String),
	#[error("failed to decode payload: {0}")]
	Decode(String),
}

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
	postcard::to_allocvec(value).map_err(|e| CodecError::Encode(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
	postcard::from_bytes(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}
