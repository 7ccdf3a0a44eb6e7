//! Basic primitives shared by the registry and every facet.
//!
//! Identities ([`Address`], [`FacetHandle`]), dispatch keys ([`Selector`],
//! [`InterfaceId`]), fixed storage locations ([`StorageSlot`]) and the payload
//! codec used for call data, return data, events and stored records.

mod address;
pub mod codec;
mod selector;
mod slot;

pub use address::{Address, AddressParseError, FacetHandle};
pub use codec::{CodecError, decode, encode};
pub use selector::{InterfaceId, Selector, Signature, SignatureError};
pub use slot::{EventTopic, StorageSlot};
