use diamond_primitives::{Address, CodecError, EventTopic, FacetHandle, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// An observable state change.
pub trait Event: Serialize + DeserializeOwned {
	/// Event signature, e.g. `Paused(address)`.
	const SIGNATURE: &'static str;

	fn topic() -> EventTopic {
		EventTopic::of(Self::SIGNATURE)
	}
}

/// An emitted event as recorded in a call receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
	/// The registry that emitted the event.
	pub emitter: Address,
	/// Module executing when the event was emitted.
	pub facet: FacetHandle,
	pub topic: EventTopic,
	pub signature: &'static str,
	pub data: Vec<u8>,
}

impl EventRecord {
	pub fn new<E: Event>(emitter: Address, facet: FacetHandle, event: &E) -> Result<Self, CodecError> {
		Ok(Self {
			emitter,
			facet,
			topic: E::topic(),
			signature: E::SIGNATURE,
			data: encode(event)?,
		})
	}

	pub fn is<E: Event>(&self) -> bool {
		self.topic == E::topic()
	}

	pub fn decode<E: Event>(&self) -> Option<E> {
		if !self.is::<E>() {
			return None;
		}
		decode(&self.data).ok()
	}
}
