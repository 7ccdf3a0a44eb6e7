use std::fmt;

use diamond_primitives::{Address, CodecError, FacetHandle, Selector, SignatureError, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cut::FacetCutAction;

/// Why a facet handle was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidFacet {
	/// Add, Replace and initializers need a non-null handle.
	Null,
	/// No module is deployed under the handle.
	NoCode,
	/// Remove cuts must carry the null handle.
	RemoveTargetNotNull,
}

impl fmt::Display for InvalidFacet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("facet handle is null"),
			Self::NoCode => f.write_str("facet has no code"),
			Self::RemoveTargetNotNull => f.write_str("remove facet handle must be null"),
		}
	}
}

/// Every failure a call unit can end with.
///
/// Any error aborts the enclosing call unit: the committed registry state is
/// left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiamondError {
	#[error("must be contract owner (caller {caller})")]
	Unauthorized { caller: Address },

	#[error("function does not exist: {selector}")]
	FunctionNotFound { selector: Selector },

	#[error("can't add function {selector} that already exists on {existing}")]
	InvalidAddSelector { selector: Selector, existing: FacetHandle },

	#[error("can't replace function {selector} with the same function on {facet}")]
	NoOpReplace { selector: Selector, facet: FacetHandle },

	#[error("can't replace function {selector} that doesn't exist")]
	InvalidReplaceSelector { selector: Selector },

	#[error("can't remove function {selector} that doesn't exist")]
	InvalidRemoveSelector { selector: Selector },

	#[error("invalid facet {facet}: {reason}")]
	InvalidFacetHandle { facet: FacetHandle, reason: InvalidFacet },

	#[error("no selectors in {action:?} cut for facet {facet}")]
	NoSelectors { action: FacetCutAction, facet: FacetHandle },

	#[error("facet {facet} does not implement {selector}")]
	SelectorNotImplemented { facet: FacetHandle, selector: Selector },

	#[error("initializer {facet} failed: {source}")]
	InitializerFailed {
		facet: FacetHandle,
		#[source]
		source: Box<DiamondError>,
	},

	#[error("new owner is the zero address")]
	InvalidOwner,

	#[error("call depth limit of {limit} exceeded")]
	CallDepthExceeded { limit: usize },

	#[error(transparent)]
	InvalidSignature(#[from] SignatureError),

	#[error(transparent)]
	Codec(#[from] CodecError),

	/// A module-defined failure, returned verbatim from the facet.
	#[error("{0}")]
	Revert(Revert),
}

impl DiamondError {
	pub fn revert<E: RevertReason>(reason: &E) -> Self {
		Self::Revert(Revert::new(reason))
	}

	/// Decodes a module-defined failure, looking through failed initializers.
	pub fn revert_reason<E: RevertReason>(&self) -> Option<E> {
		match self {
			Self::Revert(revert) => revert.decode(),
			Self::InitializerFailed { source, .. } => source.revert_reason(),
			_ => None,
		}
	}
}

/// A failure type a module can raise through the router.
///
/// Reasons are encoded with the payload codec and tagged with a domain, so a
/// caller can recover the typed reason with [`DiamondError::revert_reason`].
pub trait RevertReason: Serialize + DeserializeOwned + fmt::Display {
	const DOMAIN: &'static str;
}

/// Encoded module-defined failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revert {
	domain: &'static str,
	data: Vec<u8>,
	message: String,
}

impl Revert {
	/// An unencodable reason keeps its message but leaves `data` empty, so
	/// [`Revert::decode`] returns `None`.
	pub fn new<E: RevertReason>(reason: &E) -> Self {
		let message = reason.to_string();
		let data = match encode(reason) {
			Ok(data) => data,
			Err(err) => {
				tracing::warn!(domain = E::DOMAIN, %message, %err, "revert reason could not be encoded");
				Vec::new()
			}
		};
		Self {
			domain: E::DOMAIN,
			data,
			message,
		}
	}

	pub fn domain(&self) -> &'static str {
		self.domain
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn decode<E: RevertReason>(&self) -> Option<E> {
		if self.domain != E::DOMAIN {
			return None;
		}
		decode(&self.data).ok()
	}
}

impl fmt::Display for Revert {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.message)
	}
}
