use diamond_primitives::{FacetHandle, InterfaceId, Selector, decode, encode};

use super::{FACET_ADDRESS, FACET_ADDRESSES, FACET_FUNCTION_SELECTORS, FACETS, SUPPORTS_INTERFACE};
use crate::code::{Abi, Facet, FunctionSig};
use crate::context::CallContext;
use crate::error::DiamondError;
use crate::loupe;

#[derive(Debug, Clone, Copy)]
enum Function {
	Facets,
	FacetFunctionSelectors,
	FacetAddresses,
	FacetAddress,
	SupportsInterface,
}

/// Dispatchable introspection over the calling unit's working table.
pub struct DiamondLoupeFacet {
	abi: Abi<Function>,
}

impl DiamondLoupeFacet {
	pub fn new() -> Self {
		Self {
			abi: Abi::new(&[
				(FACETS, Function::Facets),
				(FACET_FUNCTION_SELECTORS, Function::FacetFunctionSelectors),
				(FACET_ADDRESSES, Function::FacetAddresses),
				(FACET_ADDRESS, Function::FacetAddress),
				(SUPPORTS_INTERFACE, Function::SupportsInterface),
			]),
		}
	}
}

impl Default for DiamondLoupeFacet {
	fn default() -> Self {
		Self::new()
	}
}

impl Facet for DiamondLoupeFacet {
	fn name(&self) -> &'static str {
		"DiamondLoupeFacet"
	}

	fn functions(&self) -> &[FunctionSig] {
		self.abi.functions()
	}

	fn invoke(&self, ctx: &mut CallContext<'_>, selector: Selector, input: &[u8]) -> Result<Vec<u8>, DiamondError> {
		let function = self
			.abi
			.resolve(selector)
			.ok_or(DiamondError::FunctionNotFound { selector })?;
		let state = ctx.state();
		let output = match function {
			Function::Facets => encode(&loupe::facet_entries(state))?,
			Function::FacetFunctionSelectors => {
				let facet: FacetHandle = decode(input)?;
				encode(state.table().selectors_of(facet))?
			}
			Function::FacetAddresses => encode(&state.table().facet_handles())?,
			Function::FacetAddress => {
				let queried: Selector = decode(input)?;
				// Unbound reads as the null handle.
				encode(&state.table().facet_of(queried).unwrap_or(FacetHandle::NULL))?
			}
			Function::SupportsInterface => {
				let id: InterfaceId = decode(input)?;
				encode(&loupe::supports_interface(state, id))?
			}
		};
		Ok(output)
	}
}
