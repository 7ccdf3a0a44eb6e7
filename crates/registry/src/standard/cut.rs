use diamond_primitives::{Selector, decode};

use super::DIAMOND_CUT;
use crate::code::{Abi, Facet, FunctionSig};
use crate::context::CallContext;
use crate::cut::{FacetCut, Initializer};
use crate::error::DiamondError;

#[derive(Debug, Clone, Copy)]
enum Function {
	DiamondCut,
}

/// Exposes the Upgrade Processor as a dispatchable function.
///
/// Input: `(Vec<FacetCut>, Option<Initializer>)`.
pub struct DiamondCutFacet {
	abi: Abi<Function>,
}

impl DiamondCutFacet {
	pub fn new() -> Self {
		Self {
			abi: Abi::new(&[(DIAMOND_CUT, Function::DiamondCut)]),
		}
	}
}

impl Default for DiamondCutFacet {
	fn default() -> Self {
		Self::new()
	}
}

impl Facet for DiamondCutFacet {
	fn name(&self) -> &'static str {
		"DiamondCutFacet"
	}

	fn functions(&self) -> &[FunctionSig] {
		self.abi.functions()
	}

	fn invoke(&self, ctx: &mut CallContext<'_>, selector: Selector, input: &[u8]) -> Result<Vec<u8>, DiamondError> {
		match self.abi.resolve(selector) {
			Some(Function::DiamondCut) => {
				let (cuts, init): (Vec<FacetCut>, Option<Initializer>) = decode(input)?;
				ctx.diamond_cut(cuts, init)?;
				Ok(Vec::new())
			}
			None => Err(DiamondError::FunctionNotFound { selector }),
		}
	}
}
