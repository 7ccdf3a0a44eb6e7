use diamond_primitives::{InterfaceId, Selector};

use super::{
	DIAMOND_CUT_INTERFACE, DIAMOND_LOUPE_INTERFACE, ERC165_INTERFACE, ERC173_INTERFACE, INIT, InterfaceStorage,
};
use crate::code::{Abi, Facet, FunctionSig};
use crate::context::CallContext;
use crate::error::DiamondError;

#[derive(Debug, Clone, Copy)]
enum Function {
	Init,
}

/// Initializer run once by the deploy batch. Records the standard interfaces
/// as supported.
pub struct DiamondInit {
	abi: Abi<Function>,
}

impl DiamondInit {
	pub fn new() -> Self {
		Self {
			abi: Abi::new(&[(INIT, Function::Init)]),
		}
	}
}

impl Default for DiamondInit {
	fn default() -> Self {
		Self::new()
	}
}

impl Facet for DiamondInit {
	fn name(&self) -> &'static str {
		"DiamondInit"
	}

	fn functions(&self) -> &[FunctionSig] {
		self.abi.functions()
	}

	fn invoke(&self, ctx: &mut CallContext<'_>, selector: Selector, _input: &[u8]) -> Result<Vec<u8>, DiamondError> {
		match self.abi.resolve(selector) {
			Some(Function::Init) => {
				let ids = [ERC165_INTERFACE, DIAMOND_CUT_INTERFACE, DIAMOND_LOUPE_INTERFACE, ERC173_INTERFACE]
					.into_iter()
					.map(InterfaceId::of)
					.collect::<Result<Vec<_>, _>>()?;
				ctx.update(|record: &mut InterfaceStorage| {
					record.supported.extend(ids);
					Ok(())
				})?;
				Ok(Vec::new())
			}
			None => Err(DiamondError::FunctionNotFound { selector }),
		}
	}
}
