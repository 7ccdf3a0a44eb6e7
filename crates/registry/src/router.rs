//! Dispatch Router.
//!
//! Pure indirection: resolve a selector against the live table, then run the
//! bound module against the call unit's working state. The router holds no
//! business logic and returns the module's result or failure verbatim.

use std::sync::Arc;

use diamond_primitives::{FacetHandle, Selector};

use crate::code::{CodeStore, Facet};
use crate::context::CallContext;
use crate::cut::resolve_module;
use crate::error::DiamondError;
use crate::state::State;

/// Resolves `selector` to its bound handle and module code.
pub(crate) fn resolve(
	state: &State,
	code: &CodeStore,
	selector: Selector,
) -> Result<(FacetHandle, Arc<dyn Facet>), DiamondError> {
	let facet = state
		.table
		.facet_of(selector)
		.ok_or(DiamondError::FunctionNotFound { selector })?;
	let module = resolve_module(facet, code)?;
	Ok((facet, module))
}

/// Routes a top-level call unit.
pub(crate) fn route(ctx: &mut CallContext<'_>, selector: Selector, input: &[u8]) -> Result<Vec<u8>, DiamondError> {
	let (facet, module) = ctx.resolve(selector)?;
	tracing::trace!(%selector, %facet, module = module.name(), caller = %ctx.caller(), "dispatch");
	ctx.enter(facet);
	module.invoke(ctx, selector, input)
}
