//! Upgrade Processor.
//!
//! # Purpose
//!
//! Validates and applies a batch of Add/Replace/Remove cuts against the
//! [`SelectorTable`], optionally followed by a one-shot initializer call.
//!
//! # Mental model
//!
//! 1. Stage: every cut is applied, in order, to a copy of the live table. Each
//!    cut observes the effects of the cuts before it.
//! 2. Initialize: the staged table is installed in the call unit's working
//!    state and the initializer (if any) runs against shared state.
//! 3. Commit or discard: the call unit publishes the working state only if
//!    staging and the initializer both succeed.
//!
//! # Invariants
//!
//! - A failing batch leaves the table exactly as it was (atomicity).
//!   - Enforced in: [`stage_cuts`] (works on a copy), [`crate::CallContext::diamond_cut`].
//!   - Tested by: [`crate::invariants::test_failed_batch_is_atomic`]
//!   - Failure symptom: a partially applied upgrade becomes visible.
//! - Add requires unbound selectors, Replace requires bound selectors on a
//!   different facet, Remove requires bound selectors and a null handle.

use diamond_primitives::{FacetHandle, Selector, encode};
use serde::{Deserialize, Serialize};

use crate::code::{CodeStore, Facet};
use crate::error::{DiamondError, InvalidFacet};
use crate::event::Event;
use crate::table::SelectorTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacetCutAction {
	Add,
	Replace,
	Remove,
}

/// One operation of an upgrade batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCut {
	pub facet: FacetHandle,
	pub action: FacetCutAction,
	pub selectors: Vec<Selector>,
}

impl FacetCut {
	pub fn add(facet: FacetHandle, selectors: Vec<Selector>) -> Self {
		Self {
			facet,
			action: FacetCutAction::Add,
			selectors,
		}
	}

	pub fn replace(facet: FacetHandle, selectors: Vec<Selector>) -> Self {
		Self {
			facet,
			action: FacetCutAction::Replace,
			selectors,
		}
	}

	pub fn remove(selectors: Vec<Selector>) -> Self {
		Self {
			facet: FacetHandle::NULL,
			action: FacetCutAction::Remove,
			selectors,
		}
	}
}

/// A function call: selector plus encoded arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calldata {
	pub selector: Selector,
	pub input: Vec<u8>,
}

impl Calldata {
	pub fn new(selector: Selector, input: Vec<u8>) -> Self {
		Self { selector, input }
	}

	/// Encodes `args` for the function with the given signature.
	pub fn encode<A: Serialize + ?Sized>(signature: &str, args: &A) -> Result<Self, DiamondError> {
		Ok(Self {
			selector: Selector::of(signature)?,
			input: encode(args)?,
		})
	}
}

/// One-shot call run after a batch's cuts, against shared state.
///
/// The initializer module does not need to be bound in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Initializer {
	pub facet: FacetHandle,
	pub calldata: Calldata,
}

/// Emitted once per successful upgrade batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiamondCut {
	pub cuts: Vec<FacetCut>,
	pub init: Option<Initializer>,
}

impl Event for DiamondCut {
	const SIGNATURE: &'static str = "DiamondCut((address,uint8,bytes4[])[],address,bytes)";
}

/// Applies `cuts` in order to a copy of `table` and returns the copy.
///
/// `table` itself is never modified, so an error leaves nothing to undo.
pub fn stage_cuts(table: &SelectorTable, cuts: &[FacetCut], code: &CodeStore) -> Result<SelectorTable, DiamondError> {
	let mut staged = table.clone();
	for cut in cuts {
		if cut.selectors.is_empty() {
			return Err(DiamondError::NoSelectors {
				action: cut.action,
				facet: cut.facet,
			});
		}
		match cut.action {
			FacetCutAction::Add => stage_add(&mut staged, cut, code)?,
			FacetCutAction::Replace => stage_replace(&mut staged, cut, code)?,
			FacetCutAction::Remove => stage_remove(&mut staged, cut)?,
		}
	}
	Ok(staged)
}

fn stage_add(table: &mut SelectorTable, cut: &FacetCut, code: &CodeStore) -> Result<(), DiamondError> {
	let module = resolve_module(cut.facet, code)?;
	for &selector in &cut.selectors {
		if let Some(existing) = table.facet_of(selector) {
			return Err(DiamondError::InvalidAddSelector { selector, existing });
		}
		require_implemented(module.as_ref(), cut.facet, selector)?;
		table
			.bind(selector, cut.facet)
			.map_err(|existing| DiamondError::InvalidAddSelector { selector, existing })?;
	}
	Ok(())
}

fn stage_replace(table: &mut SelectorTable, cut: &FacetCut, code: &CodeStore) -> Result<(), DiamondError> {
	let module = resolve_module(cut.facet, code)?;
	for &selector in &cut.selectors {
		match table.facet_of(selector) {
			None => return Err(DiamondError::InvalidReplaceSelector { selector }),
			Some(current) if current == cut.facet => {
				return Err(DiamondError::NoOpReplace {
					selector,
					facet: cut.facet,
				});
			}
			Some(_) => {}
		}
		require_implemented(module.as_ref(), cut.facet, selector)?;
		table.rebind(selector, cut.facet);
	}
	Ok(())
}

fn stage_remove(table: &mut SelectorTable, cut: &FacetCut) -> Result<(), DiamondError> {
	if !cut.facet.is_null() {
		return Err(DiamondError::InvalidFacetHandle {
			facet: cut.facet,
			reason: InvalidFacet::RemoveTargetNotNull,
		});
	}
	for &selector in &cut.selectors {
		if table.unbind(selector).is_none() {
			return Err(DiamondError::InvalidRemoveSelector { selector });
		}
	}
	Ok(())
}

/// Looks up the module behind a non-null handle.
pub(crate) fn resolve_module(facet: FacetHandle, code: &CodeStore) -> Result<std::sync::Arc<dyn Facet>, DiamondError> {
	if facet.is_null() {
		return Err(DiamondError::InvalidFacetHandle {
			facet,
			reason: InvalidFacet::Null,
		});
	}
	code.get(facet).ok_or(DiamondError::InvalidFacetHandle {
		facet,
		reason: InvalidFacet::NoCode,
	})
}

fn require_implemented(module: &dyn Facet, facet: FacetHandle, selector: Selector) -> Result<(), DiamondError> {
	if module.implements(selector) {
		Ok(())
	} else {
		Err(DiamondError::SelectorNotImplemented { facet, selector })
	}
}

/// Selectors for the given signatures, each of which the module must implement.
pub fn selectors_for(module: &dyn Facet, signatures: &[&str]) -> Result<Vec<Selector>, DiamondError> {
	signatures
		.iter()
		.map(|sig| {
			let selector = Selector::of(sig)?;
			if module.implements(selector) {
				Ok(selector)
			} else {
				Err(DiamondError::FunctionNotFound { selector })
			}
		})
		.collect()
}

/// Selectors of the module except those for the given signatures.
pub fn selectors_except(module: &dyn Facet, signatures: &[&str]) -> Result<Vec<Selector>, DiamondError> {
	let excluded = signatures
		.iter()
		.map(|sig| Selector::of(sig))
		.collect::<Result<Vec<_>, _>>()?;
	Ok(module
		.selectors()
		.into_iter()
		.filter(|s| !excluded.contains(s))
		.collect())
}
