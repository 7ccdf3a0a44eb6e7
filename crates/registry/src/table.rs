//! Selector Table and its reverse index.
//!
//! # Purpose
//!
//! Maps every bound [`Selector`] to the [`FacetHandle`] responsible for it, and
//! keeps the reverse index (facet -> selectors) used by introspection.
//!
//! # Invariants
//!
//! - A selector maps to at most one facet; absence means unbound.
//! - The forward map and the reverse index derive one another exactly.
//!   - Enforced in: [`SelectorTable::bind`], [`SelectorTable::unbind`].
//!   - Tested by: [`crate::invariants::test_table_stays_consistent`]
//!   - Failure symptom: loupe reports a selector that dispatch cannot resolve.
//! - A facet appears in the reverse index only while it has at least one
//!   selector. Removing a facet's last selector swap-removes it from the facet
//!   order, and removing a selector swap-removes it within its facet.
//!
//! # Concurrency
//!
//! Cloning is cheap (`Arc` maps). Mutation goes through `Arc::make_mut`, so a
//! staged copy never disturbs the table it was cloned from.

use std::sync::Arc;

use diamond_primitives::{FacetHandle, Selector};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};

/// Detected disagreement between the forward map and the reverse index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableInconsistency {
	#[error("selector {selector} bound to {facet} is missing from its reverse entry")]
	MissingReverse { selector: Selector, facet: FacetHandle },
	#[error("reverse entry of {facet} lists {selector} which is bound to {bound:?}")]
	StaleReverse {
		selector: Selector,
		facet: FacetHandle,
		bound: Option<FacetHandle>,
	},
	#[error("reverse entry of {facet} is empty")]
	EmptyFacet { facet: FacetHandle },
	#[error("selector count mismatch: forward {forward}, reverse {reverse}")]
	CountMismatch { forward: usize, reverse: usize },
}

#[derive(Clone, Default, Debug)]
pub struct SelectorTable {
	bindings: Arc<FxHashMap<Selector, FacetHandle>>,
	facets: Arc<IndexMap<FacetHandle, Vec<Selector>, FxBuildHasher>>,
}

impl SelectorTable {
	pub fn facet_of(&self, selector: Selector) -> Option<FacetHandle> {
		self.bindings.get(&selector).copied()
	}

	/// Selectors bound to `facet`, empty for an unknown facet.
	pub fn selectors_of(&self, facet: FacetHandle) -> &[Selector] {
		self.facets.get(&facet).map(Vec::as_slice).unwrap_or_default()
	}

	/// Facets in registration order, each with its selectors.
	pub fn facets(&self) -> impl Iterator<Item = (FacetHandle, &[Selector])> + '_ {
		self.facets.iter().map(|(facet, selectors)| (*facet, selectors.as_slice()))
	}

	pub fn facet_handles(&self) -> Vec<FacetHandle> {
		self.facets.keys().copied().collect()
	}

	pub fn contains(&self, selector: Selector) -> bool {
		self.bindings.contains_key(&selector)
	}

	/// Number of bound selectors.
	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}

	pub fn facet_count(&self) -> usize {
		self.facets.len()
	}

	/// Binds an unbound selector. Returns the previous binding unchanged if
	/// the selector was already bound.
	pub(crate) fn bind(&mut self, selector: Selector, facet: FacetHandle) -> Result<(), FacetHandle> {
		if let Some(existing) = self.facet_of(selector) {
			return Err(existing);
		}
		Arc::make_mut(&mut self.bindings).insert(selector, facet);
		Arc::make_mut(&mut self.facets).entry(facet).or_default().push(selector);
		Ok(())
	}

	/// Unbinds `selector`, returning the facet it was bound to.
	pub(crate) fn unbind(&mut self, selector: Selector) -> Option<FacetHandle> {
		let facet = Arc::make_mut(&mut self.bindings).remove(&selector)?;
		let facets = Arc::make_mut(&mut self.facets);
		if let Some(selectors) = facets.get_mut(&facet) {
			if let Some(pos) = selectors.iter().position(|s| *s == selector) {
				selectors.swap_remove(pos);
			}
			if selectors.is_empty() {
				facets.swap_remove(&facet);
			}
		}
		Some(facet)
	}

	/// Moves a bound selector to `facet`, returning the previous facet.
	pub(crate) fn rebind(&mut self, selector: Selector, facet: FacetHandle) -> Option<FacetHandle> {
		let previous = self.unbind(selector)?;
		// Just unbound, so binding cannot collide.
		let _ = self.bind(selector, facet);
		Some(previous)
	}

	/// Checks that the forward map and the reverse index agree.
	pub fn verify(&self) -> Result<(), TableInconsistency> {
		let mut reverse_count = 0;
		for (facet, selectors) in self.facets.iter() {
			if selectors.is_empty() {
				return Err(TableInconsistency::EmptyFacet { facet: *facet });
			}
			for selector in selectors {
				let bound = self.facet_of(*selector);
				if bound != Some(*facet) {
					return Err(TableInconsistency::StaleReverse {
						selector: *selector,
						facet: *facet,
						bound,
					});
				}
			}
			reverse_count += selectors.len();
		}

		for (selector, facet) in self.bindings.iter() {
			if !self.selectors_of(*facet).contains(selector) {
				return Err(TableInconsistency::MissingReverse {
					selector: *selector,
					facet: *facet,
				});
			}
		}

		if reverse_count != self.bindings.len() {
			return Err(TableInconsistency::CountMismatch {
				forward: self.bindings.len(),
				reverse: reverse_count,
			});
		}
		Ok(())
	}

	/// Ordered view used to compare tables exactly, including facet order.
	pub fn to_entries(&self) -> Vec<(FacetHandle, Vec<Selector>)> {
		self.facets().map(|(facet, selectors)| (facet, selectors.to_vec())).collect()
	}
}
