//! Deployed module code.
//!
//! A module ("facet") is a set of functions it claims to implement plus the
//! logic behind them. Modules are deployed once into a [`CodeStore`] and are
//! referenced everywhere else only by their [`FacetHandle`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use diamond_primitives::{Address, FacetHandle, Selector, Signature};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::context::CallContext;
use crate::error::DiamondError;

/// A function a module implements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSig {
	pub selector: Selector,
	pub signature: Signature,
}

/// A pluggable logic module.
///
/// `invoke` executes against the registry's shared state through `ctx`; a
/// module never owns state of its own.
pub trait Facet: Send + Sync + 'static {
	fn name(&self) -> &'static str;

	/// Functions this module claims to implement.
	fn functions(&self) -> &[FunctionSig];

	fn invoke(&self, ctx: &mut CallContext<'_>, selector: Selector, input: &[u8]) -> Result<Vec<u8>, DiamondError>;

	fn implements(&self, selector: Selector) -> bool {
		self.functions().iter().any(|f| f.selector == selector)
	}

	fn selectors(&self) -> Vec<Selector> {
		self.functions().iter().map(|f| f.selector).collect()
	}
}

/// Selector table local to one module, mapping selectors to the module's own
/// function enum.
pub struct Abi<F> {
	functions: Vec<FunctionSig>,
	by_selector: FxHashMap<Selector, F>,
}

impl<F: Copy> Abi<F> {
	/// Builds the table from signature literals.
	///
	/// # Panics
	///
	/// Panics if a literal is not a valid signature or two literals share a
	/// selector. Both are definition bugs in the module itself.
	pub fn new(defs: &[(&str, F)]) -> Self {
		let mut functions = Vec::with_capacity(defs.len());
		let mut by_selector = FxHashMap::default();
		for &(literal, function) in defs {
			let signature = match Signature::parse(literal) {
				Ok(signature) => signature,
				Err(err) => panic!("invalid signature literal {literal:?}: {err}"),
			};
			let selector = signature.selector();
			if by_selector.insert(selector, function).is_some() {
				panic!("duplicate selector {selector} for {signature}");
			}
			functions.push(FunctionSig { selector, signature });
		}
		Self { functions, by_selector }
	}

	pub fn resolve(&self, selector: Selector) -> Option<F> {
		self.by_selector.get(&selector).copied()
	}

	pub fn functions(&self) -> &[FunctionSig] {
		&self.functions
	}
}

/// Registry of deployed modules, keyed by handle.
#[derive(Default)]
pub struct CodeStore {
	modules: RwLock<FxHashMap<FacetHandle, Arc<dyn Facet>>>,
	nonce: AtomicU64,
}

impl CodeStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn deploy<F: Facet>(&self, facet: F) -> FacetHandle {
		self.deploy_arc(Arc::new(facet))
	}

	pub fn deploy_arc(&self, facet: Arc<dyn Facet>) -> FacetHandle {
		let handle = FacetHandle::new(self.allocate_address());
		tracing::debug!(facet = %handle, name = facet.name(), "deployed module");
		self.modules.write().insert(handle, facet);
		handle
	}

	/// Reserves a fresh address that holds no module code.
	pub fn allocate_address(&self) -> Address {
		let nonce = self.nonce.fetch_add(1, Ordering::Relaxed) + 1;
		Address::from_seed(&format!("diamond.deploy:{nonce}"))
	}

	pub fn get(&self, handle: FacetHandle) -> Option<Arc<dyn Facet>> {
		self.modules.read().get(&handle).cloned()
	}

	pub fn has_code(&self, handle: FacetHandle) -> bool {
		self.modules.read().contains_key(&handle)
	}

	pub fn name_of(&self, handle: FacetHandle) -> Option<&'static str> {
		self.modules.read().get(&handle).map(|m| m.name())
	}
}
