//! Deploy sequence.
//!
//! Mirrors what deployment tooling does against a fresh registry:
//!
//! 1. Deploy the cut module and create the registry with it bound.
//! 2. Deploy the initializer module (never bound).
//! 3. Deploy the loupe, ownership and any extra modules.
//! 4. Issue one Add batch for all of them, with `init()` as initializer.

use std::sync::Arc;

use diamond_primitives::{Address, FacetHandle};

use crate::clock::{Clock, SystemClock};
use crate::code::{CodeStore, Facet};
use crate::config::DiamondConfig;
use crate::cut::{Calldata, FacetCut, Initializer};
use crate::diamond::Diamond;
use crate::error::DiamondError;
use crate::standard::{self, DiamondCutFacet, DiamondInit, DiamondLoupeFacet, OwnershipFacet};

pub struct DiamondDeployer {
	code: Arc<CodeStore>,
	owner: Address,
	config: DiamondConfig,
	clock: Arc<dyn Clock>,
	facets: Vec<Arc<dyn Facet>>,
}

impl DiamondDeployer {
	pub fn new(owner: Address) -> Self {
		Self {
			code: Arc::new(CodeStore::new()),
			owner,
			config: DiamondConfig::default(),
			clock: Arc::new(SystemClock),
			facets: Vec::new(),
		}
	}

	/// Deploys into an existing code store.
	pub fn code(mut self, code: Arc<CodeStore>) -> Self {
		self.code = code;
		self
	}

	pub fn config(mut self, config: DiamondConfig) -> Self {
		self.config = config;
		self
	}

	pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;
		self
	}

	/// Adds an application module to the initial batch.
	pub fn facet<F: Facet>(mut self, facet: F) -> Self {
		self.facets.push(Arc::new(facet));
		self
	}

	pub fn deploy(self) -> Result<Deployment, DiamondError> {
		let Self {
			code,
			owner,
			config,
			clock,
			facets,
		} = self;

		let cut_facet = code.deploy(DiamondCutFacet::new());
		let diamond = Diamond::with_config(Arc::clone(&code), owner, cut_facet, config, clock)?;
		let init = code.deploy(DiamondInit::new());

		let modules: Vec<Arc<dyn Facet>> = [
			Arc::new(DiamondLoupeFacet::new()) as Arc<dyn Facet>,
			Arc::new(OwnershipFacet::new()),
		]
		.into_iter()
		.chain(facets)
		.collect();

		let mut deployed = Vec::with_capacity(modules.len());
		let mut cuts = Vec::with_capacity(modules.len());
		for module in modules {
			let name = module.name();
			let selectors = module.selectors();
			let handle = code.deploy_arc(module);
			cuts.push(FacetCut::add(handle, selectors));
			deployed.push(DeployedFacet { name, handle });
		}

		let initializer = Initializer {
			facet: init,
			calldata: Calldata::encode(standard::INIT, &())?,
		};
		diamond.connect(owner).diamond_cut(cuts, Some(initializer))?;

		tracing::info!(
			diamond = %diamond.address(),
			facets = deployed.len() + 1,
			"deployment complete"
		);
		Ok(Deployment {
			diamond,
			cut_facet,
			init,
			facets: deployed,
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployedFacet {
	pub name: &'static str,
	pub handle: FacetHandle,
}

#[derive(Debug)]
pub struct Deployment {
	pub diamond: Diamond,
	pub cut_facet: FacetHandle,
	pub init: FacetHandle,
	/// Modules added by the initial batch, in cut order.
	pub facets: Vec<DeployedFacet>,
}

impl Deployment {
	/// Handle of the deployed module named `name`, including the cut module.
	pub fn handle(&self, name: &str) -> Option<FacetHandle> {
		if name == "DiamondCutFacet" {
			return Some(self.cut_facet);
		}
		self.facets.iter().find(|f| f.name == name).map(|f| f.handle)
	}
}
