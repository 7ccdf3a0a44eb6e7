//! Subcommand implementations.
//!
//! Each command returns the lines it wants printed so the binary stays a thin
//! shell over these functions.

use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::{Datelike, NaiveDate};
use diamond_primitives::{Address, InterfaceId, Signature};
use diamond_registry::cut::selectors_for;
use diamond_registry::standard::{DIAMOND_CUT_INTERFACE, DIAMOND_LOUPE_INTERFACE, ERC165_INTERFACE, ERC173_INTERFACE};
use diamond_registry::{Clock, Deployment, Diamond, DiamondDeployer, FacetCut, FixedClock};
use diamond_token_price::{SET_PRICE, SET_TODAY_PRICE, TokenPrice, TokenPriceClient};

use crate::manifest::Manifest;

const DEMO_PRICES: [(u128, i64, i64, i64); 2] = [
	(1_000_000_000_000_000_000, 2022, 1, 1),
	(2_000_000_000_000_000_000, 2022, 2, 15),
];
const DEMO_TODAY_PRICE: u128 = 1_500_000_000_000_000_000;

/// Canonical form and selector of each signature.
pub fn selectors(signatures: &[String]) -> anyhow::Result<Vec<String>> {
	signatures
		.iter()
		.map(|raw| {
			let signature = Signature::parse(raw).with_context(|| format!("invalid signature {raw:?}"))?;
			Ok(format!("{}  {signature}", signature.selector()))
		})
		.collect()
}

/// Deploys the registry described by `manifest` and seeds its prices.
pub fn deploy(manifest: &Manifest, clock: Arc<dyn Clock>) -> anyhow::Result<Deployment> {
	let owner = manifest.owner()?;
	let mut deployer = DiamondDeployer::new(owner)
		.config(manifest.diamond.clone())
		.clock(clock);
	if let Some(version) = manifest.token_price {
		deployer = deployer.facet(version.facet());
	}
	let deployment = deployer.deploy().context("deployment failed")?;

	let ledger = TokenPriceClient::new(deployment.diamond.connect(owner));
	for seed in &manifest.prices {
		ledger
			.set_price(seed.price, seed.year, seed.month, seed.day)
			.with_context(|| format!("seeding price for {}-{:02}-{:02}", seed.year, seed.month, seed.day))?;
	}
	if !manifest.prices.is_empty() {
		tracing::info!(count = manifest.prices.len(), "seeded prices");
	}
	Ok(deployment)
}

/// Owner, bound modules with their selectors, and supported interfaces.
pub fn describe(diamond: &Diamond) -> Vec<String> {
	let loupe = diamond.loupe();
	let mut lines = vec![
		format!("diamond {}", diamond.address()),
		format!("owner   {}", loupe.owner()),
	];
	for entry in loupe.facets() {
		let name = diamond.code().name_of(entry.facet).unwrap_or("<unknown>");
		lines.push(format!("facet   {} {name}", entry.facet));
		lines.extend(entry.selectors.iter().map(|selector| format!("  {selector}")));
	}
	let interfaces = [
		("ERC-165", ERC165_INTERFACE),
		("DiamondCut", DIAMOND_CUT_INTERFACE),
		("DiamondLoupe", DIAMOND_LOUPE_INTERFACE),
		("ERC-173", ERC173_INTERFACE),
	];
	for (label, functions) in interfaces {
		if let Ok(id) = InterfaceId::of(functions)
			&& loupe.supports_interface(id)
		{
			lines.push(format!("supports {id} {label}"));
		}
	}
	lines
}

/// Deploys V1, records prices from two accounts, then upgrades to V2 and V3.
pub fn demo(today: NaiveDate) -> anyhow::Result<Vec<String>> {
	let owner = Address::from_seed("owner");
	let account = Address::from_seed("addr1");
	let Some(midnight) = today.and_hms_opt(0, 0, 0) else {
		bail!("invalid date {today}");
	};
	let deployment = DiamondDeployer::new(owner)
		.clock(Arc::new(FixedClock(midnight.and_utc())))
		.facet(TokenPrice::v1())
		.deploy()?;
	let diamond = &deployment.diamond;
	let code = diamond.code();
	let owner_api = TokenPriceClient::new(diamond.connect(owner));
	let other_api = TokenPriceClient::new(diamond.connect(account));
	let mut lines = vec![format!("deployed {} with {} facets", diamond.address(), diamond.loupe().list_facets().len())];

	let [(first, year, month, day), (second, year2, month2, day2)] = DEMO_PRICES;
	owner_api.set_price(first, year, month, day)?;
	other_api.set_price(second, year2, month2, day2)?;
	let average = owner_api.avg_token_price(year, month, year2, month2)?;
	lines.push(format!("v1: owner and {account} set prices, average {average}"));

	let v2 = code.deploy(TokenPrice::v2());
	let v2_module = code.get(v2).context("V2 code missing after deploy")?;
	let selectors = selectors_for(v2_module.as_ref(), &[SET_PRICE])?;
	diamond
		.connect(owner)
		.diamond_cut(vec![FacetCut::replace(v2, selectors)], None)?;
	match other_api.set_price(first, year, month, day) {
		Ok(_) => bail!("V2 accepted a price from a non-owner"),
		Err(err) => lines.push(format!("v2: setPrice from {account} rejected: {err}")),
	}
	let kept = owner_api.get_price(year, month, day)?;
	lines.push(format!("v2: price on {year}-{month:02}-{day:02} kept: {kept}"));

	let v3 = code.deploy(TokenPrice::v3());
	let v3_module = code.get(v3).context("V3 code missing after deploy")?;
	let selectors = selectors_for(v3_module.as_ref(), &[SET_TODAY_PRICE])?;
	diamond
		.connect(owner)
		.diamond_cut(vec![FacetCut::add(v3, selectors)], None)?;
	owner_api.set_today_price(DEMO_TODAY_PRICE)?;
	let stored = owner_api.get_price(i64::from(today.year()), i64::from(today.month()), i64::from(today.day()))?;
	lines.push(format!("v3: today's price {today} = {stored}"));

	lines.push(format!("{} facets bound", diamond.loupe().list_facets().len()));
	Ok(lines)
}

#[cfg(test)]
mod tests;
