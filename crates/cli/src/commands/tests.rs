use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use diamond_primitives::Address;
use diamond_registry::FixedClock;
use diamond_token_price::TokenPriceClient;
use pretty_assertions::assert_eq;

use super::*;
use crate::manifest::Manifest;

fn clock() -> Arc<dyn Clock> {
	Arc::new(FixedClock(Utc.with_ymd_and_hms(2022, 3, 10, 0, 0, 0).unwrap()))
}

#[test]
fn selector_prints_canonical_signature() {
	let lines = selectors(&["pause()".to_string(), "setPrice(uint, int, int, int)".to_string()]).unwrap();
	assert_eq!(
		lines,
		vec![
			"0x2138ec0c  pause()".to_string(),
			"0x2b85d01a  setPrice(uint256,int256,int256,int256)".to_string(),
		]
	);
}

#[test]
fn selector_rejects_malformed_signature() {
	let err = selectors(&["pause".to_string()]).unwrap_err();
	assert!(err.to_string().contains("invalid signature"));
}

#[test]
fn deploy_seeds_prices_and_describes_bindings() {
	let manifest = Manifest::from_toml_str(
		"token_price = \"v1\"\n\n[[prices]]\nyear = 2022\nmonth = 1\nday = 1\nprice = 7\n",
	)
	.unwrap();
	let deployment = deploy(&manifest, clock()).unwrap();
	let owner = Address::from_seed("owner");
	let ledger = TokenPriceClient::new(deployment.diamond.connect(owner));
	assert_eq!(ledger.get_price(2022, 1, 1).unwrap(), 7);

	let lines = describe(&deployment.diamond);
	assert_eq!(lines[1], format!("owner   {owner}"));
	assert_eq!(lines.iter().filter(|l| l.starts_with("facet ")).count(), 4);
	assert!(lines.iter().any(|l| l.ends_with("TokenPriceV1")));
	assert!(lines.contains(&"supports 0xfae56f0c DiamondLoupe".to_string()));
	assert!(lines.contains(&"supports 0xce1e1044 ERC-173".to_string()));
}

#[test]
fn deploy_without_ledger_binds_standard_modules() {
	let deployment = deploy(&Manifest::default(), clock()).unwrap();
	assert_eq!(deployment.diamond.loupe().list_facets().len(), 3);
}

#[test]
fn demo_walks_through_both_upgrades() {
	let lines = demo(NaiveDate::from_ymd_opt(2022, 3, 10).unwrap()).unwrap();
	assert!(lines[0].ends_with("with 4 facets"));
	assert!(lines[1].ends_with("average 1500000000000000000"));
	assert!(lines[2].contains("must be contract owner"));
	assert_eq!(lines[3], "v2: price on 2022-01-01 kept: 1000000000000000000");
	assert_eq!(lines[4], "v3: today's price 2022-03-10 = 1500000000000000000");
	assert_eq!(lines[5], "6 facets bound");
}
