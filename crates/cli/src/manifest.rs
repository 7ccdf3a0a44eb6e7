//! Deployment manifest.
//!
//! ```toml
//! token_price = "v1"
//!
//! [owner]
//! seed = "owner"
//!
//! [diamond]
//! max_call_depth = 16
//!
//! [[prices]]
//! year = 2022
//! month = 1
//! day = 1
//! price = 1000000000000000000
//!
//! [[prices]]
//! year = 2022
//! month = 2
//! day = 15
//! price = "20000000000000000000"
//! ```
//!
//! Every section is optional. A missing owner defaults to the `owner` seed.
//! TOML integers stop at `i64::MAX`; larger prices are written as decimal
//! strings, up to `u128::MAX`.

use std::path::Path;

use diamond_primitives::{Address, AddressParseError};
use diamond_registry::{ConfigError, DiamondConfig};
use diamond_token_price::{TokenPrice, Version};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

const DEFAULT_OWNER_SEED: &str = "owner";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
	pub owner: OwnerSpec,
	pub diamond: DiamondConfig,
	/// Token price version bound by the initial batch; absent means none.
	pub token_price: Option<TokenPriceVersion>,
	pub prices: Vec<SeedPrice>,
}

/// Owner identity, given by seed label or explicit address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OwnerSpec {
	pub seed: Option<String>,
	pub address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPriceVersion {
	V1,
	V2,
	V3,
}

impl TokenPriceVersion {
	pub fn facet(self) -> TokenPrice {
		TokenPrice::new(match self {
			Self::V1 => Version::V1,
			Self::V2 => Version::V2,
			Self::V3 => Version::V3,
		})
	}
}

/// A price recorded by the owner right after deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedPrice {
	pub year: i64,
	pub month: i64,
	pub day: i64,
	#[serde(deserialize_with = "deserialize_price")]
	pub price: u128,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
	Integer(u64),
	Decimal(String),
}

fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
	match RawPrice::deserialize(deserializer)? {
		RawPrice::Integer(value) => Ok(u128::from(value)),
		RawPrice::Decimal(text) => text
			.parse()
			.map_err(|err| D::Error::custom(format!("invalid price {text:?}: {err}"))),
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error("owner must set exactly one of `seed` or `address`")]
	AmbiguousOwner,
	#[error("invalid owner address: {0}")]
	OwnerAddress(#[from] AddressParseError),
	#[error("prices require a `token_price` version")]
	PricesWithoutLedger,
}

impl Manifest {
	pub fn from_toml_str(content: &str) -> Result<Self, ManifestError> {
		Self::parse(content, "<inline>")
	}

	pub fn load(path: &Path) -> Result<Self, ManifestError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::parse(&content, &path.display().to_string())
	}

	fn parse(content: &str, origin: &str) -> Result<Self, ManifestError> {
		let manifest: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
			origin: origin.to_string(),
			source,
		})?;
		if !manifest.prices.is_empty() && manifest.token_price.is_none() {
			return Err(ManifestError::PricesWithoutLedger);
		}
		Ok(manifest)
	}

	pub fn owner(&self) -> Result<Address, ManifestError> {
		match (&self.owner.seed, &self.owner.address) {
			(None, None) => Ok(Address::from_seed(DEFAULT_OWNER_SEED)),
			(Some(seed), None) => Ok(Address::from_seed(seed)),
			(None, Some(address)) => Ok(address.parse()?),
			(Some(_), Some(_)) => Err(ManifestError::AmbiguousOwner),
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn empty_manifest_deploys_standard_modules_only() {
		let manifest = Manifest::from_toml_str("").unwrap();
		assert_eq!(manifest, Manifest::default());
		assert_eq!(manifest.owner().unwrap(), Address::from_seed("owner"));
	}

	#[test]
	fn full_manifest_parses() {
		let manifest = Manifest::from_toml_str(
			r#"
token_price = "v2"

[owner]
seed = "treasury"

[diamond]
max_call_depth = 16

[[prices]]
year = 2022
month = 1
day = 1
price = 1000000000000000000
"#,
		)
		.unwrap();
		assert_eq!(manifest.token_price, Some(TokenPriceVersion::V2));
		assert_eq!(manifest.diamond.max_call_depth, 16);
		assert_eq!(manifest.owner().unwrap(), Address::from_seed("treasury"));
		assert_eq!(
			manifest.prices,
			vec![SeedPrice {
				year: 2022,
				month: 1,
				day: 1,
				price: 1_000_000_000_000_000_000,
			}]
		);
	}

	#[test]
	fn owner_by_address() {
		let address = Address::from_seed("treasury");
		let manifest = Manifest::from_toml_str(&format!("[owner]\naddress = \"{address}\"\n")).unwrap();
		assert_eq!(manifest.owner().unwrap(), address);

		let manifest = Manifest::from_toml_str("[owner]\naddress = \"0x1234\"\n").unwrap();
		assert!(matches!(manifest.owner(), Err(ManifestError::OwnerAddress(_))));
	}

	#[test]
	fn owner_seed_and_address_conflict() {
		let manifest = Manifest::from_toml_str("[owner]\nseed = \"a\"\naddress = \"0x00\"\n").unwrap();
		assert!(matches!(manifest.owner(), Err(ManifestError::AmbiguousOwner)));
	}

	#[test]
	fn prices_beyond_toml_integers_use_decimal_strings() {
		let manifest = Manifest::from_toml_str(
			"token_price = \"v1\"\n\n[[prices]]\nyear = 2022\nmonth = 1\nday = 1\nprice = \"340282366920938463463374607431768211455\"\n",
		)
		.unwrap();
		assert_eq!(manifest.prices[0].price, u128::MAX);

		for bad in ["\"12e3\"", "\"-1\"", "-1"] {
			let err = Manifest::from_toml_str(&format!(
				"token_price = \"v1\"\n\n[[prices]]\nyear = 2022\nmonth = 1\nday = 1\nprice = {bad}\n"
			))
			.unwrap_err();
			assert!(matches!(err, ManifestError::Config(ConfigError::Parse { .. })), "{bad}");
		}
	}

	#[test]
	fn prices_need_a_ledger() {
		let err = Manifest::from_toml_str("[[prices]]\nyear = 2022\nmonth = 1\nday = 1\nprice = 5\n").unwrap_err();
		assert!(matches!(err, ManifestError::PricesWithoutLedger));
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let err = Manifest::from_toml_str("[diamond]\nmax_depth = 3\n").unwrap_err();
		assert!(matches!(err, ManifestError::Config(ConfigError::Parse { .. })));
	}

	#[test]
	fn load_reads_file_and_reports_missing() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("deploy.toml");
		std::fs::write(&path, "token_price = \"v3\"\n").unwrap();
		assert_eq!(Manifest::load(&path).unwrap().token_price, Some(TokenPriceVersion::V3));

		let err = Manifest::load(&dir.path().join("absent.toml")).unwrap_err();
		assert!(matches!(err, ManifestError::Config(ConfigError::Io { .. })));
	}
}
