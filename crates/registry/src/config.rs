//! Registry configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Tunables for a [`crate::Diamond`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiamondConfig {
	/// Maximum nesting of re-entrant calls inside one call unit.
	pub max_call_depth: usize,
}

impl Default for DiamondConfig {
	fn default() -> Self {
		Self { max_call_depth: 64 }
	}
}

impl DiamondConfig {
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		toml::from_str(content).map_err(|source| ConfigError::Parse {
			origin: "<inline>".into(),
			source,
		})
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		toml::from_str(&content).map_err(|source| ConfigError::Parse {
			origin: path.display().to_string(),
			source,
		})
	}
}

/// Failure to load configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid config in {origin}: {source}")]
	Parse {
		origin: String,
		#[source]
		source: toml::de::Error,
	},
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_config_uses_defaults() {
		assert_eq!(DiamondConfig::from_toml_str("").unwrap(), DiamondConfig::default());
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let err = DiamondConfig::from_toml_str("max_depth = 3").unwrap_err();
		assert!(matches!(err, ConfigError::Parse { .. }));
	}

	#[test]
	fn load_reads_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("diamond.toml");
		std::fs::write(&path, "max_call_depth = 3\n").unwrap();
		assert_eq!(DiamondConfig::load(&path).unwrap().max_call_depth, 3);
	}

	#[test]
	fn load_reports_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let err = DiamondConfig::load(&dir.path().join("absent.toml")).unwrap_err();
		assert!(matches!(err, ConfigError::Io { .. }));
	}
}
