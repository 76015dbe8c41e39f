//! `trolley.toml` loading.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use trolley_store::{MemoryCartService, RemoveResponse, ResponseShape, StoreConfig};

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading the configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io { path: PathBuf, error: std::io::Error },

	/// The file is not valid TOML or does not match the schema.
	#[error("invalid config {path}: {error}")]
	Parse { path: PathBuf, error: toml::de::Error },

	/// A catalog price is neither a number nor a string.
	#[error("catalog entry {0:?} must be a number or a string")]
	InvalidPrice(String),
}

/// Top-level CLI configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrolleyConfig {
	pub store: StoreConfig,
	pub session: SessionConfig,
	pub service: ServiceConfig,
	/// Product id → price. Strings are served verbatim.
	pub catalog: BTreeMap<String, Value>,
	pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
	/// Logged-in user. Absent means logged out.
	pub user_id: Option<String>,
}

/// Response shapes of the in-memory service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
	pub add: ResponseShape,
	pub update: ResponseShape,
	pub remove: RemoveResponse,
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
	Fetch,
	Add {
		product_id: String,
		#[serde(default = "one")]
		quantity: i64,
	},
	Update {
		product_id: String,
		quantity: i64,
		#[serde(default)]
		cart_item_id: Option<String>,
	},
	Remove {
		product_id: String,
	},
	Clear,
	UpdateLocally {
		product_id: String,
		quantity: i64,
	},
	Login {
		user_id: String,
	},
	Logout,
	/// Makes the next service call fail.
	Fail {
		message: String,
		#[serde(default)]
		status: Option<u16>,
		#[serde(default)]
		body: Option<Value>,
	},
}

const fn one() -> i64 {
	1
}

impl TrolleyConfig {
	/// Reads and parses `path`.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::parse(&text).map_err(|error| ConfigError::Parse {
			path: path.to_path_buf(),
			error,
		})?;
		config.validate()?;
		Ok(config)
	}

	pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
		toml::from_str(text)
	}

	/// Rejects catalog prices the service could not serve.
	pub fn validate(&self) -> Result<(), ConfigError> {
		match self.catalog.iter().find(|(_, price)| !(price.is_number() || price.is_string())) {
			Some((product_id, _)) => Err(ConfigError::InvalidPrice(product_id.clone())),
			None => Ok(()),
		}
	}

	/// Builds the in-memory service described by `catalog` and `service`.
	pub fn memory_service(&self) -> MemoryCartService {
		self.catalog
			.iter()
			.fold(MemoryCartService::new(), |service, (product_id, price)| service.with_product(product_id.clone(), price.clone()))
			.with_shapes(self.service.add, self.service.update, self.service.remove)
	}
}
