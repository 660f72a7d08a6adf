//! Contract registry
//!
//! Name to contract lookup. Populated once at startup, read-only afterwards;
//! shared references can be handed to any number of threads.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::binding::Contract;
use super::catalog;
use super::loader::{ContractLoader, LoaderResult};
use crate::config::{Config, ValidationLimits};
use crate::schema::{FailureList, Schema, SchemaError};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("contract '{0}' is already registered")]
    DuplicateContract(String),

    #[error("unknown contract '{0}'")]
    UnknownContract(String),

    #[error("contract '{name}' has an invalid schema: {source}")]
    InvalidSchema {
        name: String,
        #[source]
        source: SchemaError,
    },
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Outcome of validating through the registry by name.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("unknown contract '{0}'")]
    UnknownContract(String),

    #[error(transparent)]
    Invalid(#[from] FailureList),
}

/// Startup-populated set of named contracts.
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    contracts: BTreeMap<String, Contract>,
    limits: ValidationLimits,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose contracts validate under `limits`, except those that
    /// set their own through [`Contract::with_limits`].
    pub fn with_limits(limits: ValidationLimits) -> Self {
        Self {
            contracts: BTreeMap::new(),
            limits,
        }
    }

    /// Builds a registry from configuration: the built-in catalog (unless
    /// disabled), then every definition under `contracts_dir`.
    pub fn from_config(config: &Config) -> LoaderResult<Self> {
        let mut registry = Self::with_limits(config.limits);

        if config.builtin {
            catalog::register_builtin(&mut registry)?;
        }

        if let Some(dir) = &config.contracts_dir {
            ContractLoader::new(dir).load_into(&mut registry)?;
        }

        tracing::info!(contracts = registry.len(), "contract registry ready");
        Ok(registry)
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Registers a contract under its own name.
    ///
    /// The registry keeps an untyped view; [`ContractRegistry::typed`]
    /// recovers a typed one. Registry limits apply unless the contract set
    /// its own.
    pub fn register<T>(&mut self, contract: &Contract<T>) -> RegistryResult<()> {
        let name = contract.name();
        if self.contracts.contains_key(name) {
            return Err(RegistryError::DuplicateContract(name.to_string()));
        }

        tracing::info!(contract = name, "contract registered");
        self.contracts.insert(
            name.to_string(),
            contract.rebind::<Value>().inherit_limits(self.limits),
        );
        Ok(())
    }

    /// Checks `schema` and registers it as an untyped contract.
    pub fn register_schema(&mut self, name: &str, schema: Schema) -> RegistryResult<()> {
        let contract: Contract =
            Contract::new(name, schema).map_err(|source| RegistryError::InvalidSchema {
                name: name.to_string(),
                source,
            })?;
        self.register(&contract)
    }

    pub fn get(&self, name: &str) -> RegistryResult<&Contract> {
        self.contracts
            .get(name)
            .ok_or_else(|| RegistryError::UnknownContract(name.to_string()))
    }

    /// Typed view of a registered contract.
    pub fn typed<T: DeserializeOwned>(&self, name: &str) -> RegistryResult<Contract<T>> {
        self.get(name).map(|contract| contract.rebind())
    }

    /// Validates `raw` against the named contract.
    pub fn validate(&self, name: &str, raw: &Value) -> Result<Value, ContractError> {
        let contract = self
            .contracts
            .get(name)
            .ok_or_else(|| ContractError::UnknownContract(name.to_string()))?;
        Ok(contract.validate_value(raw)?)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.contracts.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contracts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}
