//! Contract binding and registry
//!
//! A contract is a checked schema bound to an output type. Contracts are
//! registered once at startup, from code or from declarative definitions,
//! and shared read-only afterwards.

mod binding;
pub mod catalog;
mod loader;
mod registry;

pub use binding::{Contract, BINDING_FAILED};
pub use loader::{ContractDef, ContractLoader, LoaderError, LoaderResult};
pub use registry::{ContractError, ContractRegistry, RegistryError, RegistryResult};
