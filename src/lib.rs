//! contractkit - schema-driven contract validation
//!
//! Data crossing a trust boundary is checked against a declared schema in a
//! single pass. The result is either a typed value or the complete list of
//! `{path, message}` violations.
//!
//! # Modules
//!
//! - `refine`: reusable string and number predicates with fixed messages
//! - `schema`: schema nodes, composer, declarative definitions, validator
//! - `transform`: post-validation normalization steps
//! - `factory`: generic pagination schemas
//! - `contract`: typed contracts, registry, definition loader, built-in catalog
//! - `api`: HTTP 400 mapping
//! - `config`: limits and startup configuration
//! - `cli`: command-line front end

pub mod api;
pub mod cli;
pub mod config;
pub mod contract;
pub mod factory;
pub mod refine;
pub mod schema;
pub mod transform;

pub use config::{Config, ValidationLimits};
pub use contract::{Contract, ContractError, ContractRegistry};
pub use schema::{FailureList, Schema, SchemaError, Violation, ViolationKind};
