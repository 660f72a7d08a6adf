//! Contract binding
//!
//! A contract pairs a checked schema with the Rust type its validated output
//! deserializes into. It exposes a single entry point, [`Contract::validate`].

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ValidationLimits;
use crate::schema::{FailureList, Schema, SchemaResult, SchemaValidator, Violation};
use crate::transform::Transform;

/// Message reported when a validated value does not fit the bound type.
pub const BINDING_FAILED: &str = "Value could not be bound to contract type";

/// A named schema bound to the output type `T`.
///
/// Cloning is cheap; the schema is shared. Contracts are `Send + Sync` for
/// any `T`, and validation takes `&self`, so one instance can serve every
/// thread.
pub struct Contract<T = Value> {
    name: Arc<str>,
    schema: Arc<Schema>,
    validator: SchemaValidator,
    /// Set by [`Contract::with_limits`]; registries keep these limits
    pinned_limits: bool,
    _bound: PhantomData<fn() -> T>,
}

impl<T> Contract<T> {
    /// Creates a contract, checking the schema definition first.
    ///
    /// # Errors
    ///
    /// Any [`crate::schema::SchemaError`] found by [`Schema::check`].
    pub fn new(name: impl Into<Arc<str>>, schema: Schema) -> SchemaResult<Self> {
        schema.check()?;
        Ok(Self {
            name: name.into(),
            schema: Arc::new(schema),
            validator: SchemaValidator::default(),
            pinned_limits: false,
            _bound: PhantomData,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn limits(&self) -> &ValidationLimits {
        self.validator.limits()
    }

    /// Sets this contract's limits. A registry it is later registered in
    /// keeps them instead of applying its own.
    pub fn with_limits(mut self, limits: ValidationLimits) -> Self {
        self.validator = SchemaValidator::new(limits);
        self.pinned_limits = true;
        self
    }

    /// Applies `limits` unless the contract set its own.
    pub(crate) fn inherit_limits(mut self, limits: ValidationLimits) -> Self {
        if !self.pinned_limits {
            self.validator = SchemaValidator::new(limits);
        }
        self
    }

    /// Adds a whole-value transform, run once the schema has accepted the input.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        let schema = Schema::clone(&self.schema).transform(transform);
        self.schema = Arc::new(schema);
        self
    }

    /// Same name, schema and limits, bound to another output type.
    pub fn rebind<U>(&self) -> Contract<U> {
        Contract {
            name: Arc::clone(&self.name),
            schema: Arc::clone(&self.schema),
            validator: self.validator,
            pinned_limits: self.pinned_limits,
            _bound: PhantomData,
        }
    }

    /// Validates and returns the normalized value without binding it.
    ///
    /// The input is never modified.
    pub fn validate_value(&self, raw: &Value) -> Result<Value, FailureList> {
        self.validator.validate(&self.schema, raw).map_err(|failures| {
            tracing::debug!(
                contract = %self.name,
                violations = failures.len(),
                "contract rejected input"
            );
            failures
        })
    }
}

impl<T: DeserializeOwned> Contract<T> {
    /// Validates `raw` and binds the normalized value to `T`.
    ///
    /// # Errors
    ///
    /// Every violation found. A bound type that cannot represent the
    /// validated value is reported as a single transform violation at the
    /// root; the underlying serde error is logged, not returned.
    pub fn validate(&self, raw: &Value) -> Result<T, FailureList> {
        let normalized = self.validate_value(raw)?;
        serde_json::from_value(normalized).map_err(|e| {
            tracing::error!(
                contract = %self.name,
                error = %e,
                "validated value does not match bound type"
            );
            FailureList::single(Violation::transform("", BINDING_FAILED))
        })
    }
}

impl<T> Clone for Contract<T> {
    fn clone(&self) -> Self {
        self.rebind()
    }
}

impl<T> fmt::Debug for Contract<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contract")
            .field("name", &self.name)
            .field("type", &std::any::type_name::<T>())
            .field("limits", self.validator.limits())
            .finish()
    }
}
