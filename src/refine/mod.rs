//! Primitive refinement library
//!
//! Atomic single-value validators. Each refinement pairs a pure predicate
//! with a fixed message and carries no state, so one instance may be shared
//! by any number of schemas and evaluated from any thread.
//!
//! # Catalog
//!
//! - `phone`: US mobile number
//! - `zip`: US postal code
//! - `domain`: FQDN, or URL with an explicit protocol
//! - `url_or_domain`: URL with or without protocol (more permissive than `domain`)
//! - `ein`: `XX-XXXXXXX`
//! - `date_only`: zero-padded `YYYY-MM-DD`
//! - `password`: length, letter and digit rules, one message per failing rule
//!
//! Refinements are also addressable by name through [`lookup`] so that
//! declarative contract definitions can reference them.

mod patterns;
mod rules;

pub use patterns::{
    is_date_only, is_domain, is_ein, is_email, is_phone, is_url_or_domain, is_utc_midnight,
    is_zip,
};
pub use rules::{
    date_only, domain, ein, email, lookup, max_length, min_length, non_empty, password, phone,
    positive, url_or_domain, utc_midnight, zip, Refinement, REFINEMENT_NAMES,
};
