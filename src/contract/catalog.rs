//! Built-in contract catalog
//!
//! Typed contracts for shapes that commonly cross an API boundary. They all
//! draw on the same refinement library, so a zip code or phone number is
//! judged identically wherever it appears.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::binding::Contract;
use super::registry::{ContractRegistry, RegistryResult};
use crate::factory::{self, PaginationQuery};
use crate::refine;
use crate::schema::{
    date_only_utc, integer, object, string, strict_object, Field, KeyPolicy, Schema,
    SchemaResult,
};
use crate::transform;

pub const SEND_EMAIL: &str = "send-email";
pub const ADDRESS: &str = "address";
pub const COMPANY: &str = "company";
pub const SIGN_UP: &str = "sign-up";
pub const WEBHOOK_EVENT: &str = "webhook-event";
pub const LIST_QUERY: &str = "list-query";

/// Sort keys accepted by [`list_query`].
pub const LIST_SORT_KEYS: &[&str] = &["name", "createdAt"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub api_key: String,
    /// Lowercased
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub ein: String,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub phone: String,
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incorporated_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
}

/// Inbound webhook envelope. `data` is kept as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub created: i64,
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListSortKey {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "createdAt")]
    CreatedAt,
}

fn email_field() -> Schema {
    string()
        .refine(refine::email())
        .transform(transform::lowercase())
}

fn address_schema() -> Schema {
    strict_object(vec![
        Field::required("street", string().refine(refine::non_empty())),
        Field::required("city", string().refine(refine::non_empty())),
        Field::required(
            "state",
            string()
                .refine(refine::min_length(2))
                .refine(refine::max_length(2)),
        ),
        Field::required("zip", string().refine(refine::zip())),
    ])
}

pub fn send_email() -> SchemaResult<Contract<SendEmailRequest>> {
    Contract::new(
        SEND_EMAIL,
        strict_object(vec![
            Field::required("apiKey", string().refine(refine::non_empty())),
            Field::required("email", email_field()),
        ]),
    )
}

pub fn address() -> SchemaResult<Contract<Address>> {
    Contract::new(ADDRESS, address_schema())
}

pub fn company() -> SchemaResult<Contract<Company>> {
    Contract::new(
        COMPANY,
        strict_object(vec![
            Field::required("name", string().refine(refine::non_empty())),
            Field::required("ein", string().refine(refine::ein())),
            Field::required("domain", string().refine(refine::domain())),
            Field::optional("website", string().refine(refine::url_or_domain())),
            Field::required("phone", string().refine(refine::phone())),
            Field::required("address", address_schema()),
            Field::optional("incorporatedOn", date_only_utc()),
        ]),
    )
}

pub fn sign_up() -> SchemaResult<Contract<SignUpRequest>> {
    Contract::new(
        SIGN_UP,
        strict_object(vec![
            Field::required("email", email_field()),
            Field::required("password", string().refine_all(refine::password())),
        ]),
    )
}

/// Open envelope: providers add top-level keys over time, so undeclared keys
/// are dropped rather than rejected.
pub fn webhook_event() -> SchemaResult<Contract<WebhookEvent>> {
    Contract::new(
        WEBHOOK_EVENT,
        object(
            vec![
                Field::required("id", string().refine(refine::non_empty())),
                Field::required("type", string().refine(refine::non_empty())),
                Field::required("created", integer().refine(refine::positive())),
                Field::required("data", object(Vec::new(), KeyPolicy::Passthrough)),
            ],
            KeyPolicy::Strip,
        ),
    )
}

pub fn list_query() -> SchemaResult<Contract<PaginationQuery<ListSortKey>>> {
    factory::pagination_contract(LIST_QUERY, LIST_SORT_KEYS.iter().copied())
}

/// Registers every built-in contract.
pub fn register_builtin(registry: &mut ContractRegistry) -> RegistryResult<()> {
    registry.register(&send_email().map_err(|e| invalid(SEND_EMAIL, e))?)?;
    registry.register(&address().map_err(|e| invalid(ADDRESS, e))?)?;
    registry.register(&company().map_err(|e| invalid(COMPANY, e))?)?;
    registry.register(&sign_up().map_err(|e| invalid(SIGN_UP, e))?)?;
    registry.register(&webhook_event().map_err(|e| invalid(WEBHOOK_EVENT, e))?)?;
    registry.register(&list_query().map_err(|e| invalid(LIST_QUERY, e))?)?;
    Ok(())
}

fn invalid(name: &str, source: crate::schema::SchemaError) -> super::RegistryError {
    super::RegistryError::InvalidSchema {
        name: name.to_string(),
        source,
    }
}
