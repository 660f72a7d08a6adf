//! Pagination query and paginated response factories
//!
//! Query shape (every key optional, undeclared keys dropped):
//!
//! ```text
//! { page?: integer >= 1, limit?: integer >= 1, sortBy?: <sort key>, sortOrder?: "asc" | "desc" }
//! ```
//!
//! `page` and `limit` arrive as query-string text and coerce from strings.
//! Response shape: `{ data: [item], meta: { page, limit, total, totalPages? } }`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::contract::Contract;
use crate::refine;
use crate::schema::{
    array, enumeration, integer, object, Field, KeyPolicy, Schema, SchemaError, SchemaResult,
};

/// Sort order literals, lowercase only.
pub const SORT_ORDERS: &[&str] = &["asc", "desc"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Validated pagination query, generic over the sort-key type.
///
/// `S` is usually a fieldless enum whose serde names match the sort keys
/// passed to [`pagination_schema`]; `String` works for dynamic key sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery<S = String> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<S>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl<S> Default for PaginationQuery<S> {
    fn default() -> Self {
        Self {
            page: None,
            limit: None,
            sort_by: None,
            sort_order: None,
        }
    }
}

impl<S> PaginationQuery<S> {
    /// Number of items to skip. Pages are 1-based.
    pub fn offset(&self, default_limit: u64) -> u64 {
        let page = self.page.unwrap_or(1);
        page.saturating_sub(1)
            .saturating_mul(self.limit.unwrap_or(default_limit))
    }

    pub fn order(&self) -> SortOrder {
        self.sort_order.unwrap_or_default()
    }
}

/// Page metadata returned alongside `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
}

impl PaginationMeta {
    /// Builds metadata and derives `totalPages` from `total` and `limit`.
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = (limit > 0).then(|| total.div_ceil(limit));
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Builds a pagination query schema over `sort_keys`.
///
/// Sort-key matching is exact and case-sensitive.
///
/// # Errors
///
/// `EmptySortKeys` when no key is given; `DuplicateEnumValue` when a key
/// repeats.
pub fn pagination_schema<I, S>(sort_keys: I) -> SchemaResult<Schema>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let keys: Vec<String> = sort_keys.into_iter().map(Into::into).collect();
    if keys.is_empty() {
        return Err(SchemaError::EmptySortKeys);
    }

    let schema = object(
        vec![
            Field::optional("page", integer().coerce().refine(refine::positive())),
            Field::optional("limit", integer().coerce().refine(refine::positive())),
            Field::optional("sortBy", enumeration(keys)),
            Field::optional("sortOrder", enumeration(SORT_ORDERS.iter().copied())),
        ],
        KeyPolicy::Strip,
    )
    .describe("pagination query");

    schema.check()?;
    Ok(schema)
}

/// Schema of [`PaginationMeta`].
pub fn pagination_meta_schema() -> Schema {
    object(
        vec![
            Field::required("page", integer().refine(refine::positive())),
            Field::required("limit", integer().refine(refine::positive())),
            Field::required("total", integer()),
            Field::optional("totalPages", integer()),
        ],
        KeyPolicy::Strip,
    )
}

/// Wraps any item schema into the `{data, meta}` envelope.
pub fn paginated_response_schema(item: Schema) -> Schema {
    object(
        vec![
            Field::required("data", array(item)),
            Field::required("meta", pagination_meta_schema()),
        ],
        KeyPolicy::Strip,
    )
    .describe("paginated response")
}

/// Contract for a pagination query bound to [`PaginationQuery<S>`].
pub fn pagination_contract<S, I, K>(
    name: &str,
    sort_keys: I,
) -> SchemaResult<Contract<PaginationQuery<S>>>
where
    S: DeserializeOwned,
    I: IntoIterator<Item = K>,
    K: Into<String>,
{
    Contract::new(name, pagination_schema(sort_keys)?)
}

/// Contract for a paginated response bound to [`PaginatedResponse<T>`].
pub fn paginated_response_contract<T>(
    name: &str,
    item: Schema,
) -> SchemaResult<Contract<PaginatedResponse<T>>>
where
    T: DeserializeOwned,
{
    Contract::new(name, paginated_response_schema(item))
}
