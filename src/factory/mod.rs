//! Generic schema factories
//!
//! Parameterized builders that produce a fresh schema per instantiation.
//! The same factory serves every item type or sort-key set.

mod pagination;

pub use pagination::{
    paginated_response_contract, paginated_response_schema, pagination_contract,
    pagination_meta_schema, pagination_schema, PaginatedResponse, PaginationMeta,
    PaginationQuery, SortOrder, SORT_ORDERS,
};
