//! Contract Invariant Tests
//!
//! End-to-end properties of the public API:
//! - Refinements accept and reject with fixed messages
//! - Strict objects list every unknown key and every missing field
//! - Pagination factories match sort keys exactly
//! - One paginated factory binds any item type
//! - Validated output re-validates to itself
//! - Violations are deterministic and the input is never mutated

use contractkit::contract::catalog;
use contractkit::factory::{paginated_response_contract, pagination_contract, SortOrder};
use contractkit::refine;
use contractkit::schema::{
    array, date_only_utc, integer, number, object, string, strict_object, Field, KeyPolicy,
    SchemaValidator, ViolationKind, ROOT_PATH,
};
use contractkit::transform;
use contractkit::{Contract, ContractRegistry};
use serde::Deserialize;
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn field_contract(schema: contractkit::Schema) -> Contract {
    Contract::new("field", strict_object(vec![Field::required("value", schema)])).unwrap()
}

fn messages(contract: &Contract, value: Value) -> Vec<String> {
    match contract.validate(&json!({ "value": value })) {
        Ok(_) => Vec::new(),
        Err(failures) => failures.iter().map(|v| v.message().to_string()).collect(),
    }
}

// =============================================================================
// Refinement Tests
// =============================================================================

#[test]
fn test_phone_refinement() {
    let contract = field_contract(string().refine(refine::phone()));

    for ok in ["4155552671", "(415) 555-2671", "+1 415-555-2671", "1-415-555-2671"] {
        assert!(messages(&contract, json!(ok)).is_empty(), "rejected {}", ok);
    }
    for bad in ["555-2671", "0155552671", "415555267", "phone"] {
        assert_eq!(
            messages(&contract, json!(bad)),
            vec!["Must be valid phone number"],
            "accepted {}",
            bad
        );
    }
}

#[test]
fn test_ein_refinement() {
    let contract = field_contract(string().refine(refine::ein()));

    assert!(messages(&contract, json!("12-3456789")).is_empty());
    for bad in ["123456789", "12-345678", "AB-1234567"] {
        assert_eq!(
            messages(&contract, json!(bad)),
            vec!["EIN must be in format XX-XXXXXXX"]
        );
    }
}

#[test]
fn test_domain_stricter_than_url_or_domain() {
    let domain = field_contract(string().refine(refine::domain()));
    let url = field_contract(string().refine(refine::url_or_domain()));

    for value in ["example.com", "https://example.com/path"] {
        assert!(messages(&domain, json!(value)).is_empty());
        assert!(messages(&url, json!(value)).is_empty());
    }

    assert_eq!(
        messages(&domain, json!("example.com/path")),
        vec!["Must be valid domain"]
    );
    assert!(messages(&url, json!("example.com/path")).is_empty());

    assert_eq!(
        messages(&url, json!("not a url")),
        vec!["Must be valid URL or domain"]
    );
}

#[test]
fn test_password_rules_each_report() {
    let contract = field_contract(string().refine_all(refine::password()));
    assert_eq!(
        messages(&contract, json!("short")),
        vec![
            "Password must be at least 8 characters",
            "Password must contain at least one number"
        ]
    );
    assert!(messages(&contract, json!("longer123")).is_empty());
}

// =============================================================================
// Date Transform Tests
// =============================================================================

#[test]
fn test_date_only_maps_to_utc_midnight() {
    let contract = field_contract(date_only_utc());
    let out = contract.validate(&json!({ "value": "2023-06-15" })).unwrap();
    assert_eq!(out["value"], "2023-06-15T00:00:00Z");

    let ts = transform::parse_date_only("2023-06-15").unwrap();
    assert_eq!(ts.timestamp(), 1_686_787_200);
}

#[test]
fn test_unpadded_date_rejected_before_transform() {
    let contract = field_contract(date_only_utc());
    let err = contract.validate(&json!({ "value": "2023-6-15" })).unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err.violations()[0].kind(), ViolationKind::Refinement);
}

#[test]
fn test_calendar_overflow_rejected() {
    let contract = field_contract(date_only_utc());
    let err = contract.validate(&json!({ "value": "2023-02-30" })).unwrap_err();
    assert_eq!(err.violations()[0].kind(), ViolationKind::Transform);
    assert!(err.violations()[0].message().contains("Invalid calendar date"));
}

// =============================================================================
// Strict Object Tests
// =============================================================================

#[test]
fn test_strict_lists_extra_key() {
    let contract = catalog::send_email().unwrap();
    let err = contract
        .validate(&json!({ "apiKey": "x", "email": "a@b.com", "extra": 1 }))
        .unwrap_err();
    assert_eq!(err.paths(), vec!["extra"]);
}

#[test]
fn test_strict_lists_missing_email() {
    let contract = catalog::send_email().unwrap();
    let err = contract.validate(&json!({ "apiKey": "x" })).unwrap_err();
    assert_eq!(err.paths(), vec!["email"]);
    assert_eq!(err.violations()[0].message(), "Required");
}

#[test]
fn test_every_violation_in_one_pass() {
    let contract = catalog::send_email().unwrap();
    let err = contract
        .validate(&json!({ "email": "nope", "z": 1, "a": 2 }))
        .unwrap_err();
    assert_eq!(err.paths(), vec!["apiKey", "email", "a", "z"]);
}

#[test]
fn test_non_object_root() {
    let contract = catalog::send_email().unwrap();
    let err = contract.validate(&json!("hello")).unwrap_err();
    assert_eq!(err.paths(), vec![ROOT_PATH]);
}

// =============================================================================
// Factory Tests
// =============================================================================

#[test]
fn test_pagination_sort_keys() {
    let contract = pagination_contract::<String, _, _>("q", ["name", "date"]).unwrap();

    assert!(contract.validate(&json!({ "sortBy": "name" })).is_ok());
    assert!(contract.validate(&json!({ "sortBy": "other" })).is_err());

    let query = contract.validate(&json!({ "sortOrder": "asc" })).unwrap();
    assert_eq!(query.sort_order, Some(SortOrder::Asc));
    assert!(contract.validate(&json!({ "sortOrder": "ASC" })).is_err());
}

#[test]
fn test_paginated_response_two_items() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: f64,
    }

    let contract = paginated_response_contract::<Item>(
        "items",
        object(vec![Field::required("id", number())], KeyPolicy::Strip),
    )
    .unwrap();

    let page = contract
        .validate(&json!({
            "data": [{ "id": 1 }, { "id": 2 }],
            "meta": { "page": 1, "limit": 10, "total": 2 }
        }))
        .unwrap();
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[1], Item { id: 2.0 });
}

// =============================================================================
// Idempotence Tests
// =============================================================================

#[test]
fn test_revalidation_is_idempotent() {
    let mut registry = ContractRegistry::new();
    catalog::register_builtin(&mut registry).unwrap();

    let inputs = [
        (catalog::SEND_EMAIL, json!({ "apiKey": "k", "email": "Ada@Example.com" })),
        (
            catalog::COMPANY,
            json!({
                "name": "Acme",
                "ein": "12-3456789",
                "domain": "https://acme.com",
                "phone": "415 555 2671",
                "address": { "street": "1 Main", "city": "Austin", "state": "TX", "zip": "73301-0001" },
                "incorporatedOn": "2020-02-29"
            }),
        ),
        (
            catalog::LIST_QUERY,
            json!({ "page": "2", "limit": "50", "sortBy": "name", "utm": "x" }),
        ),
        (
            catalog::WEBHOOK_EVENT,
            json!({ "id": "e", "type": "t", "created": 1, "data": { "k": [1] }, "extra": true }),
        ),
    ];

    for (name, input) in inputs {
        let first = registry.validate(name, &input).unwrap();
        let second = registry.validate(name, &first).unwrap();
        assert_eq!(first, second, "contract {} not idempotent", name);
    }
}

#[test]
fn test_defaults_and_coercion_idempotent() {
    let schema = object(
        vec![
            Field::with_default("limit", integer().coerce(), json!(20)),
            Field::optional("tags", array(string().transform(transform::trim()))),
        ],
        KeyPolicy::Strip,
    );
    let validator = SchemaValidator::default();

    let first = validator
        .validate(&schema, &json!({ "tags": [" a ", "b "] }))
        .unwrap();
    assert_eq!(first, json!({ "limit": 20, "tags": ["a", "b"] }));
    assert_eq!(validator.validate(&schema, &first).unwrap(), first);
}

// =============================================================================
// Determinism Tests
// =============================================================================

#[test]
fn test_validation_is_deterministic() {
    let contract = catalog::company().unwrap().rebind::<Value>();
    let input = json!({ "name": "", "ein": "1", "zz": 0, "aa": 0, "address": {} });

    let first = contract.validate(&input).unwrap_err();
    for _ in 0..50 {
        assert_eq!(contract.validate(&input).unwrap_err(), first);
    }
}

#[test]
fn test_input_never_mutated() {
    let contract = catalog::list_query().unwrap();
    let input = json!({ "page": "3", "noise": { "a": 1 } });
    let snapshot = input.clone();

    let _ = contract.validate(&input);
    assert_eq!(input, snapshot);
}

#[test]
fn test_list_query_binds_enum_sort_key() {
    let contract = catalog::list_query().unwrap();

    let query = contract
        .validate(&json!({ "page": "3", "limit": "20", "sortBy": "createdAt", "sortOrder": "desc" }))
        .unwrap();
    assert_eq!(query.sort_by, Some(catalog::ListSortKey::CreatedAt));
    assert_eq!(query.order(), SortOrder::Desc);
    assert_eq!(query.offset(10), 40);

    let empty = contract.validate(&json!({})).unwrap();
    assert_eq!(empty.sort_by, None);
    assert_eq!(empty.page, None);
}
