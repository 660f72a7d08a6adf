//! API response bodies
//!
//! JSON shapes returned across the boundary, and the axum
//! [`IntoResponse`] conversions that produce them.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contract::ContractError;
use crate::schema::FailureList;

/// One violation as shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
}

/// `400 Bad Request` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadRequestBody {
    pub status_code: u16,
    pub error: String,
    pub message: Vec<FieldMessage>,
}

impl From<&FailureList> for BadRequestBody {
    fn from(failures: &FailureList) -> Self {
        Self {
            status_code: StatusCode::BAD_REQUEST.as_u16(),
            error: "Bad Request".to_string(),
            message: failures
                .iter()
                .map(|v| FieldMessage {
                    field: v.path().to_string(),
                    message: v.message().to_string(),
                })
                .collect(),
        }
    }
}

/// Generic `500` body. Carries no detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerErrorBody {
    pub status_code: u16,
    pub error: String,
}

impl Default for ServerErrorBody {
    fn default() -> Self {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            error: "Internal Server Error".to_string(),
        }
    }
}

/// Success envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub status: String,
    pub data: Value,
}

impl SuccessResponse {
    pub fn new(data: Value) -> Self {
        Self {
            status: "ok".to_string(),
            data,
        }
    }
}

impl IntoResponse for FailureList {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(BadRequestBody::from(&self))).into_response()
    }
}

impl IntoResponse for ContractError {
    fn into_response(self) -> Response {
        match self {
            ContractError::Invalid(failures) => failures.into_response(),
            ContractError::UnknownContract(name) => {
                tracing::error!(contract = %name, "request routed to unknown contract");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ServerErrorBody::default()),
                )
                    .into_response()
            }
        }
    }
}

impl IntoResponse for SuccessResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Violation;
    use serde_json::json;

    fn failures() -> FailureList {
        FailureList::new(vec![
            Violation::missing_field("email"),
            Violation::unknown_key("extra", "extra"),
        ])
        .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_bad_request_body_shape() {
        let body = serde_json::to_value(BadRequestBody::from(&failures())).unwrap();
        assert_eq!(
            body,
            json!({
                "statusCode": 400,
                "error": "Bad Request",
                "message": [
                    { "field": "email", "message": "Required" },
                    { "field": "extra", "message": "Unrecognized key: \"extra\"" }
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_failure_list_into_response() {
        let response = failures().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["message"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_contract_hides_detail() {
        let response = ContractError::UnknownContract("internal-name".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({ "statusCode": 500, "error": "Internal Server Error" })
        );
    }

    #[tokio::test]
    async fn test_contract_error_invalid_is_400() {
        let response = ContractError::Invalid(failures()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_success_response() {
        let body = serde_json::to_value(SuccessResponse::new(json!({ "id": 1 }))).unwrap();
        assert_eq!(body, json!({ "status": "ok", "data": { "id": 1 } }));
    }
}
