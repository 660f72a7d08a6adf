//! Boundary mapping for HTTP handlers
//!
//! Rejected input becomes a 400 with one `{field, message}` entry per
//! violation. Nothing else about the schema, and no error chain, reaches the
//! caller.

mod response;

pub use response::{BadRequestBody, FieldMessage, ServerErrorBody, SuccessResponse};
