use actix_web::error::JsonPayloadError;
use actix_web::web;
use serde::Serialize;

use crate::api::job::service::ServiceError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

/// Creates a configured JsonConfig with standardized error handling for the entire project
///
/// Body failures become [`ServiceError::ValidationError`] so they render as
/// the same 400 `ErrorResponse` as every other rejected request.
pub fn json_config(max_payload_size: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(max_payload_size)
        .error_handler(|err, _req| ServiceError::ValidationError(describe(&err)).into())
}

fn describe(err: &JsonPayloadError) -> String {
    match err {
        JsonPayloadError::Deserialize(de_err) if de_err.is_eof() => {
            "Request body is empty. Expected JSON payload".to_string()
        }
        JsonPayloadError::Deserialize(de_err) => format!("Invalid JSON format: {}", de_err),
        JsonPayloadError::ContentType => "Expected Content-Type: application/json".to_string(),
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "Request body exceeds the configured size limit".to_string()
        }
        other => other.to_string(),
    }
}
