use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// No source could determine make/model/year for the vehicle.
    ///
    /// Only surfaced to the caller when identity-specific advisories were
    /// explicitly requested; otherwise the pipeline degrades to defaults.
    IdentityUnresolved,
    /// Bad request error (unparseable input).
    BadRequest(String),
    /// Error interacting with an external API.
    ExternalApiError(String),
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::IdentityUnresolved => {
                write!(f, "Vehicle could not be identified from any source")
            }
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::ExternalApiError(msg) => write!(f, "External API error: {}", msg),
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Maps each error variant to an appropriate HTTP status code and JSON body.
    /// Logs errors appropriately based on their severity.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::IdentityUnresolved => {
                tracing::warn!("Valuation rejected: identity unresolved");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Vehicle could not be identified; defect advisories would be unreliable"
                        .to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::ExternalApiError(msg) => {
                tracing::error!("External API error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "External service error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
