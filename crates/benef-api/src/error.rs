//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body has the shape `{"kind": ..., "message": ...}`; validation
//! failures add an `errors` array with one entry per violated rule.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use benef_core::{ServiceError, ValidationErrors};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::ApiOptions;

/// Returned instead of the backend's message unless
/// [`ApiOptions::expose_backend_errors`] is set.
pub const GENERIC_CONFLICT: &str = "the record could not be saved";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The request does not have the expected shape. Rejected before any rule
  /// is evaluated.
  #[error("malformed request: {0}")]
  Malformed(String),

  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a service failure onto its HTTP counterpart, logging backend detail.
  pub fn from_service<E>(err: ServiceError<E>, options: &ApiOptions) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    match err {
      ServiceError::Validation(errors) => ApiError::Validation(errors),
      ServiceError::NotFound(id) => ApiError::NotFound(format!("beneficiary {id} not found")),
      ServiceError::Conflict(detail) => {
        tracing::warn!(%detail, "store rejected write");
        if options.expose_backend_errors {
          ApiError::Conflict(detail)
        } else {
          ApiError::Conflict(GENERIC_CONFLICT.to_owned())
        }
      }
      e @ ServiceError::Vanished(_) => ApiError::Store(Box::new(e)),
      ServiceError::Store(e) => ApiError::Store(Box::new(e)),
    }
  }
}

#[derive(Serialize)]
struct FieldErrorBody {
  field:   &'static str,
  code:    &'static str,
  message: String,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Malformed(m) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "kind": "malformed", "message": m })),
      )
        .into_response(),
      ApiError::Validation(errors) => {
        let message = errors.to_string();
        let errors: Vec<FieldErrorBody> = errors
          .into_iter()
          .map(|e| FieldErrorBody {
            field:   e.field,
            code:    e.violation.code(),
            message: e.violation.to_string(),
          })
          .collect();
        (
          StatusCode::BAD_REQUEST,
          Json(json!({ "kind": "validation", "message": message, "errors": errors })),
        )
          .into_response()
      }
      ApiError::NotFound(m) => (
        StatusCode::NOT_FOUND,
        Json(json!({ "kind": "not_found", "message": m })),
      )
        .into_response(),
      ApiError::Conflict(m) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "kind": "conflict", "message": m })),
      )
        .into_response(),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "kind": "internal", "message": "internal server error" })),
        )
          .into_response()
      }
    }
  }
}
