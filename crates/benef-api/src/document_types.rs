//! Handler for `GET /documentos-identidad`.
//!
//! Returns the full active catalog. Filtering by country is left to clients.

use axum::{Json, extract::State};
use benef_core::{document_type::DocumentType, store::BeneficiaryStore};

use crate::{ApiState, error::ApiError};

/// `GET /documentos-identidad`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<DocumentType>>, ApiError>
where
  S: BeneficiaryStore,
{
  let types = state
    .service
    .document_types()
    .await
    .map_err(|e| ApiError::from_service(e, &state.options))?;
  Ok(Json(types))
}
