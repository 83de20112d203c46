//! Handlers for `/beneficiarios` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/beneficiarios` | All records, joined with document-type fields |
//! | `GET`    | `/beneficiarios/:id` | 404 if not found |
//! | `POST`   | `/beneficiarios` | Body: [`BeneficiaryInput`]; 201 + `Location` + stored record |
//! | `PUT`    | `/beneficiarios/:id` | Body: [`BeneficiaryInput`]; 204, or 404 if not found |
//! | `DELETE` | `/beneficiarios/:id` | 204, or 404 if not found |

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::{StatusCode, header},
  response::IntoResponse,
};
use benef_core::{
  beneficiary::{BeneficiaryInput, BeneficiaryView, Sex},
  store::BeneficiaryStore,
  validate::{MAX_DOCUMENT_NUMBER_LEN, MAX_NAME_LEN, field},
};

use crate::{ApiState, error::ApiError};

// ─── Extraction ──────────────────────────────────────────────────────────────

fn id_from(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
  path
    .map(|Path(id)| id)
    .map_err(|e| ApiError::Malformed(e.body_text()))
}

/// Decode the body and reject anything whose shape is wrong before the
/// business rules see it: missing or mistyped fields, oversized strings, a sex
/// code that is not a single `M`/`F` letter, a non-positive type id.
///
/// Length limits apply to the raw, untrimmed strings, so padding counts.
fn input_from(body: Result<Json<BeneficiaryInput>, JsonRejection>) -> Result<BeneficiaryInput, ApiError> {
  let Json(input) = body.map_err(|e| ApiError::Malformed(e.body_text()))?;

  check_max_len(field::GIVEN_NAMES, &input.given_names, MAX_NAME_LEN)?;
  check_max_len(field::SURNAMES, &input.surnames, MAX_NAME_LEN)?;
  check_max_len(field::DOCUMENT_NUMBER, &input.document_number, MAX_DOCUMENT_NUMBER_LEN)?;

  if input.document_type_id <= 0 {
    return Err(ApiError::Malformed(format!("{} must be a positive integer", field::DOCUMENT_TYPE_ID)));
  }
  if Sex::parse(&input.sex).is_none() {
    return Err(ApiError::Malformed(format!("{} must match ^[MF]$", field::SEX)));
  }

  Ok(input)
}

fn check_max_len(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
  if value.chars().count() > max {
    return Err(ApiError::Malformed(format!("{field} must be at most {max} characters")));
  }
  Ok(())
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /beneficiarios`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<BeneficiaryView>>, ApiError>
where
  S: BeneficiaryStore,
{
  let all = state
    .service
    .list()
    .await
    .map_err(|e| ApiError::from_service(e, &state.options))?;
  Ok(Json(all))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /beneficiarios/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<BeneficiaryView>, ApiError>
where
  S: BeneficiaryStore,
{
  let id = id_from(path)?;
  let view = state
    .service
    .get(id)
    .await
    .map_err(|e| ApiError::from_service(e, &state.options))?;
  Ok(Json(view))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /beneficiarios` — returns 201, a `Location` header pointing at the
/// new record, and the record as stored.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<BeneficiaryInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BeneficiaryStore,
{
  let input = input_from(body)?;
  let created = state
    .service
    .create(&input)
    .await
    .map_err(|e| ApiError::from_service(e, &state.options))?;

  let id = created.beneficiary.id;
  tracing::info!(id, "beneficiary created");
  let location = format!("{}/beneficiarios/{id}", state.options.mount_path);
  Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /beneficiarios/:id`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  path: Result<Path<i64>, PathRejection>,
  body: Result<Json<BeneficiaryInput>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
  S: BeneficiaryStore,
{
  let id = id_from(path)?;
  let input = input_from(body)?;
  state
    .service
    .update(id, &input)
    .await
    .map_err(|e| ApiError::from_service(e, &state.options))?;
  tracing::info!(id, "beneficiary updated");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /beneficiarios/:id`
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
  S: BeneficiaryStore,
{
  let id = id_from(path)?;
  state
    .service
    .delete(id)
    .await
    .map_err(|e| ApiError::from_service(e, &state.options))?;
  tracing::info!(id, "beneficiary deleted");
  Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
  use axum::http::StatusCode as Status;

  use super::*;

  fn input() -> BeneficiaryInput {
    BeneficiaryInput {
      given_names:      "Pedro".into(),
      surnames:         "Salas".into(),
      document_type_id: 1,
      document_number:  "12345678".into(),
      birth_date:       "1970-01-01".into(),
      sex:              " m ".into(),
    }
  }

  fn shape(i: BeneficiaryInput) -> Result<BeneficiaryInput, ApiError> {
    input_from(Ok(Json(i)))
  }

  #[test]
  fn well_formed_input_passes_shape_check() {
    assert!(shape(input()).is_ok());
  }

  #[test]
  fn shape_check_rejects_each_malformation() {
    let cases: Vec<fn(&mut BeneficiaryInput)> = vec![
      |i| i.surnames = "s".repeat(MAX_NAME_LEN + 1),
      |i| i.document_number = "9".repeat(MAX_DOCUMENT_NUMBER_LEN + 1),
      |i| i.document_type_id = 0,
      |i| i.sex = "MF".into(),
      |i| i.sex = "".into(),
    ];
    for mutate in cases {
      let mut i = input();
      mutate(&mut i);
      let err = shape(i).unwrap_err();
      assert!(matches!(err, ApiError::Malformed(_)), "{err}");
      assert_eq!(err.into_response().status(), Status::BAD_REQUEST);
    }
  }

  #[test]
  fn length_limit_counts_surrounding_whitespace() {
    let mut i = input();
    i.given_names = format!(" {} ", "a".repeat(MAX_NAME_LEN));
    assert!(matches!(shape(i), Err(ApiError::Malformed(_))));
  }

  #[test]
  fn blank_names_are_left_to_the_validator() {
    let mut i = input();
    i.given_names = "   ".into();
    assert!(shape(i).is_ok());
  }
}
