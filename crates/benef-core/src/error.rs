//! Error types for `benef-core`.

use std::fmt;

use thiserror::Error;

// ─── Validation ──────────────────────────────────────────────────────────────

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
  #[error("is required")]
  Required,

  #[error("must be at most {max} characters")]
  TooLong { max: usize },

  #[error("document type {id} does not exist")]
  UnknownDocumentType { id: i64 },

  #[error("must have exactly {expected} characters, got {actual}")]
  LengthMismatch { expected: u32, actual: usize },

  #[error("must contain digits only")]
  NotNumeric,

  #[error("is not a valid date (expected YYYY-MM-DD)")]
  InvalidDate,

  #[error("cannot be in the future")]
  FutureDate,

  #[error("must be \"M\" or \"F\"")]
  InvalidSex,
}

impl Violation {
  /// Stable machine-readable code.
  pub fn code(&self) -> &'static str {
    match self {
      Violation::Required => "required",
      Violation::TooLong { .. } => "too_long",
      Violation::UnknownDocumentType { .. } => "unknown_document_type",
      Violation::LengthMismatch { .. } => "length_mismatch",
      Violation::NotNumeric => "not_numeric",
      Violation::InvalidDate => "invalid_date",
      Violation::FutureDate => "future_date",
      Violation::InvalidSex => "invalid_sex",
    }
  }
}

/// A violation tagged with the JSON name of the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {violation}")]
pub struct FieldError {
  pub field:     &'static str,
  pub violation: Violation,
}

/// All violations found in one candidate. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub(crate) Vec<FieldError>);

impl ValidationErrors {
  /// Wrap `errors`, returning `None` if there are none.
  pub fn from_vec(errors: Vec<FieldError>) -> Option<Self> {
    (!errors.is_empty()).then_some(Self(errors))
  }

  pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
    self.0.iter()
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn for_field<'a>(
    &'a self,
    field: &'a str,
  ) -> impl Iterator<Item = &'a Violation> + 'a {
    self.0.iter().filter(move |e| e.field == field).map(|e| &e.violation)
  }

  /// The referenced document type id, if the candidate was rejected because
  /// that type does not exist.
  pub fn unknown_document_type(&self) -> Option<i64> {
    self.0.iter().find_map(|e| match e.violation {
      Violation::UnknownDocumentType { id } => Some(id),
      _ => None,
    })
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, e) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{e}")?;
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
  type Item = FieldError;
  type IntoIter = std::vec::IntoIter<FieldError>;

  fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Outcome of a failed [`BeneficiaryService`](crate::BeneficiaryService)
/// operation. `E` is the store backend's error type.
#[derive(Debug, Error)]
pub enum ServiceError<E>
where
  E: std::error::Error + 'static,
{
  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("beneficiary {0} not found")]
  NotFound(i64),

  /// The store rejected a structurally valid write. Carries the backend's
  /// own message.
  #[error("write rejected: {0}")]
  Conflict(String),

  #[error("beneficiary {0} was created but could not be read back")]
  Vanished(i64),

  #[error("store error: {0}")]
  Store(#[source] E),
}
