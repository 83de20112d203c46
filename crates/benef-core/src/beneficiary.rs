//! Beneficiary — a person record attributed to an identity document.
//!
//! Three shapes exist:
//!
//! - [`BeneficiaryInput`] is what a client submits, unvalidated.
//! - [`NewBeneficiary`] is the validator's normalised output and the only
//!   shape a store accepts for writes.
//! - [`BeneficiaryView`] is the read projection, joined with the display
//!   fields of the referenced document type.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Sex ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
  M,
  F,
}

impl Sex {
  /// Parse a one-letter code, ignoring surrounding whitespace and case.
  pub fn parse(s: &str) -> Option<Self> {
    match s.trim() {
      "M" | "m" => Some(Sex::M),
      "F" | "f" => Some(Sex::F),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Sex::M => "M",
      Sex::F => "F",
    }
  }
}

impl fmt::Display for Sex {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// A create or update candidate as submitted by a client.
///
/// `birth_date` is kept as text so that an unparseable date is reported as a
/// field error rather than a deserialisation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryInput {
  pub given_names:      String,
  pub surnames:         String,
  pub document_type_id: i64,
  pub document_number:  String,
  pub birth_date:       String,
  pub sex:              String,
}

impl From<&BeneficiaryView> for BeneficiaryInput {
  /// Pre-fill an edit form from an existing record.
  fn from(v: &BeneficiaryView) -> Self {
    let b = &v.beneficiary;
    BeneficiaryInput {
      given_names:      b.given_names.clone(),
      surnames:         b.surnames.clone(),
      document_type_id: b.document_type_id,
      document_number:  b.document_number.clone(),
      birth_date:       b.birth_date.format("%Y-%m-%d").to_string(),
      sex:              b.sex.as_str().to_owned(),
    }
  }
}

// ─── Normalised write model ──────────────────────────────────────────────────

/// A validated candidate: names trimmed, document number trimmed and
/// uppercased, sex normalised. Produced only by
/// [`validate`](crate::validate::validate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBeneficiary {
  pub given_names:      String,
  pub surnames:         String,
  pub document_type_id: i64,
  pub document_number:  String,
  pub birth_date:       NaiveDate,
  pub sex:              Sex,
}

// ─── Persisted record and read projection ────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiary {
  pub id:               i64,
  pub given_names:      String,
  pub surnames:         String,
  pub document_type_id: i64,
  pub document_number:  String,
  pub birth_date:       NaiveDate,
  pub sex:              Sex,
}

impl Beneficiary {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.given_names, self.surnames)
  }
}

/// A beneficiary plus the display fields of its document type.
///
/// The document-type fields are `None` whenever the join finds nothing; this
/// holds for both the list and the single-record paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryView {
  #[serde(flatten)]
  pub beneficiary:                Beneficiary,
  pub document_type_name:         Option<String>,
  pub document_type_abbreviation: Option<String>,
  pub country:                    Option<String>,
}

impl BeneficiaryView {
  /// Case-insensitive substring match over given names, surnames and document
  /// number. An empty (or blank) term matches everything.
  pub fn matches(&self, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
      return true;
    }
    let b = &self.beneficiary;
    [&b.given_names, &b.surnames, &b.document_number]
      .iter()
      .any(|field| field.to_lowercase().contains(&term))
  }
}
