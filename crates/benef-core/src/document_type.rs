//! Identity-document types — reference data describing the shape of a
//! country-specific document number.
//!
//! The catalog is administered outside this system; everything here treats it
//! as read-only.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One entry of the document-type catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentType {
  pub id:           i64,
  /// Display label, e.g. "Documento Nacional de Identidad".
  pub name:         String,
  /// Short display code, e.g. "DNI".
  pub abbreviation: String,
  pub country:      String,
  /// Exact number of characters a document number of this type must have.
  pub length:       u32,
  /// If set, document numbers may only contain decimal digits.
  pub numeric_only: bool,
  /// Inactive types are hidden from clients but may still be referenced by
  /// existing beneficiaries.
  pub active:       bool,
}

impl DocumentType {
  /// Whether an already-normalised document `number` has the shape this type
  /// requires.
  pub fn accepts(&self, number: &str) -> bool {
    self.has_length(number) && (!self.numeric_only || is_numeric(number))
  }

  pub(crate) fn has_length(&self, number: &str) -> bool {
    number.chars().count() == self.length as usize
  }

  /// Label used by selection lists: `"Perú - DNI (Documento Nacional de Identidad)"`.
  pub fn label(&self) -> String {
    format!("{} - {} ({})", self.country, self.abbreviation, self.name)
  }
}

pub(crate) fn is_numeric(s: &str) -> bool {
  !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

// ─── Cascading selection ─────────────────────────────────────────────────────

/// Distinct countries present in `types`, sorted.
pub fn countries(types: &[DocumentType]) -> Vec<&str> {
  types
    .iter()
    .map(|t| t.country.as_str())
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect()
}

/// The document types offered once `country` has been selected.
pub fn types_for_country<'a>(
  types: &'a [DocumentType],
  country: &'a str,
) -> impl Iterator<Item = &'a DocumentType> + 'a {
  types.iter().filter(move |t| t.country == country)
}

#[cfg(test)]
pub(crate) fn dni() -> DocumentType {
  DocumentType {
    id:           1,
    name:         "Documento Nacional de Identidad".into(),
    abbreviation: "DNI".into(),
    country:      "PE".into(),
    length:       8,
    numeric_only: true,
    active:       true,
  }
}
