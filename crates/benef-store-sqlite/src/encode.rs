//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` text, booleans as `0`/`1` integers and
//! sex as a one-letter code.

use benef_core::{
  beneficiary::{Beneficiary, BeneficiaryView, Sex},
  document_type::DocumentType,
};
use chrono::NaiveDate;

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Sex ─────────────────────────────────────────────────────────────────────

pub fn encode_sex(s: Sex) -> &'static str { s.as_str() }

pub fn decode_sex(s: &str) -> Result<Sex> {
  match s {
    "M" => Ok(Sex::M),
    "F" => Ok(Sex::F),
    other => Err(Error::InvalidColumn { column: "sex", value: other.to_owned() }),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const DOCUMENT_TYPE_COLUMNS: &str =
  "id, name, abbreviation, country, length, numeric_only, active";

/// Raw values read directly from a `document_types` row.
pub struct RawDocumentType {
  pub id:           i64,
  pub name:         String,
  pub abbreviation: String,
  pub country:      String,
  pub length:       i64,
  pub numeric_only: bool,
  pub active:       bool,
}

impl RawDocumentType {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawDocumentType {
      id:           row.get(0)?,
      name:         row.get(1)?,
      abbreviation: row.get(2)?,
      country:      row.get(3)?,
      length:       row.get(4)?,
      numeric_only: row.get(5)?,
      active:       row.get(6)?,
    })
  }

  pub fn into_document_type(self) -> Result<DocumentType> {
    let length = u32::try_from(self.length).map_err(|_| Error::InvalidColumn {
      column: "length",
      value:  self.length.to_string(),
    })?;
    Ok(DocumentType {
      id: self.id,
      name: self.name,
      abbreviation: self.abbreviation,
      country: self.country,
      length,
      numeric_only: self.numeric_only,
      active: self.active,
    })
  }
}

/// Selected by both the list and single-record paths; the document-type
/// columns come from a `LEFT JOIN` and are `NULL` when the join misses.
pub const VIEW_SELECT: &str = "
SELECT
    b.id, b.given_names, b.surnames, b.document_type_id,
    b.document_number, b.birth_date, b.sex,
    d.name         AS document_type_name,
    d.abbreviation AS document_type_abbreviation,
    d.country      AS country
FROM beneficiaries b
LEFT JOIN document_types d ON d.id = b.document_type_id";

/// Raw values read from a `beneficiaries` row joined with `document_types`.
pub struct RawBeneficiaryView {
  pub id:                         i64,
  pub given_names:                String,
  pub surnames:                   String,
  pub document_type_id:           i64,
  pub document_number:            String,
  pub birth_date:                 String,
  pub sex:                        String,
  pub document_type_name:         Option<String>,
  pub document_type_abbreviation: Option<String>,
  pub country:                    Option<String>,
}

impl RawBeneficiaryView {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawBeneficiaryView {
      id:                         row.get(0)?,
      given_names:                row.get(1)?,
      surnames:                   row.get(2)?,
      document_type_id:           row.get(3)?,
      document_number:            row.get(4)?,
      birth_date:                 row.get(5)?,
      sex:                        row.get(6)?,
      document_type_name:         row.get(7)?,
      document_type_abbreviation: row.get(8)?,
      country:                    row.get(9)?,
    })
  }

  pub fn into_view(self) -> Result<BeneficiaryView> {
    Ok(BeneficiaryView {
      beneficiary:                Beneficiary {
        id:               self.id,
        given_names:      self.given_names,
        surnames:         self.surnames,
        document_type_id: self.document_type_id,
        document_number:  self.document_number,
        birth_date:       decode_date(&self.birth_date)?,
        sex:              decode_sex(&self.sex)?,
      },
      document_type_name:         self.document_type_name,
      document_type_abbreviation: self.document_type_abbreviation,
      country:                    self.country,
    })
  }
}
