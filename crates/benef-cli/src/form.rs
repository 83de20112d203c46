//! Turning command-line flags into a [`BeneficiaryInput`].
//!
//! Mirrors the web form: a country narrows the document types on offer, the
//! chosen type is matched by id or abbreviation, and the candidate is run
//! through the shared validator before anything is sent.

use anyhow::{Result, anyhow, bail};
use benef_core::{
  beneficiary::{BeneficiaryInput, BeneficiaryView},
  document_type::{DocumentType, countries, types_for_country},
  validate::validate_today,
};
use clap::Args;

/// Beneficiary fields accepted by `create` and `update`.
#[derive(Args, Debug, Default, Clone)]
pub struct FormArgs {
  #[arg(long)]
  pub given_names:     Option<String>,
  #[arg(long)]
  pub surnames:        Option<String>,
  /// Document type id or abbreviation (e.g. `1` or `DNI`).
  #[arg(long)]
  pub document_type:   Option<String>,
  #[arg(long)]
  pub document_number: Option<String>,
  /// `YYYY-MM-DD`.
  #[arg(long)]
  pub birth_date:      Option<String>,
  /// `M` or `F`.
  #[arg(long)]
  pub sex:             Option<String>,
  /// Country the document type must belong to.
  #[arg(long)]
  pub country:         Option<String>,
}

fn required(value: Option<String>, flag: &str) -> Result<String> {
  value.ok_or_else(|| anyhow!("missing required flag --{flag}"))
}

/// Build a create candidate; every field flag must be present.
pub fn create_input(catalog: &[DocumentType], form: FormArgs) -> Result<BeneficiaryInput> {
  let selector = required(form.document_type, "document-type")?;
  let document_type = resolve_document_type(catalog, &selector, form.country.as_deref())?;
  Ok(BeneficiaryInput {
    given_names:      required(form.given_names, "given-names")?,
    surnames:         required(form.surnames, "surnames")?,
    document_type_id: document_type.id,
    document_number:  required(form.document_number, "document-number")?,
    birth_date:       required(form.birth_date, "birth-date")?,
    sex:              required(form.sex, "sex")?,
  })
}

/// Build an update candidate: flags that are present replace the fields of
/// `existing`, the rest are carried over.
pub fn update_input(
  existing: &BeneficiaryView,
  catalog: &[DocumentType],
  form: FormArgs,
) -> Result<BeneficiaryInput> {
  let mut input = BeneficiaryInput::from(existing);

  if form.document_type.is_some() || form.country.is_some() {
    let selector = form
      .document_type
      .unwrap_or_else(|| input.document_type_id.to_string());
    input.document_type_id =
      resolve_document_type(catalog, &selector, form.country.as_deref())?.id;
  }
  if let Some(v) = form.given_names {
    input.given_names = v;
  }
  if let Some(v) = form.surnames {
    input.surnames = v;
  }
  if let Some(v) = form.document_number {
    input.document_number = v;
  }
  if let Some(v) = form.birth_date {
    input.birth_date = v;
  }
  if let Some(v) = form.sex {
    input.sex = v;
  }
  Ok(input)
}

// ─── Document-type selection ──────────────────────────────────────────────────

/// The catalog entries for `country`, matched case-insensitively.
pub fn types_in_country<'a>(catalog: &'a [DocumentType], country: &str) -> Result<Vec<&'a DocumentType>> {
  let wanted = country.trim().to_lowercase();
  let known = countries(catalog);
  let Some(canonical) = known.iter().copied().find(|c| c.to_lowercase() == wanted) else {
    bail!("no document types for country {country:?}; known countries: {}", known.join(", "));
  };
  Ok(types_for_country(catalog, canonical).collect())
}

/// Pick the document type named by `selector` (an id or an abbreviation),
/// restricted to `country` when one is given.
pub fn resolve_document_type<'a>(
  catalog: &'a [DocumentType],
  selector: &str,
  country: Option<&str>,
) -> Result<&'a DocumentType> {
  let candidates = match country {
    Some(c) => types_in_country(catalog, c)?,
    None => catalog.iter().collect(),
  };
  let selector = selector.trim();
  let scope = country.map(|c| format!(" for {c}")).unwrap_or_default();

  if let Ok(id) = selector.parse::<i64>() {
    return candidates
      .into_iter()
      .find(|t| t.id == id)
      .ok_or_else(|| anyhow!("document type {id} is not offered{scope}"));
  }

  let mut matches = candidates
    .into_iter()
    .filter(|t| t.abbreviation.eq_ignore_ascii_case(selector));
  match (matches.next(), matches.next()) {
    (Some(t), None) => Ok(t),
    (None, _) => bail!("unknown document type {selector:?}{scope}"),
    (Some(_), Some(_)) => bail!("document type {selector:?} exists in several countries; pass --country"),
  }
}

// ─── Local validation ─────────────────────────────────────────────────────────

/// Run the shared validator against the fetched catalog so obvious mistakes
/// never reach the server.
pub fn precheck(input: &BeneficiaryInput, catalog: &[DocumentType]) -> Result<()> {
  let errors = match validate_today(input, |id| catalog.iter().find(|t| t.id == id).cloned()) {
    Ok(_) => return Ok(()),
    Err(errors) => errors,
  };
  let mut message = String::from("input rejected:");
  for e in errors.iter() {
    message.push_str(&format!("\n  {}: {}", e.field, e.violation));
  }
  Err(anyhow!(message))
}

#[cfg(test)]
mod tests {
  use benef_core::beneficiary::{Beneficiary, Sex};
  use chrono::NaiveDate;

  use super::*;

  fn doc(id: i64, abbreviation: &str, country: &str, length: u32, numeric_only: bool) -> DocumentType {
    DocumentType {
      id,
      name: format!("{abbreviation} document"),
      abbreviation: abbreviation.into(),
      country: country.into(),
      length,
      numeric_only,
      active: true,
    }
  }

  fn catalog() -> Vec<DocumentType> {
    vec![
      doc(1, "DNI", "Perú", 8, true),
      doc(3, "PAS", "Perú", 12, false),
      doc(5, "CC", "Colombia", 10, true),
      doc(7, "PAS", "Chile", 9, false),
    ]
  }

  fn full_form() -> FormArgs {
    FormArgs {
      given_names:     Some("Ana".into()),
      surnames:        Some("Quispe".into()),
      document_type:   Some("dni".into()),
      document_number: Some("12345678".into()),
      birth_date:      Some("1990-05-04".into()),
      sex:             Some("F".into()),
      country:         None,
    }
  }

  fn existing() -> BeneficiaryView {
    BeneficiaryView {
      beneficiary:                Beneficiary {
        id:               9,
        given_names:      "Luis".into(),
        surnames:         "Rojas".into(),
        document_type_id: 1,
        document_number:  "87654321".into(),
        birth_date:       NaiveDate::from_ymd_opt(1980, 1, 2).unwrap(),
        sex:              Sex::M,
      },
      document_type_name:         Some("DNI document".into()),
      document_type_abbreviation: Some("DNI".into()),
      country:                    Some("Perú".into()),
    }
  }

  #[test]
  fn resolves_by_id_and_abbreviation() {
    let c = catalog();
    assert_eq!(resolve_document_type(&c, "5", None).unwrap().id, 5);
    assert_eq!(resolve_document_type(&c, " dni ", None).unwrap().id, 1);
  }

  #[test]
  fn shared_abbreviation_needs_country() {
    let c = catalog();
    let err = resolve_document_type(&c, "PAS", None).unwrap_err();
    assert!(err.to_string().contains("--country"), "{err}");
    assert_eq!(resolve_document_type(&c, "PAS", Some("chile")).unwrap().id, 7);
  }

  #[test]
  fn country_must_own_the_type() {
    let c = catalog();
    assert!(resolve_document_type(&c, "1", Some("Colombia")).is_err());
    assert!(resolve_document_type(&c, "DNI", Some("Atlantis")).is_err());
  }

  #[test]
  fn create_requires_every_field() {
    let c = catalog();
    let input = create_input(&c, full_form()).unwrap();
    assert_eq!(input.document_type_id, 1);
    assert_eq!(input.given_names, "Ana");

    let form = FormArgs { sex: None, ..full_form() };
    let err = create_input(&c, form).unwrap_err();
    assert!(err.to_string().contains("--sex"), "{err}");
  }

  #[test]
  fn update_keeps_unset_fields() {
    let c = catalog();
    let form = FormArgs { surnames: Some("Rojas Vega".into()), ..FormArgs::default() };
    let input = update_input(&existing(), &c, form).unwrap();
    assert_eq!(input.surnames, "Rojas Vega");
    assert_eq!(input.given_names, "Luis");
    assert_eq!(input.document_type_id, 1);
    assert_eq!(input.birth_date, "1980-01-02");
    assert_eq!(input.sex, "M");
  }

  #[test]
  fn update_country_alone_checks_current_type() {
    let c = catalog();
    let form = FormArgs { country: Some("Colombia".into()), ..FormArgs::default() };
    assert!(update_input(&existing(), &c, form).is_err());
  }

  #[test]
  fn precheck_reports_each_field() {
    let c = catalog();
    let mut input = create_input(&c, full_form()).unwrap();
    assert!(precheck(&input, &c).is_ok());

    input.document_number = "1234".into();
    input.sex = "X".into();
    let msg = precheck(&input, &c).unwrap_err().to_string();
    assert!(msg.contains("documentNumber"), "{msg}");
    assert!(msg.contains("sex"), "{msg}");
  }

  #[test]
  fn types_in_country_is_case_insensitive() {
    let c = catalog();
    let ids: Vec<i64> = types_in_country(&c, "PERÚ").unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 3]);
  }
}
