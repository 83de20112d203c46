//! Field and cross-field rules for beneficiary candidates.
//!
//! [`validate`] is pure: the document type is supplied through a resolver and
//! "today" is a parameter, so every rule can be exercised without a store or a
//! clock. All rules run on every call and their failures are collected.

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::{
  beneficiary::{BeneficiaryInput, NewBeneficiary, Sex},
  document_type::{DocumentType, is_numeric},
  error::{FieldError, ValidationErrors, Violation},
};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DOCUMENT_NUMBER_LEN: usize = 20;

/// JSON field names, used to tag violations.
pub mod field {
  pub const GIVEN_NAMES: &str = "givenNames";
  pub const SURNAMES: &str = "surnames";
  pub const DOCUMENT_TYPE_ID: &str = "documentTypeId";
  pub const DOCUMENT_NUMBER: &str = "documentNumber";
  pub const BIRTH_DATE: &str = "birthDate";
  pub const SEX: &str = "sex";
}

/// Validate and normalise `input`.
///
/// `resolve` maps `input.document_type_id` to its catalog entry; `None` is
/// reported as [`Violation::UnknownDocumentType`]. Birth dates strictly after
/// `today` are rejected.
pub fn validate<F>(
  input: &BeneficiaryInput,
  today: NaiveDate,
  resolve: F,
) -> Result<NewBeneficiary, ValidationErrors>
where
  F: FnOnce(i64) -> Option<DocumentType>,
{
  let mut errors = Vec::new();

  let given_names = check_name(&mut errors, field::GIVEN_NAMES, &input.given_names);
  let surnames = check_name(&mut errors, field::SURNAMES, &input.surnames);

  let document_type = resolve(input.document_type_id);
  if document_type.is_none() {
    errors.push(FieldError {
      field:     field::DOCUMENT_TYPE_ID,
      violation: Violation::UnknownDocumentType { id: input.document_type_id },
    });
  }

  let document_number = input.document_number.trim().to_uppercase();
  check_document_number(&mut errors, &document_number, document_type.as_ref());

  let birth_date = check_birth_date(&mut errors, &input.birth_date, today);
  let sex = check_sex(&mut errors, &input.sex);

  match (birth_date, sex) {
    (Some(birth_date), Some(sex)) if errors.is_empty() => Ok(NewBeneficiary {
      given_names,
      surnames,
      document_type_id: input.document_type_id,
      document_number,
      birth_date,
      sex,
    }),
    // A missing value always records a violation, so `errors` is non-empty.
    _ => Err(ValidationErrors(errors)),
  }
}

/// [`validate`] against the local clock.
pub fn validate_today<F>(
  input: &BeneficiaryInput,
  resolve: F,
) -> Result<NewBeneficiary, ValidationErrors>
where
  F: FnOnce(i64) -> Option<DocumentType>,
{
  validate(input, Local::now().date_naive(), resolve)
}

/// Parse a `YYYY-MM-DD` date. A `YYYY-MM-DDTHH:MM:SS` timestamp is accepted
/// and truncated to its date.
pub fn parse_birth_date(s: &str) -> Option<NaiveDate> {
  let s = s.trim();
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
    .ok()
}

// ─── Rules ───────────────────────────────────────────────────────────────────

fn check_name(errors: &mut Vec<FieldError>, field: &'static str, raw: &str) -> String {
  let value = raw.trim();
  if value.is_empty() {
    errors.push(FieldError { field, violation: Violation::Required });
  } else if value.chars().count() > MAX_NAME_LEN {
    errors.push(FieldError { field, violation: Violation::TooLong { max: MAX_NAME_LEN } });
  }
  value.to_owned()
}

fn check_document_number(
  errors: &mut Vec<FieldError>,
  number: &str,
  document_type: Option<&DocumentType>,
) {
  let field = field::DOCUMENT_NUMBER;
  if number.is_empty() {
    errors.push(FieldError { field, violation: Violation::Required });
    return;
  }

  let actual = number.chars().count();
  if actual > MAX_DOCUMENT_NUMBER_LEN {
    errors.push(FieldError {
      field,
      violation: Violation::TooLong { max: MAX_DOCUMENT_NUMBER_LEN },
    });
  }

  let Some(t) = document_type else { return };

  if t.numeric_only && !is_numeric(number) {
    errors.push(FieldError { field, violation: Violation::NotNumeric });
  }
  if !t.has_length(number) {
    errors.push(FieldError {
      field,
      violation: Violation::LengthMismatch { expected: t.length, actual },
    });
  }
}

fn check_birth_date(
  errors: &mut Vec<FieldError>,
  raw: &str,
  today: NaiveDate,
) -> Option<NaiveDate> {
  let field = field::BIRTH_DATE;
  if raw.trim().is_empty() {
    errors.push(FieldError { field, violation: Violation::Required });
    return None;
  }
  match parse_birth_date(raw) {
    None => {
      errors.push(FieldError { field, violation: Violation::InvalidDate });
      None
    }
    Some(date) if date > today => {
      errors.push(FieldError { field, violation: Violation::FutureDate });
      None
    }
    Some(date) => Some(date),
  }
}

fn check_sex(errors: &mut Vec<FieldError>, raw: &str) -> Option<Sex> {
  let field = field::SEX;
  if raw.trim().is_empty() {
    errors.push(FieldError { field, violation: Violation::Required });
    return None;
  }
  let sex = Sex::parse(raw);
  if sex.is_none() {
    errors.push(FieldError { field, violation: Violation::InvalidSex });
  }
  sex
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::*;
  use crate::document_type::dni;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 6, 15).unwrap() }

  fn input() -> BeneficiaryInput {
    BeneficiaryInput {
      given_names:      "  Rosa Elena ".into(),
      surnames:         "Mamani Condori  ".into(),
      document_type_id: 1,
      document_number:  " 12345678 ".into(),
      birth_date:       "2001-05-30".into(),
      sex:              " f".into(),
    }
  }

  fn run(input: &BeneficiaryInput) -> Result<NewBeneficiary, ValidationErrors> {
    validate(input, today(), |id| (id == 1).then(dni))
  }

  fn violations(errors: &ValidationErrors, field: &str) -> Vec<Violation> {
    errors.for_field(field).cloned().collect()
  }

  #[test]
  fn valid_input_is_normalised() {
    let ok = run(&input()).unwrap();
    assert_eq!(ok.given_names, "Rosa Elena");
    assert_eq!(ok.surnames, "Mamani Condori");
    assert_eq!(ok.document_number, "12345678");
    assert_eq!(ok.sex, Sex::F);
    assert_eq!(ok.birth_date, NaiveDate::from_ymd_opt(2001, 5, 30).unwrap());
  }

  #[test]
  fn document_number_is_uppercased() {
    let mut t = dni();
    t.numeric_only = false;
    t.length = 9;
    let mut i = input();
    i.document_number = "ab1234567".into();
    let ok = validate(&i, today(), |_| Some(t)).unwrap();
    assert_eq!(ok.document_number, "AB1234567");
  }

  #[test]
  fn seven_digits_for_an_eight_digit_type_is_a_length_mismatch() {
    let mut i = input();
    i.document_number = "1234567".into();
    let errors = run(&i).unwrap_err();
    assert_eq!(
      violations(&errors, field::DOCUMENT_NUMBER),
      vec![Violation::LengthMismatch { expected: 8, actual: 7 }]
    );
  }

  #[test]
  fn letters_in_numeric_type_are_rejected() {
    let mut i = input();
    i.document_number = "1234567X".into();
    let errors = run(&i).unwrap_err();
    assert_eq!(violations(&errors, field::DOCUMENT_NUMBER), vec![Violation::NotNumeric]);
  }

  #[test]
  fn unknown_type_is_reported() {
    let mut i = input();
    i.document_type_id = 999;
    let errors = run(&i).unwrap_err();
    assert_eq!(errors.unknown_document_type(), Some(999));
    assert_eq!(errors.len(), 1);
  }

  #[test]
  fn all_failures_are_collected() {
    let i = BeneficiaryInput {
      given_names:      "   ".into(),
      surnames:         "x".repeat(101),
      document_type_id: 1,
      document_number:  "".into(),
      birth_date:       "30/05/2001".into(),
      sex:              "X".into(),
    };
    let errors = run(&i).unwrap_err();
    assert_eq!(violations(&errors, field::GIVEN_NAMES), vec![Violation::Required]);
    assert_eq!(
      violations(&errors, field::SURNAMES),
      vec![Violation::TooLong { max: MAX_NAME_LEN }]
    );
    assert_eq!(violations(&errors, field::DOCUMENT_NUMBER), vec![Violation::Required]);
    assert_eq!(violations(&errors, field::BIRTH_DATE), vec![Violation::InvalidDate]);
    assert_eq!(violations(&errors, field::SEX), vec![Violation::InvalidSex]);
  }

  #[test]
  fn name_of_exactly_max_length_is_accepted() {
    let mut i = input();
    i.given_names = "a".repeat(MAX_NAME_LEN);
    assert!(run(&i).is_ok());
  }

  #[test]
  fn oversized_document_number_is_too_long() {
    let mut i = input();
    i.document_number = "1".repeat(21);
    let errors = run(&i).unwrap_err();
    assert!(
      errors
        .for_field(field::DOCUMENT_NUMBER)
        .any(|v| *v == Violation::TooLong { max: MAX_DOCUMENT_NUMBER_LEN })
    );
  }

  #[test]
  fn birth_date_today_is_allowed_tomorrow_is_not() {
    let mut i = input();
    i.birth_date = today().to_string();
    assert!(run(&i).is_ok());

    i.birth_date = today().succ_opt().unwrap().to_string();
    let errors = run(&i).unwrap_err();
    assert_eq!(violations(&errors, field::BIRTH_DATE), vec![Violation::FutureDate]);
  }

  #[test]
  fn timestamp_birth_date_is_truncated() {
    assert_eq!(
      parse_birth_date("2001-05-30T00:00:00"),
      NaiveDate::from_ymd_opt(2001, 5, 30)
    );
    assert_eq!(
      parse_birth_date("2001-05-30T13:45:10.250"),
      NaiveDate::from_ymd_opt(2001, 5, 30)
    );
    assert_eq!(parse_birth_date("2001-02-30"), None);
  }

  #[test]
  fn blank_sex_is_required_not_invalid() {
    let mut i = input();
    i.sex = " ".into();
    let errors = run(&i).unwrap_err();
    assert_eq!(violations(&errors, field::SEX), vec![Violation::Required]);
  }

  // ─── Properties ────────────────────────────────────────────────────────────

  fn arb_document_type() -> impl Strategy<Value = DocumentType> {
    (1u32..=20, any::<bool>()).prop_map(|(length, numeric_only)| DocumentType {
      id: 1,
      name: "Test".into(),
      abbreviation: "T".into(),
      country: "XX".into(),
      length,
      numeric_only,
      active: true,
    })
  }

  proptest! {
    #[test]
    fn document_number_accepted_iff_shape_matches(
      t in arb_document_type(),
      number in "[0-9A-Z]{1,20}",
    ) {
      let mut i = input();
      i.document_number = number.clone();
      let expected = number.chars().count() == t.length as usize
        && (!t.numeric_only || number.chars().all(|c| c.is_ascii_digit()));
      prop_assert_eq!(t.accepts(&number), expected);
      let resolved = t.clone();
      let result = validate(&i, today(), move |_| Some(resolved));
      prop_assert_eq!(result.is_ok(), expected);
      if let Ok(ok) = result {
        prop_assert_eq!(ok.document_number.chars().count(), t.length as usize);
      }
    }

    #[test]
    fn unknown_type_always_fails(
      id in 2i64..10_000,
      given in ".{0,120}",
      number in ".{0,25}",
      sex in ".{0,3}",
    ) {
      let i = BeneficiaryInput {
        given_names: given,
        surnames: "Torres".into(),
        document_type_id: id,
        document_number: number,
        birth_date: "1999-01-01".into(),
        sex,
      };
      let errors = run(&i).unwrap_err();
      prop_assert_eq!(errors.unknown_document_type(), Some(id));
    }
  }
}
