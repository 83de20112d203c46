//! Terminal tables for API results.

use benef_core::{beneficiary::BeneficiaryView, document_type::DocumentType};
use comfy_table::{
  ContentArrangement, Table,
  modifiers::UTF8_ROUND_CORNERS,
  presets::UTF8_FULL_CONDENSED,
};

fn apply_table_style(table: &mut Table) {
  table
    .load_preset(UTF8_FULL_CONDENSED)
    .apply_modifier(UTF8_ROUND_CORNERS)
    .set_content_arrangement(ContentArrangement::Dynamic);
}

fn or_dash(value: Option<&str>) -> String {
  value.unwrap_or("-").to_owned()
}

fn document_cell(v: &BeneficiaryView) -> String {
  format!(
    "{} {}",
    v.document_type_abbreviation.as_deref().unwrap_or("?"),
    v.beneficiary.document_number
  )
}

pub fn beneficiaries_table(rows: &[&BeneficiaryView]) -> Table {
  let mut table = Table::new();
  table.set_header(vec!["Id", "Name", "Document", "Country", "Birth date", "Sex"]);
  apply_table_style(&mut table);
  for v in rows {
    let b = &v.beneficiary;
    table.add_row(vec![
      b.id.to_string(),
      b.full_name(),
      document_cell(v),
      or_dash(v.country.as_deref()),
      b.birth_date.to_string(),
      b.sex.to_string(),
    ]);
  }
  table
}

pub fn beneficiary_detail(v: &BeneficiaryView) -> Table {
  let b = &v.beneficiary;
  let mut table = Table::new();
  apply_table_style(&mut table);
  table.add_row(vec!["Id".to_owned(), b.id.to_string()]);
  table.add_row(vec!["Given names".to_owned(), b.given_names.clone()]);
  table.add_row(vec!["Surnames".to_owned(), b.surnames.clone()]);
  table.add_row(vec!["Document type".to_owned(), or_dash(v.document_type_name.as_deref())]);
  table.add_row(vec!["Document".to_owned(), document_cell(v)]);
  table.add_row(vec!["Country".to_owned(), or_dash(v.country.as_deref())]);
  table.add_row(vec!["Birth date".to_owned(), b.birth_date.to_string()]);
  table.add_row(vec!["Sex".to_owned(), b.sex.to_string()]);
  table
}

pub fn document_types_table(types: &[&DocumentType]) -> Table {
  let mut table = Table::new();
  table.set_header(vec!["Id", "Country", "Code", "Name", "Length", "Digits only"]);
  apply_table_style(&mut table);
  for t in types {
    table.add_row(vec![
      t.id.to_string(),
      t.country.clone(),
      t.abbreviation.clone(),
      t.name.clone(),
      t.length.to_string(),
      if t.numeric_only { "yes" } else { "no" }.to_owned(),
    ]);
  }
  table
}
