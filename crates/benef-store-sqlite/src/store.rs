//! [`SqliteStore`] — the SQLite implementation of [`BeneficiaryStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use benef_core::{
  beneficiary::{BeneficiaryView, NewBeneficiary},
  document_type::DocumentType,
  store::{BeneficiaryStore, DocumentTypeCatalog},
};

use crate::{
  Error, Result,
  encode::{
    DOCUMENT_TYPE_COLUMNS, RawBeneficiaryView, RawDocumentType, VIEW_SELECT, encode_date,
    encode_sex,
  },
  schema::{SCHEMA, SEED_DOCUMENT_TYPES},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A beneficiary store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every trait
/// method runs as one closure on the connection thread and holds nothing
/// between calls.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Catalog administration ──────────────────────────────────────────────

  /// Insert the default document types that are not already present.
  /// Returns the number of rows added.
  pub async fn seed_document_types(&self) -> Result<usize> {
    let added = self
      .conn
      .call(|conn| {
        let count = |conn: &rusqlite::Connection| -> rusqlite::Result<i64> {
          conn.query_row("SELECT COUNT(*) FROM document_types", [], |r| r.get(0))
        };
        let before = count(conn)?;
        conn.execute_batch(SEED_DOCUMENT_TYPES)?;
        Ok(count(conn)? - before)
      })
      .await?;
    tracing::info!(added, "seeded document types");
    // `INSERT OR IGNORE` only adds rows, so the difference is never negative.
    Ok(added.max(0) as usize)
  }

  /// Insert or replace a catalog entry with a caller-chosen id.
  pub async fn upsert_document_type(&self, t: DocumentType) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO document_types
             (id, name, abbreviation, country, length, numeric_only, active)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT (id) DO UPDATE SET
             name = excluded.name,
             abbreviation = excluded.abbreviation,
             country = excluded.country,
             length = excluded.length,
             numeric_only = excluded.numeric_only,
             active = excluded.active",
          rusqlite::params![
            t.id,
            t.name,
            t.abbreviation,
            t.country,
            t.length,
            t.numeric_only,
            t.active,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Activate or deactivate a document type. Returns `false` if it does not
  /// exist.
  pub async fn set_document_type_active(&self, id: i64, active: bool) -> Result<bool> {
    let rows = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE document_types SET active = ?2 WHERE id = ?1",
          rusqlite::params![id, active],
        )?)
      })
      .await?;
    Ok(rows == 1)
  }
}

/// SQLite's message if `e` is a constraint violation.
fn constraint_violation(e: &rusqlite::Error) -> Option<String> {
  match e {
    rusqlite::Error::SqliteFailure(err, msg)
      if err.code == rusqlite::ErrorCode::ConstraintViolation =>
    {
      Some(msg.clone().unwrap_or_else(|| err.to_string()))
    }
    _ => None,
  }
}

/// Split a write result into "constraint violated" (inner `Err`) and every
/// other database failure (outer `Err`).
fn classify<T>(
  result: rusqlite::Result<T>,
) -> tokio_rusqlite::Result<std::result::Result<T, String>> {
  match result {
    Ok(v) => Ok(Ok(v)),
    Err(e) => match constraint_violation(&e) {
      Some(msg) => Ok(Err(msg)),
      None => Err(e.into()),
    },
  }
}

/// Owned column values for an insert or update.
struct WriteParams {
  given_names:      String,
  surnames:         String,
  document_type_id: i64,
  document_number:  String,
  birth_date:       String,
  sex:              &'static str,
}

impl From<NewBeneficiary> for WriteParams {
  fn from(b: NewBeneficiary) -> Self {
    WriteParams {
      given_names:      b.given_names,
      surnames:         b.surnames,
      document_type_id: b.document_type_id,
      document_number:  b.document_number,
      birth_date:       encode_date(b.birth_date),
      sex:              encode_sex(b.sex),
    }
  }
}

// ─── DocumentTypeCatalog impl ────────────────────────────────────────────────

impl DocumentTypeCatalog for SqliteStore {
  type Error = Error;

  async fn list_active(&self) -> Result<Vec<DocumentType>> {
    let raws: Vec<RawDocumentType> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {DOCUMENT_TYPE_COLUMNS} FROM document_types WHERE active = 1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map([], RawDocumentType::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocumentType::into_document_type).collect()
  }

  async fn find_document_type(&self, id: i64) -> Result<Option<DocumentType>> {
    let raw: Option<RawDocumentType> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {DOCUMENT_TYPE_COLUMNS} FROM document_types WHERE id = ?1"),
            rusqlite::params![id],
            RawDocumentType::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawDocumentType::into_document_type).transpose()
  }
}

// ─── BeneficiaryStore impl ───────────────────────────────────────────────────

impl BeneficiaryStore for SqliteStore {
  async fn list_all(&self) -> Result<Vec<BeneficiaryView>> {
    let raws: Vec<RawBeneficiaryView> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("{VIEW_SELECT} ORDER BY b.id"))?;
        let rows = stmt
          .query_map([], RawBeneficiaryView::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBeneficiaryView::into_view).collect()
  }

  async fn get_by_id(&self, id: i64) -> Result<Option<BeneficiaryView>> {
    let raw: Option<RawBeneficiaryView> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{VIEW_SELECT} WHERE b.id = ?1"),
            rusqlite::params![id],
            RawBeneficiaryView::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawBeneficiaryView::into_view).transpose()
  }

  async fn create(&self, input: NewBeneficiary) -> Result<i64> {
    let p = WriteParams::from(input);

    let outcome: std::result::Result<i64, String> = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO beneficiaries (
             given_names, surnames, document_type_id,
             document_number, birth_date, sex
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            p.given_names,
            p.surnames,
            p.document_type_id,
            p.document_number,
            p.birth_date,
            p.sex,
          ],
        );
        classify(inserted.map(|_| conn.last_insert_rowid()))
      })
      .await?;

    outcome.map_err(Error::Conflict)
  }

  async fn update(&self, id: i64, input: NewBeneficiary) -> Result<bool> {
    let p = WriteParams::from(input);

    let outcome: std::result::Result<usize, String> = self
      .conn
      .call(move |conn| {
        classify(conn.execute(
          "UPDATE beneficiaries SET
             given_names = ?2, surnames = ?3, document_type_id = ?4,
             document_number = ?5, birth_date = ?6, sex = ?7
           WHERE id = ?1",
          rusqlite::params![
            id,
            p.given_names,
            p.surnames,
            p.document_type_id,
            p.document_number,
            p.birth_date,
            p.sex,
          ],
        ))
      })
      .await?;

    Ok(outcome.map_err(Error::Conflict)? == 1)
  }

  async fn delete(&self, id: i64) -> Result<bool> {
    let rows = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM beneficiaries WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(rows == 1)
  }
}
