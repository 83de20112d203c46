//! Store traits for the document-type catalog and beneficiary records.
//!
//! Implemented by storage backends (e.g. `benef-store-sqlite`). Higher layers
//! depend on these abstractions, not on any concrete backend.
//!
//! A store performs no business-rule checks: writes take a
//! [`NewBeneficiary`], which only the validator produces. Constraint
//! enforcement beyond that is whatever the backend does structurally.

use std::future::Future;

use crate::{
  beneficiary::{BeneficiaryView, NewBeneficiary},
  document_type::DocumentType,
};

/// Read-only access to the document-type catalog.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DocumentTypeCatalog: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All active document types, in catalog order.
  fn list_active(
    &self,
  ) -> impl Future<Output = Result<Vec<DocumentType>, Self::Error>> + Send + '_;

  /// Look up a document type by id, whether active or not.
  fn find_document_type(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<DocumentType>, Self::Error>> + Send + '_;
}

/// CRUD over beneficiary records, keyed by a store-assigned integer id that is
/// never reused.
pub trait BeneficiaryStore: DocumentTypeCatalog {
  /// Every beneficiary joined with its document type. Order is up to the
  /// backend.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<BeneficiaryView>, Self::Error>> + Send + '_;

  /// Returns `None` if no beneficiary has this id.
  fn get_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<BeneficiaryView>, Self::Error>> + Send + '_;

  /// Persist a new beneficiary and return its id. Any error means the backend
  /// rejected the write.
  fn create(
    &self,
    input: NewBeneficiary,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Replace every field of beneficiary `id`. Returns `false` if it does not
  /// exist.
  fn update(
    &self,
    id: i64,
    input: NewBeneficiary,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Remove beneficiary `id`. Returns `false` if it does not exist.
  fn delete(&self, id: i64) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
