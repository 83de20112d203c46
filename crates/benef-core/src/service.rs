//! [`BeneficiaryService`] — validator and store composed into the operations a
//! client needs.
//!
//! Every mutating operation validates before touching the store. Only a
//! failure of the create write itself is downgraded to
//! [`ServiceError::Conflict`]; every other backend failure surfaces as
//! [`ServiceError::Store`].

use std::sync::Arc;

use crate::{
  beneficiary::{BeneficiaryInput, BeneficiaryView, NewBeneficiary},
  document_type::DocumentType,
  error::ServiceError,
  store::BeneficiaryStore,
  validate::validate_today,
};

type Result<T, S> = std::result::Result<T, ServiceError<<S as crate::store::DocumentTypeCatalog>::Error>>;

/// Orchestrates validation and persistence over an injected store handle.
///
/// Cloning is cheap — the store is reference-counted.
pub struct BeneficiaryService<S> {
  store: Arc<S>,
}

impl<S> Clone for BeneficiaryService<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: BeneficiaryStore> BeneficiaryService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// Active document types.
  pub async fn document_types(&self) -> Result<Vec<DocumentType>, S> {
    self.store.list_active().await.map_err(ServiceError::Store)
  }

  pub async fn list(&self) -> Result<Vec<BeneficiaryView>, S> {
    self.store.list_all().await.map_err(ServiceError::Store)
  }

  pub async fn get(&self, id: i64) -> Result<BeneficiaryView, S> {
    self
      .store
      .get_by_id(id)
      .await
      .map_err(ServiceError::Store)?
      .ok_or(ServiceError::NotFound(id))
  }

  /// Validate and persist `input`, then return the stored projection as read
  /// back from the store.
  pub async fn create(&self, input: &BeneficiaryInput) -> Result<BeneficiaryView, S> {
    let candidate = self.normalise(input).await?;

    let id = self
      .store
      .create(candidate)
      .await
      .map_err(|e| ServiceError::Conflict(e.to_string()))?;

    self
      .store
      .get_by_id(id)
      .await
      .map_err(ServiceError::Store)?
      .ok_or(ServiceError::Vanished(id))
  }

  pub async fn update(&self, id: i64, input: &BeneficiaryInput) -> Result<(), S> {
    let candidate = self.normalise(input).await?;

    let updated = self
      .store
      .update(id, candidate)
      .await
      .map_err(ServiceError::Store)?;
    if updated { Ok(()) } else { Err(ServiceError::NotFound(id)) }
  }

  pub async fn delete(&self, id: i64) -> Result<(), S> {
    let deleted = self.store.delete(id).await.map_err(ServiceError::Store)?;
    if deleted { Ok(()) } else { Err(ServiceError::NotFound(id)) }
  }

  async fn normalise(&self, input: &BeneficiaryInput) -> Result<NewBeneficiary, S> {
    let document_type = self
      .store
      .find_document_type(input.document_type_id)
      .await
      .map_err(ServiceError::Store)?;

    validate_today(input, |id| document_type.filter(|t| t.id == id))
      .map_err(ServiceError::Validation)
  }
}

#[cfg(test)]
mod tests {
  use std::{collections::BTreeMap, sync::Mutex};

  use chrono::{Days, Local};

  use super::*;
  use crate::{
    beneficiary::{Beneficiary, Sex},
    document_type::dni,
    store::DocumentTypeCatalog,
  };

  #[derive(Debug, thiserror::Error)]
  #[error("{0}")]
  struct FakeError(String);

  /// A map-backed store. `reject_writes` makes `create` fail like a
  /// constraint violation would.
  #[derive(Default)]
  struct MemoryStore {
    rows:          Mutex<BTreeMap<i64, Beneficiary>>,
    next_id:       Mutex<i64>,
    reject_writes: bool,
  }

  impl MemoryStore {
    fn view(&self, b: Beneficiary) -> BeneficiaryView {
      let t = (b.document_type_id == 1).then(dni);
      BeneficiaryView {
        beneficiary:                b,
        document_type_name:         t.as_ref().map(|t| t.name.clone()),
        document_type_abbreviation: t.as_ref().map(|t| t.abbreviation.clone()),
        country:                    t.map(|t| t.country),
      }
    }
  }

  fn row(id: i64, input: NewBeneficiary) -> Beneficiary {
    Beneficiary {
      id,
      given_names: input.given_names,
      surnames: input.surnames,
      document_type_id: input.document_type_id,
      document_number: input.document_number,
      birth_date: input.birth_date,
      sex: input.sex,
    }
  }

  impl DocumentTypeCatalog for MemoryStore {
    type Error = FakeError;

    async fn list_active(&self) -> std::result::Result<Vec<DocumentType>, FakeError> {
      Ok(vec![dni()])
    }

    async fn find_document_type(
      &self,
      id: i64,
    ) -> std::result::Result<Option<DocumentType>, FakeError> {
      Ok((id == 1).then(dni))
    }
  }

  impl BeneficiaryStore for MemoryStore {
    async fn list_all(&self) -> std::result::Result<Vec<BeneficiaryView>, FakeError> {
      let rows = self.rows.lock().unwrap().values().cloned().collect::<Vec<_>>();
      Ok(rows.into_iter().map(|b| self.view(b)).collect())
    }

    async fn get_by_id(
      &self,
      id: i64,
    ) -> std::result::Result<Option<BeneficiaryView>, FakeError> {
      let b = self.rows.lock().unwrap().get(&id).cloned();
      Ok(b.map(|b| self.view(b)))
    }

    async fn create(&self, input: NewBeneficiary) -> std::result::Result<i64, FakeError> {
      if self.reject_writes {
        return Err(FakeError("UNIQUE constraint failed".into()));
      }
      let mut next = self.next_id.lock().unwrap();
      *next += 1;
      self.rows.lock().unwrap().insert(*next, row(*next, input));
      Ok(*next)
    }

    async fn update(
      &self,
      id: i64,
      input: NewBeneficiary,
    ) -> std::result::Result<bool, FakeError> {
      let mut rows = self.rows.lock().unwrap();
      match rows.get_mut(&id) {
        Some(existing) => {
          *existing = row(id, input);
          Ok(true)
        }
        None => Ok(false),
      }
    }

    async fn delete(&self, id: i64) -> std::result::Result<bool, FakeError> {
      Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }
  }

  fn service(store: MemoryStore) -> BeneficiaryService<MemoryStore> {
    BeneficiaryService::new(Arc::new(store))
  }

  fn input() -> BeneficiaryInput {
    BeneficiaryInput {
      given_names:      " Juan Carlos ".into(),
      surnames:         "Pérez".into(),
      document_type_id: 1,
      document_number:  "12345678".into(),
      birth_date:       "1985-11-02".into(),
      sex:              "m".into(),
    }
  }

  #[tokio::test]
  async fn create_returns_read_back_projection() {
    let svc = service(MemoryStore::default());
    let created = svc.create(&input()).await.unwrap();
    assert_eq!(created.beneficiary.given_names, "Juan Carlos");
    assert_eq!(created.beneficiary.sex, Sex::M);
    assert_eq!(created.document_type_abbreviation.as_deref(), Some("DNI"));
    assert_eq!(svc.get(created.beneficiary.id).await.unwrap(), created);
  }

  #[tokio::test]
  async fn create_rejection_becomes_conflict() {
    let svc = service(MemoryStore { reject_writes: true, ..Default::default() });
    let err = svc.create(&input()).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(ref m) if m.contains("UNIQUE")));
  }

  #[tokio::test]
  async fn invalid_create_never_reaches_the_store() {
    let svc = service(MemoryStore { reject_writes: true, ..Default::default() });
    let mut i = input();
    i.document_number = "123".into();
    let err = svc.create(&i).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
  }

  #[tokio::test]
  async fn invalid_update_leaves_record_unchanged() {
    let svc = service(MemoryStore::default());
    let before = svc.create(&input()).await.unwrap();
    let id = before.beneficiary.id;

    let mut i = input();
    i.document_number = "123".into();
    i.surnames = "Changed".into();
    let err = svc.update(id, &i).await.unwrap_err();
    let ServiceError::Validation(errors) = err else { panic!("expected validation failure") };
    assert_eq!(errors.for_field("documentNumber").count(), 1);
    assert_eq!(svc.get(id).await.unwrap(), before);
  }

  #[tokio::test]
  async fn invalid_update_of_missing_id_reports_validation_first() {
    let svc = service(MemoryStore::default());
    let mut i = input();
    i.document_number = "123".into();
    assert!(matches!(svc.update(4242, &i).await, Err(ServiceError::Validation(_))));
  }

  #[tokio::test]
  async fn update_missing_is_not_found() {
    let svc = service(MemoryStore::default());
    let err = svc.update(42, &input()).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(42)));
  }

  #[tokio::test]
  async fn future_birth_date_is_rejected() {
    let svc = service(MemoryStore::default());
    let mut i = input();
    let tomorrow = Local::now().date_naive().checked_add_days(Days::new(1)).unwrap();
    i.birth_date = tomorrow.format("%Y-%m-%d").to_string();
    let err = svc.create(&i).await.unwrap_err();
    let ServiceError::Validation(errors) = err else { panic!("expected validation failure") };
    assert_eq!(errors.for_field("birthDate").count(), 1);
  }

  #[tokio::test]
  async fn delete_twice_is_ok_then_not_found() {
    let svc = service(MemoryStore::default());
    let id = svc.create(&input()).await.unwrap().beneficiary.id;
    svc.delete(id).await.unwrap();
    assert!(matches!(svc.delete(id).await, Err(ServiceError::NotFound(i)) if i == id));
  }
}
