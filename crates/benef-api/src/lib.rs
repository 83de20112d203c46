//! JSON REST API for the beneficiary registry.
//!
//! Exposes an axum [`Router`] backed by any
//! [`BeneficiaryStore`](benef_core::store::BeneficiaryStore). TLS and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", benef_api::api_router(store.clone(), ApiOptions::mounted_at("/api")))
//! ```

pub mod beneficiaries;
pub mod document_types;
pub mod error;

use std::sync::Arc;

use axum::{Router, routing::get};
use benef_core::{BeneficiaryService, store::BeneficiaryStore};

pub use error::ApiError;

/// Behaviour switches for the API router.
#[derive(Debug, Clone, Default)]
pub struct ApiOptions {
  /// Path the router is nested under; prefixes `Location` headers.
  pub mount_path:            String,
  /// Return the store's own message on rejected writes instead of a generic
  /// one. The detail is logged either way.
  pub expose_backend_errors: bool,
}

impl ApiOptions {
  pub fn mounted_at(mount_path: impl Into<String>) -> Self {
    Self { mount_path: mount_path.into(), ..Self::default() }
  }
}

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub service: BeneficiaryService<S>,
  pub options: Arc<ApiOptions>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { service: self.service.clone(), options: Arc::clone(&self.options) }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, options: ApiOptions) -> Router<()>
where
  S: BeneficiaryStore + 'static,
{
  let state = ApiState {
    service: BeneficiaryService::new(store),
    options: Arc::new(options),
  };

  Router::new()
    .route(
      "/beneficiarios",
      get(beneficiaries::list::<S>).post(beneficiaries::create::<S>),
    )
    .route(
      "/beneficiarios/{id}",
      get(beneficiaries::get_one::<S>)
        .put(beneficiaries::update::<S>)
        .delete(beneficiaries::delete::<S>),
    )
    .route("/documentos-identidad", get(document_types::list::<S>))
    .with_state(state)
}
