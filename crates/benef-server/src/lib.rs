//! HTTP server assembly for the beneficiary registry.
//!
//! Mounts the [`benef_api`] router under `/api` and wraps it with request
//! tracing and, when origins are configured, CORS for the browser front end.

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  http::{HeaderValue, Method, header},
};
use benef_api::ApiOptions;
use benef_core::store::BeneficiaryStore;
use serde::Deserialize;
use tower_http::{
  cors::{AllowOrigin, CorsLayer},
  trace::TraceLayer,
};

/// Path the JSON API is nested under.
pub const API_MOUNT: &str = "/api";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `BENEF_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                  String,
  #[serde(default = "default_port")]
  pub port:                  u16,
  #[serde(default = "default_store_path")]
  pub store_path:            PathBuf,
  /// Insert the default document-type catalog at startup.
  #[serde(default = "default_true")]
  pub seed_document_types:   bool,
  /// Return the database's own message when a write is rejected.
  #[serde(default)]
  pub expose_backend_errors: bool,
  /// Browser origins allowed to call the API. Empty disables CORS.
  #[serde(default = "default_cors_origins")]
  pub cors_origins:          Vec<String>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5069 }

fn default_store_path() -> PathBuf { PathBuf::from("beneficiarios.db") }

fn default_true() -> bool { true }

fn default_cors_origins() -> Vec<String> { vec!["http://localhost:5173".to_string()] }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                  default_host(),
      port:                  default_port(),
      store_path:            default_store_path(),
      seed_document_types:   true,
      expose_backend_errors: false,
      cors_origins:          default_cors_origins(),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router.
///
/// Fails only if a configured CORS origin is not a valid header value.
pub fn app<S>(
  store: Arc<S>,
  config: &ServerConfig,
) -> Result<Router, header::InvalidHeaderValue>
where
  S: BeneficiaryStore + 'static,
{
  let options = ApiOptions {
    expose_backend_errors: config.expose_backend_errors,
    ..ApiOptions::mounted_at(API_MOUNT)
  };

  let mut router = Router::new()
    .nest(API_MOUNT, benef_api::api_router(store, options))
    .layer(TraceLayer::new_for_http());

  if let Some(cors) = cors_layer(&config.cors_origins)? {
    router = router.layer(cors);
  }
  Ok(router)
}

fn cors_layer(origins: &[String]) -> Result<Option<CorsLayer>, header::InvalidHeaderValue> {
  // `BENEF_CORS_ORIGINS=""` arrives as a single blank entry.
  let origins = origins
    .iter()
    .map(|o| o.trim())
    .filter(|o| !o.is_empty())
    .map(HeaderValue::from_str)
    .collect::<Result<Vec<_>, _>>()?;
  if origins.is_empty() {
    return Ok(None);
  }

  Ok(Some(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
      .allow_headers([header::CONTENT_TYPE])
      .expose_headers([header::LOCATION]),
  ))
}
