//! Async HTTP client wrapping the beneficiary JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use benef_core::{
  beneficiary::{BeneficiaryInput, BeneficiaryView},
  document_type::DocumentType,
};
use reqwest::{Client, Response};
use serde::Deserialize;

/// Async HTTP client for the beneficiary REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  // ── Beneficiaries ─────────────────────────────────────────────────────────

  /// `GET /api/beneficiarios`
  pub async fn list_beneficiaries(&self) -> Result<Vec<BeneficiaryView>> {
    let resp = self
      .client
      .get(self.url("/beneficiarios"))
      .send()
      .await
      .context("GET /beneficiarios failed")?;
    let resp = check(resp, "GET /beneficiarios").await?;
    resp.json().await.context("deserialising beneficiaries")
  }

  /// `GET /api/beneficiarios/{id}`
  pub async fn get_beneficiary(&self, id: i64) -> Result<BeneficiaryView> {
    let resp = self
      .client
      .get(self.url(&format!("/beneficiarios/{id}")))
      .send()
      .await
      .with_context(|| format!("GET /beneficiarios/{id} failed"))?;
    let resp = check(resp, &format!("GET /beneficiarios/{id}")).await?;
    resp.json().await.context("deserialising beneficiary")
  }

  /// `POST /api/beneficiarios`; returns the record as stored.
  pub async fn create_beneficiary(&self, input: &BeneficiaryInput) -> Result<BeneficiaryView> {
    let resp = self
      .client
      .post(self.url("/beneficiarios"))
      .json(input)
      .send()
      .await
      .context("POST /beneficiarios failed")?;
    let resp = check(resp, "POST /beneficiarios").await?;
    resp.json().await.context("deserialising created beneficiary")
  }

  /// `PUT /api/beneficiarios/{id}`
  pub async fn update_beneficiary(&self, id: i64, input: &BeneficiaryInput) -> Result<()> {
    let resp = self
      .client
      .put(self.url(&format!("/beneficiarios/{id}")))
      .json(input)
      .send()
      .await
      .with_context(|| format!("PUT /beneficiarios/{id} failed"))?;
    check(resp, &format!("PUT /beneficiarios/{id}")).await?;
    Ok(())
  }

  /// `DELETE /api/beneficiarios/{id}`
  pub async fn delete_beneficiary(&self, id: i64) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/beneficiarios/{id}")))
      .send()
      .await
      .with_context(|| format!("DELETE /beneficiarios/{id} failed"))?;
    check(resp, &format!("DELETE /beneficiarios/{id}")).await?;
    Ok(())
  }

  // ── Document types ────────────────────────────────────────────────────────

  /// `GET /api/documentos-identidad`
  pub async fn document_types(&self) -> Result<Vec<DocumentType>> {
    let resp = self
      .client
      .get(self.url("/documentos-identidad"))
      .send()
      .await
      .context("GET /documentos-identidad failed")?;
    let resp = check(resp, "GET /documentos-identidad").await?;
    resp.json().await.context("deserialising document types")
  }
}

// ─── Error bodies ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ErrorBody {
  message: String,
  #[serde(default)]
  errors:  Vec<FieldErrorBody>,
}

#[derive(Deserialize)]
struct FieldErrorBody {
  field:   String,
  message: String,
}

async fn check(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  Err(anyhow!("{what} → {status}: {}", describe_failure(&body)))
}

/// Render a server error body for the terminal: the `message`, then one
/// indented line per field error. Falls back to the raw body.
fn describe_failure(body: &str) -> String {
  let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
    let raw = body.trim();
    return if raw.is_empty() { "no details".to_owned() } else { raw.to_owned() };
  };
  let mut out = parsed.message;
  for e in parsed.errors {
    out.push_str(&format!("\n  {}: {}", e.field, e.message));
  }
  out
}
