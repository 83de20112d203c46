//! `benef` — command-line client for the beneficiary registry.
//!
//! # Usage
//!
//! ```
//! benef list --search quispe
//! benef create --given-names Ana --surnames Quispe --country Perú \
//!   --document-type DNI --document-number 12345678 --birth-date 1990-05-04 --sex F
//! benef --url http://registry.local:5069 document-types --country Perú
//! ```

mod client;
mod form;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use benef_core::document_type::countries;
use clap::{Parser, Subcommand};
use client::ApiClient;
use form::FormArgs;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "benef", about = "Manage beneficiaries in the registry")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<PathBuf>,

  /// Base URL of the registry server (default: http://localhost:5069).
  #[arg(long, env = "BENEF_URL", global = true)]
  url: Option<String>,

  /// Print raw JSON instead of tables.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List beneficiaries, optionally filtered by name or document number.
  List {
    #[arg(short, long)]
    search: Option<String>,
  },
  /// Show one beneficiary.
  Get { id: i64 },
  /// Register a new beneficiary.
  Create {
    #[command(flatten)]
    form: FormArgs,
  },
  /// Change an existing beneficiary; omitted fields keep their value.
  Update {
    id:   i64,
    #[command(flatten)]
    form: FormArgs,
  },
  /// Remove a beneficiary.
  Delete { id: i64 },
  /// List the active document types.
  DocumentTypes {
    #[arg(long)]
    country: Option<String>,
  },
  /// List the countries that have document types.
  Countries,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flag (or BENEF_URL) overrides the config file, which overrides the default.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:5069".to_string());
  tracing::debug!(%base_url, "using server");

  let client = ApiClient::new(base_url)?;
  run(&client, args.command, args.json).await
}

async fn run(client: &ApiClient, command: Command, json: bool) -> Result<()> {
  match command {
    Command::List { search } => {
      let all = client.list_beneficiaries().await?;
      let term = search.unwrap_or_default();
      let shown: Vec<_> = all.iter().filter(|v| v.matches(&term)).collect();
      if json {
        return print_json(&shown);
      }
      println!("{}", render::beneficiaries_table(&shown));
      println!("showing {} of {}", shown.len(), all.len());
    }
    Command::Get { id } => {
      let view = client.get_beneficiary(id).await?;
      if json {
        return print_json(&view);
      }
      println!("{}", render::beneficiary_detail(&view));
    }
    Command::Create { form } => {
      let catalog = client.document_types().await?;
      let input = form::create_input(&catalog, form)?;
      form::precheck(&input, &catalog)?;
      let created = client.create_beneficiary(&input).await?;
      if json {
        return print_json(&created);
      }
      println!("created beneficiary {}", created.beneficiary.id);
      println!("{}", render::beneficiary_detail(&created));
    }
    Command::Update { id, form } => {
      let existing = client.get_beneficiary(id).await?;
      let catalog = client.document_types().await?;
      let input = form::update_input(&existing, &catalog, form)?;
      form::precheck(&input, &catalog)?;
      client.update_beneficiary(id, &input).await?;
      if !json {
        println!("updated beneficiary {id}");
      }
    }
    Command::Delete { id } => {
      client.delete_beneficiary(id).await?;
      if !json {
        println!("deleted beneficiary {id}");
      }
    }
    Command::DocumentTypes { country } => {
      let catalog = client.document_types().await?;
      let shown = match country.as_deref() {
        Some(c) => form::types_in_country(&catalog, c)?,
        None => catalog.iter().collect(),
      };
      if json {
        return print_json(&shown);
      }
      println!("{}", render::document_types_table(&shown));
    }
    Command::Countries => {
      let catalog = client.document_types().await?;
      let names = countries(&catalog);
      if json {
        return print_json(&names);
      }
      for name in names {
        println!("{name}");
      }
    }
  }
  Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value).context("serialising output")?);
  Ok(())
}
