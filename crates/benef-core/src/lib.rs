//! Core types, validation rules and store abstractions for the beneficiary
//! registry.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! validator lives here so that the server and every client check the same
//! rules.

pub mod beneficiary;
pub mod document_type;
pub mod error;
pub mod service;
pub mod store;
pub mod validate;

pub use error::{FieldError, ServiceError, ValidationErrors, Violation};
pub use service::BeneficiaryService;
