//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the catalog and registration use-cases.
//! - Keep callers decoupled from storage details.
//! - Surface every failure as one named [`ServiceError`] kind.

pub mod error;
pub mod event_catalog;
pub mod registration_service;
