//! Session-level use-case services.
//!
//! # Responsibility
//! - Orchestrate document repository calls into editor flows.
//! - Keep UI/FFI layers decoupled from substrate details.

pub mod document_service;
pub mod transfer;
