//! Persistence layer for BlueprintDB documents.
//!
//! # Responsibility
//! - Define the key-value substrate contract and its backends.
//! - Map documents onto namespaced substrate keys.
//!
//! # See also
//! - `kv_repo` for the substrate trait.
//! - `document_repo` for the document store.

pub mod document_repo;
pub mod kv_repo;
