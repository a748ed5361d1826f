//! Diagram domain model.
//!
//! # Responsibility
//! - Define the node/edge shapes persisted in documents and exported files.
//! - Provide the editing helpers the shell uses to mutate a diagram.
//!
//! # Invariants
//! - Node ids are unique within a diagram; edges reference existing nodes.
//! - Shell-owned fields survive a load/save cycle untouched.
//!
//! # See also
//! - `crate::repo::document_repo` for the persisted record envelope.

pub mod diagram;
pub mod document;
