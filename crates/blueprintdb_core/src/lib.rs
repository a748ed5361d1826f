//! Core domain logic for BlueprintDB.
//! Diagram geometry, the marker catalogue and the document store live here;
//! the FFI and CLI crates are thin shells over this crate.

pub mod config;
pub mod db;
pub mod geometry;
pub mod logging;
pub mod marker;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use geometry::{
    boundary_point, resolve_edge_endpoints, EdgeEndpoints, EdgeLayout, GeometryError, NodeBounds,
    Point, ShapeKind,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use marker::{
    marker_glyph, render_marker_defs, Cardinality, EdgeMarker, MarkerKind, MarkerType,
};
pub use model::diagram::{Diagram, DiagramEdge, DiagramError, DiagramNode, NodeKind};
pub use model::document::{DocumentListing, DocumentRecord, DocumentSummary};
pub use repo::document_repo::{DocumentError, DocumentRepository, DocumentResult};
pub use repo::kv_repo::{
    KeyValueRepository, KvError, KvResult, MemoryKeyValueRepository, SqliteKeyValueRepository,
};
pub use service::document_service::{DocumentService, DocumentServiceError, RestoredDocument};
pub use service::transfer::{export_file_name, export_json, import_json, ImportError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
