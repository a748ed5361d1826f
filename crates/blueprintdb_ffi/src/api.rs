//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose document store and edge geometry operations to Dart via FRB.
//! - Translate core errors into short, user-presentable messages.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Diagrams cross the boundary as `{nodes, edges}` JSON strings.
//! - Every document call opens the store, runs one operation and closes it.

use blueprintdb_core::db::open_db;
use blueprintdb_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    render_marker_defs, resolve_edge_endpoints, Diagram, DocumentError, DocumentRepository,
    DocumentServiceError, EdgeLayout, NodeBounds, Point, ShapeKind, SqliteKeyValueRepository,
    StoreConfig,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;

const STORE_DB_FILE_NAME: &str = "blueprintdb_store.sqlite3";
const STORE_DB_PATH_ENV: &str = "BLUEPRINTDB_DB_PATH";
static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// SVG `<defs>` block holding every marker glyph, for injection into the canvas.
#[flutter_rust_bridge::frb(sync)]
pub fn marker_defs() -> String {
    render_marker_defs()
}

/// One entry of the recent-documents menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentListItem {
    pub name: String,
    /// Save time as Unix epoch milliseconds.
    pub saved_at_ms: i64,
    /// Pre-formatted short date for display.
    pub display_date: String,
}

/// Listing envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentListResponse {
    pub ok: bool,
    /// Most recent first.
    pub items: Vec<DocumentListItem>,
    /// Number of stored records that could not be read.
    pub skipped: u32,
    pub message: String,
}

/// Generic action envelope for save/rename/delete/next-name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentActionResponse {
    pub ok: bool,
    /// Affected or generated document name.
    pub name: Option<String>,
    pub message: String,
}

impl DocumentActionResponse {
    fn success(message: impl Into<String>, name: String) -> Self {
        Self {
            ok: true,
            name: Some(name),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            name: None,
            message: message.into(),
        }
    }
}

/// Load/import envelope carrying diagram JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLoadResponse {
    pub ok: bool,
    pub name: Option<String>,
    /// `{nodes, edges}` JSON when `ok`.
    pub diagram_json: Option<String>,
    pub message: String,
}

impl DocumentLoadResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            name: None,
            diagram_json: None,
            message: message.into(),
        }
    }
}

/// Node geometry as measured by the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBoundsInput {
    pub id: String,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    /// `rectangle|circle|diamond`.
    pub shape: String,
}

/// Straight connector geometry between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRouteResponse {
    pub ok: bool,
    pub source_x: f64,
    pub source_y: f64,
    pub target_x: f64,
    pub target_y: f64,
    pub angle_degrees: f64,
    /// SVG path data.
    pub path: String,
    pub message: String,
}

impl EdgeRouteResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            source_x: 0.0,
            source_y: 0.0,
            target_x: 0.0,
            target_y: 0.0,
            angle_degrees: 0.0,
            path: String::new(),
            message: message.into(),
        }
    }
}

/// Lists stored documents, most recently saved first.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Corrupt records are skipped and counted, never fatal.
#[flutter_rust_bridge::frb(sync)]
pub fn document_list() -> DocumentListResponse {
    match with_document_repo(|repo| repo.list_all()) {
        Ok(listing) => {
            let skipped = u32::try_from(listing.skipped_count()).unwrap_or(u32::MAX);
            let items = listing
                .items
                .iter()
                .map(|summary| DocumentListItem {
                    name: summary.name.clone(),
                    saved_at_ms: summary.timestamp.timestamp_millis(),
                    display_date: summary.display_date(),
                })
                .collect::<Vec<_>>();
            let message = if skipped > 0 {
                format!("{skipped} file(s) could not be read.")
            } else {
                format!("Found {} file(s).", items.len())
            };
            DocumentListResponse {
                ok: true,
                items,
                skipped,
                message,
            }
        }
        Err(message) => DocumentListResponse {
            ok: false,
            items: Vec::new(),
            skipped: 0,
            message,
        },
    }
}

/// Saves `diagram_json` under `name`.
#[flutter_rust_bridge::frb(sync)]
pub fn document_save(name: String, diagram_json: String) -> DocumentActionResponse {
    let diagram = match serde_json::from_str::<Diagram>(&diagram_json) {
        Ok(diagram) => diagram,
        Err(err) => {
            return DocumentActionResponse::failure(format!("document_save failed: {err}"))
        }
    };
    match with_document_repo(|repo| repo.save(&name, &diagram)) {
        Ok(summary) => DocumentActionResponse::success("Saved.", summary.name),
        Err(message) => DocumentActionResponse::failure(message),
    }
}

/// Loads the document `name` as `{nodes, edges}` JSON.
#[flutter_rust_bridge::frb(sync)]
pub fn document_load(name: String) -> DocumentLoadResponse {
    let record = match with_document_repo(|repo| repo.load(&name)) {
        Ok(record) => record,
        Err(message) => return DocumentLoadResponse::failure(message),
    };
    match serde_json::to_string(&record.diagram) {
        Ok(json) => DocumentLoadResponse {
            ok: true,
            name: Some(name),
            diagram_json: Some(json),
            message: "Loaded.".to_string(),
        },
        Err(err) => DocumentLoadResponse::failure(format!("document_load failed: {err}")),
    }
}

/// Renames a stored document; refuses to overwrite an existing name.
#[flutter_rust_bridge::frb(sync)]
pub fn document_rename(old_name: String, new_name: String) -> DocumentActionResponse {
    match with_document_repo(|repo| repo.rename(&old_name, &new_name)) {
        Ok(()) => DocumentActionResponse::success("Renamed.", new_name),
        Err(message) => DocumentActionResponse::failure(message),
    }
}

/// Deletes a stored document; missing names succeed.
#[flutter_rust_bridge::frb(sync)]
pub fn document_delete(name: String) -> DocumentActionResponse {
    match with_document_repo(|repo| repo.delete(&name)) {
        Ok(()) => DocumentActionResponse::success("Deleted.", name),
        Err(message) => DocumentActionResponse::failure(message),
    }
}

/// Next free untitled name, e.g. `Untitled-3`.
#[flutter_rust_bridge::frb(sync)]
pub fn document_next_name() -> DocumentActionResponse {
    let prefix = StoreConfig::default().untitled_prefix;
    match with_document_repo(|repo| repo.next_available_name(&prefix)) {
        Ok(name) => DocumentActionResponse::success("OK", name),
        Err(message) => DocumentActionResponse::failure(message),
    }
}

/// Validates an uploaded file and returns its diagram without storing it.
#[flutter_rust_bridge::frb(sync)]
pub fn document_import(file_name: String, contents: String) -> DocumentLoadResponse {
    let imported = match blueprintdb_core::import_json(&file_name, &contents) {
        Ok(imported) => imported,
        Err(err) => {
            return DocumentLoadResponse::failure(DocumentServiceError::from(err).user_message())
        }
    };
    match serde_json::to_string(&imported.diagram) {
        Ok(json) => DocumentLoadResponse {
            ok: true,
            name: Some(imported.name),
            diagram_json: Some(json),
            message: "Imported.".to_string(),
        },
        Err(err) => DocumentLoadResponse::failure(format!("document_import failed: {err}")),
    }
}

/// Resolves where a straight connector meets each node's outline.
///
/// # FFI contract
/// - Pure computation, no I/O.
/// - Degenerate sizes and unknown shapes return `ok = false`.
#[flutter_rust_bridge::frb(sync)]
pub fn edge_route(source: NodeBoundsInput, target: NodeBoundsInput) -> EdgeRouteResponse {
    let (source, target) = match (to_bounds(source), to_bounds(target)) {
        (Ok(source), Ok(target)) => (source, target),
        (Err(message), _) | (_, Err(message)) => return EdgeRouteResponse::failure(message),
    };
    match resolve_edge_endpoints(&source, &target) {
        Ok(endpoints) => {
            let layout = EdgeLayout::from_endpoints(endpoints);
            EdgeRouteResponse {
                ok: true,
                source_x: endpoints.source.x,
                source_y: endpoints.source.y,
                target_x: endpoints.target.x,
                target_y: endpoints.target.y,
                angle_degrees: endpoints.angle_degrees(),
                path: layout.path,
                message: String::new(),
            }
        }
        Err(err) => EdgeRouteResponse::failure(format!("edge_route failed: {err}")),
    }
}

fn to_bounds(input: NodeBoundsInput) -> Result<NodeBounds, String> {
    let shape = match input.shape.trim().to_ascii_lowercase().as_str() {
        "rectangle" => ShapeKind::Rectangle,
        "circle" => ShapeKind::Circle,
        "diamond" => ShapeKind::Diamond,
        other => return Err(format!("unsupported shape `{other}`")),
    };
    Ok(NodeBounds::new(
        input.id,
        Point::new(input.center_x, input.center_y),
        input.width,
        input.height,
        shape,
    ))
}

fn resolve_store_db_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(STORE_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn with_document_repo<T>(
    f: impl FnOnce(
        &mut DocumentRepository<SqliteKeyValueRepository<'_>>,
    ) -> Result<T, DocumentError>,
) -> Result<T, String> {
    let db_path = resolve_store_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        warn!("event=ffi_store_open module=ffi status=error error={err}");
        DocumentServiceError::from(DocumentError::from(blueprintdb_core::KvError::from(err)))
            .user_message()
    })?;
    let store = SqliteKeyValueRepository::try_new(&conn)
        .map_err(|err| DocumentServiceError::from(DocumentError::from(err)).user_message())?;
    let mut repo = DocumentRepository::try_new(store, &StoreConfig::default())
        .map_err(|err| DocumentServiceError::from(err).user_message())?;
    f(&mut repo).map_err(|err| DocumentServiceError::from(err).user_message())
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, document_delete, document_import, document_list, document_load,
        document_next_name, document_rename, document_save, edge_route, init_logging,
        marker_defs, ping, NodeBoundsInput,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn marker_defs_contains_every_glyph() {
        let defs = marker_defs();
        assert!(defs.starts_with("<defs>"));
        assert!(defs.contains("type=ZeroManyEnd"));
    }

    #[test]
    fn save_load_rename_delete_flow() {
        let name = unique_token("ffi-doc");
        let renamed = format!("{name}-renamed");
        let saved = document_save(name.clone(), r#"{"nodes":[],"edges":[]}"#.to_string());
        assert!(saved.ok, "{}", saved.message);

        let loaded = document_load(name.clone());
        assert!(loaded.ok, "{}", loaded.message);
        assert_eq!(loaded.diagram_json.as_deref(), Some(r#"{"nodes":[],"edges":[]}"#));

        let listing = document_list();
        assert!(listing.ok, "{}", listing.message);
        assert!(listing.items.iter().any(|item| item.name == name));

        let rename = document_rename(name.clone(), renamed.clone());
        assert!(rename.ok, "{}", rename.message);
        assert!(!document_load(name).ok);

        let deleted = document_delete(renamed.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert!(!document_load(renamed).ok);
    }

    #[test]
    fn rename_onto_existing_name_reports_conflict() {
        let first = unique_token("ffi-first");
        let second = unique_token("ffi-second");
        assert!(document_save(first.clone(), r#"{"nodes":[],"edges":[]}"#.to_string()).ok);
        assert!(document_save(second.clone(), r#"{"nodes":[],"edges":[]}"#.to_string()).ok);

        let response = document_rename(first.clone(), second.clone());
        assert!(!response.ok);
        assert!(response.message.contains("already exists"));

        document_delete(first);
        document_delete(second);
    }

    #[test]
    fn save_rejects_malformed_diagram_json() {
        let response = document_save(unique_token("ffi-bad"), "{\"nodes\":1}".to_string());
        assert!(!response.ok);
    }

    #[test]
    fn next_name_is_untitled_prefixed() {
        let response = document_next_name();
        assert!(response.ok, "{}", response.message);
        assert!(response.name.unwrap().starts_with("Untitled"));
    }

    #[test]
    fn import_strips_extension_and_rejects_other_types() {
        let response = document_import(
            "orders.json".to_string(),
            r#"{"nodes":[],"edges":[]}"#.to_string(),
        );
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.name.as_deref(), Some("orders"));

        assert!(!document_import("orders.txt".to_string(), "{}".to_string()).ok);
    }

    #[test]
    fn edge_route_exits_through_facing_sides() {
        let response = edge_route(bounds("a", 0.0, "rectangle"), bounds("b", 300.0, "rectangle"));
        assert!(response.ok, "{}", response.message);
        assert_eq!((response.source_x, response.source_y), (50.0, 0.0));
        assert_eq!((response.target_x, response.target_y), (250.0, 0.0));
        assert_eq!(response.path, "M 50,0 L 250,0");
    }

    #[test]
    fn edge_route_rejects_unknown_shape() {
        let response = edge_route(bounds("a", 0.0, "hexagon"), bounds("b", 300.0, "circle"));
        assert!(!response.ok);
        assert!(response.message.contains("hexagon"));
    }

    fn bounds(id: &str, center_x: f64, shape: &str) -> NodeBoundsInput {
        NodeBoundsInput {
            id: id.to_string(),
            center_x,
            center_y: 0.0,
            width: 100.0,
            height: 50.0,
            shape: shape.to_string(),
        }
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
