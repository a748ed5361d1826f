//! Document session service.
//!
//! # Responsibility
//! - Track which document the editor currently has open.
//! - Drive debounced auto-save after diagram mutations.
//! - Provide open/new/rename/delete/import flows with user-facing errors.
//!
//! # Invariants
//! - A failed `open` leaves the current document name untouched.
//! - Deleting the open document moves the session to a fresh untitled name.
//! - Auto-save only fires after the debounce window has elapsed since the
//!   latest mutation, and always saves the state passed in by the caller.

use crate::config::{ConfigError, StoreConfig};
use crate::model::diagram::Diagram;
use crate::model::document::{DocumentListing, DocumentSummary};
use crate::repo::document_repo::{DocumentError, DocumentRepository};
use crate::repo::kv_repo::KeyValueRepository;
use crate::service::transfer::{export_file_name, export_json, import_json, ImportError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// Service error for document session flows.
#[derive(Debug)]
pub enum DocumentServiceError {
    Config(ConfigError),
    Document(DocumentError),
    Import(ImportError),
    /// Diagram could not be rendered as JSON.
    Export(String),
}

impl Display for DocumentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Document(err) => write!(f, "{err}"),
            Self::Import(err) => write!(f, "{err}"),
            Self::Export(message) => write!(f, "export failed: {message}"),
        }
    }
}

impl Error for DocumentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Document(err) => Some(err),
            Self::Import(err) => Some(err),
            Self::Export(_) => None,
        }
    }
}

impl From<ConfigError> for DocumentServiceError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DocumentError> for DocumentServiceError {
    fn from(value: DocumentError) -> Self {
        Self::Document(value)
    }
}

impl From<ImportError> for DocumentServiceError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl DocumentServiceError {
    /// Short text for a dismissible notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Document(DocumentError::NotFound(name)) => {
                format!("\"{name}\" could not be found.")
            }
            Self::Document(DocumentError::Corrupt { name, .. }) => {
                format!("\"{name}\" is damaged and could not be opened.")
            }
            Self::Document(DocumentError::NameConflict(name)) => {
                format!("A file with the name \"{name}\" already exists.")
            }
            Self::Document(DocumentError::InvalidName(_)) => {
                "File names cannot be empty.".to_string()
            }
            Self::Document(DocumentError::StorageUnavailable(_)) => {
                "Saving is unavailable right now. Your changes are kept in this window.".to_string()
            }
            Self::Import(err) => format!("Could not import file: {err}"),
            Self::Config(err) => format!("Storage is misconfigured: {err}"),
            Self::Export(_) => "Could not export this diagram.".to_string(),
        }
    }
}

pub type ServiceResult<T> = Result<T, DocumentServiceError>;

/// Diagram restored when a session starts.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredDocument {
    pub name: String,
    pub diagram: Diagram,
}

/// Editor session bound to one document store.
pub struct DocumentService<S: KeyValueRepository> {
    repo: DocumentRepository<S>,
    config: StoreConfig,
    current: String,
    dirty_since: Option<Instant>,
}

impl<S: KeyValueRepository> DocumentService<S> {
    /// Starts a session, reopening the most recently saved document.
    ///
    /// Returns the restored document, or `None` when the session starts on a
    /// fresh untitled name (empty store, or the latest record is unreadable).
    pub fn open_session(
        store: S,
        config: StoreConfig,
    ) -> ServiceResult<(Self, Option<RestoredDocument>)> {
        config.validate()?;
        let mut repo = DocumentRepository::try_new(store, &config)?;

        let restored = match repo.latest()? {
            Some(summary) => match repo.load(&summary.name) {
                Ok(record) => Some(RestoredDocument {
                    name: summary.name,
                    diagram: record.diagram,
                }),
                Err(err) => {
                    warn!("event=session_restore module=service status=error error={err}");
                    None
                }
            },
            None => None,
        };

        let current = match &restored {
            Some(doc) => doc.name.clone(),
            None => repo.next_available_name(&config.untitled_prefix)?,
        };
        info!(
            "event=session_open module=service status=ok restored={}",
            restored.is_some()
        );

        let service = Self {
            repo,
            config,
            current,
            dirty_since: None,
        };
        Ok((service, restored))
    }

    pub fn current_name(&self) -> &str {
        &self.current
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn repository(&self) -> &DocumentRepository<S> {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut DocumentRepository<S> {
        &mut self.repo
    }

    /// Lists stored documents, most recent first.
    pub fn list(&mut self) -> ServiceResult<DocumentListing> {
        Ok(self.repo.list_all()?)
    }

    /// Opens `name`; on failure the session keeps its current document.
    pub fn open(&mut self, name: &str) -> ServiceResult<Diagram> {
        let record = self.repo.load(name)?;
        self.current = name.to_string();
        self.dirty_since = None;
        Ok(record.diagram)
    }

    /// Saves `diagram` as the current document.
    pub fn save_current(&mut self, diagram: &Diagram) -> ServiceResult<DocumentSummary> {
        let summary = self.repo.save(&self.current, diagram)?;
        self.dirty_since = None;
        Ok(summary)
    }

    /// Records that the diagram changed at `at`, restarting the debounce window.
    pub fn note_mutation(&mut self, at: Instant) {
        self.dirty_since = Some(at);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// Whether the debounce window since the latest mutation has elapsed.
    pub fn autosave_due(&self, now: Instant) -> bool {
        self.dirty_since.is_some_and(|since| {
            now.saturating_duration_since(since) >= self.config.autosave_debounce()
        })
    }

    /// Saves `diagram` when an auto-save is due; returns whether it saved.
    pub fn autosave(&mut self, diagram: &Diagram, now: Instant) -> ServiceResult<bool> {
        if !self.autosave_due(now) {
            return Ok(false);
        }
        self.save_current(diagram)?;
        Ok(true)
    }

    /// Time left before the pending auto-save becomes due.
    pub fn autosave_remaining(&self, now: Instant) -> Option<Duration> {
        self.dirty_since.map(|since| {
            self.config
                .autosave_debounce()
                .saturating_sub(now.saturating_duration_since(since))
        })
    }

    /// Switches to a fresh untitled document, optionally saving the current one first.
    ///
    /// Returns the new document name; the caller clears its canvas.
    pub fn create_new_file(&mut self, save_first: Option<&Diagram>) -> ServiceResult<String> {
        if let Some(diagram) = save_first {
            self.save_current(diagram)?;
        }
        let name = self.repo.next_available_name(&self.config.untitled_prefix)?;
        self.current = name.clone();
        self.dirty_since = None;
        Ok(name)
    }

    /// Renames the current document.
    ///
    /// A document that was never saved only changes its session name, but
    /// still refuses a name that is already taken.
    ///
    /// When the record was copied but the old key could not be removed, the
    /// session still moves to `new_name` so later saves never land on the
    /// stale name.
    pub fn rename_current(&mut self, new_name: &str) -> ServiceResult<()> {
        match self.repo.rename(&self.current, new_name) {
            Ok(()) => {}
            Err(DocumentError::NotFound(_)) => {
                if self.repo.exists(new_name)? {
                    return Err(DocumentError::NameConflict(new_name.to_string()).into());
                }
            }
            Err(err @ DocumentError::StorageUnavailable(_)) => {
                if self
                    .repo
                    .same_record(&self.current, new_name)
                    .unwrap_or(false)
                {
                    self.current = new_name.to_string();
                }
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        }
        self.current = new_name.to_string();
        Ok(())
    }

    /// Deletes `name`; returns `true` when it was the open document and the
    /// session moved to a fresh untitled name.
    pub fn delete(&mut self, name: &str) -> ServiceResult<bool> {
        self.repo.delete(name)?;
        if name != self.current {
            return Ok(false);
        }
        self.create_new_file(None)?;
        Ok(true)
    }

    /// Exports `diagram` as `(file_name, json)` for the current document.
    pub fn export_current(&self, diagram: &Diagram) -> ServiceResult<(String, String)> {
        let json =
            export_json(diagram).map_err(|err| DocumentServiceError::Export(err.to_string()))?;
        Ok((export_file_name(&self.current), json))
    }

    /// Loads an uploaded file into the session under the file's base name.
    ///
    /// The diagram is not written immediately; it is marked dirty at `at` so
    /// the next auto-save persists it.
    pub fn import(&mut self, file_name: &str, contents: &str, at: Instant) -> ServiceResult<Diagram> {
        let imported = import_json(file_name, contents)?;
        self.current = imported.name;
        self.note_mutation(at);
        info!("event=document_import module=service status=ok");
        Ok(imported.diagram)
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentService, DocumentServiceError};
    use crate::config::StoreConfig;
    use crate::geometry::Point;
    use crate::model::diagram::{Diagram, NodeKind};
    use crate::repo::document_repo::DocumentError;
    use crate::repo::kv_repo::{KeyValueRepository, KvError, KvResult, MemoryKeyValueRepository};
    use std::time::{Duration, Instant};

    /// Memory store whose `remove` fails for one chosen key.
    #[derive(Default)]
    struct PinnedKeyStore {
        inner: MemoryKeyValueRepository,
        pinned: Option<String>,
    }

    impl KeyValueRepository for PinnedKeyStore {
        fn get(&self, key: &str) -> KvResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> KvResult<()> {
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> KvResult<()> {
            if self.pinned.as_deref() == Some(key) {
                return Err(KvError::Unavailable("remove refused".to_string()));
            }
            self.inner.remove(key)
        }

        fn keys(&self) -> KvResult<Vec<String>> {
            self.inner.keys()
        }
    }

    fn empty_session() -> DocumentService<MemoryKeyValueRepository> {
        let (service, restored) =
            DocumentService::open_session(MemoryKeyValueRepository::new(), StoreConfig::default())
                .unwrap();
        assert!(restored.is_none());
        service
    }

    fn sample_diagram() -> Diagram {
        let mut diagram = Diagram::new();
        diagram.add_node(NodeKind::Entity, Point::new(10.0, 20.0));
        diagram
    }

    #[test]
    fn empty_store_starts_on_untitled() {
        let service = empty_session();
        assert_eq!(service.current_name(), "Untitled");
        assert!(!service.is_dirty());
    }

    #[test]
    fn session_restores_latest_document() {
        let mut service = empty_session();
        let diagram = sample_diagram();
        service.save_current(&diagram).unwrap();

        let store = service.repository().store().clone();
        let (reopened, restored) =
            DocumentService::open_session(store, StoreConfig::default()).unwrap();
        let restored = restored.unwrap();
        assert_eq!(restored.name, "Untitled");
        assert_eq!(restored.diagram, diagram);
        assert_eq!(reopened.current_name(), "Untitled");
    }

    #[test]
    fn failed_open_keeps_current_name() {
        let mut service = empty_session();
        let err = service.open("Missing").unwrap_err();
        assert!(matches!(
            err,
            DocumentServiceError::Document(DocumentError::NotFound(_))
        ));
        assert_eq!(service.current_name(), "Untitled");
    }

    #[test]
    fn autosave_waits_for_debounce_window() {
        let mut service = empty_session();
        let diagram = sample_diagram();
        let start = Instant::now();

        assert!(!service.autosave(&diagram, start).unwrap());

        service.note_mutation(start);
        assert!(!service.autosave(&diagram, start + Duration::from_millis(100)).unwrap());
        service.note_mutation(start + Duration::from_millis(300));
        assert!(!service.autosave_due(start + Duration::from_millis(700)));
        assert!(service.autosave(&diagram, start + Duration::from_millis(800)).unwrap());

        assert!(!service.is_dirty());
        assert!(service.repository().exists("Untitled").unwrap());
    }

    #[test]
    fn create_new_file_saves_first_and_advances_name() {
        let mut service = empty_session();
        let name = service.create_new_file(Some(&sample_diagram())).unwrap();
        assert_eq!(name, "Untitled-1");
        assert_eq!(service.current_name(), "Untitled-1");
        assert!(service.repository().exists("Untitled").unwrap());
    }

    #[test]
    fn rename_unsaved_document_switches_name_but_refuses_conflicts() {
        let mut service = empty_session();
        service.rename_current("Draft").unwrap();
        assert_eq!(service.current_name(), "Draft");

        service.save_current(&sample_diagram()).unwrap();
        service.create_new_file(None).unwrap();
        let err = service.rename_current("Draft").unwrap_err();
        assert!(matches!(
            err,
            DocumentServiceError::Document(DocumentError::NameConflict(_))
        ));
        assert!(err.user_message().contains("already exists"));
    }

    #[test]
    fn deleting_open_document_moves_to_fresh_untitled() {
        let mut service = empty_session();
        service.save_current(&sample_diagram()).unwrap();
        service.rename_current("Shop").unwrap();

        assert!(service.delete("Shop").unwrap());
        assert_eq!(service.current_name(), "Untitled");
        assert!(!service.repository().exists("Shop").unwrap());
        assert!(!service.delete("Other").unwrap());
    }

    #[test]
    fn import_marks_dirty_under_file_base_name() {
        let mut service = empty_session();
        let now = Instant::now();
        let diagram = service
            .import("library.json", r#"{"nodes": [], "edges": []}"#, now)
            .unwrap();
        assert!(diagram.is_empty());
        assert_eq!(service.current_name(), "library");
        assert!(service.is_dirty());

        let err = service.import("library.png", "{}", now).unwrap_err();
        assert!(matches!(err, DocumentServiceError::Import(_)));
        assert_eq!(service.current_name(), "library");
    }

    #[test]
    fn export_uses_current_name() {
        let service = empty_session();
        let (file_name, json) = service.export_current(&Diagram::new()).unwrap();
        assert_eq!(file_name, "Untitled.json");
        assert!(json.contains("\"nodes\""));
    }

    #[test]
    fn rename_with_stuck_old_key_moves_session_and_loses_nothing() {
        let (mut service, _) =
            DocumentService::open_session(PinnedKeyStore::default(), StoreConfig::default())
                .unwrap();
        service.save_current(&sample_diagram()).unwrap();
        service.repository_mut().store_mut().pinned = Some("blueprintdb-Untitled".to_string());

        let err = service.rename_current("Shop").unwrap_err();
        assert!(matches!(
            err,
            DocumentServiceError::Document(DocumentError::StorageUnavailable(_))
        ));
        assert_eq!(service.current_name(), "Shop");

        let start = Instant::now();
        service.note_mutation(start);
        assert!(service
            .autosave(&Diagram::new(), start + Duration::from_secs(1))
            .unwrap());

        service.repository_mut().store_mut().pinned = None;
        let listing = service.list().unwrap();
        let mut names = listing.names();
        names.sort_unstable();
        assert_eq!(names, vec!["Shop", "Untitled"]);
        assert!(service.open("Shop").unwrap().is_empty());
        assert_eq!(service.open("Untitled").unwrap().nodes.len(), 1);
    }

    #[test]
    fn rename_failure_does_not_adopt_an_unrelated_document() {
        let (mut service, _) =
            DocumentService::open_session(PinnedKeyStore::default(), StoreConfig::default())
                .unwrap();
        service.save_current(&sample_diagram()).unwrap();
        service
            .repository_mut()
            .save("Shop", &Diagram::new())
            .unwrap();

        let err = service.rename_current("Shop").unwrap_err();
        assert!(matches!(
            err,
            DocumentServiceError::Document(DocumentError::NameConflict(_))
        ));
        assert_eq!(service.current_name(), "Untitled");
    }
}
