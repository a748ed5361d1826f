//! Named diagram documents over a flat key-value substrate.
//!
//! # Responsibility
//! - Save, load, list, rename and delete documents by name.
//! - Keep the recency list usable when individual records are corrupt.
//! - Make rename recoverable when interrupted between its two writes.
//!
//! # Invariants
//! - A document lives under exactly one key, `<namespace>-<name>`.
//! - `save` fully replaces the record (last write wins).
//! - `rename` writes the new key before removing the old one; a pending
//!   rename journal lets the next open finish the job.
//! - Parse failures are isolated per record and never abort `list_all`.

use crate::config::StoreConfig;
use crate::model::diagram::Diagram;
use crate::model::document::{DocumentListing, DocumentRecord, DocumentSummary};
use crate::repo::kv_repo::{KeyValueRepository, KvError};
use chrono::{DateTime, SubsecRound, Utc};
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const RENAME_JOURNAL_SUFFIX: &str = ".rename-journal";

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Document store error taxonomy.
#[derive(Debug)]
pub enum DocumentError {
    /// Blank document name or prefix.
    InvalidName(String),
    /// No record under the requested name.
    NotFound(String),
    /// Stored value is not a valid document record.
    Corrupt { name: String, reason: String },
    /// Rename target already exists.
    NameConflict(String),
    /// Substrate failure (quota, permissions, database error).
    StorageUnavailable(KvError),
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(name) => write!(f, "invalid document name: `{name}`"),
            Self::NotFound(name) => write!(f, "document not found: {name}"),
            Self::Corrupt { name, reason } => {
                write!(f, "document `{name}` is corrupt: {reason}")
            }
            Self::NameConflict(name) => {
                write!(f, "a document named `{name}` already exists")
            }
            Self::StorageUnavailable(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DocumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<KvError> for DocumentError {
    fn from(value: KvError) -> Self {
        Self::StorageUnavailable(value)
    }
}

#[derive(Serialize)]
struct RecordRef<'a> {
    #[serde(flatten)]
    diagram: &'a Diagram,
    timestamp: &'a DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RenameJournal {
    from: String,
    to: String,
}

/// Document CRUD on top of any `KeyValueRepository`.
pub struct DocumentRepository<S: KeyValueRepository> {
    store: S,
    namespace: String,
}

impl<S: KeyValueRepository> DocumentRepository<S> {
    /// Wraps `store` under `config.namespace`.
    ///
    /// Finishes any rename that was interrupted in a previous session.
    ///
    /// # Errors
    /// - `InvalidName` when the namespace does not validate.
    /// - `StorageUnavailable` when recovery cannot read or write the store.
    pub fn try_new(store: S, config: &StoreConfig) -> DocumentResult<Self> {
        config
            .validate()
            .map_err(|_| DocumentError::InvalidName(config.namespace.clone()))?;
        let mut repo = Self {
            store,
            namespace: config.namespace.clone(),
        };
        repo.recover_pending_rename()?;
        Ok(repo)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Substrate key holding the document `name`.
    pub fn document_key(&self, name: &str) -> String {
        format!("{}-{name}", self.namespace)
    }

    /// Saves `diagram` under `name` stamped with the current time.
    pub fn save(&mut self, name: &str, diagram: &Diagram) -> DocumentResult<DocumentSummary> {
        self.save_at(name, diagram, Utc::now())
    }

    /// Saves `diagram` under `name` with an explicit save time.
    ///
    /// # Errors
    /// - `InvalidName` for blank names.
    /// - `StorageUnavailable` when the write fails.
    pub fn save_at(
        &mut self,
        name: &str,
        diagram: &Diagram,
        timestamp: DateTime<Utc>,
    ) -> DocumentResult<DocumentSummary> {
        validate_name(name)?;
        let timestamp = timestamp.trunc_subsecs(3);
        let record = RecordRef {
            diagram,
            timestamp: &timestamp,
        };
        let raw = serde_json::to_string(&record).map_err(|err| DocumentError::Corrupt {
            name: name.to_string(),
            reason: err.to_string(),
        })?;

        let key = self.document_key(name);
        self.store.set(&key, &raw)?;
        debug!(
            "event=document_save module=repo status=ok nodes={} edges={} bytes={}",
            diagram.nodes.len(),
            diagram.edges.len(),
            raw.len()
        );
        Ok(DocumentSummary {
            name: name.to_string(),
            timestamp,
        })
    }

    /// Loads the document stored under `name`.
    ///
    /// # Errors
    /// - `NotFound` when no record exists.
    /// - `Corrupt` when the stored value is not a complete record.
    pub fn load(&self, name: &str) -> DocumentResult<DocumentRecord> {
        validate_name(name)?;
        let raw = self
            .store
            .get(&self.document_key(name))?
            .ok_or_else(|| DocumentError::NotFound(name.to_string()))?;
        parse_record(name, &raw)
    }

    pub fn exists(&self, name: &str) -> DocumentResult<bool> {
        validate_name(name)?;
        Ok(self.store.get(&self.document_key(name))?.is_some())
    }

    /// Lists every document, most recently saved first.
    ///
    /// Corrupt records are skipped, logged and reported in `skipped`.
    pub fn list_all(&mut self) -> DocumentResult<DocumentListing> {
        self.recover_pending_rename()?;

        let mut listing = DocumentListing::default();
        for key in self.store.keys()? {
            let Some(name) = self.name_from_key(&key) else {
                continue;
            };
            let Some(raw) = self.store.get(&key)? else {
                continue;
            };
            match parse_record(name, &raw) {
                Ok(record) => listing.items.push(DocumentSummary {
                    name: name.to_string(),
                    timestamp: record.timestamp,
                }),
                Err(err) => {
                    warn!("event=document_list module=repo status=skip key={key} error={err}");
                    listing.skipped.push(name.to_string());
                }
            }
        }

        listing.items.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.name.cmp(&b.name))
        });
        if !listing.skipped.is_empty() {
            warn!(
                "event=document_list module=repo status=partial listed={} skipped={}",
                listing.items.len(),
                listing.skipped.len()
            );
        }
        Ok(listing)
    }

    /// Most recently saved document, if any.
    pub fn latest(&mut self) -> DocumentResult<Option<DocumentSummary>> {
        Ok(self.list_all()?.items.into_iter().next())
    }

    /// Moves a document to a new name.
    ///
    /// # Errors
    /// - `NameConflict` when `new_name` is taken; both records stay untouched.
    /// - `NotFound` when `old_name` does not exist.
    /// - `StorageUnavailable` when a write fails. If the copy under
    ///   `new_name` was not written the journal is dropped and `old_name` is
    ///   untouched; if only the old key could not be removed the journal stays
    ///   so the next open can finish the move.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> DocumentResult<()> {
        validate_name(old_name)?;
        validate_name(new_name)?;

        let old_key = self.document_key(old_name);
        let new_key = self.document_key(new_name);
        if old_name == new_name {
            return match self.store.get(&old_key)? {
                Some(_) => Ok(()),
                None => Err(DocumentError::NotFound(old_name.to_string())),
            };
        }
        if self.store.get(&new_key)?.is_some() {
            return Err(DocumentError::NameConflict(new_name.to_string()));
        }
        let raw = self
            .store
            .get(&old_key)?
            .ok_or_else(|| DocumentError::NotFound(old_name.to_string()))?;

        let journal = RenameJournal {
            from: old_name.to_string(),
            to: new_name.to_string(),
        };
        let journal_raw = serde_json::to_string(&journal).map_err(|err| DocumentError::Corrupt {
            name: old_name.to_string(),
            reason: err.to_string(),
        })?;
        let journal_key = self.journal_key();

        self.store.set(&journal_key, &journal_raw)?;
        if let Err(err) = self.store.set(&new_key, &raw) {
            if let Err(cleanup) = self.store.remove(&journal_key) {
                warn!(
                    "event=document_rename module=repo status=error stage=journal_cleanup error={cleanup}"
                );
            }
            warn!("event=document_rename module=repo status=error stage=copy error={err}");
            return Err(err.into());
        }
        self.store.remove(&old_key)?;
        self.store.remove(&journal_key)?;

        info!("event=document_rename module=repo status=ok");
        Ok(())
    }

    /// Whether both names exist and hold byte-identical records.
    pub fn same_record(&self, first: &str, second: &str) -> DocumentResult<bool> {
        validate_name(first)?;
        validate_name(second)?;
        let first = self.store.get(&self.document_key(first))?;
        let second = self.store.get(&self.document_key(second))?;
        Ok(matches!((first, second), (Some(a), Some(b)) if a == b))
    }

    /// Deletes a document; deleting a missing name is a no-op.
    pub fn delete(&mut self, name: &str) -> DocumentResult<()> {
        validate_name(name)?;
        let key = self.document_key(name);
        self.store.remove(&key)?;
        info!("event=document_delete module=repo status=ok");
        Ok(())
    }

    /// Returns `prefix` when unused, else `prefix-<n>` one past the highest suffix.
    pub fn next_available_name(&self, prefix: &str) -> DocumentResult<String> {
        validate_name(prefix)?;
        let pattern = format!(r"^{}-(\d+)$", regex::escape(prefix));
        let numbered = Regex::new(&pattern)
            .map_err(|err| DocumentError::InvalidName(format!("{prefix}: {err}")))?;

        let mut prefix_taken = false;
        let mut highest: u64 = 0;
        for key in self.store.keys()? {
            let Some(name) = self.name_from_key(&key) else {
                continue;
            };
            if name == prefix {
                prefix_taken = true;
            } else if let Some(caps) = numbered.captures(name) {
                if let Ok(value) = caps[1].parse::<u64>() {
                    highest = highest.max(value);
                }
            }
        }

        if !prefix_taken {
            return Ok(prefix.to_string());
        }
        Ok(format!("{prefix}-{}", highest.saturating_add(1)))
    }

    /// Completes or abandons a rename interrupted between its writes.
    ///
    /// The old record is removed only while the new key still holds an
    /// identical copy of it; any divergence keeps both documents.
    ///
    /// Returns `true` when a journal entry was found and resolved.
    pub fn recover_pending_rename(&mut self) -> DocumentResult<bool> {
        let journal_key = self.journal_key();
        let Some(raw) = self.store.get(&journal_key)? else {
            return Ok(false);
        };

        match serde_json::from_str::<RenameJournal>(&raw) {
            Ok(journal) => {
                let old_key = self.document_key(&journal.from);
                let new_key = self.document_key(&journal.to);
                let old_raw = self.store.get(&old_key)?;
                let new_raw = self.store.get(&new_key)?;
                match (old_raw, new_raw) {
                    (Some(old), Some(new)) if old == new => {
                        self.store.remove(&old_key)?;
                        info!("event=rename_recover module=repo status=completed");
                    }
                    (None, Some(_)) => {
                        info!("event=rename_recover module=repo status=completed");
                    }
                    _ => {
                        info!("event=rename_recover module=repo status=abandoned");
                    }
                }
            }
            Err(err) => {
                warn!("event=rename_recover module=repo status=skip error={err}");
            }
        }

        self.store.remove(&journal_key)?;
        Ok(true)
    }

    fn journal_key(&self) -> String {
        format!("{}{RENAME_JOURNAL_SUFFIX}", self.namespace)
    }

    fn name_from_key<'k>(&self, key: &'k str) -> Option<&'k str> {
        key.strip_prefix(self.namespace.as_str())?
            .strip_prefix('-')
            .filter(|name| !name.is_empty())
    }
}

fn validate_name(name: &str) -> DocumentResult<()> {
    if name.trim().is_empty() {
        return Err(DocumentError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn parse_record(name: &str, raw: &str) -> DocumentResult<DocumentRecord> {
    serde_json::from_str(raw).map_err(|err| DocumentError::Corrupt {
        name: name.to_string(),
        reason: err.to_string(),
    })
}
