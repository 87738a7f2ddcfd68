//! Draft persistence for the institution wizard.
//!
//! [`DraftStore`] keeps the in-progress form in a key/value string storage
//! under a single fixed key. The storage itself is injected through the
//! [`DraftStorage`] trait: [`FileStorage`] for real use, [`MemoryStorage`]
//! for tests and throwaway sessions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::types::Timestamp;

use super::form::{InstitutionForm, MediaFields};

/// Storage key the wizard draft lives under.
pub const DRAFT_KEY: &str = "institution_wizard_draft";

// ---------------------------------------------------------------------------
// Storage backends
// ---------------------------------------------------------------------------

/// Key/value string storage scoped to one local profile.
pub trait DraftStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError>;
    fn remove(&mut self, key: &str) -> Result<(), CoreError>;
}

/// In-memory storage. Contents die with the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw access for tests that need to plant or inspect stored strings.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl DraftStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Directory-backed storage: one `<key>.json` file per key.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, CoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

/// Keys become file names, so only `[A-Za-z0-9_-]` is allowed.
fn validate_key(key: &str) -> Result<(), CoreError> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid storage key '{key}'. Only letters, digits, '_' and '-' are allowed"
        )))
    }
}

impl DraftStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Draft store
// ---------------------------------------------------------------------------

/// What actually gets written under [`DRAFT_KEY`].
#[derive(Debug, Serialize)]
struct DraftEnvelope<'a> {
    saved_at: Timestamp,
    form: &'a InstitutionForm,
}

/// Loads, saves and clears the wizard draft.
#[derive(Debug)]
pub struct DraftStore<S> {
    storage: S,
}

impl<S: DraftStorage> DraftStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Load the draft merged field by field over a fresh default form.
    ///
    /// A missing draft, an unreadable storage, or a blob that is not a JSON
    /// object all yield the defaults. Inside a readable draft, fields that
    /// are missing or whose stored value no longer fits the field's type
    /// take their default values; every other field is kept.
    pub fn load(&self) -> InstitutionForm {
        let raw = match self.storage.get(DRAFT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return InstitutionForm::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read wizard draft, starting fresh");
                return InstitutionForm::default();
            }
        };

        let envelope = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(envelope)) => envelope,
            Ok(_) => {
                tracing::warn!("Discarding wizard draft that is not a JSON object");
                return InstitutionForm::default();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding corrupted wizard draft");
                return InstitutionForm::default();
            }
        };

        if let Some(saved_at) = envelope.get("saved_at").and_then(Value::as_str) {
            tracing::debug!(saved_at, "Restoring wizard draft");
        }
        merge_form(envelope.get("form"))
    }

    /// Whether anything is stored under the draft key.
    pub fn has_draft(&self) -> bool {
        matches!(self.storage.get(DRAFT_KEY), Ok(Some(_)))
    }

    /// Persist the serializable part of the form. Media files are never
    /// written.
    pub fn save(&mut self, form: &InstitutionForm) -> Result<(), CoreError> {
        let envelope = DraftEnvelope {
            saved_at: Utc::now(),
            form,
        };
        let raw = serde_json::to_string(&envelope)
            .map_err(|e| CoreError::Internal(format!("Failed to serialize draft: {e}")))?;
        self.storage.set(DRAFT_KEY, &raw)
    }

    /// Remove the stored draft.
    pub fn clear(&mut self) -> Result<(), CoreError> {
        self.storage.remove(DRAFT_KEY)
    }
}

fn merge_form(saved: Option<&Value>) -> InstitutionForm {
    InstitutionForm {
        identity: merge_group("identity", saved.and_then(|f| f.get("identity"))),
        academics: merge_group("academics", saved.and_then(|f| f.get("academics"))),
        infrastructure: merge_group(
            "infrastructure",
            saved.and_then(|f| f.get("infrastructure")),
        ),
        contact: merge_group("contact", saved.and_then(|f| f.get("contact"))),
        media: MediaFields::default(),
    }
}

/// Overlay each stored field of one group onto the group's defaults.
///
/// A field is kept only if the group still deserializes with it in place.
/// Unknown fields are ignored.
fn merge_group<T>(group: &'static str, saved: Option<&Value>) -> T
where
    T: Default + Serialize + DeserializeOwned,
{
    let Some(Value::Object(saved)) = saved else {
        return T::default();
    };
    let Ok(Value::Object(mut merged)) = serde_json::to_value(T::default()) else {
        return T::default();
    };

    for (field, value) in saved {
        let Some(previous) = merged.insert(field.clone(), value.clone()) else {
            merged.remove(field);
            continue;
        };
        if serde_json::from_value::<T>(Value::Object(merged.clone())).is_err() {
            tracing::warn!(group, field = %field, "Dropping draft field with a stale value");
            merged.insert(field.clone(), previous);
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
