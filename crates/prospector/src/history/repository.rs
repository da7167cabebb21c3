use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use super::domain::{AnalysisId, AnalysisRecord};

/// Storage abstraction so the service can run against memory or disk.
///
/// `all` returns records in insertion order; listing queries sort on top.
pub trait AnalysisRepository: Send + Sync {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError>;
    fn fetch(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError>;
    fn all(&self) -> Result<Vec<AnalysisRecord>, RepositoryError>;
    fn delete(&self, id: &AnalysisId) -> Result<(), RepositoryError>;
    fn clear(&self) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("analysis already exists")]
    Conflict,
    #[error("analysis not found")]
    NotFound,
    #[error("history storage unavailable: {0}")]
    Unavailable(String),
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("history lock poisoned".to_string()))
}

fn insert_into(
    records: &mut Vec<AnalysisRecord>,
    record: AnalysisRecord,
) -> Result<AnalysisRecord, RepositoryError> {
    if records.iter().any(|existing| existing.id == record.id) {
        return Err(RepositoryError::Conflict);
    }
    records.push(record.clone());
    Ok(record)
}

fn remove_from(records: &mut Vec<AnalysisRecord>, id: &AnalysisId) -> Result<(), RepositoryError> {
    let before = records.len();
    records.retain(|record| &record.id != id);
    if records.len() == before {
        Err(RepositoryError::NotFound)
    } else {
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryAnalysisRepository {
    records: Arc<Mutex<Vec<AnalysisRecord>>>,
}

impl AnalysisRepository for InMemoryAnalysisRepository {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        let mut records = lock(&self.records)?;
        insert_into(&mut records, record)
    }

    fn fetch(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn all(&self) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        Ok(lock(&self.records)?.clone())
    }

    fn delete(&self, id: &AnalysisId) -> Result<(), RepositoryError> {
        let mut records = lock(&self.records)?;
        remove_from(&mut records, id)
    }

    fn clear(&self) -> Result<(), RepositoryError> {
        lock(&self.records)?.clear();
        Ok(())
    }
}

/// History persisted as a JSON array, rewritten in full after each change.
#[derive(Debug)]
pub struct JsonFileAnalysisRepository {
    path: PathBuf,
    records: Mutex<Vec<AnalysisRecord>>,
}

impl JsonFileAnalysisRepository {
    /// Load existing history from `path`; a missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let records = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
                RepositoryError::Unavailable(format!(
                    "{} is not valid history: {err}",
                    path.display()
                ))
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                return Err(RepositoryError::Unavailable(format!(
                    "unable to read {}: {err}",
                    path.display()
                )))
            }
        };

        debug!(path = %path.display(), records = records.len(), "loaded analysis history");
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &[AnalysisRecord]) -> Result<(), RepositoryError> {
        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).map_err(|err| self.unavailable(err))?;
        }

        let body = serde_json::to_vec_pretty(records).map_err(|err| self.unavailable(err))?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, body).map_err(|err| self.unavailable(err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.unavailable(err))?;
        Ok(())
    }

    fn unavailable(&self, err: impl std::fmt::Display) -> RepositoryError {
        RepositoryError::Unavailable(format!("{}: {err}", self.path.display()))
    }

    /// Apply `change` and write the file; memory is only updated when the
    /// write succeeds.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Vec<AnalysisRecord>) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let mut next = guard.clone();
        let outcome = change(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(outcome)
    }
}

impl AnalysisRepository for JsonFileAnalysisRepository {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        self.mutate(|records| insert_into(records, record))
    }

    fn fetch(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn all(&self) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        Ok(lock(&self.records)?.clone())
    }

    fn delete(&self, id: &AnalysisId) -> Result<(), RepositoryError> {
        self.mutate(|records| remove_from(records, id))
    }

    fn clear(&self) -> Result<(), RepositoryError> {
        self.mutate(|records| {
            records.clear();
            Ok(())
        })
    }
}
