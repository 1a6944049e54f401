//! Snapshot storage: one opaque blob per tournament id.

use crate::models::TournamentId;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

/// Errors surfaced by a [`TournamentStore`].
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
    /// Id cannot be used as a storage key.
    InvalidKey(TournamentId),
    /// Lock poisoned inside the store.
    Poisoned,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "Storage I/O error: {}", e),
            StoreError::Serialize(e) => write!(f, "Snapshot encoding error: {}", e),
            StoreError::InvalidKey(id) => write!(f, "Invalid tournament id for storage: {:?}", id),
            StoreError::Poisoned => write!(f, "Store lock error"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialize(e)
    }
}

/// Key/value persistence of tournament snapshots.
pub trait TournamentStore: Send + Sync {
    /// Every stored snapshot.
    fn load_all(&self) -> Result<Vec<Vec<u8>>, StoreError>;

    /// Store (or replace) the snapshot for `id`.
    fn save(&self, id: &str, snapshot: &[u8]) -> Result<(), StoreError>;
}

/// Snapshots kept in memory only.
#[derive(Default)]
pub struct MemoryStore {
    snapshots: RwLock<HashMap<TournamentId, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Vec<u8>> {
        self.snapshots.read().ok()?.get(id).cloned()
    }
}

impl TournamentStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        let g = self.snapshots.read().map_err(|_| StoreError::Poisoned)?;
        Ok(g.values().cloned().collect())
    }

    fn save(&self, id: &str, snapshot: &[u8]) -> Result<(), StoreError> {
        let mut g = self.snapshots.write().map_err(|_| StoreError::Poisoned)?;
        g.insert(id.to_string(), snapshot.to_vec());
        Ok(())
    }
}

/// One `<id>.json` file per tournament in a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) the snapshot directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        let bad = id.is_empty()
            || id == "."
            || id == ".."
            || id.contains(&['/', '\\'][..])
            || id.contains('\0');
        if bad {
            return Err(StoreError::InvalidKey(id.to_string()));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

impl TournamentStore for FileStore {
    fn load_all(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                out.push(fs::read(&path)?);
            }
        }
        Ok(out)
    }

    fn save(&self, id: &str, snapshot: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(id)?;
        // Write then rename so a crash never leaves a half-written snapshot.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, snapshot)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}
