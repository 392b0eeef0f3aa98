//! store
//!
//! Key-value persistence for graphs.
//!
//! # Architecture
//!
//! The editor persists the whole graph as one JSON document per key, under
//! a fixed application key by default. [`GraphStore`] is the seam the
//! editor works against; [`JsonFileStore`] is the file-backed
//! implementation and [`MemoryStore`] backs tests.
//!
//! Documents are wrapped in a versioned envelope so future layout changes
//! can be migrated on load. Writes go to a temporary file first and then
//! rename over the target, under an OS-level exclusive lock, so a crashed
//! or concurrent writer can never leave a half-written document behind.
//!
//! # Invariants
//!
//! - A successful `load` returns exactly what the last successful `save`
//!   for that key wrote
//! - `load` of an unknown key is `Ok(None)`, not an error

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::graph::Graph;

/// The application key the editor persists under.
pub const DEFAULT_STORE_KEY: &str = "dd_graph_v1";

/// Current persisted-document layout version.
const SCHEMA_VERSION: u32 = 1;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store keys name files; restrict them to a safe character set.
    #[error("invalid store key: {0:?}")]
    InvalidKey(String),

    /// The on-disk document uses a layout this build does not understand.
    #[error("unsupported document version {found} (supported: {SCHEMA_VERSION})")]
    UnsupportedVersion { found: u32 },

    /// Failed to parse or serialize the document.
    #[error("document serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O failure reading, writing, or locking.
    #[error("store i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Versioned on-disk envelope around a graph.
#[derive(Debug, Serialize, Deserialize)]
struct Document {
    version: u32,
    graph: Graph,
}

/// The persistence seam the editor works against.
pub trait GraphStore {
    /// Persist `graph` under `key`, replacing any previous document.
    fn save(&self, key: &str, graph: &Graph) -> Result<(), StoreError>;

    /// Load the graph stored under `key`, or `None` if nothing is stored.
    fn load(&self, key: &str) -> Result<Option<Graph>, StoreError>;
}

/// One JSON document per key under a base directory.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created on first
    /// save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn document_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    /// Acquire the store-wide exclusive lock. Released when the returned
    /// file handle drops.
    fn lock(&self) -> Result<File, StoreError> {
        let lock_path = self.dir.join(".lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(lock_path)?;
        file.lock_exclusive()?;
        Ok(file)
    }
}

impl GraphStore for JsonFileStore {
    fn save(&self, key: &str, graph: &Graph) -> Result<(), StoreError> {
        let path = self.document_path(key)?;
        fs::create_dir_all(&self.dir)?;
        let _lock = self.lock()?;

        let document = Document {
            version: SCHEMA_VERSION,
            graph: graph.clone(),
        };
        let json = serde_json::to_string_pretty(&document)?;

        // Write-then-rename keeps the previous document intact until the
        // new one is complete.
        let staging = path.with_extension("json.tmp");
        {
            let mut file = File::create(&staging)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&staging, &path)?;
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Graph>, StoreError> {
        let path = self.document_path(key)?;
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let document: Document = serde_json::from_str(&raw)?;
        if document.version != SCHEMA_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: document.version,
            });
        }
        Ok(Some(document.graph))
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    graphs: Mutex<HashMap<String, Graph>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn graphs(&self) -> std::sync::MutexGuard<'_, HashMap<String, Graph>> {
        // A poisoned map still holds the last consistent save.
        self.graphs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl GraphStore for MemoryStore {
    fn save(&self, key: &str, graph: &Graph) -> Result<(), StoreError> {
        validate_key(key)?;
        self.graphs().insert(key.to_string(), graph.clone());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Graph>, StoreError> {
        validate_key(key)?;
        Ok(self.graphs().get(key).cloned())
    }
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
