//! Sidecar persistence
//!
//! Raw bytes live behind [`BlobStore`], an opaque store keyed by file path.
//! On top of it:
//! 1. [`decode_index`] / [`encode_index`]: the JSON codec
//! 2. [`load`] / [`save`]: whole-file read and replace
//! 3. [`load_or_default`]: first-run recovery for a missing sidecar

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{IndexError, Result, TagIndex};

// ============================================================================
// Blob stores
// ============================================================================

/// Byte storage keyed by path.
pub trait BlobStore {
    /// Full contents at `path`, or [`IndexError::NotFound`] if nothing is there.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Replace the contents at `path` wholesale.
    fn write(&mut self, path: &Path, bytes: &[u8]) -> Result<()>;
}

/// Plain filesystem store. No locking and no atomic rename.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsBlobStore;

impl BlobStore for FsBlobStore {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => IndexError::NotFound {
                path: path.to_path_buf(),
            },
            _ => IndexError::Io {
                path: path.to_path_buf(),
                source,
            },
        })
    }

    fn write(&mut self, path: &Path, bytes: &[u8]) -> Result<()> {
        fs::write(path, bytes).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// In-memory store, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.blobs.contains_key(path)
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.blobs
            .get(path)
            .cloned()
            .ok_or_else(|| IndexError::NotFound {
                path: path.to_path_buf(),
            })
    }

    fn write(&mut self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.blobs.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}

// ============================================================================
// Codec
// ============================================================================

/// Decode a sidecar payload.
///
/// Empty or whitespace-only payloads (a freshly `touch`ed file) and a JSON
/// `null` decode to an empty index. Duplicate paths are kept as stored.
pub fn decode_index(bytes: &[u8]) -> Result<TagIndex> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(TagIndex::new());
    }
    let index: Option<TagIndex> = serde_json::from_slice(bytes).map_err(IndexError::Decode)?;
    Ok(index.unwrap_or_default())
}

pub fn encode_index(index: &TagIndex) -> Result<Vec<u8>> {
    serde_json::to_vec(index).map_err(IndexError::Encode)
}

// ============================================================================
// Load / Save
// ============================================================================

/// Outcome of [`load_or_default`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Loaded {
    pub index: TagIndex,
    /// `false` when no sidecar existed and `index` is a fresh empty one.
    pub initialized: bool,
}

pub fn load<S: BlobStore + ?Sized>(store: &S, path: &Path) -> Result<TagIndex> {
    let bytes = store.read(path)?;
    let index = decode_index(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        bytes = bytes.len(),
        records = index.len(),
        "loaded tag index"
    );
    Ok(index)
}

/// Like [`load`], but a missing sidecar becomes an empty, uninitialized index.
pub fn load_or_default<S: BlobStore + ?Sized>(store: &S, path: &Path) -> Result<Loaded> {
    match load(store, path) {
        Ok(index) => Ok(Loaded {
            index,
            initialized: true,
        }),
        Err(IndexError::NotFound { path }) => {
            tracing::warn!(path = %path.display(), "no tag index yet; starting empty");
            Ok(Loaded {
                index: TagIndex::new(),
                initialized: false,
            })
        }
        Err(e) => Err(e),
    }
}

pub fn save<S: BlobStore + ?Sized>(store: &mut S, path: &Path, index: &TagIndex) -> Result<()> {
    let bytes = encode_index(index)?;
    store.write(path, &bytes)?;
    tracing::debug!(
        path = %path.display(),
        bytes = bytes.len(),
        records = index.len(),
        "saved tag index"
    );
    Ok(())
}
