//! Blob storage and the versioned blob encoding.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::hash::hash_bytes;
use crate::IncrementalLog;

/// Leading bytes of every cache blob.
pub const MAGIC: [u8; 4] = *b"TTHR";

/// Bumped whenever the payload layout changes.
pub const FORMAT_VERSION: u32 = 1;

const HEADER_LEN: usize = 16;

/// Failure to read, write, or decode a cache blob.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to read `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cache blob is truncated ({0} bytes)")]
    Truncated(usize),
    #[error("not a tether cache blob")]
    BadMagic,
    #[error("cache format version {found} is not supported (expected {expected})")]
    Version { found: u32, expected: u32 },
    #[error("cache checksum mismatch")]
    Checksum,
    #[error("failed to encode cache: {0}")]
    Encode(#[source] bincode::Error),
    #[error("failed to decode cache: {0}")]
    Decode(#[source] bincode::Error),
}

/// Somewhere a single cache blob lives.
pub trait BlobStore {
    /// The stored bytes, or `None` if nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<u8>>, CacheError>;

    /// Replace the stored bytes.
    fn store(&mut self, bytes: &[u8]) -> Result<(), CacheError>;

    /// Short description for diagnostics.
    fn describe(&self) -> String;
}

/// A blob in one file.
///
/// Writes go to a sibling temp file that is then renamed over the target,
/// so an interrupted write leaves the previous blob intact.
#[derive(Clone, Debug)]
pub struct FileBlob {
    path: PathBuf,
}

impl FileBlob {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileBlob { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl BlobStore for FileBlob {
    fn load(&self) -> Result<Option<Vec<u8>>, CacheError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn store(&mut self, bytes: &[u8]) -> Result<(), CacheError> {
        let write_err = |source| CacheError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let temp = self.temp_path();
        fs::write(&temp, bytes).map_err(write_err)?;
        fs::rename(&temp, &self.path).map_err(write_err)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// An in-memory blob.
#[derive(Clone, Debug, Default)]
pub struct MemoryBlob {
    bytes: Option<Vec<u8>>,
}

impl MemoryBlob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        MemoryBlob { bytes: Some(bytes) }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }
}

impl BlobStore for MemoryBlob {
    fn load(&self) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.bytes.clone())
    }

    fn store(&mut self, bytes: &[u8]) -> Result<(), CacheError> {
        self.bytes = Some(bytes.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

/// Serialize a log into a blob: header, then bincode payload.
pub fn encode(log: &IncrementalLog) -> Result<Vec<u8>, CacheError> {
    let payload = bincode::serialize(log).map_err(CacheError::Encode)?;
    let checksum = hash_bytes(&payload);

    let mut blob = Vec::with_capacity(HEADER_LEN + payload.len());
    blob.extend_from_slice(&MAGIC);
    blob.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    blob.extend_from_slice(&checksum.value().to_le_bytes());
    blob.extend_from_slice(&payload);
    Ok(blob)
}

/// Check a blob's header and checksum, then deserialize the log.
pub fn decode(blob: &[u8]) -> Result<IncrementalLog, CacheError> {
    if blob.len() < HEADER_LEN {
        return Err(CacheError::Truncated(blob.len()));
    }
    let (header, payload) = blob.split_at(HEADER_LEN);
    if header[..4] != MAGIC {
        return Err(CacheError::BadMagic);
    }

    let mut version = [0u8; 4];
    version.copy_from_slice(&header[4..8]);
    let version = u32::from_le_bytes(version);
    if version != FORMAT_VERSION {
        return Err(CacheError::Version {
            found: version,
            expected: FORMAT_VERSION,
        });
    }

    let mut checksum = [0u8; 8];
    checksum.copy_from_slice(&header[8..16]);
    if hash_bytes(payload).value() != u64::from_le_bytes(checksum) {
        return Err(CacheError::Checksum);
    }

    bincode::deserialize(payload).map_err(CacheError::Decode)
}

#[cfg(test)]
mod tests;
