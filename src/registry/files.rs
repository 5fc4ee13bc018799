use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{mime, uri, Keyed, KeyedRecords};

/// Content digest attached to a file record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fingerprint {
    pub value: String,
    pub algorithm: &'static str,
}

/// Pure content hash used for fingerprints.
pub type HashFn = fn(&[u8]) -> Fingerprint;

/// SHA-256 of the file bytes, lowercase hex.
pub fn sha256_fingerprint(bytes: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    Fingerprint {
        value: format!("{:x}", hasher.finalize()),
        algorithm: "sha-256",
    }
}

/// A source file referenced somewhere in a run. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub uri: String,
    pub mime_type: Option<&'static str>,
    pub fingerprint: Option<Fingerprint>,
}

impl Keyed for FileRecord {
    fn key(&self) -> &str {
        &self.uri
    }
}

/// Deduplicates source files by canonical URI for one run.
///
/// Every path an adapter sees goes through [`FileRegistry::resolve`], so the
/// registry ends up holding exactly the files the run's output refers to.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    project_root: PathBuf,
    hasher: Option<HashFn>,
    records: KeyedRecords<FileRecord>,
}

impl FileRegistry {
    /// `hasher` is `None` when fingerprinting is disabled for the run.
    pub fn new(project_root: impl Into<PathBuf>, hasher: Option<HashFn>) -> Self {
        FileRegistry {
            project_root: project_root.into(),
            hasher,
            records: KeyedRecords::default(),
        }
    }

    /// Resolve an analyzer-reported path to its canonical URI, registering
    /// a record the first time the URI is seen.
    ///
    /// Never fails: a path that exists neither under the project root nor
    /// on its own still maps to a deterministic URI, just without a
    /// fingerprint.
    pub fn resolve(&mut self, raw_path: &str) -> String {
        let (resolved, on_disk) = self.locate(raw_path);
        let file_uri = uri::to_file_uri(&resolved);

        if self.records.contains(&file_uri) {
            return file_uri;
        }

        let fingerprint = match (self.hasher, &on_disk) {
            (Some(hash), Some(path)) => match std::fs::read(path) {
                Ok(bytes) => Some(hash(&bytes)),
                Err(e) => {
                    debug!("No fingerprint for {}: {}", path.display(), e);
                    None
                }
            },
            _ => None,
        };

        if on_disk.is_none() {
            debug!("Not on disk, registering without fingerprint: {}", raw_path);
        }

        self.records.insert_if_absent(FileRecord {
            uri: file_uri.clone(),
            mime_type: mime::mime_type_of(&file_uri),
            fingerprint,
        });
        file_uri
    }

    /// Join against the project root, falling back to the raw path when the
    /// joined path is missing. Returns the lexically normalized path for the
    /// URI and, when the file exists, the path as given for reading it.
    ///
    /// Existence is checked before normalizing: `link/../x.c` must follow
    /// the symlink the way the file system does.
    fn locate(&self, raw_path: &str) -> (PathBuf, Option<PathBuf>) {
        let joined = self.project_root.join(raw_path);
        if joined.exists() {
            return (uri::normalize_lexically(&joined), Some(joined));
        }
        let raw = Path::new(raw_path);
        let on_disk = (raw.is_absolute() && raw.exists()).then(|| raw.to_path_buf());
        (uri::normalize_lexically(raw), on_disk)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.records.contains(uri)
    }

    #[cfg(test)]
    pub fn get(&self, uri: &str) -> Option<&FileRecord> {
        self.records.get(uri)
    }

    pub fn into_records(self) -> KeyedRecords<FileRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
