//! Delivery of exported files.
//!
//! [`DirectorySink`] writes into a directory on disk. Each file is written to
//! a temporary file in the same directory and renamed into place, so readers
//! never observe a partial PNG. [`MemorySink`] keeps files in memory for
//! embedding hosts.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::CaptureError;

/// Receives finished PNG files.
pub trait DeliverySink: Send + Sync {
    /// Hand over `png` under `filename`.
    ///
    /// Returns the written path for sinks backed by the file system.
    fn deliver(&self, filename: &str, png: &[u8]) -> Result<Option<PathBuf>, CaptureError>;
}

/// Writes exports into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DeliverySink for DirectorySink {
    fn deliver(&self, filename: &str, png: &[u8]) -> Result<Option<PathBuf>, CaptureError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);

        let mut file = tempfile::NamedTempFile::new_in(&self.dir)?;
        file.write_all(png)?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|e| e.error)?;

        tracing::debug!(path = %path.display(), bytes = png.len(), "Wrote export");
        Ok(Some(path))
    }
}

/// Keeps delivered files in memory.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivered files in delivery order.
    ///
    /// # Panics
    ///
    /// Panics if the internal `Mutex` is poisoned.
    #[must_use]
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files.lock().unwrap().clone()
    }

    /// # Panics
    ///
    /// Panics if the internal `Mutex` is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DeliverySink for MemorySink {
    fn deliver(&self, filename: &str, png: &[u8]) -> Result<Option<PathBuf>, CaptureError> {
        self.files
            .lock()
            .unwrap()
            .push((filename.to_owned(), png.to_vec()));
        Ok(None)
    }
}
