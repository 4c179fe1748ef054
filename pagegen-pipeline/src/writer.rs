//! Phase 3: persist rendered pages.
//!
//! ## `OutputWriter::write` protocol
//!
//! 1. SHA-256 the rendered content.
//! 2. Stream the existing destination (if any) through SHA-256 and compare;
//!    identical content is `Unchanged` and the file is left alone.
//! 3. In dry-run mode stop here with `WouldWrite`.
//! 4. Create the output directory (already existing is success, also when a
//!    sibling task created it a moment ago).
//! 5. Write to `<file>.pagegen.tmp`.
//! 6. Rename over the destination; on failure remove the temp file.

use std::fs::File;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{write_err, TaskError};

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File already held exactly this content.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path } => path,
        }
    }
}

// ---------------------------------------------------------------------------
// OutputWriter
// ---------------------------------------------------------------------------

/// Writes documents into one output directory. Cheap to clone.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
    dry_run: bool,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>, dry_run: bool) -> Self {
        OutputWriter {
            dir: dir.into(),
            dry_run,
        }
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Write `content` to `<dir>/<filename>`, replacing what is there.
    pub fn write(&self, filename: &str, content: &str) -> Result<WriteResult, TaskError> {
        let path = self.path_for(filename);
        let tmp = PathBuf::from(format!("{}.pagegen.tmp", path.display()));
        self.write_with_tmp(filename, &path, &tmp, content)
    }

    fn write_with_tmp(
        &self,
        filename: &str,
        path: &Path,
        tmp: &Path,
        content: &str,
    ) -> Result<WriteResult, TaskError> {
        let digest = hex::encode(Sha256::digest(content.as_bytes()));
        if existing_digest(path).as_deref() == Some(digest.as_str()) {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }

        if self.dry_run {
            tracing::info!("[dry-run] would write: {}", path.display());
            return Ok(WriteResult::WouldWrite {
                path: path.to_path_buf(),
            });
        }

        ensure_dir(&self.dir).map_err(|e| write_err(filename, e))?;
        std::fs::write(tmp, content).map_err(|e| write_err(filename, e))?;

        if let Err(e) = std::fs::rename(tmp, path) {
            let _ = std::fs::remove_file(tmp);
            return Err(write_err(filename, e));
        }

        tracing::debug!("wrote: {}", path.display());
        Ok(WriteResult::Written {
            path: path.to_path_buf(),
        })
    }
}

/// Create `dir` and its parents; an existing directory is success.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    match std::fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(e),
    }
}

/// Hex SHA-256 of the file at `path`, or `None` if it cannot be read.
fn existing_digest(path: &Path) -> Option<String> {
    let mut file = File::open(path).ok()?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).ok()?;
    Some(hex::encode(hasher.finalize()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
