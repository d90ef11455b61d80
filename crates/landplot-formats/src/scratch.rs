//! Scoped scratch directories for archive import and export
//!
//! A `ScratchDir` owns a fresh temporary directory that is removed when the
//! value is dropped, whichever way the surrounding operation exits.

use landplot_core::error::{LandplotError, Result};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("landplot-").tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a file directly inside the scratch directory
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Unpack a zip archive into the scratch directory
    ///
    /// Entries whose names would escape the directory are skipped. Returns the
    /// number of files written.
    pub fn extract_zip(&self, bytes: &[u8]) -> Result<usize> {
        let mut archive =
            ZipArchive::new(Cursor::new(bytes)).map_err(|e| LandplotError::format("Zip", e))?;
        let mut written = 0;

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| LandplotError::format("Zip", e))?;

            let Some(relative) = entry.enclosed_name() else {
                tracing::warn!(entry = %entry.name(), "Skipping archive entry outside extraction root");
                continue;
            };
            let target = self.path().join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&target)?;
                continue;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = fs::File::create(&target)?;
            std::io::copy(&mut entry, &mut file)?;
            written += 1;
        }

        tracing::debug!(entries = archive.len(), files = written, "Extracted archive");
        Ok(written)
    }

    /// First file with the given extension (case-insensitive)
    ///
    /// Each directory's files are checked in name order before its
    /// subdirectories are searched, also in name order.
    pub fn find_first(&self, extension: &str) -> Result<Option<PathBuf>> {
        find_first_in(self.path(), extension)
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

fn find_first_in(dir: &Path, extension: &str) -> Result<Option<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    let (dirs, files): (Vec<PathBuf>, Vec<PathBuf>) = entries.into_iter().partition(|p| p.is_dir());

    if let Some(found) = files.into_iter().find(|p| has_extension(p, extension)) {
        return Ok(Some(found));
    }
    for sub in dirs {
        if let Some(found) = find_first_in(&sub, extension)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}
