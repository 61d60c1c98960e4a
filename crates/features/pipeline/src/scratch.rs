//! Per-request scratch directories.
//!
//! Each request gets `<root>/<contract id>-<random>/`, created with exclusive-create
//! semantics. The directory tree is removed when the [`ScratchSpace`] is dropped; call
//! [`ScratchSpace::release`] on the normal path to surface removal failures in the logs.

use crate::error::{PipelineError, PipelineErrorExt};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use tforge_composer::GeneratedArtifact;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct ScratchSpace {
    dir: TempDir,
    source: PathBuf,
}

impl ScratchSpace {
    /// Creates the directory under `root` (created if missing) and writes the artifact.
    ///
    /// # Errors
    /// [`PipelineError::Persist`] on any filesystem failure; nothing is left behind.
    pub fn persist(root: &Path, artifact: &GeneratedArtifact) -> Result<Self, PipelineError> {
        fs::create_dir_all(root).context("creating scratch root")?;

        let dir = tempfile::Builder::new()
            .prefix(&format!("{}-", artifact.contract_id))
            .tempdir_in(root)
            .context("creating scratch directory")?;

        let source = dir.path().join(artifact.file_name());
        fs::write(&source, artifact.source.as_bytes()).context("writing contract source")?;

        debug!(path = %dir.path().display(), "Persisted contract source");
        Ok(Self { dir, source })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of the written `contract_<id>.py`.
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source
    }

    /// Removes the directory tree now, logging instead of failing.
    pub fn release(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!(path = %path.display(), "Released scratch directory"),
            Err(err) => warn!(path = %path.display(), error = %err, "Failed to remove scratch directory"),
        }
    }
}

/// Removes scratch directories under `root` left behind by an earlier process.
///
/// Only entries named like `<contract id>-…` and last modified more than `older_than`
/// ago are touched. Returns how many were removed.
///
/// # Errors
/// [`PipelineError::Persist`] if `root` exists but cannot be listed.
pub fn sweep_stale(root: &Path, older_than: Duration) -> Result<usize, PipelineError> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(err) => return Err(err).context("listing scratch root"),
    };

    let now = SystemTime::now();
    let mut removed = 0;

    for entry in entries.flatten() {
        let path = entry.path();
        let is_scratch = entry.file_name().to_str().is_some_and(|name| {
            name.split_once('-').is_some_and(|(id, _)| tforge_kernel::is_contract_id(id))
        });
        if !is_scratch || !path.is_dir() {
            continue;
        }

        let age = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok());
        if !age.is_some_and(|age| age >= older_than) {
            continue;
        }

        match fs::remove_dir_all(&path) {
            Ok(()) => removed += 1,
            Err(err) => warn!(path = %path.display(), error = %err, "Failed to sweep stale scratch directory"),
        }
    }

    Ok(removed)
}
