//! On-disk store for the last observed job set.
//!
//! The snapshot is the only durable state. Its absence means no baseline
//! has been recorded yet; a snapshot that exists but cannot be read back is
//! an error, never a fresh start.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{CoreError, Result};
use crate::record::JobRecordSet;

pub struct SnapshotStore {
    /// Directory holding the snapshot file; `file` may add subdirectories
    /// below the configured folder.
    dir: PathBuf,
    path: PathBuf,
    tmp_path: PathBuf,
}

impl SnapshotStore {
    pub fn new(folder: impl Into<PathBuf>, file: &str) -> Self {
        let folder = folder.into();
        let path = folder.join(file);
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| folder.clone());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.to_string());
        let tmp_path = dir.join(format!(".{name}.tmp"));
        Self {
            dir,
            path,
            tmp_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted job set.
    ///
    /// Returns `Ok(None)` when the folder or the file does not exist yet,
    /// creating the folder on the way. Unreadable or malformed content is
    /// reported as [`CoreError::SnapshotCorrupt`].
    pub fn load(&self) -> Result<Option<JobRecordSet>> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
            info!(folder = %self.dir.display(), "created snapshot folder");
            return Ok(None);
        }
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no snapshot yet");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| CoreError::SnapshotCorrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        let records: JobRecordSet =
            serde_json::from_str(&content).map_err(|e| CoreError::SnapshotCorrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        debug!(path = %self.path.display(), jobs = records.len(), "loaded snapshot");
        Ok(Some(records))
    }

    /// Atomically replace the snapshot with `records`.
    ///
    /// Writes to a `.tmp` sibling first, then renames over the final path so
    /// a crash never leaves a truncated snapshot behind.
    pub fn save(&self, records: &JobRecordSet) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(records)
            .map_err(|e| CoreError::SnapshotEncode(e.to_string()))?;
        fs::write(&self.tmp_path, json)?;
        fs::rename(&self.tmp_path, &self.path)?;

        info!(path = %self.path.display(), jobs = records.len(), "wrote snapshot");
        Ok(())
    }
}
