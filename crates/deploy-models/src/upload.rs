//! Items of a bulk library upload.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ModelError, Result};
use crate::naming::parse_name_version;

/// Upload state of one selected file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Pending,
    Uploading,
    Uploaded,
    Failed,
    /// Ignored after a failure; picked up again when the queue is re-run.
    Skipped,
}

impl UploadStatus {
    /// Whether the state machine has an edge `self -> next`.
    pub fn can_move_to(self, next: UploadStatus) -> bool {
        use UploadStatus::*;
        matches!(
            (self, next),
            (Pending, Uploading)
                | (Uploading, Uploaded)
                | (Uploading, Failed)
                | (Failed, Uploading)
                | (Failed, Skipped)
                | (Skipped, Uploading)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Pending => "pending",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Uploaded => "uploaded",
            UploadStatus::Failed => "failed",
            UploadStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file queued for upload.
///
/// `name` and `version` start as a guess parsed from the file name and may
/// be corrected before the upload runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadItem {
    pub file_name: String,
    pub file_size: u64,
    pub name: String,
    pub version: Option<String>,
    pub path: PathBuf,
    status: UploadStatus,
}

impl UploadItem {
    /// Creates a pending item for a file of the given size.
    pub fn new(path: impl Into<PathBuf>, file_size: u64) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (name, version) = parse_name_version(&file_name);
        Self {
            file_name,
            file_size,
            name,
            version,
            path,
            status: UploadStatus::Pending,
        }
    }

    /// Creates a pending item from a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let size = std::fs::metadata(path)?.len();
        Ok(Self::new(path, size))
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    /// Moves the item to `next`, rejecting edges the workflow does not have.
    pub fn transition(&mut self, next: UploadStatus) -> Result<()> {
        if !self.status.can_move_to(next) {
            return Err(ModelError::InvalidTransition {
                file_name: self.file_name.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    pub fn is_uploaded(&self) -> bool {
        self.status == UploadStatus::Uploaded
    }
}
