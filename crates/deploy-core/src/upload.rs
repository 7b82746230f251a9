//! Bulk library upload.
//!
//! Selected jars are uploaded one at a time, strictly in order. A failure
//! halts the queue and asks the [`Prompter`] whether to retry the file,
//! ignore it, or abort. Re-running the workflow skips files already
//! uploaded.

use std::path::PathBuf;

use deploy_models::{Library, UploadItem, UploadStatus};
use tracing::{debug, info, warn};

use crate::content;
use crate::error::Result;
use crate::gateway::DeployApi;
use crate::libraries::LibraryGrid;
use crate::phrases::PhraseBook;
use crate::prompt::{Prompter, UploadDecision};
use crate::session::TaskScope;

/// How a run of the workflow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Every file is uploaded.
    Finished,
    /// Some files are failed, skipped or were never reached.
    Halted,
}

/// Queue of files for one bulk upload.
#[derive(Debug, Clone, Default)]
pub struct UploadWorkflow {
    items: Vec<UploadItem>,
}

impl UploadWorkflow {
    pub fn new(items: Vec<UploadItem>) -> Self {
        Self { items }
    }

    /// Queue files from disk, guessing names and versions.
    pub fn from_paths(paths: &[PathBuf]) -> Result<Self> {
        let items = paths
            .iter()
            .map(UploadItem::from_path)
            .collect::<std::io::Result<Vec<_>>>()?;
        Ok(Self::new(items))
    }

    pub fn items(&self) -> &[UploadItem] {
        &self.items
    }

    /// Items are editable until the upload runs (name/version correction).
    pub fn item_mut(&mut self, index: usize) -> Option<&mut UploadItem> {
        self.items.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True only when every item is uploaded.
    pub fn is_finished(&self) -> bool {
        self.items.iter().all(UploadItem::is_uploaded)
    }

    /// Upload every item not yet uploaded, in order.
    ///
    /// Successful uploads are overlaid onto `grid`. Only model errors
    /// (which indicate a bug) are returned; request failures go through
    /// `prompter`.
    pub async fn run(
        &mut self,
        api: &dyn DeployApi,
        scope: TaskScope<'_>,
        grid: &mut LibraryGrid,
        prompter: &dyn Prompter,
        phrases: &PhraseBook,
    ) -> Result<UploadOutcome> {
        let mut index = 0;
        while index < self.items.len() {
            if self.items[index].is_uploaded() {
                index += 1;
                continue;
            }

            prompter.notify(&format!(
                "{} {}",
                phrases.lookup("Uploading:"),
                self.items[index].file_name
            ));
            self.items[index].transition(UploadStatus::Uploading)?;

            match upload_one(api, scope, grid, &self.items[index]).await {
                Ok(()) => {
                    self.items[index].transition(UploadStatus::Uploaded)?;
                    index += 1;
                }
                Err(e) => {
                    warn!(file = %self.items[index].file_name, error = %e, "upload failed");
                    self.items[index].transition(UploadStatus::Failed)?;
                    match prompter.upload_failed(&self.items[index], &e).await {
                        UploadDecision::Retry => {
                            debug!(file = %self.items[index].file_name, "retrying upload");
                        }
                        UploadDecision::Ignore => {
                            self.items[index].transition(UploadStatus::Skipped)?;
                            index += 1;
                        }
                        UploadDecision::Abort => {
                            info!(remaining = self.items.len() - index, "upload aborted");
                            return Ok(UploadOutcome::Halted);
                        }
                    }
                }
            }
        }

        if self.is_finished() {
            info!(count = self.items.len(), "upload finished");
            prompter.notify(phrases.lookup("Upload finished"));
            Ok(UploadOutcome::Finished)
        } else {
            Ok(UploadOutcome::Halted)
        }
    }
}

/// Read one file and post it with its library record.
async fn upload_one(
    api: &dyn DeployApi,
    scope: TaskScope<'_>,
    grid: &mut LibraryGrid,
    item: &UploadItem,
) -> Result<()> {
    let jar_content = content::read_data_url(&item.path).await?;
    let library = upload_record(grid, item);
    let mut acknowledged = api
        .update_library(scope, &library, Some(&jar_content))
        .await?;
    if grid.is_empty() {
        acknowledged.major = true;
    }
    grid.apply_update(&acknowledged, true);
    Ok(())
}

/// Library record sent with an upload.
///
/// Reuses the displayed record of a library with the same name; a library
/// without a sequence is appended after the last row.
pub fn upload_record(grid: &LibraryGrid, item: &UploadItem) -> Library {
    let mut library = grid
        .get(&item.name)
        .map(|entry| entry.current())
        .unwrap_or_else(|| Library::new(item.name.clone()));
    library.name = item.name.clone();
    library.version = item.version.clone();
    library.modules = None;
    if !library.has_sequence() {
        library.sequence = grid.next_sequence();
    }
    library
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_record_for_new_library() {
        let mut grid = LibraryGrid::new();
        let item = UploadItem::new("/tmp/crm-core-2.1.jar", 10);
        let record = upload_record(&grid, &item);
        assert_eq!(record.name, "crm-core");
        assert_eq!(record.version.as_deref(), Some("2.1"));
        assert_eq!(record.sequence, 1);

        let mut existing = Library::new("util");
        existing.sequence = 7;
        grid.load(vec![existing]);
        assert_eq!(upload_record(&grid, &item).sequence, 8);
    }

    #[test]
    fn test_upload_record_reuses_existing() {
        let mut grid = LibraryGrid::new();
        let mut existing = Library::new("crm-core");
        existing.sequence = 3;
        existing.disabled = true;
        existing.version = Some("2.0".into());
        grid.load(vec![existing]);

        let item = UploadItem::new("crm-core-2.1.jar", 10);
        let record = upload_record(&grid, &item);
        assert_eq!(record.sequence, 3);
        assert!(record.disabled);
        assert_eq!(record.version.as_deref(), Some("2.1"));
    }

    #[test]
    fn test_corrected_name_is_used() {
        let grid = LibraryGrid::new();
        let mut workflow = UploadWorkflow::new(vec![UploadItem::new("weird_name.jar", 1)]);
        let item = workflow.item_mut(0).unwrap();
        item.name = "proper".into();
        item.version = Some("1.0".into());
        let record = upload_record(&grid, &workflow.items()[0]);
        assert_eq!(record.name, "proper");
        assert_eq!(record.version.as_deref(), Some("1.0"));
        assert!(!workflow.is_finished());
    }
}
