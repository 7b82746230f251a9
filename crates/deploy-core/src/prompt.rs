//! User interaction seam.
//!
//! The console asks the user to confirm destructive steps and to decide
//! what happens after a failed upload. Front ends implement [`Prompter`]
//! (the CLI reads answers from the terminal); tests script the answers.

use async_trait::async_trait;
use deploy_models::UploadItem;

use crate::error::DeployError;

/// What to do after an upload failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadDecision {
    /// Upload the same file again.
    Retry,
    /// Mark the file skipped and continue with the next one.
    Ignore,
    /// Stop the remaining queue.
    Abort,
}

#[async_trait]
pub trait Prompter: Send + Sync {
    /// Ask a yes/no question; `true` means yes.
    async fn confirm(&self, title: &str, message: &str) -> bool;

    /// Ask how to continue after `item` failed to upload.
    async fn upload_failed(&self, item: &UploadItem, error: &DeployError) -> UploadDecision;

    /// Show a failed operation.
    fn show_error(&self, error: &DeployError);

    /// Show a progress or completion message.
    fn notify(&self, message: &str);
}
