//! Busy locks for the console views.
//!
//! Every request runs on behalf of a view (the project form or the library
//! grid). While one is in flight the view is locked, and starting another
//! request on the same view fails fast with [`DeployError::Busy`].

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

use crate::error::{DeployError, Result};

/// Lock over one view; clones share the same state.
#[derive(Debug, Clone)]
pub struct BusyLock {
    view: &'static str,
    held: Arc<Mutex<Option<String>>>,
}

impl BusyLock {
    pub fn new(view: &'static str) -> Self {
        Self {
            view,
            held: Arc::new(Mutex::new(None)),
        }
    }

    pub fn view(&self) -> &'static str {
        self.view
    }

    /// Lock the view, showing `message` while held.
    ///
    /// # Errors
    /// Returns [`DeployError::Busy`] if the view is already locked.
    pub fn acquire(&self, message: impl Into<String>) -> Result<BusyGuard> {
        let message = message.into();
        let mut held = self.slot();
        if let Some(current) = held.as_ref() {
            return Err(DeployError::Busy {
                view: self.view,
                message: current.clone(),
            });
        }
        trace!(view = self.view, %message, "lock acquired");
        *held = Some(message);
        Ok(BusyGuard { lock: self.clone() })
    }

    /// Message of the operation holding the lock, if any.
    pub fn status(&self) -> Option<String> {
        self.slot().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.slot().is_some()
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.held.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Releases the view when dropped.
#[derive(Debug)]
pub struct BusyGuard {
    lock: BusyLock,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        *self.lock.slot() = None;
        trace!(view = self.lock.view, "lock released");
    }
}
