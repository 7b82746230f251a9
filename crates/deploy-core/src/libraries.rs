//! The library grid.
//!
//! Libraries are listed in load order, each optionally expanded to show its
//! modules as child rows. Records keep the values from the last `_libs`
//! listing and overlay whatever the server acknowledged since.

use std::collections::HashSet;

use deploy_models::{Library, LibraryOverlay, Module};
use tracing::warn;

/// A selected grid row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Library(String),
    Module { library: String, class_name: String },
}

/// One displayed row.
#[derive(Debug, Clone, PartialEq)]
pub enum GridRow<'a> {
    Library(&'a LibraryOverlay),
    Module { parent: &'a str, module: Module },
}

impl GridRow<'_> {
    pub fn is_library(&self) -> bool {
        matches!(self, GridRow::Library(_))
    }

    pub fn library_name(&self) -> &str {
        match self {
            GridRow::Library(overlay) => overlay.name(),
            GridRow::Module { parent, .. } => parent,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LibraryGrid {
    entries: Vec<LibraryOverlay>,
    expanded: HashSet<String>,
    selection: Option<Selection>,
}

impl LibraryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the grid with a fresh `_libs` listing.
    pub fn load(&mut self, libraries: Vec<Library>) {
        self.entries = libraries.into_iter().map(LibraryOverlay::confirmed).collect();
        self.expanded.clear();
        self.selection = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LibraryOverlay] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&LibraryOverlay> {
        self.entries.iter().find(|e| e.name() == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name() == name)
    }

    /// Libraries as displayed, in grid order.
    pub fn libraries(&self) -> Vec<Library> {
        self.entries.iter().map(LibraryOverlay::current).collect()
    }

    /// Flattened rows, expanded libraries followed by their modules.
    pub fn rows(&self) -> Vec<GridRow<'_>> {
        let mut rows = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            rows.push(GridRow::Library(entry));
            if self.expanded.contains(entry.name()) {
                for module in entry.modules.current() {
                    rows.push(GridRow::Module {
                        parent: entry.name(),
                        module: module.clone(),
                    });
                }
            }
        }
        rows
    }

    /// Row index of the current selection.
    pub fn selected_row(&self) -> Option<usize> {
        let selection = self.selection.as_ref()?;
        self.rows().iter().position(|row| match (row, selection) {
            (GridRow::Library(entry), Selection::Library(name)) => entry.name() == name,
            (
                GridRow::Module { parent, module },
                Selection::Module {
                    library,
                    class_name,
                },
            ) => parent == library && &module.class_name == class_name,
            _ => false,
        })
    }

    /// Show or hide the module rows of a library.
    pub fn set_expanded(&mut self, name: &str, expanded: bool) -> bool {
        if self.get(name).is_none() {
            return false;
        }
        if expanded {
            self.expanded.insert(name.to_string());
        } else {
            self.collapse(name);
        }
        true
    }

    pub fn is_expanded(&self, name: &str) -> bool {
        self.expanded.contains(name)
    }

    /// Hide the module rows of a library; a selected module moves the
    /// selection to its library.
    pub fn collapse(&mut self, name: &str) {
        self.expanded.remove(name);
        if let Some(Selection::Module { library, .. }) = &self.selection {
            if library == name {
                self.selection = Some(Selection::Library(name.to_string()));
            }
        }
    }

    /// Select a row; returns false if it is not displayed.
    pub fn select(&mut self, selection: Selection) -> bool {
        let previous = self.selection.replace(selection);
        if self.selected_row().is_some() {
            true
        } else {
            self.selection = previous;
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Displayed record of the selected row when it is a library row.
    pub fn selected_library(&self) -> Option<Library> {
        match &self.selection {
            Some(Selection::Library(name)) => self.get(name).map(LibraryOverlay::current),
            _ => None,
        }
    }

    /// Overlay a record acknowledged by `_lib`.
    ///
    /// Unknown names are appended as new libraries. `reset_children`
    /// collapses the row so its modules are rebuilt from the new record.
    pub fn apply_update(&mut self, updated: &Library, reset_children: bool) -> bool {
        if updated.name.is_empty() {
            warn!("ignoring library update without a name");
            return false;
        }
        match self.entries.iter_mut().find(|e| e.name() == updated.name) {
            Some(entry) => entry.apply(updated),
            None => self.entries.push(LibraryOverlay::created(updated.clone())),
        }
        if reset_children {
            self.collapse(&updated.name);
        }
        true
    }

    /// Any displayed library marked for deletion.
    pub fn has_deleted(&self) -> bool {
        self.entries.iter().any(|e| *e.deleted.current())
    }

    /// Sequence for a library added at the end: one past the highest.
    pub fn next_sequence(&self) -> u32 {
        self.entries
            .iter()
            .map(|e| *e.sequence.current())
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Exchange the positions of two libraries and select `selected`.
    pub fn swap(&mut self, selected: &str, other: &str) -> bool {
        match (self.position(selected), self.position(other)) {
            (Some(a), Some(b)) => {
                self.entries.swap(a, b);
                self.selection = Some(Selection::Library(selected.to_string()));
                true
            }
            _ => false,
        }
    }
}
