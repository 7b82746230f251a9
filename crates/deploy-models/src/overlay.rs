//! Pending-change overlays.
//!
//! Libraries are shown as the value the server last listed (`_libs`)
//! overlaid with changes acknowledged inside the open deploy task. Each
//! field carries its own [`FieldState`]: a change that brings a field back
//! to its listed value clears the overlay for that field.

use chrono::NaiveDateTime;

use crate::library::{Library, Module};

/// Values that have an "empty" form.
///
/// Overlay comparison treats two empty values as equal, so `None`,
/// `Some("")`, `0` and `false` never show up as pending changes against
/// each other.
pub trait Blank {
    /// Whether the value is the empty form of its type.
    fn is_blank(&self) -> bool;
}

impl Blank for bool {
    fn is_blank(&self) -> bool {
        !*self
    }
}

impl Blank for u32 {
    fn is_blank(&self) -> bool {
        *self == 0
    }
}

impl Blank for u64 {
    fn is_blank(&self) -> bool {
        *self == 0
    }
}

impl Blank for Option<String> {
    fn is_blank(&self) -> bool {
        self.as_deref().map_or(true, str::is_empty)
    }
}

impl Blank for Option<NaiveDateTime> {
    fn is_blank(&self) -> bool {
        self.is_none()
    }
}

impl Blank for Vec<Module> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

fn same<V: PartialEq + Blank>(a: &V, b: &V) -> bool {
    (a.is_blank() && b.is_blank()) || a == b
}

/// State of one displayed field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldState<V> {
    /// Shown value equals the server-listed value.
    Confirmed(V),
    /// A different value was acknowledged inside the deploy task.
    Pending {
        /// Value from the last listing.
        confirmed: V,
        /// Value shown in its place.
        pending: V,
    },
}

impl<V: Clone + PartialEq + Blank> FieldState<V> {
    /// Value to display.
    pub fn current(&self) -> &V {
        match self {
            FieldState::Confirmed(v) => v,
            FieldState::Pending { pending, .. } => pending,
        }
    }

    /// Value from the last listing.
    pub fn confirmed(&self) -> &V {
        match self {
            FieldState::Confirmed(v) => v,
            FieldState::Pending { confirmed, .. } => confirmed,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FieldState::Pending { .. })
    }

    /// Overlays an acknowledged value.
    ///
    /// Matching the listed value collapses the state back to `Confirmed`.
    pub fn apply(&mut self, incoming: V) {
        let confirmed = self.confirmed().clone();
        *self = if same(&confirmed, &incoming) {
            FieldState::Confirmed(confirmed)
        } else {
            FieldState::Pending {
                confirmed,
                pending: incoming,
            }
        };
    }

    /// Sets a local value without marking it pending.
    pub fn reset(&mut self, value: V) {
        *self = FieldState::Confirmed(value);
    }
}

/// A library as displayed: listed values plus per-field overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryOverlay {
    name: String,
    pub version: FieldState<Option<String>>,
    pub file_size: FieldState<u64>,
    pub sequence: FieldState<u32>,
    pub major: FieldState<bool>,
    pub disabled: FieldState<bool>,
    pub deleted: FieldState<bool>,
    pub file_hash: FieldState<Option<String>>,
    pub last_modified: FieldState<Option<NaiveDateTime>>,
    pub modules: FieldState<Vec<Module>>,
}

impl LibraryOverlay {
    /// Starts from a server-listed library with no pending changes.
    pub fn confirmed(library: Library) -> Self {
        Self {
            name: library.name,
            version: FieldState::Confirmed(library.version),
            file_size: FieldState::Confirmed(library.file_size),
            sequence: FieldState::Confirmed(library.sequence),
            major: FieldState::Confirmed(library.major),
            disabled: FieldState::Confirmed(library.disabled),
            deleted: FieldState::Confirmed(library.deleted),
            file_hash: FieldState::Confirmed(library.file_hash),
            last_modified: FieldState::Confirmed(library.last_modified),
            modules: FieldState::Confirmed(library.modules.unwrap_or_default()),
        }
    }

    /// Starts a library created inside the deploy task.
    ///
    /// There is no listed value yet, so every non-blank field is pending
    /// against an empty record.
    pub fn created(library: Library) -> Self {
        let mut overlay = Self::confirmed(Library::new(library.name.clone()));
        overlay.apply(&library);
        overlay
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Overlays a record acknowledged by `_lib`.
    ///
    /// Modules are only overlaid when the record carries them.
    pub fn apply(&mut self, updated: &Library) {
        self.version.apply(updated.version.clone());
        self.file_size.apply(updated.file_size);
        self.sequence.apply(updated.sequence);
        self.major.apply(updated.major);
        self.disabled.apply(updated.disabled);
        self.deleted.apply(updated.deleted);
        self.file_hash.apply(updated.file_hash.clone());
        self.last_modified.apply(updated.last_modified);
        if let Some(modules) = &updated.modules {
            self.modules.apply(modules.clone());
        }
    }

    /// The library as displayed (listed values with overlays applied).
    pub fn current(&self) -> Library {
        Library {
            name: self.name.clone(),
            version: self.version.current().clone(),
            file_size: *self.file_size.current(),
            sequence: *self.sequence.current(),
            major: *self.major.current(),
            disabled: *self.disabled.current(),
            deleted: *self.deleted.current(),
            file_hash: self.file_hash.current().clone(),
            last_modified: *self.last_modified.current(),
            modules: Some(self.modules.current().clone()).filter(|m| !m.is_empty()),
        }
    }

    /// Wire names of the fields currently carrying a pending change.
    pub fn pending_fields(&self) -> Vec<&'static str> {
        let flags = [
            ("version", self.version.is_pending()),
            ("fileSize", self.file_size.is_pending()),
            ("sequence", self.sequence.is_pending()),
            ("major", self.major.is_pending()),
            ("disabled", self.disabled.is_pending()),
            ("deleted", self.deleted.is_pending()),
            ("fileHash", self.file_hash.is_pending()),
            ("lastModified", self.last_modified.is_pending()),
            ("modules", self.modules.is_pending()),
        ];
        flags
            .into_iter()
            .filter_map(|(name, pending)| pending.then_some(name))
            .collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_state_apply_and_clear() {
        let mut field = FieldState::Confirmed(false);
        field.apply(true);
        assert!(field.is_pending());
        assert_eq!(*field.current(), true);
        assert_eq!(*field.confirmed(), false);

        field.apply(false);
        assert_eq!(field, FieldState::Confirmed(false));
    }

    #[test]
    fn test_blank_values_compare_equal() {
        let mut field: FieldState<Option<String>> = FieldState::Confirmed(None);
        field.apply(Some(String::new()));
        assert!(!field.is_pending());

        let mut size = FieldState::Confirmed(0u64);
        size.apply(0);
        assert!(!size.is_pending());
    }

    #[test]
    fn test_overlay_tracks_changes() {
        let mut listed = Library::new("crm-core");
        listed.sequence = 1;
        listed.major = true;
        let mut overlay = LibraryOverlay::confirmed(listed.clone());
        assert!(!overlay.has_pending());

        let mut updated = listed.clone();
        updated.disabled = true;
        overlay.apply(&updated);
        assert_eq!(overlay.pending_fields(), vec!["disabled"]);
        assert!(overlay.current().disabled);

        overlay.apply(&listed);
        assert!(!overlay.has_pending());
        assert_eq!(overlay.current(), listed);
    }

    #[test]
    fn test_created_overlay_is_pending() {
        let mut lib = Library::new("fresh");
        lib.sequence = 3;
        lib.file_size = 100;
        let overlay = LibraryOverlay::created(lib.clone());

        assert_eq!(overlay.name(), "fresh");
        assert_eq!(overlay.current(), lib);
        assert!(overlay.sequence.is_pending());
        assert!(overlay.file_size.is_pending());
        assert!(!overlay.major.is_pending());
    }

    #[test]
    fn test_modules_kept_when_omitted() {
        let mut listed = Library::new("crm");
        listed.modules = Some(vec![Module {
            class_name: "com.acme.Orders".into(),
            ..Module::default()
        }]);
        let mut overlay = LibraryOverlay::confirmed(listed.clone());

        let mut updated = Library::new("crm");
        updated.disabled = true;
        overlay.apply(&updated);
        assert!(!overlay.modules.is_pending());
        assert_eq!(overlay.current().modules(), listed.modules());

        updated.modules = Some(vec![]);
        overlay.apply(&updated);
        assert!(overlay.modules.is_pending());
        assert!(overlay.current().modules.is_none());
    }
}
