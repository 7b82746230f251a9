//! Plain-text rendering of projects, libraries and upload queues.

use std::fmt::Write;

use deploy_core::{
    ActionState, GridRow, LibraryGrid, LibraryToolbar, PhraseBook, ProjectToolbar, UploadWorkflow,
};
use deploy_models::{format_bytes, IconKind, Icons, Module, Project, ProjectEntry};

/// Truncates a string to the given length, adding "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn flag(on: bool, label: &str) -> &str {
    if on {
        label
    } else {
        ""
    }
}

/// Project list; the `$add` row is shown as an invitation to create one.
pub fn project_table(entries: &[ProjectEntry], phrases: &PhraseBook) -> String {
    let mut out = String::new();
    let projects: Vec<_> = entries.iter().filter(|e| !e.is_add_row()).collect();
    if projects.is_empty() {
        let _ = writeln!(out, "{}", phrases.lookup("No projects found."));
    } else {
        let _ = writeln!(
            out,
            "{:<20}  {:<30}  {:<10}  {:<10}  STATE",
            "NAME", "TITLE", "VERSION", "DEPLOY"
        );
        let _ = writeln!(out, "{}", "-".repeat(84));
        for entry in &projects {
            let project = &entry.project;
            let state = [
                flag(project.initial, "new"),
                flag(project.disabled, "disabled"),
                flag(project.deleted, "deleted"),
            ]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(",");
            let _ = writeln!(
                out,
                "{:<20}  {:<30}  {:<10}  {:<10}  {}",
                truncate(&project.name, 20),
                truncate(project.display_title(), 30),
                truncate(project.version.as_deref().unwrap_or("-"), 10),
                if entry.deploy_allowed { "allowed" } else { "-" },
                state
            );
        }
        let _ = writeln!(out, "\n{} project(s)", projects.len());
    }
    if entries.iter().any(ProjectEntry::is_add_row) {
        let _ = writeln!(
            out,
            "{}",
            phrases.lookup("Use /new <name> to deploy a new project.")
        );
    }
    out
}

/// Project fields, icons and the status tag.
pub fn project_details(project: &Project, icons: &Icons, toolbar: &ProjectToolbar) -> String {
    let mut out = String::new();
    let _ = write!(out, "Project: {}", project.name);
    if let Some(status) = toolbar.status {
        let _ = write!(out, "  [{}]", status.phrase());
    }
    let _ = writeln!(out);
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    let _ = writeln!(out, "  Title: {}", field(&project.title));
    let _ = writeln!(out, "  Version: {}", field(&project.version));
    let _ = writeln!(out, "  Module base class: {}", field(&project.module_base_class));
    let _ = writeln!(out, "  Module name getter: {}", field(&project.module_name_getter));
    let _ = writeln!(
        out,
        "  Module version getter: {}",
        field(&project.module_version_getter)
    );
    if let Some(modified) = project.last_modified {
        let _ = writeln!(out, "  Last modified: {}", modified.format("%Y-%m-%d %H:%M:%S"));
    }
    let icon_list = IconKind::ALL
        .iter()
        .map(|kind| {
            let size = icons.get(*kind).map_or(0, str::len);
            if size == 0 {
                format!("{kind}: -")
            } else {
                format!("{kind}: set")
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "  Icons: {}", icon_list);
    out
}

fn action_list<'a>(actions: impl IntoIterator<Item = (&'a str, ActionState)>) -> String {
    actions
        .into_iter()
        .filter(|(_, state)| state.usable())
        .map(|(name, _)| format!("/{name}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Actions currently offered by both toolbars.
pub fn toolbar_summary(
    deploying: bool,
    project: &ProjectToolbar,
    library: &LibraryToolbar,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Deploy: {}",
        if deploying { "in progress" } else { "idle" }
    );
    let project_actions = action_list([
        ("change", project.change),
        ("jnlp", project.jnlp),
        ("disable", project.disable),
        ("enable", project.enable),
        ("delete", project.delete),
        ("restore", project.restore),
        ("save", project.save),
        ("cancel", project.cancel),
    ]);
    let _ = writeln!(out, "  Project actions: {}", project_actions);
    if let Some(hint) = project.jnlp_hint {
        let _ = writeln!(out, "  {} ({})", hint, project.jnlp_label);
    }
    let library_actions = action_list([
        ("upload", library.add),
        ("lib disable", library.disable),
        ("lib enable", library.enable),
        ("lib delete", library.delete),
        ("lib restore", library.restore),
        ("up", library.up),
        ("down", library.down),
    ]);
    let _ = writeln!(out, "  Library actions: {}", library_actions);
    out
}

/// Library grid rows; `*` marks pending changes, `>` the selection.
pub fn library_table(grid: &LibraryGrid) -> String {
    let mut out = String::new();
    if grid.is_empty() {
        let _ = writeln!(out, "No libraries.");
        return out;
    }
    let selected = grid.selected_row();
    let _ = writeln!(
        out,
        "   {:>4}  {:<28}  {:<10}  {:>8}  FLAGS",
        "SEQ", "NAME", "VERSION", "SIZE"
    );
    let _ = writeln!(out, "{}", "-".repeat(72));
    for (index, row) in grid.rows().iter().enumerate() {
        let marker = if selected == Some(index) { '>' } else { ' ' };
        match row {
            GridRow::Library(entry) => {
                let library = entry.current();
                let expander = if library.modules().is_empty() {
                    ' '
                } else if grid.is_expanded(&library.name) {
                    '-'
                } else {
                    '+'
                };
                let flags = [
                    flag(library.major, "major"),
                    flag(library.disabled, "disabled"),
                    flag(library.deleted, "deleted"),
                ]
                .iter()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(",");
                let pending = if entry.has_pending() { " *" } else { "" };
                let _ = writeln!(
                    out,
                    "{}{} {:>4}  {:<28}  {:<10}  {:>8}  {}{}",
                    marker,
                    expander,
                    library.sequence,
                    truncate(&library.name, 28),
                    truncate(library.version.as_deref().unwrap_or("-"), 10),
                    format_bytes(library.file_size),
                    flags,
                    pending
                );
            }
            GridRow::Module { module, .. } => {
                let _ = writeln!(
                    out,
                    "{}        {}",
                    marker,
                    module_line(module)
                );
            }
        }
    }
    out
}

fn module_line(module: &Module) -> String {
    let mut line = module.class_name.clone();
    if let Some(name) = &module.name {
        let _ = write!(line, "  {}", name);
    }
    if let Some(version) = &module.version {
        let _ = write!(line, "  {}", version);
    }
    line
}

/// Deployed modules of a project.
pub fn module_table(modules: &[Module]) -> String {
    if modules.is_empty() {
        return "No modules.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:<48}  {:<20}  VERSION", "CLASS", "NAME");
    let _ = writeln!(out, "{}", "-".repeat(80));
    for module in modules {
        let _ = writeln!(
            out,
            "{:<48}  {:<20}  {}",
            truncate(&module.class_name, 48),
            truncate(module.name.as_deref().unwrap_or("-"), 20),
            module.version.as_deref().unwrap_or("-")
        );
    }
    out
}

/// Upload queue with per-file status.
pub fn queue_table(workflow: &UploadWorkflow) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<32}  {:<20}  {:<10}  {:>8}  STATUS",
        "#", "FILE", "NAME", "VERSION", "SIZE"
    );
    for (index, item) in workflow.items().iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<32}  {:<20}  {:<10}  {:>8}  {}",
            index + 1,
            truncate(&item.file_name, 32),
            truncate(&item.name, 20),
            truncate(item.version.as_deref().unwrap_or("-"), 10),
            format_bytes(item.file_size),
            item.status()
        );
    }
    out
}
