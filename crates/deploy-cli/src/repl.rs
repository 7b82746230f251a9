//! Interactive REPL (Read-Eval-Print Loop) for the deploy console.

use std::path::PathBuf;
use std::sync::Arc;

use deploy_core::{
    ensure_state_dir, history_file, list_projects, new_project_name, ClientConfig, DeployApi,
    DeployController, DeployError, Direction, HttpGateway, LibraryChange, PhraseBook, Prompter,
    Selection, UploadOutcome, UploadWorkflow,
};
use deploy_models::{IconKind, Project};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing::{debug, info};

use crate::commands;
use crate::prompt::TerminalPrompter;
use crate::view;

/// Help information for a command.
pub struct CommandHelp {
    /// Command name (e.g., "open").
    pub name: &'static str,
    /// Command aliases (e.g., ["o"]).
    pub aliases: &'static [&'static str],
    /// Brief one-line description.
    pub brief: &'static str,
    /// Usage syntax.
    pub usage: &'static str,
}

/// Static help entries for all commands.
static COMMAND_HELP: &[CommandHelp] = &[
    CommandHelp {
        name: "list",
        aliases: &["ls", "l"],
        brief: "List deployable projects",
        usage: "/list",
    },
    CommandHelp {
        name: "open",
        aliases: &["o"],
        brief: "Open a project (starts a deploy for a new project)",
        usage: "/open <project>",
    },
    CommandHelp {
        name: "new",
        aliases: &[],
        brief: "Open a project that does not exist yet",
        usage: "/new <name>",
    },
    CommandHelp {
        name: "close",
        aliases: &[],
        brief: "Leave the project, cancelling an open deploy",
        usage: "/close",
    },
    CommandHelp {
        name: "show",
        aliases: &["s"],
        brief: "Show project fields and available actions",
        usage: "/show",
    },
    CommandHelp {
        name: "libs",
        aliases: &[],
        brief: "Show the library grid",
        usage: "/libs",
    },
    CommandHelp {
        name: "expand",
        aliases: &[],
        brief: "Show the modules of a library",
        usage: "/expand <library>",
    },
    CommandHelp {
        name: "collapse",
        aliases: &[],
        brief: "Hide the modules of a library",
        usage: "/collapse <library>",
    },
    CommandHelp {
        name: "select",
        aliases: &["sel"],
        brief: "Select a library or module row",
        usage: "/select <library> [module-class]",
    },
    CommandHelp {
        name: "change",
        aliases: &[],
        brief: "Start a deploy",
        usage: "/change",
    },
    CommandHelp {
        name: "save",
        aliases: &[],
        brief: "Finish the deploy, committing all changes",
        usage: "/save",
    },
    CommandHelp {
        name: "cancel",
        aliases: &[],
        brief: "Abandon the deploy",
        usage: "/cancel",
    },
    CommandHelp {
        name: "jnlp",
        aliases: &[],
        brief: "Upload the JNLP descriptor",
        usage: "/jnlp <file>",
    },
    CommandHelp {
        name: "set",
        aliases: &[],
        brief: "Change a project field",
        usage: "/set <title|version|moduleBaseClass|moduleNameGetter|moduleVersionGetter> [value]",
    },
    CommandHelp {
        name: "disable",
        aliases: &[],
        brief: "Disable the project",
        usage: "/disable",
    },
    CommandHelp {
        name: "enable",
        aliases: &[],
        brief: "Enable the project",
        usage: "/enable",
    },
    CommandHelp {
        name: "delete",
        aliases: &[],
        brief: "Mark the project for deletion",
        usage: "/delete",
    },
    CommandHelp {
        name: "restore",
        aliases: &[],
        brief: "Undo a project deletion",
        usage: "/restore",
    },
    CommandHelp {
        name: "icon",
        aliases: &[],
        brief: "Upload an icon image",
        usage: "/icon <default|shortcut|splash> <file>",
    },
    CommandHelp {
        name: "lib",
        aliases: &[],
        brief: "Change the selected library",
        usage: "/lib <disable|enable|delete|restore>",
    },
    CommandHelp {
        name: "up",
        aliases: &[],
        brief: "Move the selected library up",
        usage: "/up",
    },
    CommandHelp {
        name: "down",
        aliases: &[],
        brief: "Move the selected library down",
        usage: "/down",
    },
    CommandHelp {
        name: "upload",
        aliases: &["add"],
        brief: "Queue jar files for upload",
        usage: "/upload <jar> [jar...]",
    },
    CommandHelp {
        name: "queue",
        aliases: &[],
        brief: "Show the upload queue",
        usage: "/queue",
    },
    CommandHelp {
        name: "rename",
        aliases: &[],
        brief: "Correct the library name and version of a queued file",
        usage: "/rename <#> <name> [version]",
    },
    CommandHelp {
        name: "run",
        aliases: &[],
        brief: "Upload the queue (again, after a halt)",
        usage: "/run",
    },
    CommandHelp {
        name: "modules",
        aliases: &[],
        brief: "List deployed modules",
        usage: "/modules [project]",
    },
    CommandHelp {
        name: "help",
        aliases: &["h", "?"],
        brief: "Show help",
        usage: "/help [command]",
    },
    CommandHelp {
        name: "quit",
        aliases: &["q", "exit"],
        brief: "Exit the REPL",
        usage: "/quit",
    },
];

/// Tab completion for slash commands.
struct CommandCompleter;

impl CommandCompleter {
    const COMMANDS: &'static [&'static str] = &[
        "/cancel", "/change", "/close", "/collapse", "/delete", "/disable", "/down", "/enable",
        "/expand", "/help", "/icon", "/jnlp", "/lib", "/libs", "/list", "/modules", "/new",
        "/open", "/queue", "/quit", "/rename", "/restore", "/run", "/save", "/select", "/set",
        "/show", "/up", "/upload",
    ];
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if !line.starts_with('/') || line[..pos].contains(' ') {
            return Ok((0, vec![]));
        }

        let prefix = &line[..pos];
        let matches: Vec<Pair> = Self::COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Slash commands available in the REPL.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    List,
    Open(String),
    New(String),
    Close,
    Show,
    Libs,
    Expand(String),
    Collapse(String),
    Select {
        library: String,
        class_name: Option<String>,
    },
    Change,
    Save,
    Cancel,
    Jnlp(String),
    Set {
        field: String,
        value: String,
    },
    Disable,
    Enable,
    Delete,
    Restore,
    Icon {
        kind: String,
        path: String,
    },
    Lib(LibraryChange),
    Move(Direction),
    Upload(Vec<String>),
    Queue,
    Rename {
        index: usize,
        name: String,
        version: Option<String>,
    },
    Run,
    Modules(Option<String>),
    Help(Option<String>),
    Quit,
    /// Known command with bad arguments; carries the command name
    Usage(String),
    Unknown(String),
    Empty,
}

impl ReplCommand {
    /// Parses input into a REPL command.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return ReplCommand::Empty;
        }

        let Some(stripped) = input.strip_prefix('/') else {
            return ReplCommand::Unknown(input.to_string());
        };
        let parts: Vec<&str> = stripped.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let arg = parts
            .get(1)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let words: Vec<String> = arg
            .as_deref()
            .map(|a| a.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        let usage = || ReplCommand::Usage(cmd.clone());

        match cmd.as_str() {
            "list" | "ls" | "l" => ReplCommand::List,
            "open" | "o" => arg.map(ReplCommand::Open).unwrap_or_else(usage),
            "new" => arg.map(ReplCommand::New).unwrap_or_else(usage),
            "close" => ReplCommand::Close,
            "show" | "s" => ReplCommand::Show,
            "libs" => ReplCommand::Libs,
            "expand" => arg.map(ReplCommand::Expand).unwrap_or_else(usage),
            "collapse" => arg.map(ReplCommand::Collapse).unwrap_or_else(usage),
            "select" | "sel" => match words.as_slice() {
                [library] => ReplCommand::Select {
                    library: library.clone(),
                    class_name: None,
                },
                [library, class_name] => ReplCommand::Select {
                    library: library.clone(),
                    class_name: Some(class_name.clone()),
                },
                _ => usage(),
            },
            "change" => ReplCommand::Change,
            "save" => ReplCommand::Save,
            "cancel" => ReplCommand::Cancel,
            "jnlp" => arg.map(ReplCommand::Jnlp).unwrap_or_else(usage),
            "set" => match arg {
                Some(arg) => {
                    let mut split = arg.splitn(2, ' ');
                    let field = split.next().unwrap_or_default().to_string();
                    let value = split.next().unwrap_or_default().trim().to_string();
                    ReplCommand::Set { field, value }
                }
                None => usage(),
            },
            "disable" => ReplCommand::Disable,
            "enable" => ReplCommand::Enable,
            "delete" => ReplCommand::Delete,
            "restore" => ReplCommand::Restore,
            "icon" => match arg.as_deref().and_then(|a| a.split_once(' ')) {
                Some((kind, path)) => ReplCommand::Icon {
                    kind: kind.to_string(),
                    path: path.trim().to_string(),
                },
                None => usage(),
            },
            "lib" => match words.first().map(|w| w.to_lowercase()).as_deref() {
                Some("disable") => ReplCommand::Lib(LibraryChange::Disable),
                Some("enable") => ReplCommand::Lib(LibraryChange::Enable),
                Some("delete") => ReplCommand::Lib(LibraryChange::Delete),
                Some("restore") => ReplCommand::Lib(LibraryChange::Restore),
                _ => usage(),
            },
            "up" => ReplCommand::Move(Direction::Up),
            "down" => ReplCommand::Move(Direction::Down),
            "upload" | "add" => {
                if words.is_empty() {
                    usage()
                } else {
                    ReplCommand::Upload(words)
                }
            }
            "queue" => ReplCommand::Queue,
            "rename" => match words.as_slice() {
                [index, name, rest @ ..] if rest.len() <= 1 => match index.parse::<usize>() {
                    Ok(index) if index > 0 => ReplCommand::Rename {
                        index,
                        name: name.clone(),
                        version: rest.first().cloned(),
                    },
                    _ => usage(),
                },
                _ => usage(),
            },
            "run" => ReplCommand::Run,
            "modules" => ReplCommand::Modules(arg),
            "help" | "h" | "?" => ReplCommand::Help(arg),
            "quit" | "q" | "exit" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(cmd),
        }
    }
}

/// Expand `~` in a path typed at the prompt.
fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

fn active(controller: &mut Option<DeployController>) -> deploy_core::Result<&mut DeployController> {
    controller.as_mut().ok_or(DeployError::NotLoaded)
}

/// REPL state
pub struct Repl {
    editor: Editor<CommandCompleter, DefaultHistory>,
    runtime: tokio::runtime::Runtime,
    api: Arc<dyn DeployApi>,
    phrases: PhraseBook,
    prompter: TerminalPrompter,
    controller: Option<DeployController>,
    workflow: Option<UploadWorkflow>,
    history_path: PathBuf,
}

impl Repl {
    /// Creates a new REPL instance and loads the phrase table.
    pub fn new(config: ClientConfig) -> commands::Result<Self> {
        let rl_config = rustyline::Config::builder()
            .completion_type(rustyline::CompletionType::List)
            .build();
        let mut editor = Editor::with_config(rl_config)?;
        editor.set_helper(Some(CommandCompleter));

        let runtime = tokio::runtime::Runtime::new()?;
        let locale = config.locale.clone();
        let gateway = HttpGateway::new(config)?;
        let phrases = runtime.block_on(PhraseBook::load(&gateway, &locale));

        if let Err(e) = ensure_state_dir() {
            debug!("cannot create state directory: {}", e);
        }
        let history_path = history_file();
        if history_path.exists() {
            let _ = editor.load_history(&history_path);
        }

        Ok(Self {
            editor,
            runtime,
            api: Arc::new(gateway),
            phrases,
            prompter: TerminalPrompter::new(),
            controller: None,
            workflow: None,
            history_path,
        })
    }

    /// Runs the REPL loop, optionally opening a project first.
    pub fn run(&mut self, open: Option<ReplCommand>) -> commands::Result<()> {
        println!("jnlp-deploy REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type /help for commands, /quit to exit");
        println!();

        if let Some(cmd) = open {
            if let Err(e) = self.handle_command(cmd) {
                self.prompter.show_error(&e);
            }
        }

        loop {
            let prompt = self.prompt();

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    self.editor.add_history_entry(&line)?;

                    let cmd = ReplCommand::parse(&line);
                    debug!(?cmd, "Parsed command");

                    match self.handle_command(cmd) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => self.prompter.show_error(&e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!("^D");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        self.leave_project();
        let _ = self.editor.save_history(&self.history_path);

        println!("Goodbye!");
        Ok(())
    }

    /// Returns the prompt string; `*` marks an open deploy.
    fn prompt(&self) -> String {
        match &self.controller {
            Some(ctl) => {
                let marker = if ctl.session().is_deploying() { "*" } else { "" };
                format!("jnlp-deploy [{}{}]> ", ctl.session().project_name(), marker)
            }
            None => "jnlp-deploy> ".to_string(),
        }
    }

    /// Close the open project, cancelling its deploy best-effort.
    fn leave_project(&mut self) {
        if let Some(mut ctl) = self.controller.take() {
            info!(project = ctl.session().project_name(), "closing project");
            self.runtime.block_on(ctl.close());
        }
        self.workflow = None;
    }

    fn open_project(&mut self, name: &str) -> deploy_core::Result<()> {
        self.leave_project();
        let mut ctl = DeployController::new(self.api.clone(), name, self.phrases.clone());
        self.runtime.block_on(ctl.open(&self.prompter))?;
        self.controller = Some(ctl);
        self.print_project();
        Ok(())
    }

    fn print_project(&self) {
        if let Some(ctl) = &self.controller {
            let session = ctl.session();
            let toolbar = ctl.project_toolbar();
            print!(
                "{}",
                view::project_details(&session.project, &session.icons, &toolbar)
            );
            print!(
                "{}",
                view::toolbar_summary(session.is_deploying(), &toolbar, &ctl.library_toolbar())
            );
        }
    }

    fn print_libraries(&self) {
        if let Some(ctl) = &self.controller {
            print!("{}", view::library_table(ctl.grid()));
        }
    }

    fn set_expanded(&mut self, name: &str, expanded: bool) -> deploy_core::Result<()> {
        let ctl = active(&mut self.controller)?;
        if ctl.grid_mut().set_expanded(name, expanded) {
            self.print_libraries();
        } else {
            println!("Library not found: {}", name);
        }
        Ok(())
    }

    /// Handles a REPL command. Returns Ok(true) if should quit.
    fn handle_command(&mut self, cmd: ReplCommand) -> deploy_core::Result<bool> {
        match cmd {
            ReplCommand::Empty => {}

            ReplCommand::List => {
                let entries = self.runtime.block_on(list_projects(self.api.as_ref()))?;
                print!("{}", view::project_table(&entries, &self.phrases));
            }

            ReplCommand::Open(name) => self.open_project(&name)?,

            ReplCommand::New(name) => {
                let name = new_project_name(&name)?;
                self.open_project(&name)?;
            }

            ReplCommand::Close => {
                if self.controller.is_none() {
                    println!("No project open.");
                }
                self.leave_project();
            }

            ReplCommand::Show => {
                active(&mut self.controller)?;
                self.print_project();
            }

            ReplCommand::Libs => {
                active(&mut self.controller)?;
                self.print_libraries();
            }

            ReplCommand::Expand(name) => self.set_expanded(&name, true)?,

            ReplCommand::Collapse(name) => self.set_expanded(&name, false)?,

            ReplCommand::Select {
                library,
                class_name,
            } => {
                let ctl = active(&mut self.controller)?;
                let selection = match class_name {
                    Some(class_name) => Selection::Module {
                        library,
                        class_name,
                    },
                    None => Selection::Library(library),
                };
                if ctl.grid_mut().select(selection) {
                    self.print_libraries();
                } else {
                    println!("Row not displayed; /expand the library first for module rows.");
                }
            }

            ReplCommand::Change => {
                let ctl = active(&mut self.controller)?;
                if !self.runtime.block_on(ctl.start(&self.prompter))? {
                    println!("Deploy not started.");
                }
                self.print_project();
            }

            ReplCommand::Save => {
                let ctl = active(&mut self.controller)?;
                if self.runtime.block_on(ctl.finish(&self.prompter))? {
                    self.workflow = None;
                    self.prompter.notify(self.phrases.lookup("Deploy saved"));
                    self.print_project();
                }
            }

            ReplCommand::Cancel => {
                let ctl = active(&mut self.controller)?;
                if self.runtime.block_on(ctl.cancel(&self.prompter))? {
                    self.workflow = None;
                    self.print_project();
                }
            }

            ReplCommand::Jnlp(path) => {
                let ctl = active(&mut self.controller)?;
                let path = expand_path(&path);
                if self
                    .runtime
                    .block_on(ctl.upload_jnlp(&path, &self.prompter))?
                {
                    self.print_project();
                }
            }

            ReplCommand::Set { field, value } => {
                let ctl = active(&mut self.controller)?;
                if !Project::EDITABLE_FIELDS.contains(&field.as_str()) {
                    println!(
                        "Unknown field: {}. Editable: {}",
                        field,
                        Project::EDITABLE_FIELDS.join(", ")
                    );
                    return Ok(false);
                }
                self.runtime.block_on(ctl.set_field(&field, &value))?;
                self.print_project();
            }

            ReplCommand::Disable | ReplCommand::Enable => {
                let ctl = active(&mut self.controller)?;
                let disabled = matches!(cmd, ReplCommand::Disable);
                self.runtime.block_on(ctl.set_disabled(disabled))?;
                self.print_project();
            }

            ReplCommand::Delete | ReplCommand::Restore => {
                let ctl = active(&mut self.controller)?;
                let deleted = matches!(cmd, ReplCommand::Delete);
                self.runtime.block_on(ctl.set_deleted(deleted))?;
                self.print_project();
            }

            ReplCommand::Icon { kind, path } => {
                let kind: IconKind = kind.parse()?;
                let ctl = active(&mut self.controller)?;
                let path = expand_path(&path);
                self.runtime.block_on(ctl.upload_icon(kind, &path))?;
                println!("{} icon updated.", kind);
            }

            ReplCommand::Lib(change) => {
                let ctl = active(&mut self.controller)?;
                self.runtime.block_on(ctl.update_library(change))?;
                self.print_libraries();
            }

            ReplCommand::Move(direction) => {
                let ctl = active(&mut self.controller)?;
                if self.runtime.block_on(ctl.move_library(direction))? {
                    self.print_libraries();
                } else {
                    println!("Nothing to move past.");
                }
            }

            ReplCommand::Upload(paths) => {
                let ctl = active(&mut self.controller)?;
                let paths: Vec<PathBuf> = paths.iter().map(|p| expand_path(p)).collect();
                let workflow = ctl.prepare_upload(&paths)?;
                print!("{}", view::queue_table(&workflow));
                println!("Use /rename to correct names, /run to upload.");
                self.workflow = Some(workflow);
            }

            ReplCommand::Queue => match &self.workflow {
                Some(workflow) => print!("{}", view::queue_table(workflow)),
                None => println!("Upload queue is empty."),
            },

            ReplCommand::Rename {
                index,
                name,
                version,
            } => {
                let Some(item) = self
                    .workflow
                    .as_mut()
                    .and_then(|w| w.item_mut(index - 1))
                else {
                    println!("No queued file #{}", index);
                    return Ok(false);
                };
                if item.is_uploaded() {
                    println!("{} is already uploaded.", item.file_name);
                    return Ok(false);
                }
                item.name = name;
                item.version = version;
                if let Some(workflow) = &self.workflow {
                    print!("{}", view::queue_table(workflow));
                }
            }

            ReplCommand::Run => {
                let ctl = active(&mut self.controller)?;
                let Some(workflow) = self.workflow.as_mut() else {
                    println!("Upload queue is empty; use /upload first.");
                    return Ok(false);
                };
                let outcome = self.runtime.block_on(ctl.run_upload(workflow, &self.prompter))?;
                print!("{}", view::queue_table(workflow));
                if outcome == UploadOutcome::Finished {
                    self.workflow = None;
                } else {
                    println!("Upload halted; /run to retry the remaining files.");
                }
                self.print_libraries();
            }

            ReplCommand::Modules(project) => {
                let project = match project {
                    Some(project) => project,
                    None => active(&mut self.controller)?
                        .session()
                        .project_name()
                        .to_string(),
                };
                let modules = self.runtime.block_on(self.api.runtime_modules(&project))?;
                print!("{}", view::module_table(&modules));
            }

            ReplCommand::Help(topic) => print_help(topic.as_deref()),

            ReplCommand::Quit => return Ok(true),

            ReplCommand::Usage(name) => match find_command_help(&name) {
                Some(help) => println!("Usage: {}", help.usage),
                None => println!("Unknown command: /{}", name),
            },

            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}. Type /help for available commands.", cmd);
            }
        }
        Ok(false)
    }
}

/// Finds help for a command by name or alias.
fn find_command_help(name: &str) -> Option<&'static CommandHelp> {
    let name_lower = name.trim_start_matches('/').to_lowercase();
    COMMAND_HELP
        .iter()
        .find(|h| h.name == name_lower || h.aliases.contains(&name_lower.as_str()))
}

/// Prints help information.
fn print_help(topic: Option<&str>) {
    match topic {
        Some(cmd) => match find_command_help(cmd) {
            Some(help) => {
                println!("/{} - {}", help.name, help.brief);
                if !help.aliases.is_empty() {
                    println!("Aliases: {}", help.aliases.join(", "));
                }
                println!("Usage: {}", help.usage);
            }
            None => println!(
                "Unknown command: {}. Type /help for available commands.",
                cmd
            ),
        },
        None => {
            println!("jnlp-deploy REPL - JNLP deploy console");
            println!();
            for help in COMMAND_HELP {
                println!("  {:<48} {}", help.usage, help.brief);
            }
            println!();
            println!("Type /help <command> for detailed help on a specific command.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(ReplCommand::parse("/list"), ReplCommand::List);
        assert_eq!(ReplCommand::parse("/ls"), ReplCommand::List);
    }

    #[test]
    fn test_parse_open_requires_name() {
        assert_eq!(
            ReplCommand::parse("/open crm"),
            ReplCommand::Open("crm".into())
        );
        assert_eq!(ReplCommand::parse("/open"), ReplCommand::Usage("open".into()));
        assert_eq!(ReplCommand::parse("/o  "), ReplCommand::Usage("o".into()));
    }

    #[test]
    fn test_parse_select() {
        assert_eq!(
            ReplCommand::parse("/select crm-core com.acme.Orders"),
            ReplCommand::Select {
                library: "crm-core".into(),
                class_name: Some("com.acme.Orders".into()),
            }
        );
        assert_eq!(
            ReplCommand::parse("/sel util"),
            ReplCommand::Select {
                library: "util".into(),
                class_name: None,
            }
        );
    }

    #[test]
    fn test_parse_set_keeps_spaces() {
        assert_eq!(
            ReplCommand::parse("/set title CRM Client 2"),
            ReplCommand::Set {
                field: "title".into(),
                value: "CRM Client 2".into(),
            }
        );
        assert_eq!(
            ReplCommand::parse("/set version"),
            ReplCommand::Set {
                field: "version".into(),
                value: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_icon() {
        assert_eq!(
            ReplCommand::parse("/icon splash ~/img/splash.png"),
            ReplCommand::Icon {
                kind: "splash".into(),
                path: "~/img/splash.png".into(),
            }
        );
        assert_eq!(ReplCommand::parse("/icon splash"), ReplCommand::Usage("icon".into()));
    }

    #[test]
    fn test_parse_library_changes() {
        assert_eq!(
            ReplCommand::parse("/lib Delete"),
            ReplCommand::Lib(LibraryChange::Delete)
        );
        assert_eq!(ReplCommand::parse("/lib"), ReplCommand::Usage("lib".into()));
        assert_eq!(ReplCommand::parse("/up"), ReplCommand::Move(Direction::Up));
        assert_eq!(ReplCommand::parse("/down"), ReplCommand::Move(Direction::Down));
    }

    #[test]
    fn test_parse_upload_and_rename() {
        assert_eq!(
            ReplCommand::parse("/upload a-1.0.jar b-2.0.jar"),
            ReplCommand::Upload(vec!["a-1.0.jar".into(), "b-2.0.jar".into()])
        );
        assert_eq!(ReplCommand::parse("/upload"), ReplCommand::Usage("upload".into()));
        assert_eq!(
            ReplCommand::parse("/rename 2 crm-core 2.1"),
            ReplCommand::Rename {
                index: 2,
                name: "crm-core".into(),
                version: Some("2.1".into()),
            }
        );
        assert_eq!(
            ReplCommand::parse("/rename 0 crm-core"),
            ReplCommand::Usage("rename".into())
        );
    }

    #[test]
    fn test_parse_help_and_quit() {
        assert_eq!(ReplCommand::parse("/help"), ReplCommand::Help(None));
        assert_eq!(
            ReplCommand::parse("/? upload"),
            ReplCommand::Help(Some("upload".into()))
        );
        assert_eq!(ReplCommand::parse("/q"), ReplCommand::Quit);
    }

    #[test]
    fn test_parse_empty_and_unknown() {
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Empty);
        assert_eq!(
            ReplCommand::parse("/frobnicate"),
            ReplCommand::Unknown("frobnicate".into())
        );
        assert_eq!(
            ReplCommand::parse("hello"),
            ReplCommand::Unknown("hello".into())
        );
    }

    #[test]
    fn test_find_command_help() {
        assert_eq!(find_command_help("open").unwrap().name, "open");
        assert_eq!(find_command_help("/add").unwrap().name, "upload");
        assert!(find_command_help("nope").is_none());
    }

    #[test]
    fn test_every_command_has_help() {
        for cmd in CommandCompleter::COMMANDS {
            assert!(find_command_help(cmd).is_some(), "missing help for {cmd}");
        }
    }

    #[test]
    fn test_expand_path_home() {
        let path = expand_path("plain/file.jar");
        assert_eq!(path, PathBuf::from("plain/file.jar"));
    }

    #[test]
    fn test_completer_matches_prefix() {
        let completer = CommandCompleter;
        let history = rustyline::history::DefaultHistory::new();
        let ctx = rustyline::Context::new(&history);

        let (pos, matches) = completer.complete("/ope", 4, &ctx).unwrap();
        assert_eq!(pos, 0);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].replacement, "/open");
    }

    #[test]
    fn test_completer_multiple_matches() {
        let completer = CommandCompleter;
        let history = rustyline::history::DefaultHistory::new();
        let ctx = rustyline::Context::new(&history);

        let (_, matches) = completer.complete("/li", 3, &ctx).unwrap();
        let replacements: Vec<&str> = matches.iter().map(|m| m.replacement.as_str()).collect();
        assert_eq!(replacements, vec!["/lib", "/libs", "/list"]);
    }

    #[test]
    fn test_completer_ignores_arguments() {
        let completer = CommandCompleter;
        let history = rustyline::history::DefaultHistory::new();
        let ctx = rustyline::Context::new(&history);

        let (_, matches) = completer.complete("/open cr", 8, &ctx).unwrap();
        assert!(matches.is_empty());
        let (_, matches) = completer.complete("open", 4, &ctx).unwrap();
        assert!(matches.is_empty());
    }
}
