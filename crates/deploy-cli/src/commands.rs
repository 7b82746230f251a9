//! Command handlers for CLI subcommands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use deploy_core::{
    list_projects, ClientConfig, DeployApi, DeployController, HttpGateway, PhraseBook, Prompter,
    TaskScope, UploadOutcome,
};
use tracing::{info, warn};

use crate::cli::{Commands, OutputFormat};
use crate::prompt::TerminalPrompter;
use crate::view;

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Execute a one-shot CLI command.
pub fn execute(command: Commands, config: ClientConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let gateway = HttpGateway::new(config)?;

    runtime.block_on(async {
        match command {
            Commands::List { format } => cmd_list(&gateway, format).await,
            Commands::Show { project } => cmd_show(&gateway, &project).await,
            Commands::Jnlp { project, output } => {
                cmd_jnlp(&gateway, &project, output.as_deref()).await
            }
            Commands::Modules { project, format } => cmd_modules(&gateway, &project, format).await,
            Commands::Deploy {
                project,
                jars,
                jnlp,
                yes,
            } => {
                let prompter = if yes {
                    TerminalPrompter::assume_yes()
                } else {
                    TerminalPrompter::new()
                };
                cmd_deploy(gateway, &project, &jars, jnlp.as_deref(), &prompter).await
            }
            // REPL entry points are handled in main
            Commands::New { .. } | Commands::Repl { .. } => Ok(()),
        }
    })
}

async fn load_phrases(gateway: &HttpGateway) -> PhraseBook {
    let locale = gateway.config().locale.clone();
    PhraseBook::load(gateway, &locale).await
}

async fn cmd_list(gateway: &HttpGateway, format: OutputFormat) -> Result<()> {
    let entries = list_projects(gateway).await?;
    match format {
        OutputFormat::Table => {
            let phrases = load_phrases(gateway).await;
            print!("{}", view::project_table(&entries, &phrases));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&entries)?;
            println!("{}", json);
        }
        OutputFormat::Brief => {
            for entry in entries.iter().filter(|e| !e.is_add_row()) {
                println!("{}\t{}", entry.project.name, entry.project.display_title());
            }
        }
    }
    Ok(())
}

async fn cmd_show(gateway: &HttpGateway, project: &str) -> Result<()> {
    let scope = TaskScope::new(project);
    let record = gateway.load_project(scope).await?;
    let icons = gateway.load_icons(scope).await?;
    let libraries = gateway.load_libraries(scope).await?;

    let toolbar = deploy_core::gate::project_toolbar(false, &record, &record);
    print!("{}", view::project_details(&record, &icons, &toolbar));
    println!();

    let mut grid = deploy_core::LibraryGrid::new();
    grid.load(libraries);
    for library in grid.libraries() {
        if !library.modules().is_empty() {
            grid.set_expanded(&library.name, true);
        }
    }
    print!("{}", view::library_table(&grid));
    Ok(())
}

async fn cmd_jnlp(gateway: &HttpGateway, project: &str, output: Option<&Path>) -> Result<()> {
    let jnlp = gateway.runtime_jnlp(project).await?;
    match output {
        Some(path) => {
            tokio::fs::write(path, &jnlp).await?;
            println!("Saved {} ({} bytes)", path.display(), jnlp.len());
        }
        None => println!("{}", jnlp),
    }
    Ok(())
}

async fn cmd_modules(gateway: &HttpGateway, project: &str, format: OutputFormat) -> Result<()> {
    let modules = gateway.runtime_modules(project).await?;
    match format {
        OutputFormat::Table => print!("{}", view::module_table(&modules)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&modules)?),
        OutputFormat::Brief => {
            for module in &modules {
                println!("{}", module.class_name);
            }
        }
    }
    Ok(())
}

/// Open a deploy, upload the descriptor and jars, then save.
///
/// A halted upload or a declined save cancels the deploy.
async fn cmd_deploy(
    gateway: HttpGateway,
    project: &str,
    jars: &[PathBuf],
    jnlp: Option<&Path>,
    prompter: &dyn Prompter,
) -> Result<()> {
    if jars.is_empty() && jnlp.is_none() {
        return Err("nothing to deploy: give jar files and/or --jnlp".into());
    }
    let phrases = load_phrases(&gateway).await;
    let api: Arc<dyn DeployApi> = Arc::new(gateway);
    let mut controller = DeployController::new(api, project, phrases);

    let result = deploy_steps(&mut controller, jars, jnlp, prompter).await;
    if result.is_err() {
        controller.close().await;
    }
    result
}

async fn deploy_steps(
    controller: &mut DeployController,
    jars: &[PathBuf],
    jnlp: Option<&Path>,
    prompter: &dyn Prompter,
) -> Result<()> {
    controller.open(prompter).await?;
    if !controller.session().is_deploying() && !controller.start(prompter).await? {
        println!("Deploy not started.");
        return Ok(());
    }

    if let Some(path) = jnlp {
        if !controller.upload_jnlp(path, prompter).await? {
            warn!(file = %path.display(), "descriptor skipped");
        }
    }

    if !jars.is_empty() {
        let mut workflow = controller.prepare_upload(jars)?;
        print!("{}", view::queue_table(&workflow));
        if controller.run_upload(&mut workflow, prompter).await? == UploadOutcome::Halted {
            print!("{}", view::queue_table(&workflow));
            controller.close().await;
            return Err("upload halted, deploy cancelled".into());
        }
    }

    if controller.finish(prompter).await? {
        info!(project = controller.session().project_name(), "deploy saved");
        println!("Deploy of '{}' saved.", controller.session().project_name());
    } else {
        controller.close().await;
        println!("Deploy cancelled.");
    }
    Ok(())
}
