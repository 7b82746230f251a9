//! jnlp-deploy entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use deploy_cli::cli::{Cli, Commands};
use deploy_cli::commands;
use deploy_cli::repl::{Repl, ReplCommand};
use deploy_core::config::STATE_DIR_ENV;
use deploy_core::{env_file, ClientConfig};

fn main() {
    let cli = Cli::parse();

    // The state directory is resolved once; flags must be in place first
    if let Some(dir) = &cli.state_dir {
        std::env::set_var(STATE_DIR_ENV, dir);
    }
    let _ = dotenvy::from_path(env_file());
    let _ = dotenvy::from_filename(".env.local");

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    let result = match cli.client_config() {
        Ok(config) => match cli.command {
            Some(Commands::Repl { project }) => run_repl(config, project.map(ReplCommand::Open)),
            Some(Commands::New { name }) => run_repl(config, Some(ReplCommand::New(name))),
            Some(cmd) => commands::execute(cmd, config),
            None => run_repl(config, None),
        },
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_repl(config: ClientConfig, open: Option<ReplCommand>) -> commands::Result<()> {
    let mut repl = Repl::new(config)?;
    repl.run(open)
}
