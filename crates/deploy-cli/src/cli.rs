//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use deploy_core::config::{LOCALE_ENV, SERVER_URL_ENV, STATE_DIR_ENV};
use deploy_core::ClientConfig;

/// Build version string with git hash and build date.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    // Format: "0.3.0 (abc1234, 2026-01-29)"
    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// jnlp-deploy - admin console for Java Web Start deployments
#[derive(Parser, Debug)]
#[command(name = "jnlp-deploy")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Base URL of the deploy server
    #[arg(short = 'u', long, env = SERVER_URL_ENV)]
    pub server_url: Option<String>,

    /// Locale of the phrase table (e.g. en, zh-CN)
    #[arg(short, long, env = LOCALE_ENV)]
    pub locale: Option<String>,

    /// Path to state directory
    #[arg(short, long, env = STATE_DIR_ENV)]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List deployable projects
    List {
        /// Output format (table, json, brief)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show a project with its icons and libraries
    Show {
        #[arg(required = true)]
        project: String,
    },

    /// Download the deployed JNLP descriptor
    Jnlp {
        #[arg(required = true)]
        project: String,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the deployed modules of a project
    Modules {
        #[arg(required = true)]
        project: String,

        /// Output format (table, json, brief)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Deploy jars (and optionally a JNLP descriptor) in one go
    Deploy {
        #[arg(required = true)]
        project: String,

        /// Jar files to upload, in load order
        jars: Vec<PathBuf>,

        /// JNLP descriptor to upload first
        #[arg(short, long)]
        jnlp: Option<PathBuf>,

        /// Answer yes to every confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Create a new project and open it in the REPL
    New {
        #[arg(required = true)]
        name: String,
    },

    /// Start interactive REPL mode
    Repl {
        /// Open a project on start
        #[arg(short, long)]
        project: Option<String>,
    },
}

/// Output format for list commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Brief,
}

impl Cli {
    /// Client settings from the environment, overridden by flags.
    pub fn client_config(&self) -> deploy_core::Result<ClientConfig> {
        let mut config = ClientConfig::from_env()?;
        if let Some(url) = &self.server_url {
            config = config.with_server_url(url)?;
        }
        if let Some(locale) = &self.locale {
            config = config.with_locale(locale.clone());
        }
        Ok(config)
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
