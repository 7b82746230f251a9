//! jnlp-deploy CLI library.
//!
//! One-shot subcommands and an interactive REPL over the deploy console
//! client in `deploy-core`.

pub mod cli;
pub mod commands;
pub mod prompt;
pub mod repl;
pub mod view;
