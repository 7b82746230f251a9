//! Terminal implementation of the confirmation and upload-failure prompts.

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use deploy_core::{DeployError, Prompter, UploadDecision};
use deploy_models::UploadItem;
use tracing::debug;

/// Asks on stdin; `assume_yes` answers every confirmation without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter {
    assume_yes: bool,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-interactive prompter for scripted runs: confirmations are
    /// accepted and failed uploads abort the queue.
    pub fn assume_yes() -> Self {
        Self { assume_yes: true }
    }

    fn ask(&self, question: &str) -> Option<String> {
        print!("{question} ");
        io::stdout().flush().ok()?;
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }
}

/// Reads a yes/no answer; anything but y/yes is no.
pub fn parse_answer(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Reads a retry/ignore/abort choice by word or initial.
pub fn parse_decision(input: &str) -> Option<UploadDecision> {
    match input.trim().to_lowercase().as_str() {
        "r" | "retry" => Some(UploadDecision::Retry),
        "i" | "ignore" => Some(UploadDecision::Ignore),
        "a" | "abort" => Some(UploadDecision::Abort),
        _ => None,
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        if self.assume_yes {
            println!("{title}: {message} yes");
            return true;
        }
        self.ask(&format!("{title}: {message} [y/N]"))
            .is_some_and(|answer| parse_answer(&answer))
    }

    async fn upload_failed(&self, item: &UploadItem, error: &DeployError) -> UploadDecision {
        eprintln!("Upload of {} failed: {}", item.file_name, error);
        if self.assume_yes {
            return UploadDecision::Abort;
        }
        loop {
            let Some(answer) = self.ask("[r]etry, [i]gnore or [a]bort?") else {
                return UploadDecision::Abort;
            };
            match parse_decision(&answer) {
                Some(decision) => {
                    debug!(file = %item.file_name, ?decision, "upload decision");
                    return decision;
                }
                None => println!("Please answer r, i or a."),
            }
        }
    }

    fn show_error(&self, error: &DeployError) {
        eprintln!("Error: {}", error);
    }

    fn notify(&self, message: &str) {
        println!("{message}");
    }
}
