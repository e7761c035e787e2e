// ABOUTME: Confirmation gate asked once before a destructive batch.
// ABOUTME: Terminal prompt for interactive runs, fixed answer for --yes.

use std::io::{self, BufRead, Write};

/// Yes/no gate in front of destructive operations.
pub trait Confirm: Send + Sync {
    fn confirm(&self, message: &str, prompt: &str) -> bool;
}

/// Asks on stdout and reads the answer from stdin. Only `y`/`yes` confirm.
#[derive(Debug, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, message: &str, prompt: &str) -> bool {
        println!("{message}");
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}

/// Confirms everything without asking.
#[derive(Debug, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, message: &str, _prompt: &str) -> bool {
        tracing::debug!("Confirmation assumed: {}", message);
        true
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
