//! Interactive prompts guarding destructive operations.
//!
//! All user input goes through a [`PromptHandler`] so that tests can script
//! the answers. Prompts are written with `print!`, not tracing, so they stay
//! visible regardless of the log level.

#[cfg(test)]
mod safety_properties;

use std::io::{BufRead, Write};

use anyhow::{Context, Result, anyhow};

use crate::types::PersonalAccessToken;
use crate::types::error::SweepError;

const PAT_PROMPT: &str = "Enter Personal Access Token> ";
const YES_NO_HINT: &str = "Enter \"Yes\" or \"No\": ";

// ---------------------------------------------------------------------------
// PromptHandler trait (for testability)
// ---------------------------------------------------------------------------

/// Source of line-based user input.
pub trait PromptHandler: Send + Sync {
    /// Display `prompt` and read one line of input without its line ending.
    ///
    /// Returns `None` when the input is closed.
    fn read_line(&self, prompt: &str) -> Result<Option<String>>;
}

/// Default prompt handler using stdin/stdout.
pub struct StdioPromptHandler;

impl PromptHandler for StdioPromptHandler {
    fn read_line(&self, prompt: &str) -> Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;

        let mut input = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut input)
            .context("Failed to read from stdin.")?;
        if read == 0 {
            return Ok(None);
        }

        Ok(Some(input.trim_end_matches(['\r', '\n']).to_string()))
    }
}

fn read_required_line(prompt_handler: &dyn PromptHandler, prompt: &str) -> Result<String> {
    prompt_handler
        .read_line(prompt)?
        .ok_or_else(|| anyhow!(SweepError::Io("input closed while waiting for an answer.".to_string())))
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

/// Ask `question` until the answer is yes or no.
///
/// Answers are trimmed and compared case-insensitively. Anything else repeats
/// the question. A closed input is an error.
pub fn prompt_yes_no(prompt_handler: &dyn PromptHandler, question: &str) -> Result<bool> {
    let prompt = format!("{question} {YES_NO_HINT}");

    loop {
        let answer = read_required_line(prompt_handler, &prompt)?;
        let answer = answer.trim();

        if answer.eq_ignore_ascii_case("yes") {
            return Ok(true);
        }
        if answer.eq_ignore_ascii_case("no") {
            return Ok(false);
        }
    }
}

/// Use the configured token, or prompt until a non-empty one is entered.
pub fn resolve_personal_access_token(
    pat: Option<PersonalAccessToken>,
    prompt_handler: &dyn PromptHandler,
) -> Result<PersonalAccessToken> {
    if let Some(pat) = pat {
        return Ok(pat);
    }

    loop {
        let token = read_required_line(prompt_handler, PAT_PROMPT)?;
        let token = token.trim();
        if !token.is_empty() {
            return Ok(PersonalAccessToken::new(token));
        }
    }
}
