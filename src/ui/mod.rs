//! User interface module - interactive prompts and formatting.
//!
//! `formatter` holds the pure display functions; this module handles
//! user input. Prompts loop until the supplied validation accepts the
//! input, mirroring the behavior of an interactive questionnaire.

use std::io::{self, Write};

use console::{style, Term};

use crate::error::{ReleaseError, Result};

pub mod formatter;

pub use formatter::{
    display_error, display_field, display_plan, display_plans_preamble, display_step,
    display_version_change,
};

/// Prompt for a line of input, re-prompting until `validate` accepts.
///
/// An empty answer takes the default when one is given. The validation
/// error is displayed before re-prompting.
pub fn input(
    message: &str,
    default: Option<&str>,
    validate: impl Fn(&str) -> Result<()>,
) -> Result<String> {
    loop {
        match default {
            Some(default) => print!(
                "{} {} [{}]: ",
                style("?").green(),
                style(message).bold(),
                default
            ),
            None => print!("{} {} ", style("?").green(), style(message).bold()),
        }
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        let answer = line.trim();
        let answer = if answer.is_empty() {
            default.unwrap_or("")
        } else {
            answer
        };

        match validate(answer) {
            Ok(()) => return Ok(answer.to_string()),
            Err(error) => display_error(&error.to_string()),
        }
    }
}

/// Prompt the user for a yes/no confirmation.
pub fn confirm(message: &str, default: bool) -> Result<bool> {
    let hint = if default { "(Y/n)" } else { "(y/N)" };
    print!("{} {} {}: ", style("?").green(), style(message).bold(), hint);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let answer = line.trim().to_lowercase();

    Ok(match answer.as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    })
}

/// Prompt for a secret without echoing it, re-prompting while empty.
pub fn password(message: &str) -> Result<String> {
    let term = Term::stdout();
    loop {
        print!("{} {} ", style("?").green(), style(message).bold());
        io::stdout().flush()?;
        let answer = term.read_secure_line()?;
        if answer.trim().is_empty() {
            display_error(&ReleaseError::config("A value is required").to_string());
        } else {
            return Ok(answer.trim().to_string());
        }
    }
}
