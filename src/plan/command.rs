use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::process::{self, Stdio};

use crate::error::{ReleaseError, Result};
use crate::vars;

/// A single executable shell command: a program name plus its ordered
/// arguments, derived by shell-lexing a template string.
///
/// The variable references are fixed at construction, scanned from the
/// raw template before lexing discards escape information. A command
/// produced by [Command::substitute] carries no references, so
/// substituting it again is the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    tokens: Vec<String>,
    references: BTreeSet<String>,
}

impl Command {
    /// Parse a template string into a command using POSIX-shell lexing
    /// rules (quoting, escaping).
    pub fn parse(template: &str) -> Result<Self> {
        let tokens = shell_words::split(template)
            .map_err(|e| ReleaseError::malformed_command(template, e.to_string()))?;
        if tokens.is_empty() {
            return Err(ReleaseError::malformed_command(template, "empty command"));
        }
        Ok(Command {
            references: vars::scan_template(template),
            tokens,
        })
    }

    /// Construct a command from a pre-tokenized argument list.
    pub fn from_tokens(tokens: Vec<String>) -> Result<Self> {
        if tokens.is_empty() {
            return Err(ReleaseError::malformed_command("", "empty command"));
        }
        let references = tokens
            .iter()
            .flat_map(|token| vars::scan_template(token))
            .collect();
        Ok(Command { tokens, references })
    }

    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The variable names this command still needs substituted.
    pub fn references(&self) -> &BTreeSet<String> {
        &self.references
    }

    /// Return a new command with every variable reference replaced by
    /// its value from `variables`.
    pub fn substitute(&self, variables: &BTreeMap<String, String>) -> Result<Command> {
        for name in &self.references {
            if !variables.contains_key(name) {
                return Err(ReleaseError::UnresolvedVariable {
                    name: name.clone(),
                    command: self.to_string(),
                });
            }
        }
        let tokens = self
            .tokens
            .iter()
            .map(|token| vars::substitute_references(token, &self.references, variables))
            .collect();
        Ok(Command {
            tokens,
            references: BTreeSet::new(),
        })
    }

    /// Spawn the program and wait for it to terminate, inheriting the
    /// caller's standard streams so interactive output passes through.
    pub fn execute(&self) -> Result<()> {
        let status = process::Command::new(&self.tokens[0])
            .args(&self.tokens[1..])
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(ReleaseError::CommandFailed {
                program: self.tokens[0].clone(),
                code: status.code().unwrap_or(-1),
            })
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_words::join(self.tokens.iter()))
    }
}
