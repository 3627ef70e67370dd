//! Plans: ordered, variable-substituted shell command sequences.
//!
//! A plan is built once from configuration (or the compiled defaults),
//! run at most once, and discarded. Commands run strictly one at a
//! time; the first failure aborts the remainder.

use std::collections::{BTreeMap, BTreeSet};

use console::style;

use crate::error::Result;

pub mod catalog;
pub mod command;

pub use catalog::{PlanCatalog, PlanSource, DEVELOPMENT_PLAN, RELEASE_PLAN};
pub use command::Command;

/// An immutable ordered sequence of commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    commands: Vec<Command>,
}

impl Plan {
    /// Build a plan from command templates, failing fast on the first
    /// malformed template.
    pub fn from_templates<I, S>(templates: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let commands = templates
            .into_iter()
            .map(|template| Command::parse(template.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Plan { commands })
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// The variable names referenced across all commands.
    pub fn required_variables(&self) -> BTreeSet<String> {
        self.commands
            .iter()
            .flat_map(|command| command.references().iter().cloned())
            .collect()
    }

    /// Substitute variables into every command, then execute the
    /// commands strictly in order. The first non-zero exit aborts the
    /// remainder and propagates to the caller; no rollback of commands
    /// that already ran is attempted.
    ///
    /// Consumes the plan: construct a fresh one to retry.
    pub fn run(self, variables: &BTreeMap<String, String>) -> Result<()> {
        let commands = self
            .commands
            .iter()
            .map(|command| command.substitute(variables))
            .collect::<Result<Vec<_>>>()?;
        for command in commands {
            println!("{}", style(&command).bold());
            command.execute()?;
        }
        Ok(())
    }

    /// Render the ordered command list for user confirmation.
    pub fn describe(&self) -> String {
        self.commands
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
