//! Pure formatting functions for UI output.
//!
//! Display logic lives here, separated from the interactive prompts in
//! the parent module.

use console::style;

use crate::plan::Plan;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("error:").red().bold(), message);
}

/// Echo a resolved field, prompt-style: `! Label: value`. The label
/// carries its own punctuation.
pub fn display_field(label: &str, value: &str) {
    println!(
        "{} {} {}",
        style("!").yellow(),
        style(label).bold(),
        style(value).cyan()
    );
}

/// Announce the plan listing that follows.
pub fn display_plans_preamble() {
    println!("\n  The tool will execute the following plans in order.");
}

/// Display a titled plan, commands indented for confirmation.
pub fn display_plan(title: &str, plan: &Plan) {
    println!("\n  {}:\n", style(title).bold());
    for line in plan.describe().lines() {
        println!("      {}", line);
    }
}

/// Print an underlined step heading before a plan runs.
pub fn display_step(message: &str) {
    println!("\n{}", style(message).underlined());
}

/// Show the version movement a bump will perform.
pub fn display_version_change(from: &str, to: &str) {
    println!(
        "\n    {} {} {}\n",
        style(from).yellow(),
        style("→").bold(),
        style(to).green()
    );
}
