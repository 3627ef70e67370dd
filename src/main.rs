use anyhow::Result;
use clap::Parser;

use release_tool::ui;
use release_tool::workflow::{self, WorkflowArgs};

#[derive(clap::Parser)]
#[command(
    name = "release",
    version,
    about = "A tool for releasing software",
    long_about = "release is a tool for releasing software. It supports bumping version \
numbers in JavaScript projects out-of-the-box, but is otherwise generic enough to \
release any kind of software. Run release with no arguments for interactive mode."
)]
struct Args {
    #[arg(value_name = "CURRENT_VERSION")]
    current_version: Option<String>,

    #[arg(value_name = "RELEASE_VERSION")]
    release_version: Option<String>,

    #[arg(value_name = "DEVELOPMENT_VERSION")]
    development_version: Option<String>,

    #[arg(short, long, help = "Bump the version number from CURRENT_VERSION to RELEASE_VERSION")]
    bump: bool,

    #[arg(short, long, help = "Run in non-interactive mode (e.g., in a script)")]
    non_interactive: bool,

    #[arg(short, long, help = "Execute the publish plan")]
    publish: bool,

    #[arg(
        short = 'x',
        long,
        help = "Execute the plans locally (defaults to true unless using Travis CI)"
    )]
    execute: bool,

    #[arg(long, help = "Release from this branch instead of the checked-out one")]
    branch: Option<String>,

    #[arg(short, long, help = "Specify the repository slug (owner_name/repo_name)")]
    slug: Option<String>,

    #[arg(short, long, help = "Assign the Travis CI token to use")]
    token: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        long = "var",
        value_name = "NAME=VALUE",
        help = "Assign a plan variable; may be repeated"
    )]
    var: Vec<String>,
}

fn parse_variable_flags(flags: &[String]) -> Result<Vec<(String, String)>> {
    flags
        .iter()
        .map(|flag| {
            flag.split_once('=')
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .ok_or_else(|| anyhow::anyhow!("Invalid variable assignment '{}'", flag))
        })
        .collect()
}

fn main() -> Result<()> {
    let args = Args::parse();

    let variables = match parse_variable_flags(&args.var) {
        Ok(variables) => variables,
        Err(error) => {
            ui::display_error(&error.to_string());
            std::process::exit(1);
        }
    };

    let workflow_args = WorkflowArgs {
        config_path: args.config,
        current_version: args.current_version,
        release_version: args.release_version,
        development_version: args.development_version,
        bump: args.bump,
        non_interactive: args.non_interactive,
        publish: args.publish.then_some(true),
        execute: args.execute,
        branch: args.branch,
        slug: args.slug,
        token: args.token,
        variables,
    };

    if let Err(error) = workflow::run(workflow_args) {
        ui::display_error(&error.to_string());
        std::process::exit(1);
    }
    Ok(())
}
