//! Main release workflow orchestration.
//!
//! Wires configuration, git queries, version resolution, and the plan
//! catalog together. Everything here is strictly sequential: one
//! prompt, one child process, one network call at a time.

use std::collections::BTreeMap;
use std::env;
use std::path::Path;

use crate::ci::{self, BuildRequest};
use crate::config::{self, Config};
use crate::error::{ReleaseError, Result};
use crate::git_ops::GitRepo;
use crate::manifest;
use crate::plan::{Plan, PlanCatalog, DEVELOPMENT_PLAN, RELEASE_PLAN};
use crate::ui;
use crate::vars::{self, BuiltinVariables};
use crate::version;

const PUBLISH_PLAN: &str = "publish";

/// Workflow arguments, decoupled from the clap surface so the workflow
/// can be driven programmatically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowArgs {
    pub config_path: Option<String>,
    pub current_version: Option<String>,
    pub release_version: Option<String>,
    pub development_version: Option<String>,
    /// Only bump manifests from current to release version, then stop.
    pub bump: bool,
    pub non_interactive: bool,
    /// Some(..) when the flag was given; None prompts interactively.
    pub publish: Option<bool>,
    /// Execute plans locally even when CI routing is configured.
    pub execute: bool,
    pub branch: Option<String>,
    pub slug: Option<String>,
    pub token: Option<String>,
    /// CLI-supplied variable assignments (--var NAME=VALUE).
    pub variables: Vec<(String, String)>,
}

/// Run the program.
pub fn run(args: WorkflowArgs) -> Result<()> {
    let root = env::current_dir()?;
    let config = config::load_config(args.config_path.as_deref())?;
    let repo = GitRepo::discover(&root)?;
    repo.assert_no_uncommitted_changes()?;

    let catalog = PlanCatalog::from_config(&config)?;

    let branch = match &args.branch {
        Some(branch) => branch.clone(),
        None => repo.branch_name()?,
    };
    if !args.non_interactive {
        if let Some(name) = manifest::project_name(&root) {
            ui::display_field("Name:", &name);
        }
        ui::display_field("Branch:", &branch);
    }

    let current_version = resolve_current_version(&args, &root)?;
    let release_version = resolve_release_version(&args, &repo, &current_version)?;
    let development_version = resolve_development_version(&args, &release_version)?;

    if args.bump {
        ui::display_version_change(&current_version, &release_version);
        return manifest::bump(
            &root,
            &current_version,
            &release_version,
            config.project_type.as_deref(),
        );
    }

    let publish = resolve_publish(&args)?;

    let mut plans_to_execute = vec![(
        if version::is_release_candidate_version(&release_version) {
            "Create Release Candidate"
        } else {
            "Create Release"
        },
        RELEASE_PLAN,
    )];
    if development_version.is_some() {
        plans_to_execute.push(("Continue Development", DEVELOPMENT_PLAN));
    }
    if publish {
        plans_to_execute.push(("Publish", PUBLISH_PLAN));
    }

    // Every plan must exist before anything runs.
    for (_, name) in &plans_to_execute {
        catalog.get(name)?;
    }

    if !args.non_interactive {
        ui::display_plans_preamble();
        for (title, name) in &plans_to_execute {
            ui::display_plan(title, catalog.get(name)?);
        }
        println!();
        if !ui::confirm("Is this OK?", false)? {
            return Err(ReleaseError::Aborted);
        }
    }

    let builtins = BuiltinVariables {
        branch: Some(branch.clone()),
        current_version: Some(current_version.clone()),
        release_version: Some(release_version.clone()),
        development_version: development_version.clone(),
    };

    if config.travis.is_none() || args.execute {
        let versions = Versions {
            current: &current_version,
            release: &release_version,
            development: development_version.as_deref(),
        };
        execute_plans(&args, &config, &catalog, &root, &plans_to_execute, &builtins, versions)
    } else {
        let request = build_request(&args, &config, &branch, &current_version,
            &release_version, &development_version, publish)?;
        let response = ci::trigger_build(&request)?;
        println!("{}", response);
        Ok(())
    }
}

struct Versions<'a> {
    current: &'a str,
    release: &'a str,
    development: Option<&'a str>,
}

fn resolve_current_version(args: &WorkflowArgs, root: &Path) -> Result<String> {
    let validate: fn(&str) -> Result<()> = if args.bump {
        version::assert_valid_semantic_version
    } else {
        version::assert_valid_development_version
    };

    let given = args
        .current_version
        .clone()
        .or_else(|| env::var(vars::CURRENT_VERSION).ok());
    let value = match given {
        Some(value) => value,
        None if args.non_interactive => {
            return Err(ReleaseError::config("Current version must be specified"))
        }
        None => match manifest::manifest_version(root) {
            Some(value) => value,
            None => return ui::input("Current Version:", None, validate),
        },
    };
    validate(&value)?;
    if !args.non_interactive {
        ui::display_field("Current Version:", &value);
    }
    Ok(value)
}

fn resolve_release_version(
    args: &WorkflowArgs,
    repo: &GitRepo,
    current_version: &str,
) -> Result<String> {
    let validate = |candidate: &str| -> Result<()> {
        if args.bump {
            version::assert_valid_semantic_version(candidate)
        } else {
            version::assert_valid_release_or_release_candidate_version(candidate)?;
            repo.assert_tag_does_not_exist(candidate)
        }
    };

    let given = args
        .release_version
        .clone()
        .or_else(|| env::var(vars::RELEASE_VERSION).ok());
    let value = match given {
        Some(value) => value,
        None if args.non_interactive => {
            return Err(ReleaseError::config(if args.bump {
                "Next version must be specified"
            } else {
                "Release version must be specified"
            }))
        }
        None => {
            let default = version::base_version(current_version)?;
            let message = if args.bump {
                "Next Version:"
            } else {
                "Release (or Release Candidate) Version:"
            };
            return ui::input(message, Some(&default), validate);
        }
    };
    validate(&value)?;
    if !args.non_interactive {
        ui::display_field("Release (or Release Candidate) Version:", &value);
    }
    Ok(value)
}

fn resolve_development_version(
    args: &WorkflowArgs,
    release_version: &str,
) -> Result<Option<String>> {
    if args.bump {
        return Ok(None);
    }

    let given = args
        .development_version
        .clone()
        .or_else(|| env::var(vars::DEVELOPMENT_VERSION).ok());
    match given {
        Some(value) => {
            version::assert_valid_development_version(&value)?;
            if !args.non_interactive {
                ui::display_field("Continue development?", "Yes");
                ui::display_field("Development Version:", &value);
            }
            Ok(Some(value))
        }
        None if args.non_interactive => Ok(None),
        None => {
            if !ui::confirm("Continue development?", true)? {
                return Ok(None);
            }
            let default = version::default_development_version(release_version)?;
            let value = ui::input(
                "Development Version:",
                Some(&default),
                version::assert_valid_development_version,
            )?;
            Ok(Some(value))
        }
    }
}

fn resolve_publish(args: &WorkflowArgs) -> Result<bool> {
    match args.publish {
        Some(publish) => {
            if !args.non_interactive {
                ui::display_field("Publish?", if publish { "Yes" } else { "No" });
            }
            Ok(publish)
        }
        None if args.non_interactive => Ok(false),
        None => ui::confirm("Publish?", false),
    }
}

/// The program-computed resolution source: the four builtins plus any
/// --var assignments, builtins winning on collision.
fn program_variables(
    builtins: &BuiltinVariables,
    cli: &[(String, String)],
) -> BTreeMap<String, String> {
    let mut program = builtins.to_map();
    for (name, value) in cli {
        program
            .entry(name.clone())
            .or_insert_with(|| value.clone());
    }
    program
}

fn execute_plans(
    args: &WorkflowArgs,
    config: &Config,
    catalog: &PlanCatalog,
    root: &Path,
    plans_to_execute: &[(&str, &str)],
    builtins: &BuiltinVariables,
    versions: Versions<'_>,
) -> Result<()> {
    let program = program_variables(builtins, &args.variables);
    let process_env: BTreeMap<String, String> = env::vars().collect();

    // Resolve every plan's variables before any command runs.
    let mut resolved: Vec<(&str, &str, Plan, BTreeMap<String, String>)> = Vec::new();
    for &(title, name) in plans_to_execute {
        let plan = catalog.get(name)?.clone();
        let required = plan.required_variables();
        let resolution =
            vars::resolve_for_plan(config, name, &required, &program, Some(process_env.clone()));
        if !resolution.unassigned.is_empty() {
            return Err(ReleaseError::UnassignedVariables(
                resolution.unassigned.into_iter().collect(),
            ));
        }
        resolved.push((title, name, plan, resolution.assigned));
    }

    for (title, name, plan, assigned) in resolved {
        match name {
            RELEASE_PLAN => {
                ui::display_step("Updating version…");
                manifest::bump(
                    root,
                    versions.current,
                    versions.release,
                    config.project_type.as_deref(),
                )?;
            }
            DEVELOPMENT_PLAN => {
                if let Some(development) = versions.development {
                    ui::display_step("Updating version…");
                    manifest::bump(
                        root,
                        versions.release,
                        development,
                        config.project_type.as_deref(),
                    )?;
                }
            }
            _ => {}
        }
        ui::display_step(&format!("{}…", title));
        plan.run(&assigned)?;
    }
    Ok(())
}

fn build_request(
    args: &WorkflowArgs,
    config: &Config,
    branch: &str,
    current_version: &str,
    release_version: &str,
    development_version: &Option<String>,
    publish: bool,
) -> Result<BuildRequest> {
    let configured_slug = args.slug.clone().or_else(|| config.slug.clone());
    let slug = match configured_slug {
        Some(slug) if args.non_interactive => slug,
        None if args.non_interactive => {
            return Err(ReleaseError::config("The repository slug is required"))
        }
        configured => ui::input("Repository slug:", configured.as_deref(), |candidate| {
            if candidate.is_empty() {
                Err(ReleaseError::config("The repository slug is required"))
            } else {
                Ok(())
            }
        })?,
    };

    let token = match &args.token {
        Some(token) => token.clone(),
        None if args.non_interactive => {
            return Err(ReleaseError::config("A Travis CI token is required"))
        }
        None => ui::password("Travis CI token:")?,
    };

    Ok(BuildRequest {
        slug,
        token,
        branch: branch.to_string(),
        tier: config.travis.clone(),
        current_version: current_version.to_string(),
        release_version: release_version.to_string(),
        development_version: development_version.clone(),
        publish,
    })
}
