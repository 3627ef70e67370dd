//! Variable scanning and layered resolution for plan command templates.
//!
//! Commands reference variables as `$NAME` or `${NAME}`. Four variables
//! are always computed by the program before a plan runs: `BRANCH`,
//! `CURRENT_VERSION`, `RELEASE_VERSION`, and `DEVELOPMENT_VERSION`.
//! The remaining names are satisfied from configuration and the
//! process environment.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::Config;

pub const BRANCH: &str = "BRANCH";
pub const CURRENT_VERSION: &str = "CURRENT_VERSION";
pub const RELEASE_VERSION: &str = "RELEASE_VERSION";
pub const DEVELOPMENT_VERSION: &str = "DEVELOPMENT_VERSION";

const REFERENCE_PATTERN: &str = r"\$(\{[A-Za-z0-9_]+\}|[A-Za-z0-9_]+)";

/// The variables computed by the program itself, threaded explicitly
/// through resolution rather than accumulated in shared state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltinVariables {
    pub branch: Option<String>,
    pub current_version: Option<String>,
    pub release_version: Option<String>,
    pub development_version: Option<String>,
}

impl BuiltinVariables {
    /// Render the assigned builtins as a resolution source.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        let fields = [
            (BRANCH, &self.branch),
            (CURRENT_VERSION, &self.current_version),
            (RELEASE_VERSION, &self.release_version),
            (DEVELOPMENT_VERSION, &self.development_version),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                values.insert(name.to_string(), value.clone());
            }
        }
        values
    }
}

/// Outcome of resolving a required-variable set against layered sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub assigned: BTreeMap<String, String>,
    pub unassigned: BTreeSet<String>,
}

/// Collect the variable names referenced by a single command template.
///
/// A backslash immediately before `$` escapes the reference. An
/// unbalanced `${NAME` is not a reference.
pub fn scan_template(template: &str) -> BTreeSet<String> {
    let mut required = BTreeSet::new();
    // Drop escaped references before matching.
    let unescaped = template.replace("\\$", "\\");
    if let Ok(re) = regex::Regex::new(REFERENCE_PATTERN) {
        for captures in re.captures_iter(&unescaped) {
            if let Some(reference) = captures.get(1) {
                let name = reference
                    .as_str()
                    .trim_start_matches('{')
                    .trim_end_matches('}');
                required.insert(name.to_string());
            }
        }
    }
    required
}

/// Collect the variable names referenced across a plan's command
/// templates, duplicates collapsed.
pub fn scan_required_variables<'a, I>(templates: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut required = BTreeSet::new();
    for template in templates {
        required.extend(scan_template(template));
    }
    required
}

/// Replace the given references in a token with their values.
///
/// Only names in `references` are replaced; any other `$` text in the
/// token is left untouched, so text introduced by substituted values is
/// never substituted again. A `\$` surviving lexing (single quotes)
/// resolves to a literal `$`.
pub fn substitute_references(
    token: &str,
    references: &BTreeSet<String>,
    values: &BTreeMap<String, String>,
) -> String {
    // Escaped dollars must not match the reference pattern.
    const PROTECTED: &str = "\u{0}";
    let token = token.replace("\\$", PROTECTED);
    let substituted = match regex::Regex::new(REFERENCE_PATTERN) {
        Ok(re) => re
            .replace_all(&token, |captures: &regex::Captures| {
                let name = captures
                    .get(1)
                    .map(|m| m.as_str())
                    .unwrap_or("")
                    .trim_start_matches('{')
                    .trim_end_matches('}');
                match values.get(name) {
                    Some(value) if references.contains(name) => value.clone(),
                    _ => captures
                        .get(0)
                        .map(|m| m.as_str())
                        .unwrap_or("")
                        .to_string(),
                }
            })
            .into_owned(),
        Err(_) => token.clone(),
    };
    substituted.replace(PROTECTED, "$")
}

/// Resolve required names against an ordered list of sources,
/// first-match-wins: a name assigned by an earlier source is never
/// overwritten by a later one. Missing names are reported, not failed.
pub fn resolve(
    required: &BTreeSet<String>,
    sources: &[BTreeMap<String, String>],
) -> Resolution {
    let mut assigned = BTreeMap::new();
    for name in required {
        for source in sources {
            if let Some(value) = source.get(name) {
                assigned.insert(name.clone(), value.clone());
                break;
            }
        }
    }
    let unassigned = required
        .iter()
        .filter(|name| !assigned.contains_key(*name))
        .cloned()
        .collect();
    Resolution {
        assigned,
        unassigned,
    }
}

/// Resolve a plan's required variables using the documented source
/// order: plan-level config env, global config env, program-computed
/// values, then the process environment (when provided).
pub fn resolve_for_plan(
    config: &Config,
    plan_name: &str,
    required: &BTreeSet<String>,
    program: &BTreeMap<String, String>,
    process_env: Option<BTreeMap<String, String>>,
) -> Resolution {
    let mut sources = Vec::new();
    if let Some(plan) = config.plans.get(plan_name) {
        sources.push(plan.env.clone());
    }
    sources.push(config.env.clone());
    sources.push(program.clone());
    if let Some(env) = process_env {
        sources.push(env);
    }
    resolve(required, &sources)
}
