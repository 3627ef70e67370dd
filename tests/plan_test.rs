// tests/plan_test.rs
use std::collections::BTreeMap;

use release_tool::error::ReleaseError;
use release_tool::plan::{Plan, PlanCatalog};
use release_tool::config::Config;
use tempfile::TempDir;

fn variables(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_plan_runs_commands_in_order() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");

    let plan = Plan::from_templates([
        format!("touch {}", first.display()),
        format!("touch {}", second.display()),
    ])
    .unwrap();
    plan.run(&BTreeMap::new()).unwrap();

    assert!(first.exists());
    assert!(second.exists());
}

#[test]
fn test_plan_aborts_on_first_failure() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("marker");

    // The second command fails; the third must never run.
    let plan = Plan::from_templates([
        "true".to_string(),
        "false".to_string(),
        format!("touch {}", marker.display()),
    ])
    .unwrap();

    match plan.run(&BTreeMap::new()).unwrap_err() {
        ReleaseError::CommandFailed { program, code } => {
            assert_eq!(program, "false");
            assert_eq!(code, 1);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(!marker.exists());
}

#[test]
fn test_plan_substitutes_before_running() {
    let dir = TempDir::new().unwrap();
    let tagged = dir.path().join("1.2.3");

    let plan = Plan::from_templates([format!("touch {}/${{RELEASE_VERSION}}", dir.path().display())])
        .unwrap();
    plan.run(&variables(&[("RELEASE_VERSION", "1.2.3")])).unwrap();

    assert!(tagged.exists());
}

#[test]
fn test_plan_with_unresolved_variable_runs_nothing() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("marker");

    let plan = Plan::from_templates([
        format!("touch {}", marker.display()),
        "echo ${MISSING}".to_string(),
    ])
    .unwrap();

    let err = plan.run(&BTreeMap::new()).unwrap_err();
    assert!(matches!(err, ReleaseError::UnresolvedVariable { .. }));
    // Substitution happens before execution, so even the valid first
    // command must not have run.
    assert!(!marker.exists());
}

#[test]
fn test_default_release_plan_describes_tagging() {
    let catalog = PlanCatalog::from_config(&Config::default()).unwrap();
    let description = catalog.get("release").unwrap().describe();
    assert!(description.contains("git add ."));
    assert!(description.contains("git tag"));
    assert!(description.contains("RELEASE_VERSION"));
}
