use std::collections::BTreeMap;

use crate::config::Config;
use crate::error::{ReleaseError, Result};
use crate::plan::Plan;

pub const RELEASE_PLAN: &str = "release";
pub const DEVELOPMENT_PLAN: &str = "development";

/// Where a catalog entry came from: user configuration, or the
/// compiled-in fallback for a well-known plan name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSource {
    UserDefined(Plan),
    BuiltinDefault(Plan),
}

impl PlanSource {
    pub fn plan(&self) -> &Plan {
        match self {
            PlanSource::UserDefined(plan) => plan,
            PlanSource::BuiltinDefault(plan) => plan,
        }
    }
}

/// Read-only mapping from plan name to plan, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct PlanCatalog {
    plans: BTreeMap<String, PlanSource>,
}

impl PlanCatalog {
    /// Build every configured plan, then fill in the compiled defaults
    /// for well-known names the configuration does not override.
    ///
    /// Fails on the first malformed command template.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut plans = BTreeMap::new();
        for (name, plan_config) in &config.plans {
            let plan = Plan::from_templates(&plan_config.commands)?;
            plans.insert(name.clone(), PlanSource::UserDefined(plan));
        }
        for (name, default) in [
            (RELEASE_PLAN, default_release_plan()?),
            (DEVELOPMENT_PLAN, default_development_plan()?),
        ] {
            plans
                .entry(name.to_string())
                .or_insert(PlanSource::BuiltinDefault(default));
        }
        Ok(PlanCatalog { plans })
    }

    pub fn get(&self, name: &str) -> Result<&Plan> {
        self.plans
            .get(name)
            .map(PlanSource::plan)
            .ok_or_else(|| ReleaseError::PlanNotFound(name.to_string()))
    }

    pub fn source(&self, name: &str) -> Option<&PlanSource> {
        self.plans.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plans.keys().map(String::as_str)
    }
}

fn default_release_plan() -> Result<Plan> {
    Plan::from_templates([
        "git add .",
        r#"git commit -m "Release ${RELEASE_VERSION}""#,
        "git tag ${RELEASE_VERSION}",
    ])
}

fn default_development_plan() -> Result<Plan> {
    Plan::from_templates([
        "git add .",
        r#"git commit -m "Continue development on ${DEVELOPMENT_VERSION}""#,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanConfig;
    use std::collections::BTreeMap;

    #[test]
    fn test_defaults_present_without_config() {
        let catalog = PlanCatalog::from_config(&Config::default()).unwrap();
        let release = catalog.get(RELEASE_PLAN).unwrap();
        assert_eq!(release.commands().len(), 3);
        assert!(release.required_variables().contains("RELEASE_VERSION"));

        let development = catalog.get(DEVELOPMENT_PLAN).unwrap();
        assert_eq!(development.commands().len(), 2);
        assert!(development
            .required_variables()
            .contains("DEVELOPMENT_VERSION"));

        assert!(matches!(
            catalog.source(RELEASE_PLAN),
            Some(PlanSource::BuiltinDefault(_))
        ));
    }

    #[test]
    fn test_config_overrides_default() {
        let mut config = Config::default();
        config.plans.insert(
            RELEASE_PLAN.to_string(),
            PlanConfig {
                commands: vec!["make release".to_string()],
                env: BTreeMap::new(),
            },
        );
        let catalog = PlanCatalog::from_config(&config).unwrap();
        let release = catalog.get(RELEASE_PLAN).unwrap();
        assert_eq!(release.commands().len(), 1);
        assert!(matches!(
            catalog.source(RELEASE_PLAN),
            Some(PlanSource::UserDefined(_))
        ));
    }

    #[test]
    fn test_unknown_plan_not_found() {
        let catalog = PlanCatalog::from_config(&Config::default()).unwrap();
        let err = catalog.get("publish").unwrap_err();
        assert!(matches!(err, ReleaseError::PlanNotFound(_)));
    }

    #[test]
    fn test_configured_publish_plan_is_found() {
        let mut config = Config::default();
        config.plans.insert(
            "publish".to_string(),
            PlanConfig {
                commands: vec!["npm publish".to_string()],
                env: BTreeMap::new(),
            },
        );
        let catalog = PlanCatalog::from_config(&config).unwrap();
        assert!(catalog.get("publish").is_ok());
    }

    #[test]
    fn test_malformed_configured_plan_fails_construction() {
        let mut config = Config::default();
        config.plans.insert(
            "broken".to_string(),
            PlanConfig {
                commands: vec!["echo \"unclosed".to_string()],
                env: BTreeMap::new(),
            },
        );
        assert!(PlanCatalog::from_config(&config).is_err());
    }
}
