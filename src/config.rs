use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReleaseError, Result};

/// Complete configuration for release-tool.
///
/// Every field is optional; an absent file yields the defaults, which
/// leave plan lookup to the compiled-in release/development plans.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Repository slug (owner_name/repo_name) for CI triggering.
    #[serde(default)]
    pub slug: Option<String>,

    /// Travis CI tier: "org" or "pro". Presence routes plan execution
    /// to the CI service unless --execute is given.
    #[serde(default)]
    pub travis: Option<String>,

    /// Project type controlling which manifests get version bumps.
    #[serde(default, rename = "type")]
    pub project_type: Option<String>,

    /// Global variable overrides, consulted after per-plan overrides.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(default)]
    pub plans: BTreeMap<String, PlanConfig>,
}

/// A named plan: its command templates and per-plan variable overrides.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PlanConfig {
    #[serde(default)]
    pub commands: Vec<String>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in the current directory
/// 3. `.release.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)
            .map_err(|e| ReleaseError::config(format!("Unable to read {}: {}", path, e)))?
    } else if Path::new("./release.toml").exists() {
        fs::read_to_string("./release.toml")
            .map_err(|e| ReleaseError::config(format!("Unable to read release.toml: {}", e)))?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".release.toml");
        if config_path.exists() {
            fs::read_to_string(&config_path).map_err(|e| {
                ReleaseError::config(format!("Unable to read {}: {}", config_path.display(), e))
            })?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str)
        .map_err(|e| ReleaseError::config(format!("Invalid configuration: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_empty() {
        let config = Config::default();
        assert!(config.slug.is_none());
        assert!(config.travis.is_none());
        assert!(config.project_type.is_none());
        assert!(config.env.is_empty());
        assert!(config.plans.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
slug = "acme/widget"
travis = "pro"
type = "JavaScript"

[env]
NPM_TOKEN = "secret"

[plans.release]
commands = ["git add .", "git tag ${RELEASE_VERSION}"]

[plans.release.env]
GPG_KEY = "ABCD"

[plans.publish]
commands = ["npm publish"]
"#,
        )
        .unwrap();

        assert_eq!(config.slug.as_deref(), Some("acme/widget"));
        assert_eq!(config.travis.as_deref(), Some("pro"));
        assert_eq!(config.project_type.as_deref(), Some("JavaScript"));
        assert_eq!(config.env.get("NPM_TOKEN"), Some(&"secret".to_string()));

        let release = config.plans.get("release").unwrap();
        assert_eq!(release.commands.len(), 2);
        assert_eq!(release.env.get("GPG_KEY"), Some(&"ABCD".to_string()));

        let publish = config.plans.get("publish").unwrap();
        assert!(publish.env.is_empty());
    }

    #[test]
    fn test_parse_rejects_invalid_toml() {
        let result = toml::from_str::<Config>("plans = 3");
        assert!(result.is_err());
    }
}
