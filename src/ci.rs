//! Remote build triggering via the Travis CI v3 API.
//!
//! Instead of running plans locally, the tool can instruct Travis to
//! run the release: the triggered build re-invokes the tool in
//! non-interactive execute mode with the already-resolved versions.

use serde_json::json;

use crate::error::{ReleaseError, Result};

/// Everything needed to trigger a remote release build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub slug: String,
    pub token: String,
    pub branch: String,
    /// Travis tier from config: "pro" routes to travis-ci.com.
    pub tier: Option<String>,
    pub current_version: String,
    pub release_version: String,
    pub development_version: Option<String>,
    pub publish: bool,
}

/// POST a build request; returns the raw response body for display.
pub fn trigger_build(request: &BuildRequest) -> Result<String> {
    let url = format!(
        "https://{}/repo/{}/requests",
        api_host(request.tier.as_deref()),
        request.slug.replace('/', "%2F")
    );
    let body = json!({
        "request": {
            "branch": request.branch,
            "config": {
                "after_success": after_success(request),
            },
        },
    });

    let client = reqwest::blocking::Client::new();
    let response = client
        .post(&url)
        .header("Content-Type", "application/json")
        .header("Accept", "application/json")
        .header("Travis-API-Version", "3")
        .header("Authorization", format!("token {}", request.token))
        .json(&body)
        .send()
        .map_err(|e| ReleaseError::remote(e.to_string()))?;

    response
        .text()
        .map_err(|e| ReleaseError::remote(e.to_string()))
}

fn api_host(tier: Option<&str>) -> &'static str {
    if tier == Some("pro") {
        "api.travis-ci.com"
    } else {
        "api.travis-ci.org"
    }
}

/// The command the triggered build runs: the tool itself, in
/// non-interactive execute mode, with the resolved versions.
fn after_success(request: &BuildRequest) -> String {
    let mut command = format!(
        "release --branch {} -n{} -x {} {}",
        request.branch,
        if request.publish { " -p" } else { "" },
        request.current_version,
        request.release_version,
    );
    if let Some(development_version) = &request.development_version {
        command.push(' ');
        command.push_str(development_version);
    }
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> BuildRequest {
        BuildRequest {
            slug: "acme/widget".to_string(),
            token: "secret".to_string(),
            branch: "main".to_string(),
            tier: None,
            current_version: "1.2.3-dev".to_string(),
            release_version: "1.2.3".to_string(),
            development_version: Some("1.2.4-dev".to_string()),
            publish: false,
        }
    }

    #[test]
    fn test_api_host_tiers() {
        assert_eq!(api_host(None), "api.travis-ci.org");
        assert_eq!(api_host(Some("org")), "api.travis-ci.org");
        assert_eq!(api_host(Some("pro")), "api.travis-ci.com");
    }

    #[test]
    fn test_after_success_with_development_version() {
        assert_eq!(
            after_success(&request()),
            "release --branch main -n -x 1.2.3-dev 1.2.3 1.2.4-dev"
        );
    }

    #[test]
    fn test_after_success_publish_without_development_version() {
        let mut request = request();
        request.publish = true;
        request.development_version = None;
        assert_eq!(
            after_success(&request),
            "release --branch main -n -p -x 1.2.3-dev 1.2.3"
        );
    }
}
