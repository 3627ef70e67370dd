//! Version string validation and derivation.
//!
//! Three roles share the semver grammar: a current version (a
//! development-suffixed version in the default workflow), a release or
//! release-candidate version (no development suffix allowed), and a
//! development version (must carry a recognized development suffix).

use semver::Version;

use crate::error::{ReleaseError, Result};

/// Prerelease tags recognized as development suffixes.
pub const DEVELOPMENT_MARKERS: [&str; 3] = ["dev", "snapshot", "SNAPSHOT"];

const CANDIDATE_PATTERN: &str = r"^(alpha|beta|rc)(\.[0-9]+)?$";

fn parse(version: &str) -> Result<Version> {
    Version::parse(version).map_err(|_| ReleaseError::invalid_version(version))
}

/// Assert that a version number is a Semantic Version number.
pub fn assert_valid_semantic_version(version: &str) -> Result<()> {
    parse(version).map(|_| ())
}

/// Get the prerelease portion of a Semantic Version number, the part
/// between the first `-` and any `+`.
pub fn extract_prerelease(version: &str) -> Result<Option<String>> {
    let parsed = parse(version)?;
    if parsed.pre.is_empty() {
        Ok(None)
    } else {
        Ok(Some(parsed.pre.as_str().to_string()))
    }
}

/// Assert that a version number is both a Semantic Version number and
/// carries one of the recognized development suffixes.
pub fn assert_valid_development_version(version: &str) -> Result<()> {
    match extract_prerelease(version)? {
        Some(tag) if DEVELOPMENT_MARKERS.contains(&tag.as_str()) => Ok(()),
        _ => Err(ReleaseError::NotDevelopmentVersion(version.to_string())),
    }
}

/// Assert that a version number is both a Semantic Version number and
/// not a prerelease version.
pub fn assert_valid_release_version(version: &str) -> Result<()> {
    match extract_prerelease(version)? {
        None => Ok(()),
        Some(_) => Err(ReleaseError::HasPrerelease(version.to_string())),
    }
}

/// Assert that a version number is both a Semantic Version number and
/// carries an `alpha`, `beta`, or `rc` prerelease tag, optionally
/// followed by a dot and digits.
pub fn assert_valid_release_candidate_version(version: &str) -> Result<()> {
    let prerelease = extract_prerelease(version)?;
    let tag = match prerelease {
        Some(tag) => tag,
        None => return Err(ReleaseError::NotReleaseCandidate(version.to_string())),
    };
    match regex::Regex::new(CANDIDATE_PATTERN) {
        Ok(re) if re.is_match(&tag) => Ok(()),
        _ => Err(ReleaseError::NotReleaseCandidate(version.to_string())),
    }
}

/// Assert that a version number is either a Release or a Release
/// Candidate version number, composing both underlying failures into
/// the error message when it is neither.
pub fn assert_valid_release_or_release_candidate_version(version: &str) -> Result<()> {
    let release = match assert_valid_release_version(version) {
        Ok(()) => return Ok(()),
        Err(error) => error,
    };
    match assert_valid_release_candidate_version(version) {
        Ok(()) => Ok(()),
        Err(candidate) => Err(ReleaseError::NotReleaseOrCandidate {
            version: version.to_string(),
            release: release.to_string(),
            candidate: candidate.to_string(),
        }),
    }
}

/// Check whether a Semantic Version number is a Release Candidate
/// version. Never fails; invalid input is simply not a candidate.
pub fn is_release_candidate_version(version: &str) -> bool {
    assert_valid_release_candidate_version(version).is_ok()
}

/// The `MAJOR.MINOR.PATCH` core of a version, with any prerelease or
/// build components stripped.
pub fn base_version(version: &str) -> Result<String> {
    let parsed = parse(version)?;
    Ok(format!("{}.{}.{}", parsed.major, parsed.minor, parsed.patch))
}

/// The suggested development version to continue on after a release:
/// the release's base version, patch-incremented unless the release was
/// a release candidate, with a `-dev` suffix.
pub fn default_development_version(release_version: &str) -> Result<String> {
    let parsed = parse(release_version)?;
    let patch = if is_release_candidate_version(release_version) {
        parsed.patch
    } else {
        parsed.patch + 1
    };
    Ok(format!("{}.{}.{}-dev", parsed.major, parsed.minor, patch))
}
