//! Version bumping in project manifest files.
//!
//! Which manifests get bumped depends on the configured project type.
//! All manifests are read and validated before any of them is written,
//! so a bad manifest never leaves the set half-updated.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{ReleaseError, Result};

/// Bump the version number in every manifest registered for the
/// project type, from `from` to `to`.
///
/// No configured type is a no-op; an unrecognized type is an error.
pub fn bump(root: &Path, from: &str, to: &str, project_type: Option<&str>) -> Result<()> {
    let updates = match project_type {
        None => Vec::new(),
        Some("JavaScript") => {
            let mut updates = Vec::new();
            if let Some(update) = prepare_json_update(root, "package.json", from, to, true)? {
                updates.push(update);
            }
            if let Some(update) = prepare_json_update(root, "bower.json", from, to, false)? {
                updates.push(update);
            }
            updates
        }
        Some(other) => {
            return Err(ReleaseError::config(format!(
                "Unrecognized project type '{}'",
                other
            )))
        }
    };
    for update in updates {
        update.apply()?;
    }
    Ok(())
}

/// The project name from package.json, when one is present.
pub fn project_name(root: &Path) -> Option<String> {
    let json = read_json(root, "package.json").ok()??;
    json.get("name")?.as_str().map(str::to_string)
}

/// The version from package.json, when one is present.
pub fn manifest_version(root: &Path) -> Option<String> {
    let json = read_json(root, "package.json").ok()??;
    json.get("version")?.as_str().map(str::to_string)
}

/// A validated pending write: path plus the already-updated document.
struct ManifestUpdate {
    path: PathBuf,
    json: Value,
}

impl ManifestUpdate {
    fn apply(&self) -> Result<()> {
        let rendered = serde_json::to_string_pretty(&self.json)
            .map_err(|e| ReleaseError::manifest(format!("Unable to render {}: {}", self.path.display(), e)))?;
        fs::write(&self.path, rendered + "\n")
            .map_err(|_| ReleaseError::manifest(format!("Unable to write {}", self.path.display())))
    }
}

fn read_json(root: &Path, name: &str) -> Result<Option<Value>> {
    let path = root.join(name);
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(&path)
        .map_err(|_| ReleaseError::manifest(format!("Unable to read {}", name)))?;
    let json = serde_json::from_str(&contents)
        .map_err(|_| ReleaseError::manifest(format!("Unable to read {}", name)))?;
    Ok(Some(json))
}

fn prepare_json_update(
    root: &Path,
    name: &str,
    from: &str,
    to: &str,
    must_exist: bool,
) -> Result<Option<ManifestUpdate>> {
    let mut json = match read_json(root, name)? {
        Some(json) => json,
        None if must_exist => {
            return Err(ReleaseError::manifest(format!("{} does not exist", name)))
        }
        None => return Ok(None),
    };

    let version = json
        .get("version")
        .and_then(Value::as_str)
        .map(str::to_string);
    match version {
        None => {
            return Err(ReleaseError::manifest(format!(
                "A version number is not present in {}",
                name
            )))
        }
        Some(version) if version != from => {
            return Err(ReleaseError::manifest(format!(
                "Unexpected version in {} '{}'",
                name, version
            )))
        }
        Some(_) => {}
    }

    if let Some(object) = json.as_object_mut() {
        object.insert("version".to_string(), Value::String(to.to_string()));
    }
    Ok(Some(ManifestUpdate {
        path: root.join(name),
        json,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(root: &Path, name: &str, contents: &str) {
        fs::write(root.join(name), contents).unwrap();
    }

    #[test]
    fn test_bump_updates_package_json() {
        let dir = TempDir::new().unwrap();
        write_manifest(
            dir.path(),
            "package.json",
            r#"{"name": "widget", "version": "1.2.3-dev"}"#,
        );

        bump(dir.path(), "1.2.3-dev", "1.2.3", Some("JavaScript")).unwrap();

        let updated = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert!(updated.contains(r#""version": "1.2.3""#));
        assert!(updated.ends_with('\n'));
    }

    #[test]
    fn test_bump_updates_optional_bower_json() {
        let dir = TempDir::new().unwrap();
        write_manifest(
            dir.path(),
            "package.json",
            r#"{"name": "widget", "version": "1.2.3-dev"}"#,
        );
        write_manifest(
            dir.path(),
            "bower.json",
            r#"{"name": "widget", "version": "1.2.3-dev"}"#,
        );

        bump(dir.path(), "1.2.3-dev", "1.2.3", Some("JavaScript")).unwrap();

        let bower = fs::read_to_string(dir.path().join("bower.json")).unwrap();
        assert!(bower.contains(r#""version": "1.2.3""#));
    }

    #[test]
    fn test_bump_requires_package_json() {
        let dir = TempDir::new().unwrap();
        let err = bump(dir.path(), "1.0.0", "1.0.1", Some("JavaScript")).unwrap_err();
        assert!(err.to_string().contains("package.json does not exist"));
    }

    #[test]
    fn test_bump_rejects_unexpected_version() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "package.json", r#"{"version": "9.9.9"}"#);
        let err = bump(dir.path(), "1.0.0", "1.0.1", Some("JavaScript")).unwrap_err();
        assert!(err.to_string().contains("Unexpected version"));
    }

    #[test]
    fn test_bump_rejects_missing_version_field() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "package.json", r#"{"name": "widget"}"#);
        let err = bump(dir.path(), "1.0.0", "1.0.1", Some("JavaScript")).unwrap_err();
        assert!(err.to_string().contains("version number is not present"));
    }

    #[test]
    fn test_bump_validates_before_writing() {
        // A bad bower.json must leave package.json untouched.
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "package.json", r#"{"version": "1.0.0"}"#);
        write_manifest(dir.path(), "bower.json", r#"{"version": "2.0.0"}"#);

        assert!(bump(dir.path(), "1.0.0", "1.0.1", Some("JavaScript")).is_err());
        let package = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert!(package.contains("1.0.0"));
    }

    #[test]
    fn test_bump_without_type_is_noop() {
        let dir = TempDir::new().unwrap();
        bump(dir.path(), "1.0.0", "1.0.1", None).unwrap();
    }

    #[test]
    fn test_bump_unknown_type() {
        let dir = TempDir::new().unwrap();
        let err = bump(dir.path(), "1.0.0", "1.0.1", Some("COBOL")).unwrap_err();
        assert!(err.to_string().contains("Unrecognized project type"));
    }

    #[test]
    fn test_project_name_and_version_probes() {
        let dir = TempDir::new().unwrap();
        assert_eq!(project_name(dir.path()), None);

        write_manifest(
            dir.path(),
            "package.json",
            r#"{"name": "widget", "version": "0.4.0-dev"}"#,
        );
        assert_eq!(project_name(dir.path()), Some("widget".to_string()));
        assert_eq!(manifest_version(dir.path()), Some("0.4.0-dev".to_string()));
    }
}
