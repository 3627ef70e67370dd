use std::path::Path;

use git2::{Repository, StatusOptions};

use crate::error::{ReleaseError, Result};

/// Wrapper around a git2 Repository for the queries the release
/// workflow needs: current branch, working-tree cleanliness, and the
/// existing-tag guard.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Discover the repository at or above `root`.
    pub fn discover(root: &Path) -> Result<Self> {
        let repo = Repository::discover(root)
            .map_err(|e| ReleaseError::repo(format!("Not in a git repository: {}", e)))?;
        Ok(GitRepo { repo })
    }

    /// The short name of the currently checked-out branch.
    pub fn branch_name(&self) -> Result<String> {
        let head = self.repo.head()?;
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::repo("Unable to get branch"))
    }

    /// Fail if any tracked file has staged or unstaged modifications.
    /// Untracked files do not count.
    pub fn assert_no_uncommitted_changes(&self) -> Result<()> {
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut options))?;
        if statuses.is_empty() {
            Ok(())
        } else {
            Err(ReleaseError::repo("You have uncommitted changes"))
        }
    }

    /// All tag names in the repository.
    pub fn list_tags(&self) -> Result<Vec<String>> {
        let names = self.repo.tag_names(None)?;
        Ok(names.iter().flatten().map(str::to_string).collect())
    }

    pub fn tag_exists(&self, tag: &str) -> Result<bool> {
        Ok(self.list_tags()?.iter().any(|name| name == tag))
    }

    /// The guard applied to release versions: the chosen version must
    /// not already exist as a tag.
    pub fn assert_tag_does_not_exist(&self, tag: &str) -> Result<()> {
        if self.tag_exists(tag)? {
            Err(ReleaseError::tag(format!(
                "git tag already exists '{}'",
                tag
            )))
        } else {
            Ok(())
        }
    }
}
