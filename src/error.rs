use thiserror::Error;

/// Unified error type for release-tool operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Not a Semantic Version '{0}'")]
    InvalidVersion(String),

    #[error("Not a recognized Development Version '{0}'")]
    NotDevelopmentVersion(String),

    #[error("A Release cannot include a prerelease version '{0}'")]
    HasPrerelease(String),

    #[error("Not a recognized Release Candidate version '{0}'")]
    NotReleaseCandidate(String),

    #[error("Not a recognized Release or Release Candidate version '{version}': {release}; {candidate}")]
    NotReleaseOrCandidate {
        version: String,
        release: String,
        candidate: String,
    },

    #[error("Malformed command '{template}': {reason}")]
    MalformedCommand { template: String, reason: String },

    #[error("Unresolved variable '{name}' in command '{command}'")]
    UnresolvedVariable { name: String, command: String },

    #[error("Unassigned variables: {}", .0.join(", "))]
    UnassignedVariables(Vec<String>),

    #[error("{program} exited with code {code}")]
    CommandFailed { program: String, code: i32 },

    #[error("No plan exists in the configuration, nor in the defaults, for '{0}'")]
    PlanNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Repository error: {0}")]
    Repo(String),

    #[error("Remote build error: {0}")]
    Remote(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("User aborted release")]
    Aborted,
}

/// Convenience type alias for Results in release-tool
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create an invalid-version error for the offending string
    pub fn invalid_version(version: impl Into<String>) -> Self {
        ReleaseError::InvalidVersion(version.into())
    }

    /// Create a malformed-command error with context
    pub fn malformed_command(template: impl Into<String>, reason: impl Into<String>) -> Self {
        ReleaseError::MalformedCommand {
            template: template.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ReleaseError::Manifest(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::Tag(msg.into())
    }

    /// Create a repository error with context
    pub fn repo(msg: impl Into<String>) -> Self {
        ReleaseError::Repo(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }
}
