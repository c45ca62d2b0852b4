//! Error types for steward operations.

use thiserror::Error;

/// Main error type for steward operations.
#[derive(Error, Debug)]
pub enum StewardError {
    // Cli args errors
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Lookup / state errors
    #[error("Not found: {entity}")]
    NotFound { entity: String },

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Ambiguous state: {0}")]
    AmbiguousState(String),

    #[error(
        "Release branch '{branch}' did not converge to {sha} after {attempts} attempts"
    )]
    BranchSyncExhausted {
        branch: String,
        sha: String,
        attempts: usize,
    },

    #[error("Jira release '{version}' failed for {}", .failures.join("; "))]
    JiraReleaseFailed {
        version: String,
        failures: Vec<String>,
    },

    // External service errors
    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Invalid git remote URL: {0}")]
    InvalidRemoteUrl(String),

    #[error("Git URL parse error: {0}")]
    GitUrlError(#[from] git_url_parse::GitUrlParseError),

    // Network/API errors
    #[error("Network request failed: {0}")]
    NetworkError(String),

    #[error("API authentication failed: {0}")]
    AuthenticationError(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Regular expression error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using StewardError
pub type Result<T> = std::result::Result<T, StewardError>;

impl StewardError {
    /// Create a not-found error naming the missing entity
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
        }
    }

    /// Create a precondition error
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::PreconditionFailed(msg.into())
    }

    /// Create an ambiguous state error
    pub fn ambiguous(msg: impl Into<String>) -> Self {
        Self::AmbiguousState(msg.into())
    }

    /// Create an external service error
    pub fn external(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<std::io::Error> for StewardError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

impl From<reqwest::Error> for StewardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            return Self::NetworkError(err.to_string());
        }

        match err.status().map(|s| s.as_u16()) {
            Some(401) | Some(403) => Self::AuthenticationError(err.to_string()),
            Some(429) => Self::RateLimitExceeded,
            Some(_) => Self::ExternalService(err.to_string()),
            None => Self::NetworkError(err.to_string()),
        }
    }
}

impl From<reqwest::header::InvalidHeaderValue> for StewardError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::AuthenticationError(format!("Invalid header value: {}", err))
    }
}

impl From<crate::release::ReleaseManagerParamsBuilderError> for StewardError {
    fn from(err: crate::release::ReleaseManagerParamsBuilderError) -> Self {
        Self::InvalidArgs(err.to_string())
    }
}

impl From<octocrab::Error> for StewardError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. }
                if source.message.contains("rate limit") =>
            {
                Self::RateLimitExceeded
            }
            _ => Self::ExternalService(format!("GitHub API error: {}", err)),
        }
    }
}
