//! Error types for package generation.

use std::path::PathBuf;

/// Generation errors.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// Upstream sources no longer match the expected textual shape.
    #[error("unexpected upstream format: {message}")]
    UpstreamFormat { message: String },

    /// Non-2xx response from the upstream host.
    #[error("failed to fetch {url}: {status}")]
    Http { url: String, status: String },

    /// Transport-level failure.
    #[error("network error: {message}")]
    Network { message: String },

    /// Response body could not be decoded.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Two descriptors map to the same output file.
    #[error("duplicate lib: {}", path.display())]
    DuplicateDestination { path: PathBuf },

    /// Two descriptors share a logical name.
    #[error("duplicate lib name: {name}")]
    DuplicateName { name: String },

    /// Libs required by an entry file are absent.
    #[error("failed to find all required libs for `{flavor}` flavor (missing: {})", missing.join(", "))]
    MissingRequired {
        flavor: String,
        missing: Vec<String>,
    },

    /// Invalid configuration or arguments.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Filesystem error.
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Worker task failed or the download pool broke down.
    #[error("internal error: {message}")]
    Internal { message: String },

    /// Registry publish step failed.
    #[error("publish failed: {message}")]
    Publish { message: String },
}

impl GenError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::UpstreamFormat {
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 1,

            // Upstream changed shape, a human has to look
            Self::UpstreamFormat { .. } => 3,

            // Invariant violations
            Self::DuplicateDestination { .. } => 4,
            Self::DuplicateName { .. } => 4,
            Self::MissingRequired { .. } => 4,

            // Network
            Self::Http { .. } => 5,
            Self::Network { .. } => 5,
            Self::InvalidResponse { .. } => 5,

            Self::Io { .. } => 6,
            Self::Internal { .. } => 6,
            Self::Publish { .. } => 7,
        }
    }
}

impl From<reqwest::Error> for GenError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for generation operations.
pub type GenResult<T> = Result<T, GenError>;
