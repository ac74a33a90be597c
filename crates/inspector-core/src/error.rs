//! Error types for distribution inspection.

use std::sync::Arc;

use thiserror::Error;

/// Result type alias using `InspectError`.
pub type Result<T> = std::result::Result<T, InspectError>;

/// Errors that can occur while fetching, opening or reading a distribution.
///
/// Every variant is recoverable at the boundary that produced it. The type is
/// `Clone` so that one failed fetch can be reported to every caller that was
/// waiting on it.
#[derive(Error, Debug, Clone)]
pub enum InspectError {
    /// Requested path is absent from an otherwise valid archive.
    #[error("file not found in archive: {path}")]
    NotFound {
        /// The path that was requested.
        path: String,
    },

    /// Archive bytes are corrupt or cannot be parsed.
    #[error("bad archive file: {0}")]
    BadFile(String),

    /// The registry or file host could not be reached or answered with an
    /// error status.
    #[error("upstream unavailable{}: {reason}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    UpstreamUnavailable {
        /// HTTP status returned by the upstream host, when one was received.
        status: Option<u16>,
        /// Human-readable cause.
        reason: String,
    },

    /// Archive file name does not map to a supported container format.
    #[error("unsupported distribution format: {filename}")]
    UnsupportedFormat {
        /// The distribution file name.
        filename: String,
    },

    /// External decompiler or disassembler failed to run.
    #[error("{tool} failed: {reason}")]
    ToolFailed {
        /// Name of the tool that was invoked.
        tool: String,
        /// Human-readable cause.
        reason: String,
    },

    /// Local I/O failed.
    #[error("I/O error: {0}")]
    Io(Arc<std::io::Error>),
}

impl From<std::io::Error> for InspectError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl InspectError {
    /// Creates a `NotFound` error for the given path.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Returns `true` if this error means "no such file".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the failure was caused by the upstream host.
    ///
    /// Timeouts of outbound fetches are reported this way too, without a
    /// status.
    ///
    /// # Examples
    ///
    /// ```
    /// use inspector_core::InspectError;
    ///
    /// let err = InspectError::UpstreamUnavailable {
    ///     status: Some(503),
    ///     reason: "service unavailable".to_string(),
    /// };
    /// assert!(err.is_upstream());
    /// assert_eq!(err.status(), Some(503));
    ///
    /// let err = InspectError::BadFile("truncated gzip stream".to_string());
    /// assert!(!err.is_upstream());
    /// ```
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { .. })
    }

    /// Returns the upstream HTTP status, if this error carries one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UpstreamUnavailable { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns a context string for this error, if available.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::BadFile(msg) => Some(msg),
            Self::UpstreamUnavailable { reason, .. } | Self::ToolFailed { reason, .. } => {
                Some(reason)
            }
            _ => None,
        }
    }
}
