//! Error conversion utilities for CLI.
//!
//! Converts inspector-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use inspector_core::InspectError;

/// Converts `InspectError` to a user-friendly anyhow error.
///
/// `subject` names what was being inspected, e.g. `rake-13.0.6.gem`.
pub fn convert_inspect_error(err: InspectError, subject: &str) -> anyhow::Error {
    match err {
        InspectError::NotFound { path } => {
            anyhow!(
                "File '{path}' not found in {subject}\n\
                 HINT: List the available paths with `inspector files` or `inspector inspect-file`."
            )
        }
        InspectError::BadFile(reason) => {
            anyhow!(
                "Invalid archive {subject}: {reason}\n\
                 HINT: The distribution may be corrupted or truncated."
            )
        }
        InspectError::UpstreamUnavailable {
            status: Some(404),
            reason,
        } => {
            anyhow!(
                "{subject} was not found upstream: {reason}\n\
                 HINT: Check the project name, the version and --platform."
            )
        }
        InspectError::UpstreamUnavailable { status, reason } => {
            let status = status.map(|s| format!(" (HTTP {s})")).unwrap_or_default();
            anyhow!(
                "Upstream unavailable while fetching {subject}{status}: {reason}\n\
                 HINT: Check network access, --registry-url and --download-url, or retry later."
            )
        }
        InspectError::UnsupportedFormat { filename } => {
            anyhow!(
                "Distribution format not supported: {filename}\n\
                 HINT: Supported formats: gem, tar.gz, tgz, zip, whl, egg"
            )
        }
        InspectError::ToolFailed { tool, reason } => {
            anyhow!(
                "{tool} failed on {subject}: {reason}\n\
                 HINT: Install {tool} or point --pycdc/--pycdas at it."
            )
        }
        InspectError::Io(io_err) => {
            anyhow!("I/O error while processing {subject}: {io_err}")
        }
    }
}

/// Adds inspection context to a core result.
pub fn add_context<T>(result: Result<T, InspectError>, subject: &str) -> anyhow::Result<T> {
    result.map_err(|e| convert_inspect_error(e, subject))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_convert_not_found() {
        let converted = convert_inspect_error(InspectError::not_found("lib/x.rb"), "x-1.0.gem");
        let msg = format!("{converted:?}");
        assert!(msg.contains("'lib/x.rb' not found in x-1.0.gem"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_upstream_404() {
        let err = InspectError::UpstreamUnavailable {
            status: Some(404),
            reason: "GET returned 404".into(),
        };
        let msg = format!("{:?}", convert_inspect_error(err, "x-1.0.gem"));
        assert!(msg.contains("not found upstream"));
        assert!(msg.contains("--platform"));
    }

    #[test]
    fn test_convert_upstream_other() {
        let err = InspectError::UpstreamUnavailable {
            status: Some(503),
            reason: "busy".into(),
        };
        let msg = format!("{:?}", convert_inspect_error(err, "x-1.0.gem"));
        assert!(msg.contains("(HTTP 503)"));
        assert!(msg.contains("retry later"));
    }

    #[test]
    fn test_convert_tool_failed() {
        let err = InspectError::ToolFailed {
            tool: "pycdc".into(),
            reason: "failed to start: No such file or directory".into(),
        };
        let msg = format!("{:?}", convert_inspect_error(err, "a.pyc"));
        assert!(msg.contains("Install pycdc"));
    }

    #[test]
    fn test_convert_io_error() {
        let err = InspectError::from(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        let msg = format!("{:?}", convert_inspect_error(err, "archive.tar.gz"));
        assert!(msg.contains("I/O error"));
    }

    #[test]
    fn test_add_context_passes_ok() {
        assert_eq!(add_context(Ok::<_, InspectError>(3), "x").ok(), Some(3));
    }
}
