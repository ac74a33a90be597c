//! Output formatter trait for CLI results.

use anyhow::Result;
use inspector_core::FileContents;
use inspector_core::analysis::Finding;
use inspector_core::registry::ReleaseGroup;
use serde::Serialize;

/// Listing of one opened distribution.
#[derive(Debug, Serialize)]
pub struct ArchiveListing<'a> {
    pub name: &'a str,
    pub format: &'a str,
    pub size: u64,
    pub entries: &'a [String],
}

/// One platform build of a release.
#[derive(Debug, Serialize)]
pub struct DistributionFile {
    pub platform: String,
    pub filename: String,
    pub url: String,
}

/// Findings for one file, optionally with its decoded contents.
#[derive(Debug, Serialize)]
pub struct FileReport<'a> {
    pub path: &'a str,
    pub findings: &'a [Finding],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<&'a FileContents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_link: Option<&'a str>,
}

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format a project's releases
    fn format_versions(&self, project: &str, groups: &[ReleaseGroup]) -> Result<()>;

    /// Format the platform builds of a release
    fn format_distributions(
        &self,
        project: &str,
        version: &str,
        files: &[DistributionFile],
    ) -> Result<()>;

    /// Format the entry listing of a distribution
    fn format_listing(&self, listing: &ArchiveListing<'_>) -> Result<()>;

    /// Format findings and contents of a file
    fn format_file(&self, operation: &str, report: &FileReport<'_>) -> Result<()>;

    /// Format decompiler or disassembler output
    fn format_tool_output(&self, operation: &str, path: &str, output: &str) -> Result<()>;

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
