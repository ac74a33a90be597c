//! JSON output formatter for machine-readable results.

use super::formatter::ArchiveListing;
use super::formatter::DistributionFile;
use super::formatter::FileReport;
use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use inspector_core::registry::ReleaseGroup;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    /// Prints a failed command as a JSON document.
    pub fn format_error(operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_versions(&self, project: &str, groups: &[ReleaseGroup]) -> Result<()> {
        #[derive(Serialize)]
        struct VersionsOutput<'a> {
            project: &'a str,
            releases: &'a [ReleaseGroup],
        }

        Self::output(&JsonOutput::success(
            "versions",
            VersionsOutput {
                project,
                releases: groups,
            },
        ))
    }

    fn format_distributions(
        &self,
        project: &str,
        version: &str,
        files: &[DistributionFile],
    ) -> Result<()> {
        #[derive(Serialize)]
        struct DistributionsOutput<'a> {
            project: &'a str,
            version: &'a str,
            distributions: &'a [DistributionFile],
        }

        Self::output(&JsonOutput::success(
            "distributions",
            DistributionsOutput {
                project,
                version,
                distributions: files,
            },
        ))
    }

    fn format_listing(&self, listing: &ArchiveListing<'_>) -> Result<()> {
        Self::output(&JsonOutput::success("files", listing))
    }

    fn format_file(&self, operation: &str, report: &FileReport<'_>) -> Result<()> {
        Self::output(&JsonOutput::success(operation, report))
    }

    fn format_tool_output(&self, operation: &str, path: &str, output: &str) -> Result<()> {
        #[derive(Serialize)]
        struct ToolOutput<'a> {
            path: &'a str,
            output: &'a str,
        }

        Self::output(&JsonOutput::success(operation, ToolOutput { path, output }))
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData<'a> {
            message: &'a str,
        }

        // stderr keeps stdout a single JSON document
        let output = JsonOutput::success("warning", WarningData { message });
        if let Ok(json) = serde_json::to_string(&output) {
            let _ = writeln!(io::stderr(), "{json}");
        }
    }
}
