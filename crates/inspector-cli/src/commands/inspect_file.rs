//! Inspect-file command implementation.

use crate::cli::InspectFileArgs;
use crate::error::add_context;
use crate::error::convert_inspect_error;
use crate::output::ArchiveListing;
use crate::output::FileReport;
use crate::output::OutputFormatter;
use anyhow::Result;
use inspector_core::AnalysisConfig;
use inspector_core::Distribution;
use inspector_core::FileContents;
use inspector_core::InspectError;
use inspector_core::analysis::analyze;
use inspector_core::analysis::is_compiled;
use inspector_core::formats::ArchiveSource;

pub fn execute(
    args: &InspectFileArgs,
    analysis: &AnalysisConfig,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let name = args
        .archive
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.archive.display().to_string());

    let distribution = add_context(Distribution::open_file(&args.archive), &name)?
        .ok_or_else(|| {
            convert_inspect_error(
                InspectError::UnsupportedFormat {
                    filename: name.clone(),
                },
                &name,
            )
        })?;

    let Some(path) = &args.path else {
        return formatter.format_listing(&ArchiveListing {
            name: &name,
            format: distribution.format_name(),
            size: distribution.size(),
            entries: distribution.list(),
        });
    };

    let mut findings = add_context(analyze(&distribution, path, analysis), &name)?;
    let collected: Vec<_> = findings.by_ref().collect();
    let contents = if is_compiled(path) {
        None
    } else {
        Some(add_context(
            FileContents::from_bytes(path, findings.into_contents()),
            &name,
        )?)
    };

    formatter.format_file(
        "inspect-file",
        &FileReport {
            path,
            findings: &collected,
            contents: contents.as_ref(),
            report_link: None,
        },
    )
}
