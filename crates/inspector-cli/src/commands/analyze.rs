//! Analyze command implementation.

use super::Session;
use super::release_id;
use crate::cli::FileArgs;
use crate::error::add_context;
use crate::output::FileReport;
use crate::output::OutputFormatter;
use anyhow::Result;
use inspector_core::analysis::analyze;

pub async fn execute(
    args: &FileArgs,
    session: &Session,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let id = release_id(&args.release);
    let distribution = session.open(&id).await?;

    let findings: Vec<_> = add_context(
        analyze(&*distribution, &args.path, &session.config().analysis),
        &id.filename(),
    )?
    .collect();

    formatter.format_file(
        "analyze",
        &FileReport {
            path: &args.path,
            findings: &findings,
            contents: None,
            report_link: None,
        },
    )
}
