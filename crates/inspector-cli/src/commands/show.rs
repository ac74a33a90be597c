//! Show command implementation.

use super::Session;
use super::files::warn_if_yanked;
use super::release_id;
use crate::cli::FileArgs;
use crate::error::add_context;
use crate::output::FileReport;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use inspector_core::FileContents;
use inspector_core::analysis::analyze;
use inspector_core::analysis::is_compiled;
use inspector_core::report::mailto_report_link;

pub async fn execute(
    args: &FileArgs,
    session: &Session,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    if is_compiled(&args.path) {
        bail!(
            "'{}' is compiled bytecode and cannot be shown as text\n\
             HINT: Use `inspector decompile` or `inspector disassemble` instead.",
            args.path
        );
    }

    let id = release_id(&args.release);
    let distribution = session.open(&id).await?;
    warn_if_yanked(session, &id, formatter).await;

    let filename = id.filename();
    let mut findings = add_context(
        analyze(&*distribution, &args.path, &session.config().analysis),
        &filename,
    )?;
    let collected: Vec<_> = findings.by_ref().collect();
    let contents = add_context(
        FileContents::from_bytes(&args.path, findings.into_contents()),
        &filename,
    )?;

    let link = mailto_report_link(
        &id.project,
        &id.version,
        &id.platform,
        &args.path,
        &session.registry().download_url(&id),
    );

    formatter.format_file(
        "show",
        &FileReport {
            path: &args.path,
            findings: &collected,
            contents: Some(&contents),
            report_link: Some(&link),
        },
    )
}
