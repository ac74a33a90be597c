//! Distributions command implementation.

use super::Session;
use super::versions::lookup;
use super::versions::project_not_found;
use crate::cli::VersionArgs;
use crate::output::DistributionFile;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use inspector_core::DistributionId;
use inspector_core::registry::platforms_for;

pub async fn execute(
    args: &VersionArgs,
    session: &Session,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let Some(releases) = lookup(session, &args.project).await? else {
        return Err(project_not_found(session, &args.project));
    };

    let platforms = platforms_for(&releases, &args.version);
    if platforms.is_empty() {
        bail!(
            "Release {} of '{}' not found\n\
             HINT: List the published releases with `inspector versions {}`.",
            args.version,
            args.project,
            args.project
        );
    }

    let files: Vec<DistributionFile> = platforms
        .into_iter()
        .map(|platform| {
            let id = DistributionId::with_platform(&args.project, &args.version, platform);
            DistributionFile {
                filename: id.filename(),
                url: session.registry().download_url(&id),
                platform: id.platform,
            }
        })
        .collect();

    formatter.format_distributions(&args.project, &args.version, &files)
}
