//! Files command implementation.

use super::Session;
use super::release_id;
use crate::cli::ReleaseArgs;
use crate::output::ArchiveListing;
use crate::output::OutputFormatter;
use anyhow::Result;
use inspector_core::DistributionId;
use inspector_core::formats::ArchiveSource;
use tracing::debug;

pub async fn execute(
    args: &ReleaseArgs,
    session: &Session,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let id = release_id(args);
    let distribution = session.open(&id).await?;
    warn_if_yanked(session, &id, formatter).await;

    let filename = id.filename();
    formatter.format_listing(&ArchiveListing {
        name: &filename,
        format: distribution.format_name(),
        size: distribution.size(),
        entries: distribution.list(),
    })
}

/// Warns when the registry no longer lists content that was still
/// downloadable.
pub(crate) async fn warn_if_yanked(
    session: &Session,
    id: &DistributionId,
    formatter: &dyn OutputFormatter,
) {
    let registry = session.registry();
    match registry.release_exists(id).await {
        Ok(true) => {}
        Ok(false) => match registry.project_exists(&id.project).await {
            Ok(false) => formatter.format_warning(&format!(
                "Project '{}' is no longer listed by the registry",
                id.project
            )),
            Ok(true) => formatter.format_warning(&format!(
                "Release {} has been yanked from the registry",
                id.full_name()
            )),
            Err(e) => debug!(error = %e, "project existence probe failed"),
        },
        Err(e) => debug!(error = %e, "release existence probe failed"),
    }
}
