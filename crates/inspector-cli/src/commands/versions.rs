//! Versions command implementation.

use super::Session;
use crate::cli::ProjectArgs;
use crate::error::add_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::anyhow;
use anyhow::bail;
use inspector_core::registry::Metadata;
use inspector_core::registry::Release;
use inspector_core::registry::canonical_name;
use inspector_core::registry::group_releases;

pub async fn execute(
    args: &ProjectArgs,
    session: &Session,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let mut project = args.project.clone();
    let mut releases = lookup(session, &project).await?;

    if releases.is_none() {
        let canonical = canonical_name(&project);
        if canonical != project {
            formatter.format_warning(&format!(
                "'{project}' not found, trying canonical name '{canonical}'"
            ));
            releases = lookup(session, &canonical).await?;
            project = canonical;
        }
    }

    let Some(releases) = releases else {
        return Err(project_not_found(session, &project));
    };

    formatter.format_versions(&project, &group_releases(&releases))
}

pub(crate) fn project_not_found(session: &Session, project: &str) -> anyhow::Error {
    anyhow!(
        "Project '{project}' not found at {}\n\
         HINT: Check the spelling, or --registry-url for a private registry.",
        session.registry().project_page(project)
    )
}

pub(crate) async fn lookup(session: &Session, project: &str) -> Result<Option<Vec<Release>>> {
    match add_context(session.registry().versions(project).await, project)? {
        Metadata::Available(releases) => Ok(Some(releases)),
        Metadata::NotFound => Ok(None),
        Metadata::Unavailable(status) => bail!(
            "Registry unavailable while listing {project} (HTTP {status})\n\
             HINT: Retry later or check --registry-url."
        ),
    }
}
