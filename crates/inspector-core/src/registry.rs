//! Gem registry metadata client.
//!
//! Metadata lookups never fail hard on an HTTP status: a 404 becomes
//! [`Metadata::NotFound`] and any other non-success status
//! [`Metadata::Unavailable`]. Only transport failures and timeouts surface
//! as [`InspectError::UpstreamUnavailable`].

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use crate::InspectError;
use crate::Result;
use crate::config::InspectorConfig;
use crate::config::RegistryConfig;
use crate::distribution::DEFAULT_PLATFORM;
use crate::distribution::DistributionId;
use crate::fetch::build_client;
use crate::fetch::upstream_error;
use crate::version::sort_newest_first;

/// Characters left as-is in one URL path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Result of a metadata lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metadata<T> {
    /// The registry answered with the data.
    Available(T),
    /// The registry does not know the project or release.
    NotFound,
    /// The registry answered with another error status.
    Unavailable(u16),
}

impl<T> Metadata<T> {
    /// Returns the data, if available.
    pub fn available(self) -> Option<T> {
        match self {
            Self::Available(data) => Some(data),
            Self::NotFound | Self::Unavailable(_) => None,
        }
    }
}

/// One published build of a version, as listed by the versions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Version string.
    pub number: String,
    /// Build platform.
    #[serde(default = "default_platform")]
    pub platform: String,
    /// Whether the registry marks the version as a prerelease.
    #[serde(default)]
    pub prerelease: bool,
    /// Publication timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// SHA-256 of the distribution file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

fn default_platform() -> String {
    DEFAULT_PLATFORM.to_string()
}

/// All builds of one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseGroup {
    /// Version string.
    pub version: String,
    /// Platforms published for the version, in registry order.
    pub platforms: Vec<String>,
}

/// Groups releases by version number, newest version first.
///
/// # Examples
///
/// ```
/// use inspector_core::registry::Release;
/// use inspector_core::registry::group_releases;
///
/// let release = |number: &str, platform: &str| Release {
///     number: number.to_string(),
///     platform: platform.to_string(),
///     prerelease: false,
///     created_at: None,
///     sha: None,
/// };
/// let groups = group_releases(&[
///     release("1.0", "ruby"),
///     release("2.0", "ruby"),
///     release("2.0", "java"),
/// ]);
/// assert_eq!(groups[0].version, "2.0");
/// assert_eq!(groups[0].platforms, ["ruby", "java"]);
/// ```
#[must_use]
pub fn group_releases(releases: &[Release]) -> Vec<ReleaseGroup> {
    let mut groups: Vec<ReleaseGroup> = Vec::new();
    for release in releases {
        match groups.iter_mut().find(|group| group.version == release.number) {
            Some(group) => group.platforms.push(release.platform.clone()),
            None => groups.push(ReleaseGroup {
                version: release.number.clone(),
                platforms: vec![release.platform.clone()],
            }),
        }
    }
    sort_newest_first(&mut groups, |group| &group.version);
    groups
}

/// Platforms published for `version`.
#[must_use]
pub fn platforms_for(releases: &[Release], version: &str) -> Vec<String> {
    releases
        .iter()
        .filter(|release| release.number == version)
        .map(|release| release.platform.clone())
        .collect()
}

/// Canonical form of a project name: lower-cased, with every run of `-`,
/// `_` and `.` collapsed into a single `-`.
///
/// # Examples
///
/// ```
/// use inspector_core::registry::canonical_name;
///
/// assert_eq!(canonical_name("Foo__Bar.baz"), "foo-bar-baz");
/// ```
#[must_use]
pub fn canonical_name(name: &str) -> String {
    let mut canonical = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                canonical.push('-');
            }
            in_separator = true;
        } else {
            canonical.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    canonical
}

/// Client for the registry's JSON API.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    config: RegistryConfig,
}

impl RegistryClient {
    /// Creates a client with its own HTTP connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::UpstreamUnavailable`] if the HTTP client
    /// cannot be initialized.
    pub fn new(config: &InspectorConfig) -> Result<Self> {
        Ok(Self::with_client(
            build_client(&config.fetch)?,
            config.registry.clone(),
        ))
    }

    /// Creates a client sharing an existing HTTP client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client, config: RegistryConfig) -> Self {
        Self { client, config }
    }

    /// Lists every published build of `project`.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::UpstreamUnavailable`] on transport failure or
    /// a malformed response body.
    pub async fn versions(&self, project: &str) -> Result<Metadata<Vec<Release>>> {
        let url = format!(
            "{}/api/v1/versions/{}.json",
            self.api_base(),
            segment(project)
        );
        let response = match self.get(&url).await? {
            Metadata::Available(response) => response,
            Metadata::NotFound => return Ok(Metadata::NotFound),
            Metadata::Unavailable(status) => return Ok(Metadata::Unavailable(status)),
        };

        let releases = response
            .json::<Vec<Release>>()
            .await
            .map_err(|e| InspectError::UpstreamUnavailable {
                status: None,
                reason: format!("malformed versions response from {url}: {e}"),
            })?;
        debug!(project, releases = releases.len(), "fetched release list");
        Ok(Metadata::Available(releases))
    }

    /// Returns `false` only if the registry reports the project as gone.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::UpstreamUnavailable`] on transport failure.
    pub async fn project_exists(&self, project: &str) -> Result<bool> {
        let url = format!("{}/api/v1/gems/{}.json", self.api_base(), segment(project));
        Ok(!matches!(self.get(&url).await?, Metadata::NotFound))
    }

    /// Returns `false` only if the registry reports the release as gone,
    /// e.g. after a yank.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::UpstreamUnavailable`] on transport failure.
    pub async fn release_exists(&self, id: &DistributionId) -> Result<bool> {
        let url = format!(
            "{}/api/v2/rubygems/{}/versions/{}.json",
            self.api_base(),
            segment(&id.project),
            segment(&id.release_name())
        );
        Ok(!matches!(self.get(&url).await?, Metadata::NotFound))
    }

    /// Public web page of a project.
    #[must_use]
    pub fn project_page(&self, project: &str) -> String {
        format!("{}/gems/{}", self.api_base(), segment(project))
    }

    /// Download URL of a distribution file.
    #[must_use]
    pub fn download_url(&self, id: &DistributionId) -> String {
        id.download_url(&self.config.download_base)
    }

    fn api_base(&self) -> &str {
        self.config.api_base.trim_end_matches('/')
    }

    async fn get(&self, url: &str) -> Result<Metadata<reqwest::Response>> {
        let response = self.client.get(url).send().await.map_err(upstream_error)?;
        match response.status() {
            status if status.is_success() => Ok(Metadata::Available(response)),
            StatusCode::NOT_FOUND => Ok(Metadata::NotFound),
            status => {
                warn!(url, status = status.as_u16(), "registry metadata unavailable");
                Ok(Metadata::Unavailable(status.as_u16()))
            }
        }
    }
}

fn segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}
