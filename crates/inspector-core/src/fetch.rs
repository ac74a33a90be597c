//! Downloading and opening remote distributions.

use std::future::Future;

use tracing::info;
use tracing::warn;

use crate::InspectError;
use crate::Result;
use crate::archive::Distribution;
use crate::config::FetchConfig;
use crate::formats::ArchiveKind;

/// Source of distribution bytes.
///
/// [`HttpFetcher`] is the production implementation; tests substitute an
/// in-memory one.
pub trait Fetch: Send + Sync {
    /// Downloads the full body behind `url`.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::UpstreamUnavailable`] on transport failure,
    /// timeout or a non-success HTTP status.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// HTTP fetcher backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_download_size: u64,
}

impl HttpFetcher {
    /// Creates a fetcher from the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::UpstreamUnavailable`] if the HTTP client
    /// cannot be initialized.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            max_download_size: config.max_download_size,
        })
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        info!(url, "downloading distribution");
        let mut response = self.client.get(url).send().await.map_err(upstream_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "upstream returned an error status");
            return Err(InspectError::UpstreamUnavailable {
                status: Some(status.as_u16()),
                reason: format!("GET {url} returned {status}"),
            });
        }

        if let Some(len) = response.content_length()
            && len > self.max_download_size
        {
            return Err(too_large(url, len, self.max_download_size));
        }

        let capacity = usize::try_from(
            response
                .content_length()
                .unwrap_or(0)
                .min(self.max_download_size),
        )
        .unwrap_or(0);
        let mut bytes = Vec::with_capacity(capacity);
        while let Some(chunk) = response.chunk().await.map_err(upstream_error)? {
            bytes.extend_from_slice(&chunk);
            let current = bytes.len() as u64;
            if current > self.max_download_size {
                return Err(too_large(url, current, self.max_download_size));
            }
        }

        info!(url, bytes = bytes.len(), "download complete");
        Ok(bytes)
    }
}

/// Builds the HTTP client shared by downloads and metadata lookups.
///
/// # Errors
///
/// Returns [`InspectError::UpstreamUnavailable`] if TLS initialization fails.
pub fn build_client(config: &FetchConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(config.timeout);
    if !config.system_proxy {
        builder = builder.no_proxy();
    }

    builder
        .build()
        .map_err(|e| InspectError::UpstreamUnavailable {
            status: None,
            reason: format!("failed to create HTTP client: {e}"),
        })
}

/// Maps a transport-level `reqwest` failure onto the error taxonomy.
pub(crate) fn upstream_error(err: reqwest::Error) -> InspectError {
    let reason = if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        format!("request failed: {err}")
    };
    warn!(error = %err, "upstream request failed");
    InspectError::UpstreamUnavailable {
        status: err.status().map(|s| s.as_u16()),
        reason,
    }
}

fn too_large(url: &str, size: u64, limit: u64) -> InspectError {
    InspectError::BadFile(format!(
        "distribution at {url} is {size} bytes, above the {limit} byte limit"
    ))
}

/// Downloads a distribution and opens it as an archive.
///
/// The format is classified from `filename` before anything is downloaded;
/// an unsupported name yields `Ok(None)` without network access. Parsing
/// runs on the blocking thread pool.
///
/// # Errors
///
/// Returns [`InspectError::UpstreamUnavailable`] if the download fails, or
/// [`InspectError::BadFile`] if the bytes do not parse as the detected format.
pub async fn fetch_and_open<F: Fetch>(
    fetcher: &F,
    url: &str,
    filename: &str,
) -> Result<Option<Distribution>> {
    let Some(kind) = ArchiveKind::from_filename(filename) else {
        return Ok(None);
    };

    let bytes = fetcher.fetch(url).await?;
    let distribution = tokio::task::spawn_blocking(move || Distribution::open(kind, bytes))
        .await
        .map_err(|e| InspectError::BadFile(format!("archive parsing aborted: {e}")))??;
    Ok(Some(distribution))
}
