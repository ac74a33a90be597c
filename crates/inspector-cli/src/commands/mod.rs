//! Subcommand implementations.

pub mod analyze;
pub mod completion;
pub mod decompile;
pub mod distributions;
pub mod files;
pub mod inspect_file;
pub mod show;
pub mod versions;

use crate::cli::Cli;
use crate::cli::ReleaseArgs;
use crate::error::add_context;
use crate::error::convert_inspect_error;
use crate::progress::CliSpinner;
use anyhow::Result;
use inspector_core::Decompiler;
use inspector_core::Distribution;
use inspector_core::DistributionCache;
use inspector_core::DistributionId;
use inspector_core::HttpFetcher;
use inspector_core::InspectError;
use inspector_core::InspectorConfig;
use inspector_core::RegistryClient;
use std::sync::Arc;

/// Registry, cache and tools shared by the remote subcommands.
pub struct Session {
    config: InspectorConfig,
    registry: RegistryClient,
    cache: DistributionCache<HttpFetcher>,
    decompiler: Decompiler,
    show_progress: bool,
}

impl Session {
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = cli.config();
        let fetcher = add_context(HttpFetcher::new(&config.fetch), "HTTP client")?;
        let registry =
            RegistryClient::with_client(fetcher.client().clone(), config.registry.clone());
        let cache = DistributionCache::new(fetcher, &config.cache);
        let decompiler = Decompiler::new(config.tools.clone());

        Ok(Self {
            config,
            registry,
            cache,
            decompiler,
            show_progress: !cli.quiet && !cli.json,
        })
    }

    pub const fn config(&self) -> &InspectorConfig {
        &self.config
    }

    pub const fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    pub const fn decompiler(&self) -> &Decompiler {
        &self.decompiler
    }

    /// Downloads and opens the distribution of a release.
    pub async fn open(&self, id: &DistributionId) -> Result<Arc<Distribution>> {
        let filename = id.filename();
        let opened = {
            let _spinner =
                CliSpinner::start(&format!("Downloading {filename}"), self.show_progress);
            self.cache
                .get_or_fetch(&id.cache_key(), &filename, || self.registry.download_url(id))
                .await
        };

        add_context(opened, &filename)?.ok_or_else(|| {
            convert_inspect_error(
                InspectError::UnsupportedFormat {
                    filename: filename.clone(),
                },
                &filename,
            )
        })
    }
}

/// Identity of the release named on the command line.
pub fn release_id(args: &ReleaseArgs) -> DistributionId {
    DistributionId::with_platform(&args.project, &args.version, &args.platform)
}
