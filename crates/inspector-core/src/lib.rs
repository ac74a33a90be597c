//! Remote package distribution inspection.
//!
//! `inspector-core` lets a reviewer browse a package's releases and look
//! inside its distribution archives without unpacking them to disk:
//!
//! - [`version`]: legacy-tolerant version ordering
//! - [`formats`]: uniform `list`/`read` over zip, tar.gz and nested tar
//! - [`cache`]: single-flight, bounded cache of downloaded distributions
//! - [`analysis`]: per-file forensic findings (digest, entropy, bytecode)
//! - [`decompile`]: external decompiler and disassembler wrapper
//!
//! # Examples
//!
//! ```no_run
//! use inspector_core::DistributionCache;
//! use inspector_core::DistributionId;
//! use inspector_core::HttpFetcher;
//! use inspector_core::InspectorConfig;
//! use inspector_core::analysis;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = InspectorConfig::default();
//! let cache = DistributionCache::new(HttpFetcher::new(&config.fetch)?, &config.cache);
//!
//! let id = DistributionId::new("rake", "13.0.6");
//! let base = config.registry.download_base.clone();
//! if let Some(gem) = cache
//!     .get_or_fetch(&id.cache_key(), &id.filename(), || id.download_url(&base))
//!     .await?
//! {
//!     for finding in analysis::analyze(&*gem, "data.tar.gz/lib/rake.rb", &config.analysis)? {
//!         println!("{}: {:?}", finding.label, finding.value);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod analysis;
pub mod archive;
pub mod cache;
pub mod config;
pub mod decompile;
pub mod distribution;
pub mod error;
pub mod fetch;
pub mod formats;
pub mod registry;
pub mod report;
pub mod version;
pub mod view;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export main API types
pub use archive::Distribution;
pub use cache::DistributionCache;
pub use config::AnalysisConfig;
pub use config::CacheConfig;
pub use config::FetchConfig;
pub use config::InspectorConfig;
pub use config::RegistryConfig;
pub use config::ToolConfig;
pub use decompile::Decompiler;
pub use distribution::DistributionId;
pub use error::InspectError;
pub use error::Result;
pub use fetch::Fetch;
pub use fetch::HttpFetcher;
pub use fetch::fetch_and_open;
pub use registry::RegistryClient;
pub use version::VersionKey;
pub use view::FileContents;
