//! Configuration for fetching, caching, analysis and external tools.
//!
//! Every struct has documented defaults; the CLI maps flags and environment
//! variables onto them.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

/// Outbound HTTP settings shared by archive downloads and metadata lookups.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// `User-Agent` header sent upstream.
    pub user_agent: String,

    /// Bound on a single request, connect through last body byte.
    pub timeout: Duration,

    /// Largest archive body accepted, in bytes.
    pub max_download_size: u64,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` from the environment.
    pub system_proxy: bool,
}

impl Default for FetchConfig {
    /// Defaults:
    /// - `user_agent`: `inspector/<crate version>`
    /// - `timeout`: 30 s
    /// - `max_download_size`: 200 MiB
    /// - `system_proxy`: `true`
    fn default() -> Self {
        Self {
            user_agent: format!("inspector/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
            max_download_size: 200 * 1024 * 1024,
            system_proxy: true,
        }
    }
}

/// Bounds for the in-memory distribution cache.
///
/// Entries are evicted least-recently-used first once either bound is hit.
/// An archive larger than `max_bytes` is still returned to its caller but
/// only stays cached until the next insertion.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of opened distributions kept.
    pub max_entries: NonZeroUsize,

    /// Maximum total size of the archives' backing bytes.
    pub max_bytes: u64,
}

impl Default for CacheConfig {
    /// Defaults: 128 entries, 1 GiB.
    fn default() -> Self {
        Self {
            max_entries: NonZeroUsize::new(128).unwrap_or(NonZeroUsize::MIN),
            max_bytes: 1024 * 1024 * 1024,
        }
    }
}

/// Thresholds for the per-file forensic checks.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Shannon entropy (bits per byte) above which a file is flagged.
    pub entropy_threshold: f64,
}

impl Default for AnalysisConfig {
    /// Default entropy threshold: 6.0 bits per byte.
    fn default() -> Self {
        Self {
            entropy_threshold: 6.0,
        }
    }
}

/// External decompiler and disassembler invocation.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Decompiler executable.
    pub decompiler: PathBuf,

    /// Disassembler executable.
    pub disassembler: PathBuf,

    /// Bound on a single tool run.
    pub timeout: Duration,
}

impl Default for ToolConfig {
    /// Defaults: `pycdc`, `pycdas`, 30 s.
    fn default() -> Self {
        Self {
            decompiler: PathBuf::from("pycdc"),
            disassembler: PathBuf::from("pycdas"),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Registry endpoints.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Base URL of the metadata API.
    pub api_base: String,

    /// Base URL distribution files are downloaded from.
    pub download_base: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            api_base: "https://rubygems.org".to_string(),
            download_base: "https://index.rubygems.org".to_string(),
        }
    }
}

/// Top-level configuration.
///
/// # Examples
///
/// ```
/// use inspector_core::InspectorConfig;
/// use std::time::Duration;
///
/// let mut config = InspectorConfig::default();
/// config.fetch.timeout = Duration::from_secs(5);
/// config.analysis.entropy_threshold = 7.0;
/// assert_eq!(config.registry.api_base, "https://rubygems.org");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InspectorConfig {
    /// Outbound HTTP.
    pub fetch: FetchConfig,
    /// Distribution cache bounds.
    pub cache: CacheConfig,
    /// Forensic thresholds.
    pub analysis: AnalysisConfig,
    /// External tools.
    pub tools: ToolConfig,
    /// Registry endpoints.
    pub registry: RegistryConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InspectorConfig::default();
        assert_eq!(config.fetch.timeout, Duration::from_secs(30));
        assert_eq!(config.fetch.max_download_size, 200 * 1024 * 1024);
        assert_eq!(config.cache.max_entries.get(), 128);
        assert_eq!(config.cache.max_bytes, 1024 * 1024 * 1024);
        assert!((config.analysis.entropy_threshold - 6.0).abs() < f64::EPSILON);
        assert_eq!(config.tools.decompiler, PathBuf::from("pycdc"));
        assert_eq!(config.tools.disassembler, PathBuf::from("pycdas"));
    }

    #[test]
    fn test_user_agent_carries_version() {
        let config = FetchConfig::default();
        assert!(config.user_agent.starts_with("inspector/"));
    }

    #[test]
    fn test_registry_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.api_base, "https://rubygems.org");
        assert_eq!(config.download_base, "https://index.rubygems.org");
    }
}
