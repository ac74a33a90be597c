//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use inspector_core::InspectorConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "inspector")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Registry metadata API base URL
    #[arg(
        long,
        global = true,
        env = "INSPECTOR_REGISTRY_URL",
        default_value = "https://rubygems.org"
    )]
    pub registry_url: String,

    /// Base URL distribution files are downloaded from
    #[arg(
        long,
        global = true,
        env = "INSPECTOR_DOWNLOAD_URL",
        default_value = "https://index.rubygems.org"
    )]
    pub download_url: String,

    /// Timeout for each upstream request, in seconds
    #[arg(
        long,
        global = true,
        env = "INSPECTOR_TIMEOUT",
        default_value = "30",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Maximum distribution size to download (e.g. 200M)
    #[arg(long, global = true, default_value = "200M", value_parser = parse_byte_size)]
    pub max_download_size: u64,

    /// Entropy (bits per byte) above which a file is flagged
    #[arg(
        long,
        global = true,
        env = "INSPECTOR_ENTROPY_THRESHOLD",
        default_value_t = 6.0,
        value_parser = parse_entropy
    )]
    pub entropy_threshold: f64,

    /// Decompiler executable
    #[arg(long, global = true, env = "INSPECTOR_PYCDC", default_value = "pycdc")]
    pub pycdc: PathBuf,

    /// Disassembler executable
    #[arg(long, global = true, env = "INSPECTOR_PYCDAS", default_value = "pycdas")]
    pub pycdas: PathBuf,
}

impl Cli {
    /// Maps the global flags onto the library configuration.
    pub fn config(&self) -> InspectorConfig {
        let mut config = InspectorConfig::default();
        let timeout = Duration::from_secs(self.timeout);

        config.fetch.timeout = timeout;
        config.fetch.max_download_size = self.max_download_size;
        config.registry.api_base.clone_from(&self.registry_url);
        config.registry.download_base.clone_from(&self.download_url);
        config.analysis.entropy_threshold = self.entropy_threshold;
        config.tools.decompiler.clone_from(&self.pycdc);
        config.tools.disassembler.clone_from(&self.pycdas);
        config.tools.timeout = timeout;
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List a project's releases, newest first
    Versions(ProjectArgs),
    /// List the platform builds published for a release
    Distributions(VersionArgs),
    /// List the files inside a release's distribution
    Files(ReleaseArgs),
    /// Show a file with its findings
    Show(FileArgs),
    /// Run the forensic checks on a file
    Analyze(FileArgs),
    /// Decompile a bytecode file
    Decompile(FileArgs),
    /// Disassemble a bytecode file
    Disassemble(FileArgs),
    /// List or analyze a local archive file
    InspectFile(InspectFileArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct ProjectArgs {
    /// Project name
    #[arg(value_name = "PROJECT")]
    pub project: String,
}

#[derive(clap::Args)]
pub struct VersionArgs {
    /// Project name
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// Release version
    #[arg(id = "release_version", value_name = "VERSION")]
    pub version: String,
}

#[derive(clap::Args)]
pub struct ReleaseArgs {
    /// Project name
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// Release version
    #[arg(id = "release_version", value_name = "VERSION")]
    pub version: String,

    /// Build platform
    #[arg(long, default_value = "ruby")]
    pub platform: String,
}

#[derive(clap::Args)]
pub struct FileArgs {
    #[command(flatten)]
    pub release: ReleaseArgs,

    /// Path inside the distribution (as printed by `files`)
    #[arg(value_name = "PATH")]
    pub path: String,
}

#[derive(clap::Args)]
pub struct InspectFileArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// File inside the archive to analyze; lists the archive when omitted
    #[arg(value_name = "PATH")]
    pub path: Option<String>,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}

/// Parse an entropy threshold in bits per byte.
fn parse_entropy(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid entropy threshold: {s}"))?;
    if (0.0..=8.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("entropy threshold must be between 0 and 8, got {value}"))
    }
}
