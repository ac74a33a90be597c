//! Per-file forensic checks.
//!
//! [`analyze`] reads one archive member and yields its findings lazily, in
//! a fixed order: content digest, entropy, then the compiled-bytecode flag
//! when the path calls for it. Every check runs; none short-circuits.
//!
//! # Examples
//!
//! ```
//! use inspector_core::AnalysisConfig;
//! use inspector_core::analysis::Findings;
//! use inspector_core::analysis::Severity;
//!
//! let findings: Vec<_> =
//!     Findings::new("lib/x.rb", b"puts 'hi'\n".to_vec(), &AnalysisConfig::default()).collect();
//! assert_eq!(findings[0].label, "SHA-256");
//! assert_eq!(findings[1].label, "Entropy");
//! assert_eq!(findings[1].severity, Severity::Normal);
//! ```

pub mod entropy;
pub mod finding;

use std::iter::FusedIterator;

use sha2::Digest;
use sha2::Sha256;

pub use entropy::shannon_entropy;
pub use finding::Finding;
pub use finding::Severity;

use crate::Result;
use crate::config::AnalysisConfig;
use crate::formats::ArchiveSource;

/// Label of the content digest finding.
pub const DIGEST_LABEL: &str = "SHA-256";
/// Label of the entropy finding.
pub const ENTROPY_LABEL: &str = "Entropy";
/// Label of the compiled bytecode finding.
pub const COMPILED_LABEL: &str = "Compiled Python Bytecode";

const COMPILED_EXTENSIONS: [&str; 2] = [".pyc", ".pyo"];

/// Returns `true` if `path` names pre-compiled interpreter bytecode.
///
/// The extension match is case-sensitive: `A.PYO` is not bytecode.
///
/// Such files cannot be read as text; they go through
/// [`Decompiler`](crate::decompile::Decompiler) instead.
#[must_use]
pub fn is_compiled(path: &str) -> bool {
    COMPILED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Reads `path` from `source` and prepares its findings.
///
/// # Errors
///
/// Returns [`InspectError::NotFound`](crate::InspectError::NotFound) if the
/// path is absent, or `BadFile` if the member cannot be decompressed.
pub fn analyze<S>(source: &S, path: &str, config: &AnalysisConfig) -> Result<Findings>
where
    S: ArchiveSource + ?Sized,
{
    let contents = source.read(path)?;
    Ok(Findings::new(path, contents, config))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Digest,
    Entropy,
    Compiled,
    Done,
}

/// Lazy sequence of findings for one file.
///
/// Each check runs when its finding is pulled. Consuming the iterator does
/// not affect later calls to [`analyze`].
#[derive(Debug, Clone)]
pub struct Findings {
    contents: Vec<u8>,
    compiled: bool,
    entropy_threshold: f64,
    step: Step,
}

impl Findings {
    /// Prepares the checks for already-read contents.
    #[must_use]
    pub fn new(path: &str, contents: Vec<u8>, config: &AnalysisConfig) -> Self {
        Self {
            contents,
            compiled: is_compiled(path),
            entropy_threshold: config.entropy_threshold,
            step: Step::Digest,
        }
    }

    /// The analyzed bytes.
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Consumes the iterator and returns the analyzed bytes.
    #[must_use]
    pub fn into_contents(self) -> Vec<u8> {
        self.contents
    }

    fn digest(&self) -> Finding {
        let digest = Sha256::digest(&self.contents);
        Finding::new(Severity::Normal, DIGEST_LABEL, Some(hex::encode(digest)))
    }

    fn entropy(&self) -> Finding {
        let entropy = shannon_entropy(&self.contents);
        if entropy > self.entropy_threshold {
            Finding::new(
                Severity::High,
                ENTROPY_LABEL,
                Some(format!("{entropy:?} (HIGH)")),
            )
        } else {
            Finding::new(Severity::Normal, ENTROPY_LABEL, Some(format!("{entropy:?}")))
        }
    }
}

impl Iterator for Findings {
    type Item = Finding;

    fn next(&mut self) -> Option<Finding> {
        loop {
            let step = self.step;
            match step {
                Step::Digest => {
                    self.step = Step::Entropy;
                    return Some(self.digest());
                }
                Step::Entropy => {
                    self.step = Step::Compiled;
                    return Some(self.entropy());
                }
                Step::Compiled => {
                    self.step = Step::Done;
                    if self.compiled {
                        return Some(Finding::new(Severity::Medium, COMPILED_LABEL, None));
                    }
                }
                Step::Done => return None,
            }
        }
    }
}

impl FusedIterator for Findings {}
