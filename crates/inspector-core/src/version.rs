//! Legacy-tolerant version ordering.
//!
//! Registries accept version strings that do not follow the standard public
//! versioning grammar. [`VersionKey::parse`] never fails: strings that parse
//! strictly are ordered by the standard rules, everything else falls back to
//! the setuptools-era tokenizer and lands in a comparison band strictly below
//! every standard version.
//!
//! # Examples
//!
//! ```
//! use inspector_core::version::sort_newest_first;
//!
//! let mut versions = vec!["1.0.dev0", "2.0", "1.0a1", "1.0"];
//! sort_newest_first(&mut versions, |v| *v);
//! assert_eq!(versions, ["2.0", "1.0", "1.0a1", "1.0.dev0"]);
//! ```

use std::cmp::Ordering;
use std::cmp::Reverse;
use std::str::FromStr;

use pep440_rs::Version;

/// Width numeric legacy tokens are zero-padded to before comparison.
pub const LEGACY_NUMERIC_WIDTH: usize = 8;

/// Epoch reported for legacy keys. Standard epochs are always `>= 0`.
pub const LEGACY_EPOCH: i64 = -1;

const FINAL: &str = "*final";
const FINAL_SEPARATOR: &str = "*final-";

/// Comparable key for a version string.
///
/// Ordering compares the band first (legacy below standard), then the
/// band's own rules. The variant is resolved once by [`VersionKey::parse`].
#[derive(Debug, Clone)]
pub enum VersionKey {
    /// The string parsed under the standard public versioning scheme.
    Standard(Version),
    /// The string only made sense to the legacy tokenizer.
    Legacy(LegacyKey),
}

impl VersionKey {
    /// Parses a version string into a key. Total: never fails.
    #[must_use]
    pub fn parse(version: &str) -> Self {
        Version::from_str(version)
            .map_or_else(|_| Self::Legacy(LegacyKey::parse(version)), Self::Standard)
    }

    /// Returns the epoch: `-1` for legacy keys, the parsed epoch otherwise.
    #[must_use]
    pub fn epoch(&self) -> i64 {
        match self {
            Self::Standard(version) => i64::try_from(version.epoch()).unwrap_or(i64::MAX),
            Self::Legacy(_) => LEGACY_EPOCH,
        }
    }

    /// Returns `true` if the string was parsed by the legacy tokenizer.
    #[must_use]
    pub const fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Standard(a), Self::Standard(b)) => a.cmp(b),
            (Self::Legacy(a), Self::Legacy(b)) => a.cmp(b),
            (Self::Legacy(_), Self::Standard(_)) => Ordering::Less,
            (Self::Standard(_), Self::Legacy(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for VersionKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionKey {}

/// Token sequence produced by the legacy tokenizer.
///
/// Numeric tokens are zero-padded to [`LEGACY_NUMERIC_WIDTH`] so they compare
/// correctly as strings; every other token carries a `*` prefix, which sorts
/// below any digit. A trailing `*final` marks the end of every key so that
/// pre-release markers (`*a`, `*b`, `*c`, `*@`) sort before the final
/// release.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LegacyKey {
    parts: Vec<String>,
}

impl LegacyKey {
    /// Tokenizes a version string the legacy way.
    ///
    /// # Examples
    ///
    /// ```
    /// use inspector_core::version::LegacyKey;
    ///
    /// assert_eq!(LegacyKey::parse("1.0.0"), LegacyKey::parse("1.0"));
    /// assert_eq!(LegacyKey::parse("").parts(), ["*final"]);
    /// ```
    #[must_use]
    pub fn parse(version: &str) -> Self {
        let mut parts: Vec<String> = Vec::new();

        for part in legacy_tokens(&version.to_lowercase()) {
            if part.starts_with('*') {
                // a separator dash directly before a pre-release tag is noise
                if part.as_str() < FINAL {
                    while parts.last().is_some_and(|last| last == FINAL_SEPARATOR) {
                        parts.pop();
                    }
                }

                while parts.last().is_some_and(|last| is_zero_token(last)) {
                    parts.pop();
                }
            }

            parts.push(part);
        }

        Self { parts }
    }

    /// Returns the comparison tokens.
    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.parts
    }
}

fn is_zero_token(token: &str) -> bool {
    token.len() == LEGACY_NUMERIC_WIDTH && token.bytes().all(|b| b == b'0')
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Digit,
    Letter,
    Dot,
    Dash,
    Other,
}

impl CharClass {
    const fn of(c: char) -> Self {
        match c {
            '0'..='9' => Self::Digit,
            'a'..='z' => Self::Letter,
            '.' => Self::Dot,
            '-' => Self::Dash,
            _ => Self::Other,
        }
    }

    /// Runs of these classes form a single fragment; dots and dashes are
    /// always fragments on their own.
    const fn groups(self) -> bool {
        matches!(self, Self::Digit | Self::Letter | Self::Other)
    }
}

/// Splits into digit runs, letter runs, `.`, `-` and the text in between,
/// then maps each fragment to its comparison token and appends `*final`.
fn legacy_tokens(lowered: &str) -> Vec<String> {
    let mut fragments: Vec<&str> = Vec::new();
    let mut start = 0;
    let mut current: Option<CharClass> = None;

    for (idx, c) in lowered.char_indices() {
        let class = CharClass::of(c);
        if let Some(prev) = current
            && (prev != class || !class.groups())
        {
            fragments.push(&lowered[start..idx]);
            start = idx;
        }
        current = Some(class);
    }
    if current.is_some() {
        fragments.push(&lowered[start..]);
    }

    let mut tokens: Vec<String> = fragments
        .into_iter()
        .map(replace_fragment)
        .filter(|part| !part.is_empty() && *part != ".")
        .map(|part| {
            if part.starts_with(|c: char| c.is_ascii_digit()) {
                format!("{part:0>LEGACY_NUMERIC_WIDTH$}")
            } else {
                format!("*{part}")
            }
        })
        .collect();

    tokens.push(FINAL.to_string());
    tokens
}

fn replace_fragment(fragment: &str) -> &str {
    match fragment {
        "pre" | "preview" | "rc" => "c",
        "-" => "final-",
        "dev" => "@",
        other => other,
    }
}

/// Sorts items newest-first by the version string `version_of` extracts.
///
/// Keys are computed once per item.
pub fn sort_newest_first<T, F>(items: &mut [T], version_of: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_cached_key(|item| Reverse(VersionKey::parse(version_of(item))));
}
