//! Textual view of archive members.

use std::io::Read;

use flate2::read::GzDecoder;
use serde::Serialize;

use crate::InspectError;
use crate::Result;

/// Outer gem member holding the gzip-compressed YAML specification.
const GEM_METADATA: &str = "metadata.gz";

/// Decoded contents of an archive member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FileContents {
    /// UTF-8 text.
    Text {
        /// The decoded text.
        text: String,
        /// Syntax hint taken from the file extension.
        syntax: Option<String>,
    },
    /// Bytes that are not valid UTF-8.
    Binary,
}

impl FileContents {
    /// Decodes a member for display.
    ///
    /// Paths ending in `.gz` are decompressed first and their syntax hint
    /// comes from the next extension in (`metadata.gz` is YAML). Bytes that
    /// are not UTF-8 give [`FileContents::Binary`], which is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::BadFile`] if a `.gz` member does not
    /// decompress.
    ///
    /// # Examples
    ///
    /// ```
    /// use inspector_core::FileContents;
    ///
    /// let view = FileContents::from_bytes("lib/rake.rb", b"module Rake; end\n".to_vec()).unwrap();
    /// assert_eq!(view.syntax(), Some("rb"));
    ///
    /// let view = FileContents::from_bytes("logo.png", vec![0x89, 0x50, 0xff, 0xfe]).unwrap();
    /// assert!(view.is_binary());
    /// ```
    pub fn from_bytes(path: &str, bytes: Vec<u8>) -> Result<Self> {
        let name = path.rsplit('/').next().unwrap_or(path);
        let extensions: Vec<&str> = name.split('.').skip(1).collect();
        let mut extensions = extensions.into_iter().rev();

        let (bytes, syntax) = if name.ends_with(".gz") {
            extensions.next();
            let syntax = if path == GEM_METADATA {
                Some("yaml".to_string())
            } else {
                extensions.next().map(str::to_string)
            };
            (gunzip(path, &bytes)?, syntax)
        } else {
            (bytes, extensions.next().map(str::to_string))
        };

        Ok(match String::from_utf8(bytes) {
            Ok(text) => Self::Text { text, syntax },
            Err(_) => Self::Binary,
        })
    }

    /// Returns `true` for undecodable contents.
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Self::Binary)
    }

    /// Returns the decoded text, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            Self::Binary => None,
        }
    }

    /// Returns the syntax hint, if any.
    #[must_use]
    pub fn syntax(&self) -> Option<&str> {
        match self {
            Self::Text { syntax, .. } => syntax.as_deref(),
            Self::Binary => None,
        }
    }
}

fn gunzip(path: &str, bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoded = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut decoded)
        .map_err(|e| InspectError::BadFile(format!("failed to ungzip {path}: {e}")))?;
    Ok(decoded)
}
