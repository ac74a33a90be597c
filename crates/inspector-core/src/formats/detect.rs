//! Distribution format classification.

/// Suffix marking a tar member that is itself a gzip-compressed tar.
pub const NESTED_ARCHIVE_SUFFIX: &str = ".tar.gz";

/// Supported distribution container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    /// ZIP container (wheels, eggs, plain zips).
    Zip,
    /// Gzip-compressed tar (source distributions).
    TarGz,
    /// Plain tar whose `.tar.gz` members hold the payload (gems).
    NestedTar,
}

impl ArchiveKind {
    /// Classifies a distribution by its file name.
    ///
    /// Returns `None` for names that map to no supported format; callers
    /// treat that as "not supported", not as a failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use inspector_core::formats::ArchiveKind;
    ///
    /// assert_eq!(ArchiveKind::from_filename("rake-13.0.6.gem"), Some(ArchiveKind::NestedTar));
    /// assert_eq!(ArchiveKind::from_filename("pkg-1.0.tar.gz"), Some(ArchiveKind::TarGz));
    /// assert_eq!(ArchiveKind::from_filename("pkg-1.0.rar"), None);
    /// ```
    #[must_use]
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".gem") {
            Some(Self::NestedTar)
        } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if lower.ends_with(".zip") || lower.ends_with(".whl") || lower.ends_with(".egg") {
            Some(Self::Zip)
        } else {
            None
        }
    }

    /// Returns a human-readable name for this format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
            Self::NestedTar => "nested-tar",
        }
    }
}

impl std::fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
