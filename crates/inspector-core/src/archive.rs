//! Opened distribution archives.
//!
//! [`Distribution`] is the tagged union over the supported container formats.
//! The variant is picked once, from the file name, when the archive is
//! opened; afterwards every consumer goes through [`ArchiveSource`].

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::Result;
use crate::formats::ArchiveKind;
use crate::formats::ArchiveSource;
use crate::formats::NestedTarArchive;
use crate::formats::TarGzArchive;
use crate::formats::ZipArchive;

/// A parsed, read-only distribution archive.
#[derive(Debug, Clone)]
pub enum Distribution {
    /// Wheel, egg or plain zip.
    Zip(ZipArchive),
    /// Gzip-compressed tarball.
    TarGz(TarGzArchive),
    /// Tar with nested `.tar.gz` payload (gem).
    NestedTar(NestedTarArchive),
}

impl Distribution {
    /// Parses `bytes` as the given container format.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::BadFile`](crate::InspectError::BadFile) if the
    /// bytes are not a valid archive of that kind.
    pub fn open(kind: ArchiveKind, bytes: impl Into<Arc<[u8]>>) -> Result<Self> {
        let bytes: Arc<[u8]> = bytes.into();
        debug!(format = %kind, bytes = bytes.len(), "opening archive");
        Ok(match kind {
            ArchiveKind::Zip => Self::Zip(ZipArchive::new(bytes)?),
            ArchiveKind::TarGz => Self::TarGz(TarGzArchive::new(bytes)?),
            ArchiveKind::NestedTar => Self::NestedTar(NestedTarArchive::new(bytes)?),
        })
    }

    /// Classifies `filename` and parses `bytes` accordingly.
    ///
    /// Returns `Ok(None)` when the file name maps to no supported format.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::BadFile`](crate::InspectError::BadFile) if the
    /// bytes do not parse as the detected format.
    ///
    /// # Examples
    ///
    /// ```
    /// use inspector_core::Distribution;
    ///
    /// let opened = Distribution::open_named("notes.rar", b"Rar!".to_vec()).unwrap();
    /// assert!(opened.is_none());
    /// ```
    pub fn open_named(filename: &str, bytes: impl Into<Arc<[u8]>>) -> Result<Option<Self>> {
        match ArchiveKind::from_filename(filename) {
            Some(kind) => Self::open(kind, bytes).map(Some),
            None => {
                debug!(filename, "unsupported distribution format");
                Ok(None)
            }
        }
    }

    /// Reads and opens a local archive file.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::Io`](crate::InspectError::Io) if the file
    /// cannot be read, or `BadFile` if it does not parse.
    pub fn open_file<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if ArchiveKind::from_filename(&filename).is_none() {
            return Ok(None);
        }
        let bytes = std::fs::read(path)?;
        Self::open_named(&filename, bytes)
    }

    /// Returns the container format of this archive.
    #[must_use]
    pub const fn kind(&self) -> ArchiveKind {
        match self {
            Self::Zip(_) => ArchiveKind::Zip,
            Self::TarGz(_) => ArchiveKind::TarGz,
            Self::NestedTar(_) => ArchiveKind::NestedTar,
        }
    }

    fn source(&self) -> &dyn ArchiveSource {
        match self {
            Self::Zip(archive) => archive,
            Self::TarGz(archive) => archive,
            Self::NestedTar(archive) => archive,
        }
    }
}

impl ArchiveSource for Distribution {
    fn list(&self) -> &[String] {
        self.source().list()
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.source().read(path)
    }

    fn format_name(&self) -> &str {
        self.kind().name()
    }

    fn size(&self) -> u64 {
        self.source().size()
    }
}
