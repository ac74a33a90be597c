//! Common trait for archive sources.

use crate::Result;

/// Uniform, read-only view over an opened archive.
///
/// Implementations parse their backing bytes once at construction; after that
/// they are immutable, so shared references may be used from many threads at
/// once.
pub trait ArchiveSource: Send + Sync {
    /// Returns every non-directory entry, in archive order.
    ///
    /// The listing is a pure function of the backing bytes.
    fn list(&self) -> &[String];

    /// Reads the full contents of one entry.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::NotFound`](crate::InspectError::NotFound) if
    /// the path is absent and [`InspectError::BadFile`](crate::InspectError::BadFile)
    /// if the archive turns out to be corrupt while reading.
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Returns the archive format name.
    fn format_name(&self) -> &str;

    /// Returns the size of the backing bytes.
    fn size(&self) -> u64;

    /// Returns `true` if `path` is one of the listed entries.
    fn contains(&self, path: &str) -> bool {
        self.list().iter().any(|entry| entry == path)
    }
}
