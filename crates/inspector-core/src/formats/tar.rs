//! Gzip-compressed tar archive source and shared tar walking helpers.

use std::io::Read;
use std::sync::Arc;

use flate2::read::GzDecoder;

use super::traits::ArchiveSource;
use crate::InspectError;
use crate::Result;

/// Gzip-compressed tar archive held in memory.
///
/// The entry listing is collected at construction, which also validates the
/// gzip framing and tar headers end to end. Reads decompress the stream again
/// up to the requested member.
#[derive(Debug, Clone)]
pub struct TarGzArchive {
    bytes: Arc<[u8]>,
    entries: Vec<String>,
}

impl TarGzArchive {
    /// Parses a `.tar.gz` archive from its raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::BadFile`] on bad gzip framing or tar corruption.
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Result<Self> {
        let bytes: Arc<[u8]> = bytes.into();
        let entries = list_tar_entries(GzDecoder::new(&bytes[..]))?;
        Ok(Self { bytes, entries })
    }
}

impl ArchiveSource for TarGzArchive {
    fn list(&self) -> &[String] {
        &self.entries
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        read_tar_entry(GzDecoder::new(&self.bytes[..]), path)
    }

    fn format_name(&self) -> &str {
        "tar.gz"
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Returns `true` for tar entries that carry no file of their own.
fn is_skipped(entry_type: tar::EntryType) -> bool {
    entry_type.is_dir()
        || entry_type.is_pax_global_extensions()
        || entry_type.is_pax_local_extensions()
}

fn entry_name<R: Read>(entry: &tar::Entry<'_, R>) -> String {
    String::from_utf8_lossy(&entry.path_bytes()).into_owned()
}

/// Lists the non-directory members of a tar stream.
pub(crate) fn list_tar_entries<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for_each_tar_entry(reader, |name, _| {
        names.push(name.to_string());
        Ok(())
    })?;
    Ok(names)
}

/// Walks a tar stream and visits every non-directory member with its reader.
///
/// The visitor sees members in archive order and may consume the member's
/// data.
pub(crate) fn for_each_tar_entry<R, F>(reader: R, mut visit: F) -> Result<()>
where
    R: Read,
    F: FnMut(&str, &mut tar::Entry<'_, R>) -> Result<()>,
{
    let mut archive = tar::Archive::new(reader);
    let entries = archive
        .entries()
        .map_err(|e| InspectError::BadFile(format!("failed to read TAR entries: {e}")))?;

    for entry_result in entries {
        let mut entry = entry_result
            .map_err(|e| InspectError::BadFile(format!("failed to read TAR entry: {e}")))?;
        if is_skipped(entry.header().entry_type()) {
            continue;
        }
        let name = entry_name(&entry);
        visit(&name, &mut entry)?;
    }

    Ok(())
}

/// Reads one member of a tar stream by name.
///
/// The first member with a matching name wins.
pub(crate) fn read_tar_entry<R: Read>(reader: R, path: &str) -> Result<Vec<u8>> {
    let mut archive = tar::Archive::new(reader);
    let entries = archive
        .entries()
        .map_err(|e| InspectError::BadFile(format!("failed to read TAR entries: {e}")))?;

    for entry_result in entries {
        let mut entry = entry_result
            .map_err(|e| InspectError::BadFile(format!("failed to read TAR entry: {e}")))?;
        if is_skipped(entry.header().entry_type()) || entry_name(&entry) != path {
            continue;
        }

        let capacity = usize::try_from(entry.size()).unwrap_or(0);
        let mut contents = Vec::with_capacity(capacity);
        entry
            .read_to_end(&mut contents)
            .map_err(|e| InspectError::BadFile(format!("failed to read {path}: {e}")))?;
        return Ok(contents);
    }

    Err(InspectError::not_found(path))
}
