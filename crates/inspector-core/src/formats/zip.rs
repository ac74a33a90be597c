//! ZIP archive source.

use std::io::Cursor;
use std::io::Read;
use std::sync::Arc;

use zip::result::ZipError;

use super::traits::ArchiveSource;
use crate::InspectError;
use crate::Result;

/// ZIP archive held in memory.
///
/// The central directory is parsed once; each read works on a cheap clone of
/// the parsed archive so no lock is needed.
#[derive(Debug, Clone)]
pub struct ZipArchive {
    archive: zip::ZipArchive<Cursor<Arc<[u8]>>>,
    entries: Vec<String>,
    size: u64,
}

impl ZipArchive {
    /// Parses a ZIP archive from its raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::BadFile`] if the headers are corrupt.
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Result<Self> {
        let bytes: Arc<[u8]> = bytes.into();
        let size = bytes.len() as u64;
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| InspectError::BadFile(format!("failed to open ZIP archive: {e}")))?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let entry = archive.by_index_raw(i).map_err(|e| {
                InspectError::BadFile(format!("failed to read ZIP entry {i}: {e}"))
            })?;
            if !entry.is_dir() {
                entries.push(entry.name().to_string());
            }
        }

        Ok(Self {
            archive,
            entries,
            size,
        })
    }
}

impl ArchiveSource for ZipArchive {
    fn list(&self) -> &[String] {
        &self.entries
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.clone();
        let mut file = match archive.by_name(path) {
            Ok(file) if !file.is_dir() => file,
            Ok(_) | Err(ZipError::FileNotFound) => return Err(InspectError::not_found(path)),
            Err(e) => {
                return Err(InspectError::BadFile(format!(
                    "failed to open ZIP entry {path}: {e}"
                )));
            }
        };

        let capacity = usize::try_from(file.size()).unwrap_or(0);
        let mut contents = Vec::with_capacity(capacity);
        file.read_to_end(&mut contents)
            .map_err(|e| InspectError::BadFile(format!("failed to decompress {path}: {e}")))?;
        Ok(contents)
    }

    fn format_name(&self) -> &str {
        "zip"
    }

    fn size(&self) -> u64 {
        self.size
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_zip;

    #[test]
    fn test_zip_list_and_read() {
        let data = create_test_zip(vec![("a.txt", b"hello"), ("dir/b.txt", b"world")]);
        let archive = ZipArchive::new(data).unwrap();

        assert_eq!(archive.format_name(), "zip");
        assert_eq!(archive.list(), ["a.txt", "dir/b.txt"]);
        assert_eq!(archive.read("a.txt").unwrap(), b"hello");
        assert_eq!(archive.read("dir/b.txt").unwrap(), b"world");
    }

    #[test]
    fn test_zip_excludes_directories() {
        let data = crate::test_utils::ZipTestBuilder::new()
            .add_directory("dir/")
            .add_file("dir/a.txt", b"x")
            .build();
        let archive = ZipArchive::new(data).unwrap();
        assert_eq!(archive.list(), ["dir/a.txt"]);
        assert!(archive.read("dir/").unwrap_err().is_not_found());
    }

    #[test]
    fn test_zip_missing_path() {
        let data = create_test_zip(vec![("a.txt", b"hello")]);
        let archive = ZipArchive::new(data).unwrap();
        let err = archive.read("missing.txt").unwrap_err();
        assert!(matches!(err, InspectError::NotFound { path } if path == "missing.txt"));
    }

    #[test]
    fn test_zip_empty_file() {
        let data = create_test_zip(vec![("empty.txt", b"")]);
        let archive = ZipArchive::new(data).unwrap();
        assert!(archive.read("empty.txt").unwrap().is_empty());
    }

    #[test]
    fn test_zip_malformed_bytes() {
        let err = ZipArchive::new(b"PK\x03\x04 definitely not a zip".to_vec()).unwrap_err();
        assert!(matches!(err, InspectError::BadFile(_)));
    }

    #[test]
    fn test_zip_size() {
        let data = create_test_zip(vec![("a.txt", b"hello")]);
        let len = data.len() as u64;
        let archive = ZipArchive::new(data).unwrap();
        assert_eq!(archive.size(), len);
    }

    #[test]
    fn test_zip_every_listed_entry_reads_and_nothing_else_does() {
        let data = crate::test_utils::ZipTestBuilder::new()
            .add_directory("pkg/")
            .add_file("pkg/a.py", b"a = 1")
            .add_file("pkg/sub/b.py", b"b = 2")
            .build();
        let archive = ZipArchive::new(data).unwrap();

        for entry in archive.list() {
            assert!(archive.read(entry).is_ok(), "listed entry {entry} not readable");
        }
        for unlisted in ["pkg/", "pkg", "a.py", "pkg/c.py", ""] {
            assert!(
                archive.read(unlisted).unwrap_err().is_not_found(),
                "unlisted path {unlisted:?} was readable"
            );
        }
    }
}
