//! Tar archive whose payload sits in nested `.tar.gz` members.
//!
//! RubyGems packages are a plain tar holding `metadata.gz`,
//! `checksums.yaml.gz` and `data.tar.gz`; the files worth inspecting live
//! inside `data.tar.gz`. Those are exposed as composite paths
//! `<outer member>/<inner member>`, e.g. `data.tar.gz/lib/rake.rb`.

use std::io::Read;
use std::sync::Arc;

use flate2::read::GzDecoder;

use super::detect::NESTED_ARCHIVE_SUFFIX;
use super::tar::for_each_tar_entry;
use super::tar::list_tar_entries;
use super::tar::read_tar_entry;
use super::traits::ArchiveSource;
use crate::InspectError;
use crate::Result;

/// Outer tar with nested gzip-compressed tar members.
#[derive(Debug, Clone)]
pub struct NestedTarArchive {
    bytes: Arc<[u8]>,
    entries: Vec<String>,
    nested: Vec<String>,
}

impl NestedTarArchive {
    /// Parses the outer tar and every nested archive member.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::BadFile`] if the outer tar or any nested
    /// archive is corrupt.
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Result<Self> {
        let bytes: Arc<[u8]> = bytes.into();
        let mut entries = Vec::new();
        let mut nested_members = Vec::new();

        for_each_tar_entry(&bytes[..], |name, entry| {
            if !name.ends_with(NESTED_ARCHIVE_SUFFIX) {
                entries.push(name.to_string());
                return Ok(());
            }

            let mut nested = Vec::new();
            entry
                .read_to_end(&mut nested)
                .map_err(|e| InspectError::BadFile(format!("failed to read {name}: {e}")))?;
            let inner =
                list_tar_entries(GzDecoder::new(&nested[..])).map_err(|e| nested_error(name, e))?;
            entries.extend(inner.into_iter().map(|inner| format!("{name}/{inner}")));
            nested_members.push(name.to_string());
            Ok(())
        })?;

        Ok(Self {
            bytes,
            entries,
            nested: nested_members,
        })
    }

    fn read_nested(&self, outer: &str, inner: &str) -> Result<Vec<u8>> {
        let nested = read_tar_entry(&self.bytes[..], outer)?;
        read_tar_entry(GzDecoder::new(&nested[..]), inner).map_err(|e| match e {
            InspectError::NotFound { .. } => InspectError::not_found(format!("{outer}/{inner}")),
            other => nested_error(outer, other),
        })
    }
}

impl NestedTarArchive {
    /// Finds the nested member a composite path lives in.
    ///
    /// The longest matching member wins, so a nested archive stored under a
    /// directory whose name also ends in the suffix still resolves.
    fn resolve<'p>(&self, path: &'p str) -> Option<(&'p str, &'p str)> {
        self.nested
            .iter()
            .filter_map(|member| {
                let inner = path.strip_prefix(member.as_str())?.strip_prefix('/')?;
                (!inner.is_empty()).then_some((&path[..member.len()], inner))
            })
            .max_by_key(|(outer, _)| outer.len())
    }
}

impl ArchiveSource for NestedTarArchive {
    fn list(&self) -> &[String] {
        &self.entries
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        // nested members themselves are not listed, only their contents
        if !self.contains(path) {
            return Err(InspectError::not_found(path));
        }
        match self.resolve(path) {
            Some((outer, inner)) => self.read_nested(outer, inner),
            None => read_tar_entry(&self.bytes[..], path),
        }
    }

    fn format_name(&self) -> &str {
        "nested-tar"
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn nested_error(outer: &str, err: InspectError) -> InspectError {
    match err {
        InspectError::BadFile(reason) => {
            InspectError::BadFile(format!("nested archive {outer}: {reason}"))
        }
        other => other,
    }
}
