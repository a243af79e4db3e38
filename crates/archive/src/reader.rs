//! Archive reader
//!
//! Opens an uploaded archive, inflates it, and exposes its files by path.
//! The whole file set is extracted up front; archives are bounded by what
//! one backup job produces.

use crate::error::{ArchiveError, ArchiveResult};
use crate::manifest::{paths, xxh3_hex, BackupManifest, ARCHIVE_FORMAT_VERSION};
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use tar::Archive;

/// Reader over one extracted archive
pub struct ArchiveReader {
    files: HashMap<String, Vec<u8>>,
}

impl ArchiveReader {
    /// Inflate an archive from its compressed bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a zstd-compressed tar stream.
    pub fn from_bytes(data: &[u8]) -> ArchiveResult<Self> {
        let decoder = zstd::Decoder::new(data)
            .map_err(|e| ArchiveError::compression(format!("zstd decode: {}", e)))?;

        let mut archive = Archive::new(decoder);
        let mut files = HashMap::new();

        for entry in archive
            .entries()
            .map_err(|e| ArchiveError::archive(e.to_string()))?
        {
            let mut entry = entry.map_err(|e| ArchiveError::archive(e.to_string()))?;
            let entry_path = entry
                .path()
                .map_err(|e| ArchiveError::archive(e.to_string()))?
                .to_string_lossy()
                .to_string();

            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .map_err(|e| ArchiveError::archive(format!("read {}: {}", entry_path, e)))?;
            files.insert(entry_path, data);
        }

        Ok(Self { files })
    }

    /// Open an archive file from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not an archive.
    pub fn open(path: &Path) -> ArchiveResult<Self> {
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Parse the manifest
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest is missing, unparseable, or of an
    /// unsupported format version.
    pub fn manifest(&self) -> ArchiveResult<BackupManifest> {
        let data = self
            .files
            .get(paths::MANIFEST)
            .ok_or_else(|| ArchiveError::missing_file(paths::MANIFEST))?;
        let manifest: BackupManifest = serde_json::from_slice(data)?;

        if manifest.format_version != ARCHIVE_FORMAT_VERSION {
            return Err(ArchiveError::UnsupportedVersion {
                version: manifest.format_version,
            });
        }
        Ok(manifest)
    }

    /// Raw bytes of a file, if present
    pub fn file(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// UTF-8 contents of a file, if present
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is not valid UTF-8.
    pub fn text(&self, path: &str) -> ArchiveResult<Option<&str>> {
        match self.files.get(path) {
            None => Ok(None),
            Some(data) => std::str::from_utf8(data)
                .map(Some)
                .map_err(|e| ArchiveError::invalid_archive(format!("{}: {}", path, e))),
        }
    }

    /// All file paths in the archive, sorted
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.files.keys().cloned().collect();
        names.sort();
        names
    }

    /// Verify the manifest's recorded checksums against the extracted files
    ///
    /// Files the manifest does not mention are ignored; a checksum for a
    /// missing file counts as a mismatch.
    pub fn verify_checksums(&self, manifest: &BackupManifest) -> bool {
        manifest.checksums.iter().all(|(path, expected)| {
            self.files
                .get(path)
                .map(|data| &xxh3_hex(data) == expected)
                .unwrap_or(false)
        })
    }
}
