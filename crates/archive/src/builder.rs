//! In-memory archive writer
//!
//! Appends files to a tar stream behind a zstd encoder writing into a
//! `Vec<u8>`. Each appended buffer can be dropped by the caller as soon as
//! `add_file` returns; only the compressed output accumulates.

use crate::error::{ArchiveError, ArchiveResult};
use crate::manifest::{paths, BackupManifest};
use tar::{Builder, Header};

/// Options for archive construction
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Zstd compression level (1-22). Fixed per job, not content-adaptive.
    pub compression_level: i32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            compression_level: 3,
        }
    }
}

/// Writer for backup archives
pub struct ArchiveBuilder {
    tar: Builder<zstd::Encoder<'static, Vec<u8>>>,
}

impl ArchiveBuilder {
    /// Create a builder compressing at the given level
    ///
    /// # Errors
    ///
    /// Returns an error if the zstd encoder rejects the level.
    pub fn new(options: &ExportOptions) -> ArchiveResult<Self> {
        let encoder = zstd::Encoder::new(Vec::new(), options.compression_level)
            .map_err(|e| ArchiveError::compression(format!("zstd encoder: {}", e)))?;
        Ok(Self {
            tar: Builder::new(encoder),
        })
    }

    /// Append one file to the archive
    ///
    /// # Errors
    ///
    /// Returns an error if the tar append fails.
    pub fn add_file(&mut self, path: &str, data: &[u8]) -> ArchiveResult<()> {
        let mut header = Header::new_gnu();
        header
            .set_path(path)
            .map_err(|e| ArchiveError::archive(format!("set path '{}': {}", path, e)))?;
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(0); // Reproducible output: zero mtime
        header.set_cksum();

        self.tar
            .append(&header, data)
            .map_err(|e| ArchiveError::archive(format!("append '{}': {}", path, e)))?;
        Ok(())
    }

    /// Write the manifest and finish the archive
    ///
    /// The manifest goes in last so its counts describe what was actually
    /// appended.
    ///
    /// # Errors
    ///
    /// Returns an error if manifest rendering, the final tar write, or the
    /// zstd finish fails.
    pub fn finish(mut self, manifest: &BackupManifest) -> ArchiveResult<Vec<u8>> {
        let manifest_json = serde_json::to_vec_pretty(manifest)?;
        self.add_file(paths::MANIFEST, &manifest_json)?;

        let encoder = self
            .tar
            .into_inner()
            .map_err(|e| ArchiveError::archive(format!("tar finish: {}", e)))?;
        let buffer = encoder
            .finish()
            .map_err(|e| ArchiveError::compression(format!("zstd finish: {}", e)))?;
        Ok(buffer)
    }
}
