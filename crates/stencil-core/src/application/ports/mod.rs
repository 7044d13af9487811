//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define what the application needs from
//! the outside world. Adapters in `stencil-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: called by the application, implemented by
//!   infrastructure
//!   - `Filesystem`: file operations, tree walking, temp directories
//!   - `Downloader`: blocking fetch of a remote template archive
//!   - `Unpacker`: archive extraction
//!   - `ContentRenderer`: variable substitution in selected files
//!
//! Every port is synchronous: the whole pipeline is single-threaded,
//! blocking I/O executed in sequence.

use std::path::{Path, PathBuf};

use crate::domain::RenderContext;
use crate::error::StencilResult;

/// Response metadata from a completed download.
///
/// Only the two headers the resolver consults to improve the stored
/// filename; nothing else from the response survives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub content_disposition: Option<String>,
    pub content_type: Option<String>,
}

/// Fetches one remote resource to a local file.
pub trait Downloader {
    /// Fetch `url` into `dest`, blocking until complete.
    ///
    /// Fails with `ApplicationError::DownloadFailed` on any transport
    /// problem; `dest`'s parent directory is guaranteed to exist.
    fn download(&self, url: &str, dest: &Path) -> StencilResult<DownloadOutcome>;
}

/// Unpacks one archive into a directory.
pub trait Unpacker {
    /// Extract `archive` into the existing directory `dest`.
    ///
    /// The format is sniffed from the archive's filename. Fails with
    /// `ApplicationError::ExtractionFailed` on unsupported or corrupt input.
    fn unpack(&self, archive: &Path, dest: &Path) -> StencilResult<()>;
}

/// Renders template text with variable bindings.
pub trait ContentRenderer {
    /// Substitute `context` into `source`. `origin` names the file being
    /// rendered and is used only for error context.
    fn render(&self, source: &str, context: &RenderContext, origin: &Path)
    -> StencilResult<String>;
}

/// Whether a walked entry is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One entry of a walked template tree, relative to the walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub relative: PathBuf,
    pub kind: EntryKind,
}

impl WalkEntry {
    pub fn dir(relative: impl Into<PathBuf>) -> Self {
        Self {
            relative: relative.into(),
            kind: EntryKind::Directory,
        }
    }

    pub fn file(relative: impl Into<PathBuf>) -> Self {
        Self {
            relative: relative.into(),
            kind: EntryKind::File,
        }
    }
}

/// Filesystem operations used by the resolver and the generation walk.
pub trait Filesystem {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> StencilResult<()>;

    fn read(&self, path: &Path) -> StencilResult<Vec<u8>>;

    fn write(&self, path: &Path, contents: &[u8]) -> StencilResult<()>;

    fn rename(&self, from: &Path, to: &Path) -> StencilResult<()>;

    /// Remove a file, or a directory and everything beneath it.
    fn remove_path(&self, path: &Path) -> StencilResult<()>;

    /// Create a uniquely named temporary directory that is NOT removed
    /// automatically; the caller owns its lifetime.
    fn create_temp_dir(&self, prefix: &str, suffix: &str) -> StencilResult<PathBuf>;

    /// Walk a directory tree depth-first in sorted order, returning paths
    /// relative to `root`. Parents always precede their children.
    fn walk(&self, root: &Path) -> StencilResult<Vec<WalkEntry>>;

    /// Copy permission bits from `from` to `to`, then ensure `to` is
    /// writable by its owner.
    fn mirror_permissions(&self, from: &Path, to: &Path) -> StencilResult<()>;
}
