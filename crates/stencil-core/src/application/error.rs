//! Application layer errors.
//!
//! These errors represent failures in orchestration: the reference could
//! not be turned into a usable directory, or the target tree could not be
//! written. Invalid-input errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ErrorCategory;

/// Errors that occur while resolving a template source or writing the tree.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The target directory, or a destination file inside it, already exists.
    /// Rendering never merges into or overwrites existing trees.
    #[error("'{}' already exists", .path.display())]
    TargetExists { path: PathBuf },

    /// Transport failure while fetching a remote template.
    #[error("couldn't download {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// The archive could not be unpacked (unsupported format or corrupt).
    #[error("couldn't extract {} to {}: {reason}", .archive.display(), .dest.display())]
    ExtractionFailed {
        archive: PathBuf,
        dest: PathBuf,
        reason: String,
    },

    /// The reference matched nothing usable: not a directory, not an
    /// existing archive, not a downloadable URL.
    #[error("couldn't handle template reference '{reference}'")]
    UnresolvedTemplate { reference: String },

    /// Variable substitution failed for a selected file.
    #[error("couldn't render {}: {reason}", .file.display())]
    RenderingFailed { file: PathBuf, reason: String },

    /// A filesystem operation failed.
    #[error("filesystem error at {}: {reason}", .path.display())]
    Filesystem { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TargetExists { path } => vec![
                format!("'{}' already exists", path.display()),
                "Rendering into an existing directory won't replace conflicting files".into(),
                "Choose a different project name or remove the existing path".into(),
            ],
            Self::DownloadFailed { url, .. } => vec![
                format!("Failed to fetch: {}", url),
                "Check the URL and your network connection".into(),
                "Only http, https, and ftp references are downloadable".into(),
            ],
            Self::ExtractionFailed { archive, .. } => vec![
                format!("Failed to unpack: {}", archive.display()),
                "Supported formats: .zip, .tar, .tar.gz/.tgz, .tar.bz2/.tbz2".into(),
                "Re-download the archive if it may be truncated".into(),
            ],
            Self::UnresolvedTemplate { reference } => vec![
                format!("'{}' is not a directory, an archive, or a known URL", reference),
                "Pass a template directory, an archive path, or an http/https/ftp URL".into(),
            ],
            Self::RenderingFailed { file, .. } => vec![
                format!("Template file failed to render: {}", file.display()),
                "Check the placeholder syntax and that the file is valid UTF-8".into(),
                "Exclude the file from rendering if it is a binary asset".into(),
            ],
            Self::Filesystem { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Check available disk space".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TargetExists { .. } => ErrorCategory::Validation,
            Self::UnresolvedTemplate { .. } => ErrorCategory::NotFound,
            Self::DownloadFailed { .. }
            | Self::ExtractionFailed { .. }
            | Self::RenderingFailed { .. }
            | Self::Filesystem { .. } => ErrorCategory::Internal,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
