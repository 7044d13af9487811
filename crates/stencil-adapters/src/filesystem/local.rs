//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use stencil_core::{
    application::ports::{EntryKind, Filesystem, WalkEntry},
    error::StencilResult,
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> StencilResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn read(&self, path: &Path) -> StencilResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> StencilResult<()> {
        std::fs::write(path, contents).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn rename(&self, from: &Path, to: &Path) -> StencilResult<()> {
        std::fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename"))
    }

    fn remove_path(&self, path: &Path) -> StencilResult<()> {
        let metadata =
            std::fs::symlink_metadata(path).map_err(|e| map_io_error(path, e, "inspect path"))?;
        if metadata.is_dir() {
            std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
        } else {
            std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
        }
    }

    fn create_temp_dir(&self, prefix: &str, suffix: &str) -> StencilResult<PathBuf> {
        // `keep()` detaches the directory from the guard: it must survive
        // until the caller's cleanup pass, not until the end of this call.
        tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempdir()
            .map(tempfile::TempDir::keep)
            .map_err(|e| map_io_error(&std::env::temp_dir(), e, "create temporary directory"))
    }

    fn walk(&self, root: &Path) -> StencilResult<Vec<WalkEntry>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                let reason = format!("Failed to walk: {e}");
                stencil_core::application::ApplicationError::Filesystem { path, reason }
            })?;
            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| map_io_error(entry.path(), io::Error::other(e), "relativize path"))?
                .to_path_buf();
            let kind = if entry.file_type().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(WalkEntry { relative, kind });
        }
        Ok(entries)
    }

    fn mirror_permissions(&self, from: &Path, to: &Path) -> StencilResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mode = std::fs::metadata(from)
                .map_err(|e| map_io_error(from, e, "get metadata"))?
                .permissions()
                .mode();
            std::fs::set_permissions(to, std::fs::Permissions::from_mode(mode))
                .map_err(|e| map_io_error(to, e, "set permissions"))?;

            // A read-only template must still yield editable output.
            if mode & 0o200 == 0 {
                std::fs::set_permissions(to, std::fs::Permissions::from_mode(mode | 0o200))
                    .map_err(|e| map_io_error(to, e, "make writable"))?;
            }
        }
        #[cfg(not(unix))]
        {
            // Windows has no mode bits to mirror.
            let _ = (from, to);
        }
        Ok(())
    }
}

pub(crate) fn map_io_error(
    path: &Path,
    e: io::Error,
    operation: &str,
) -> stencil_core::error::StencilError {
    use stencil_core::application::ApplicationError;

    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_returns_sorted_relative_entries() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("src")).unwrap();
        std::fs::write(root.path().join("src/main.rs"), b"fn main() {}").unwrap();
        std::fs::write(root.path().join("Cargo.toml"), b"[package]").unwrap();

        let fs = LocalFilesystem::new();
        let entries = fs.walk(root.path()).unwrap();

        let listed: Vec<(String, EntryKind)> = entries
            .iter()
            .map(|e| (e.relative.display().to_string(), e.kind))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("Cargo.toml".to_string(), EntryKind::File),
                ("src".to_string(), EntryKind::Directory),
                ("src/main.rs".to_string(), EntryKind::File),
            ]
        );
    }

    #[test]
    fn create_temp_dir_is_unique_and_survives() {
        let fs = LocalFilesystem::new();
        let a = fs.create_temp_dir("stencil_test_", "_download").unwrap();
        let b = fs.create_temp_dir("stencil_test_", "_download").unwrap();

        assert_ne!(a, b);
        assert!(a.is_dir());
        assert!(b.is_dir());

        std::fs::remove_dir_all(&a).unwrap();
        std::fs::remove_dir_all(&b).unwrap();
    }

    #[test]
    fn remove_path_handles_files_and_trees() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("f.txt");
        std::fs::write(&file, b"x").unwrap();
        let dir = root.path().join("d");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("inner.txt"), b"y").unwrap();

        let fs = LocalFilesystem::new();
        fs.remove_path(&file).unwrap();
        fs.remove_path(&dir).unwrap();
        assert!(!file.exists());
        assert!(!dir.exists());
    }

    #[cfg(unix)]
    #[test]
    fn mirror_permissions_adds_owner_write_for_readonly_sources() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let src = root.path().join("src.txt");
        let dst = root.path().join("dst.txt");
        std::fs::write(&src, b"a").unwrap();
        std::fs::write(&dst, b"b").unwrap();
        std::fs::set_permissions(&src, std::fs::Permissions::from_mode(0o444)).unwrap();

        let fs = LocalFilesystem::new();
        fs.mirror_permissions(&src, &dst).unwrap();

        let mode = std::fs::metadata(&dst).unwrap().permissions().mode();
        assert_eq!(mode & 0o200, 0o200, "owner write bit must be added");
        assert_eq!(mode & 0o044, 0o044, "other bits mirror the source");
    }

    #[cfg(unix)]
    #[test]
    fn mirror_permissions_preserves_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let src = root.path().join("run.sh");
        let dst = root.path().join("out.sh");
        std::fs::write(&src, b"#!/bin/sh").unwrap();
        std::fs::write(&dst, b"#!/bin/sh").unwrap();
        std::fs::set_permissions(&src, std::fs::Permissions::from_mode(0o755)).unwrap();

        let fs = LocalFilesystem::new();
        fs.mirror_permissions(&src, &dst).unwrap();

        let mode = std::fs::metadata(&dst).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
