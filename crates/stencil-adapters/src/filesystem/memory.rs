//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use stencil_core::{
    application::{
        ApplicationError,
        ports::{EntryKind, Filesystem, WalkEntry},
    },
    error::StencilResult,
};

/// In-memory filesystem for testing.
///
/// Cheap to clone; clones share state, so a test can seed a template tree,
/// hand the filesystem to a service, and inspect the outcome afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    temp_counter: usize,
    fail_permissions: bool,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating parent directories (testing helper).
    pub fn seed_file(&self, path: impl Into<PathBuf>, contents: &[u8]) {
        let path = path.into();
        let mut inner = self.inner.write().unwrap();
        if let Some(parent) = path.parent() {
            insert_dir_chain(&mut inner.directories, parent);
        }
        inner.files.insert(path, contents.to_vec());
    }

    /// Seed a file *without* its parent directories (testing helper).
    ///
    /// Simulates a destination file appearing inside a target directory the
    /// service has not created yet, as a concurrent invocation would.
    pub fn seed_orphan_file(&self, path: impl Into<PathBuf>, contents: &[u8]) {
        self.inner
            .write()
            .unwrap()
            .files
            .insert(path.into(), contents.to_vec());
    }

    /// Seed a directory (testing helper).
    pub fn seed_dir(&self, path: impl Into<PathBuf>) {
        let mut inner = self.inner.write().unwrap();
        insert_dir_chain(&mut inner.directories, &path.into());
    }

    /// Read a file's content (testing helper).
    pub fn file_contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.inner.read().unwrap().files.get(path).cloned()
    }

    /// List all file paths (testing helper).
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.inner.read().unwrap().files.keys().cloned().collect()
    }

    /// Make `mirror_permissions` fail, to exercise the advisory-warning path.
    pub fn fail_permissions(&self, fail: bool) {
        self.inner.write().unwrap().fail_permissions = fail;
    }
}

fn insert_dir_chain(directories: &mut BTreeSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        directories.insert(current.clone());
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.read().unwrap();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner.read().unwrap().directories.contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> StencilResult<()> {
        let mut inner = self.inner.write().unwrap();
        insert_dir_chain(&mut inner.directories, path);
        Ok(())
    }

    fn read(&self, path: &Path) -> StencilResult<Vec<u8>> {
        self.inner
            .read()
            .unwrap()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> StencilResult<()> {
        self.inner
            .write()
            .unwrap()
            .files
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> StencilResult<()> {
        let mut inner = self.inner.write().unwrap();
        match inner.files.remove(from) {
            Some(contents) => {
                inner.files.insert(to.to_path_buf(), contents);
                Ok(())
            }
            None => Err(not_found(from)),
        }
    }

    fn remove_path(&self, path: &Path) -> StencilResult<()> {
        let mut inner = self.inner.write().unwrap();
        if inner.files.remove(path).is_some() {
            return Ok(());
        }
        if !inner.directories.contains(path) {
            return Err(not_found(path));
        }
        inner.directories.retain(|d| !d.starts_with(path));
        inner.files.retain(|f, _| !f.starts_with(path));
        Ok(())
    }

    fn create_temp_dir(&self, prefix: &str, suffix: &str) -> StencilResult<PathBuf> {
        let mut inner = self.inner.write().unwrap();
        inner.temp_counter += 1;
        let path = PathBuf::from(format!("/mem/tmp/{prefix}{:04}{suffix}", inner.temp_counter));
        insert_dir_chain(&mut inner.directories, &path);
        Ok(path)
    }

    fn walk(&self, root: &Path) -> StencilResult<Vec<WalkEntry>> {
        let inner = self.inner.read().unwrap();
        if !inner.directories.contains(root) {
            return Err(not_found(root));
        }
        // BTree ordering keeps parents ahead of their children.
        let mut entries = BTreeMap::new();
        for dir in &inner.directories {
            if let Ok(rel) = dir.strip_prefix(root) {
                if !rel.as_os_str().is_empty() {
                    entries.insert(rel.to_path_buf(), EntryKind::Directory);
                }
            }
        }
        for file in inner.files.keys() {
            if let Ok(rel) = file.strip_prefix(root) {
                entries.insert(rel.to_path_buf(), EntryKind::File);
            }
        }
        Ok(entries
            .into_iter()
            .map(|(relative, kind)| WalkEntry { relative, kind })
            .collect())
    }

    fn mirror_permissions(&self, _from: &Path, to: &Path) -> StencilResult<()> {
        if self.inner.read().unwrap().fail_permissions {
            return Err(ApplicationError::Filesystem {
                path: to.to_path_buf(),
                reason: "Failed to set permissions: simulated".into(),
            }
            .into());
        }
        Ok(())
    }
}

fn not_found(path: &Path) -> stencil_core::error::StencilError {
    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        reason: "Failed to access: no such entry".into(),
    }
    .into()
}

// ── tests ─────────────────────────────────────────────────────────────────────
