//! Generate Service - main application orchestrator.
//!
//! Coordinates the whole rendering workflow:
//! 1. Create the target directory (which must not already exist)
//! 2. Resolve the template source (directory, archive, or URL)
//! 3. Walk the template tree, rendering selected files and copying the rest
//! 4. Remove every temporary artifact, whether the walk succeeded or not

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{ContentRenderer, Downloader, EntryKind, Filesystem, Unpacker, WalkEntry},
        services::resolver::{ResolverConfig, SourceResolver, TempArtifacts},
    },
    domain::{RenderContext, RenderSelection},
    error::StencilResult,
};

/// Directory names never copied out of a template.
const IGNORED_DIR_NAMES: [&str; 1] = ["__pycache__"];

/// File suffixes never copied out of a template (compiled leftovers).
const IGNORED_FILE_SUFFIXES: [&str; 3] = [".pyc", ".pyo", ".py.class"];

/// Everything the pipeline needs to render one project.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Directory to create and populate. Must not exist yet.
    pub target_dir: PathBuf,
    /// Template reference; `None` selects the default template.
    pub reference: Option<String>,
    /// Directory used when `reference` is `None`.
    pub default_template_dir: PathBuf,
    /// Which files receive variable substitution.
    pub selection: RenderSelection,
    /// Variable bindings for the substitution pass.
    pub context: RenderContext,
}

/// Counters reported after a successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub files_written: usize,
    pub files_rendered: usize,
    pub directories_created: usize,
}

/// Main generation service.
///
/// Owns the driven-port adapters and runs the resolve → walk → render
/// pipeline against them.
pub struct GenerateService {
    downloader: Box<dyn Downloader>,
    unpacker: Box<dyn Unpacker>,
    renderer: Box<dyn ContentRenderer>,
    filesystem: Box<dyn Filesystem>,
    resolver_config: ResolverConfig,
}

impl GenerateService {
    /// Create a new generate service with the given adapters.
    pub fn new(
        downloader: Box<dyn Downloader>,
        unpacker: Box<dyn Unpacker>,
        renderer: Box<dyn ContentRenderer>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            downloader,
            unpacker,
            renderer,
            filesystem,
            resolver_config: ResolverConfig::default(),
        }
    }

    /// Override the resolver configuration (home dir, temp prefix).
    pub fn with_resolver_config(mut self, config: ResolverConfig) -> Self {
        self.resolver_config = config;
        self
    }

    /// Render one template into one new directory.
    ///
    /// Temporary downloads and extraction directories are removed before
    /// this returns, on success and on failure alike. A partially written
    /// *target* is left in place when a destination conflict aborts the
    /// walk; only temporaries are cleaned up.
    #[instrument(skip_all, fields(target = %request.target_dir.display()))]
    pub fn generate(&self, request: &GenerateRequest) -> StencilResult<GenerateReport> {
        if self.filesystem.exists(&request.target_dir) {
            return Err(ApplicationError::TargetExists {
                path: request.target_dir.clone(),
            }
            .into());
        }
        self.filesystem.create_dir_all(&request.target_dir)?;

        let mut artifacts = TempArtifacts::new();
        let result = self.resolve_and_render(request, &mut artifacts);
        self.cleanup(&artifacts);
        result
    }

    fn resolve_and_render(
        &self,
        request: &GenerateRequest,
        artifacts: &mut TempArtifacts,
    ) -> StencilResult<GenerateReport> {
        let resolver = SourceResolver::new(
            self.downloader.as_ref(),
            self.unpacker.as_ref(),
            self.filesystem.as_ref(),
            &self.resolver_config,
        );
        let source = resolver.resolve(
            request.reference.as_deref(),
            &request.default_template_dir,
            artifacts,
        )?;
        info!(
            template_dir = %source.dir.display(),
            owned = source.owned,
            "template source resolved"
        );
        self.render_tree(&source.dir, request)
    }

    /// Mirror the template tree into the target, substituting where selected.
    fn render_tree(
        &self,
        template_dir: &Path,
        request: &GenerateRequest,
    ) -> StencilResult<GenerateReport> {
        let mut report = GenerateReport::default();

        for entry in self.filesystem.walk(template_dir)? {
            if is_ignored(&entry) {
                continue;
            }
            let dest = request.target_dir.join(&entry.relative);
            match entry.kind {
                EntryKind::Directory => {
                    self.filesystem.create_dir_all(&dest)?;
                    report.directories_created += 1;
                }
                EntryKind::File => {
                    // Overlaying onto an existing tree must never replace files.
                    if self.filesystem.exists(&dest) {
                        return Err(ApplicationError::TargetExists { path: dest }.into());
                    }
                    if let Some(parent) = dest.parent() {
                        self.filesystem.create_dir_all(parent)?;
                    }

                    let src = template_dir.join(&entry.relative);
                    let raw = self.filesystem.read(&src)?;
                    let filename = entry
                        .relative
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or_default();

                    if request.selection.should_render(filename) {
                        let text = String::from_utf8(raw).map_err(|e| {
                            ApplicationError::RenderingFailed {
                                file: src.clone(),
                                reason: format!("not valid UTF-8: {e}"),
                            }
                        })?;
                        let rendered = self.renderer.render(&text, &request.context, &src)?;
                        self.filesystem.write(&dest, rendered.as_bytes())?;
                        report.files_rendered += 1;
                    } else {
                        self.filesystem.write(&dest, &raw)?;
                    }
                    report.files_written += 1;
                    debug!(file = %dest.display(), "created");

                    // Permission bits are advisory: mirror them, add owner
                    // write, and keep going if the filesystem says no.
                    if let Err(e) = self.filesystem.mirror_permissions(&src, &dest) {
                        warn!(
                            file = %dest.display(),
                            error = %e,
                            "couldn't set permission bits; you're probably on an \
                             uncommon filesystem setup, no problem"
                        );
                    }
                }
            }
        }

        info!(
            files = report.files_written,
            rendered = report.files_rendered,
            directories = report.directories_created,
            "template rendered"
        );
        Ok(report)
    }

    /// Remove recorded temporaries, in order, best-effort.
    fn cleanup(&self, artifacts: &TempArtifacts) {
        if artifacts.is_empty() {
            return;
        }
        debug!(count = artifacts.paths().len(), "cleaning up temporary files");
        for path in artifacts.paths() {
            if let Err(e) = self.filesystem.remove_path(path) {
                warn!(path = %path.display(), error = %e, "failed to remove temporary path");
            }
        }
    }
}

/// Whether a walked entry is template junk that never reaches the target.
///
/// Hidden directories (and everything beneath them) are skipped; hidden
/// *files* like `.gitignore` are kept. Compiled-artifact suffixes are
/// dropped wherever they appear.
fn is_ignored(entry: &WalkEntry) -> bool {
    let components: Vec<&str> = entry
        .relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();
    let count = components.len();

    for (i, name) in components.iter().enumerate() {
        let is_dir_component = i + 1 < count || entry.kind == EntryKind::Directory;
        if is_dir_component && (name.starts_with('.') || IGNORED_DIR_NAMES.contains(name)) {
            return true;
        }
    }

    entry.kind == EntryKind::File
        && components.last().is_some_and(|name| {
            IGNORED_FILE_SUFFIXES
                .iter()
                .any(|suffix| name.ends_with(suffix))
        })
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> WalkEntry {
        WalkEntry::file(path)
    }

    fn dir(path: &str) -> WalkEntry {
        WalkEntry::dir(path)
    }

    #[test]
    fn hidden_directories_are_ignored_recursively() {
        assert!(is_ignored(&dir(".git")));
        assert!(is_ignored(&file(".git/config")));
        assert!(is_ignored(&file("src/.hidden/lib.rs")));
    }

    #[test]
    fn hidden_files_are_kept() {
        assert!(!is_ignored(&file(".gitignore")));
        assert!(!is_ignored(&file("src/.env.example")));
    }

    #[test]
    fn pycache_is_ignored() {
        assert!(is_ignored(&dir("__pycache__")));
        assert!(is_ignored(&file("pkg/__pycache__/mod.cpython-312.pyc")));
    }

    #[test]
    fn compiled_leftovers_are_ignored() {
        assert!(is_ignored(&file("app/models.pyc")));
        assert!(is_ignored(&file("app/models.pyo")));
        assert!(is_ignored(&file("app/models.py.class")));
        assert!(!is_ignored(&file("app/models.py")));
    }

    #[test]
    fn ordinary_entries_are_kept() {
        assert!(!is_ignored(&dir("src")));
        assert!(!is_ignored(&file("src/main.rs")));
        assert!(!is_ignored(&file("Cargo.toml")));
    }
}
