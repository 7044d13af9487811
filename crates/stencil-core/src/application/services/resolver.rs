//! Template source resolution.
//!
//! Turns a template reference (directory, archive path, or URL) into a
//! concrete on-disk directory, tracking every temporary artifact it creates
//! so the caller can delete them once the rendered tree has been written.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Downloader, Filesystem, Unpacker},
    },
    domain::{archive, source},
    error::StencilResult,
};

/// Explicit resolver configuration.
///
/// Passed in rather than read from ambient globals; the CLI owns the real
/// values (home directory, temp-dir prefix).
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Home directory used for `~` expansion, if known.
    pub home_dir: Option<PathBuf>,
    /// Prefix for temporary download/extraction directories.
    pub temp_prefix: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            home_dir: None,
            temp_prefix: "stencil_template_".to_string(),
        }
    }
}

/// Ordered record of temporary paths created during resolution.
///
/// Every path is recorded *before* the operation that populates it can
/// fail, so cleanup is always possible no matter where an error is raised.
#[derive(Debug, Clone, Default)]
pub struct TempArtifacts {
    paths: Vec<PathBuf>,
}

impl TempArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a path for later removal. Order is preserved.
    pub fn record(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// The outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    /// Directory holding the unpacked template content.
    pub dir: PathBuf,
    /// `true` when the directory was created by this resolution (download
    /// or extraction) and must eventually be deleted; `false` for existing
    /// local directories, which must never be deleted.
    pub owned: bool,
}

/// Resolves a template reference into a usable directory.
pub struct SourceResolver<'a> {
    downloader: &'a dyn Downloader,
    unpacker: &'a dyn Unpacker,
    filesystem: &'a dyn Filesystem,
    config: &'a ResolverConfig,
}

impl<'a> SourceResolver<'a> {
    pub fn new(
        downloader: &'a dyn Downloader,
        unpacker: &'a dyn Unpacker,
        filesystem: &'a dyn Filesystem,
        config: &'a ResolverConfig,
    ) -> Self {
        Self {
            downloader,
            unpacker,
            filesystem,
            config,
        }
    }

    /// Resolve `reference` to a directory of template content.
    ///
    /// With no reference, the built-in `default_dir` is used as-is. A
    /// reference is tried as an existing directory first, then as a URL to
    /// download, then as a local archive path; archives are unpacked into a
    /// fresh temporary directory. All temporaries are recorded in
    /// `artifacts` — this function never deletes anything itself.
    #[instrument(skip_all, fields(reference = reference.unwrap_or("<default>")))]
    pub fn resolve(
        &self,
        reference: Option<&str>,
        default_dir: &Path,
        artifacts: &mut TempArtifacts,
    ) -> StencilResult<ResolvedSource> {
        let Some(reference) = reference else {
            debug!(dir = %default_dir.display(), "no reference; using default template");
            return Ok(ResolvedSource {
                dir: default_dir.to_path_buf(),
                owned: false,
            });
        };

        let stripped = source::strip_file_scheme(reference);
        let expanded = source::expand_tilde(stripped, self.config.home_dir.as_deref());

        if self.filesystem.is_dir(&expanded) {
            debug!(dir = %expanded.display(), "reference is an existing directory");
            return Ok(ResolvedSource {
                dir: expanded,
                owned: false,
            });
        }

        let archive_path = if source::is_url(reference) {
            self.download(reference, artifacts)?
        } else {
            expanded
        };

        if self.filesystem.exists(&archive_path) {
            let dir = self.extract(&archive_path, artifacts)?;
            return Ok(ResolvedSource { dir, owned: true });
        }

        Err(ApplicationError::UnresolvedTemplate {
            reference: reference.to_string(),
        }
        .into())
    }

    /// Download a URL into a fresh temp directory and return the file path.
    fn download(&self, url: &str, artifacts: &mut TempArtifacts) -> StencilResult<PathBuf> {
        let tempdir = self
            .filesystem
            .create_temp_dir(&self.config.temp_prefix, "_download")?;
        // Recorded before the fetch so a failed transfer still gets cleaned up.
        artifacts.record(tempdir.clone());

        let (filename, display_url) = source::download_filename(url);
        info!(url = %display_url, "downloading template");

        let dest = tempdir.join(&filename);
        let outcome = self.downloader.download(url, &dest)?;

        // Try to get a better name from the response headers.
        let mut improved = outcome
            .content_disposition
            .as_deref()
            .and_then(source::content_disposition_filename)
            .unwrap_or_else(|| filename.clone());

        // Fall back to content-type guessing when there is no extension.
        let (_, ext) = archive::splitext(&improved);
        if ext.is_empty() {
            if let Some(guessed) = outcome
                .content_type
                .as_deref()
                .and_then(archive::extension_for_content_type)
            {
                improved.push_str(guessed);
            }
        }

        // Move the file to a name the unpacker has a chance of recognizing.
        if improved != filename {
            let better = tempdir.join(&improved);
            debug!(from = %dest.display(), to = %better.display(), "renaming download");
            self.filesystem.rename(&dest, &better)?;
            return Ok(better);
        }

        Ok(dest)
    }

    /// Unpack an archive into a fresh temp directory and return it.
    fn extract(&self, archive_path: &Path, artifacts: &mut TempArtifacts) -> StencilResult<PathBuf> {
        let tempdir = self
            .filesystem
            .create_temp_dir(&self.config.temp_prefix, "_extract")?;
        artifacts.record(tempdir.clone());

        info!(archive = %archive_path.display(), "extracting template archive");
        self.unpacker.unpack(archive_path, &tempdir)?;
        Ok(tempdir)
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{DownloadOutcome, WalkEntry};
    use crate::error::StencilError;
    use mockall::predicate::eq;

    mockall::mock! {
        pub Dl {}
        impl Downloader for Dl {
            fn download(&self, url: &str, dest: &Path) -> StencilResult<DownloadOutcome>;
        }
    }

    mockall::mock! {
        pub Up {}
        impl Unpacker for Up {
            fn unpack(&self, archive: &Path, dest: &Path) -> StencilResult<()>;
        }
    }

    mockall::mock! {
        pub Fs {}
        impl Filesystem for Fs {
            fn exists(&self, path: &Path) -> bool;
            fn is_dir(&self, path: &Path) -> bool;
            fn create_dir_all(&self, path: &Path) -> StencilResult<()>;
            fn read(&self, path: &Path) -> StencilResult<Vec<u8>>;
            fn write(&self, path: &Path, contents: &[u8]) -> StencilResult<()>;
            fn rename(&self, from: &Path, to: &Path) -> StencilResult<()>;
            fn remove_path(&self, path: &Path) -> StencilResult<()>;
            fn create_temp_dir(&self, prefix: &str, suffix: &str) -> StencilResult<PathBuf>;
            fn walk(&self, root: &Path) -> StencilResult<Vec<WalkEntry>>;
            fn mirror_permissions(&self, from: &Path, to: &Path) -> StencilResult<()>;
        }
    }

    fn config() -> ResolverConfig {
        ResolverConfig {
            home_dir: Some(PathBuf::from("/home/alice")),
            temp_prefix: "stencil_template_".into(),
        }
    }

    #[test]
    fn absent_reference_uses_default_dir() {
        let dl = MockDl::new();
        let up = MockUp::new();
        let fs = MockFs::new();
        let cfg = config();
        let resolver = SourceResolver::new(&dl, &up, &fs, &cfg);

        let mut artifacts = TempArtifacts::new();
        let resolved = resolver
            .resolve(None, Path::new("/usr/share/stencil/default"), &mut artifacts)
            .unwrap();

        assert_eq!(resolved.dir, PathBuf::from("/usr/share/stencil/default"));
        assert!(!resolved.owned);
        assert!(artifacts.is_empty());
    }

    #[test]
    fn existing_directory_is_returned_unowned_and_idempotently() {
        let dl = MockDl::new();
        let up = MockUp::new();
        let mut fs = MockFs::new();
        fs.expect_is_dir()
            .withf(|p| p == Path::new("/tmp/tpl"))
            .times(2)
            .return_const(true);
        let cfg = config();
        let resolver = SourceResolver::new(&dl, &up, &fs, &cfg);

        let mut artifacts = TempArtifacts::new();
        for _ in 0..2 {
            let resolved = resolver
                .resolve(Some("/tmp/tpl"), Path::new("/default"), &mut artifacts)
                .unwrap();
            assert_eq!(resolved.dir, PathBuf::from("/tmp/tpl"));
            assert!(!resolved.owned);
        }
        // Two resolutions, zero temp artifacts: nothing created, nothing to delete.
        assert!(artifacts.is_empty());
    }

    #[test]
    fn file_scheme_and_tilde_are_normalized_before_the_directory_check() {
        let dl = MockDl::new();
        let up = MockUp::new();
        let mut fs = MockFs::new();
        fs.expect_is_dir()
            .withf(|p| p == Path::new("/home/alice/templates/web"))
            .return_const(true);
        let cfg = config();
        let resolver = SourceResolver::new(&dl, &up, &fs, &cfg);

        let mut artifacts = TempArtifacts::new();
        let resolved = resolver
            .resolve(
                Some("file://~/templates/web"),
                Path::new("/default"),
                &mut artifacts,
            )
            .unwrap();
        assert_eq!(resolved.dir, PathBuf::from("/home/alice/templates/web"));
    }

    #[test]
    fn missing_local_archive_is_unresolved() {
        let dl = MockDl::new();
        let up = MockUp::new();
        let mut fs = MockFs::new();
        fs.expect_is_dir().return_const(false);
        fs.expect_exists().return_const(false);
        let cfg = config();
        let resolver = SourceResolver::new(&dl, &up, &fs, &cfg);

        let mut artifacts = TempArtifacts::new();
        let err = resolver
            .resolve(Some("/tmp/missing.tar.gz"), Path::new("/default"), &mut artifacts)
            .unwrap_err();

        match err {
            StencilError::Application(ApplicationError::UnresolvedTemplate { reference }) => {
                assert_eq!(reference, "/tmp/missing.tar.gz");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(artifacts.is_empty());
    }

    #[test]
    fn local_archive_is_extracted_into_owned_temp_dir() {
        let dl = MockDl::new();
        let mut up = MockUp::new();
        up.expect_unpack()
            .withf(|a, d| a == Path::new("/tmp/tpl.tar.gz") && d == Path::new("/t/x_extract"))
            .returning(|_, _| Ok(()));
        let mut fs = MockFs::new();
        fs.expect_is_dir().return_const(false);
        fs.expect_exists()
            .withf(|p| p == Path::new("/tmp/tpl.tar.gz"))
            .return_const(true);
        fs.expect_create_temp_dir()
            .with(eq("stencil_template_"), eq("_extract"))
            .returning(|_, _| Ok(PathBuf::from("/t/x_extract")));
        let cfg = config();
        let resolver = SourceResolver::new(&dl, &up, &fs, &cfg);

        let mut artifacts = TempArtifacts::new();
        let resolved = resolver
            .resolve(Some("/tmp/tpl.tar.gz"), Path::new("/default"), &mut artifacts)
            .unwrap();

        assert_eq!(resolved.dir, PathBuf::from("/t/x_extract"));
        assert!(resolved.owned);
        assert_eq!(artifacts.paths(), &[PathBuf::from("/t/x_extract")]);
    }

    #[test]
    fn failed_download_still_records_the_temp_dir() {
        let mut dl = MockDl::new();
        dl.expect_download().returning(|url, _| {
            Err(ApplicationError::DownloadFailed {
                url: url.to_string(),
                reason: "connection refused".into(),
            }
            .into())
        });
        let up = MockUp::new();
        let mut fs = MockFs::new();
        fs.expect_is_dir().return_const(false);
        fs.expect_create_temp_dir()
            .with(eq("stencil_template_"), eq("_download"))
            .returning(|_, _| Ok(PathBuf::from("/t/x_download")));
        let cfg = config();
        let resolver = SourceResolver::new(&dl, &up, &fs, &cfg);

        let mut artifacts = TempArtifacts::new();
        let err = resolver
            .resolve(
                Some("https://example.com/tpl.tar.gz"),
                Path::new("/default"),
                &mut artifacts,
            )
            .unwrap_err();

        assert!(matches!(
            err,
            StencilError::Application(ApplicationError::DownloadFailed { .. })
        ));
        // The directory was recorded before the fetch, so cleanup can proceed.
        assert_eq!(artifacts.paths(), &[PathBuf::from("/t/x_download")]);
    }

    #[test]
    fn download_then_extract_records_both_artifacts_in_order() {
        let mut dl = MockDl::new();
        dl.expect_download()
            .withf(|url, dest| {
                url == "https://example.com/dl/tpl.tar.gz"
                    && dest == Path::new("/t/d_download/tpl.tar.gz")
            })
            .returning(|_, _| Ok(DownloadOutcome::default()));
        let mut up = MockUp::new();
        up.expect_unpack()
            .withf(|a, d| {
                a == Path::new("/t/d_download/tpl.tar.gz") && d == Path::new("/t/d_extract")
            })
            .returning(|_, _| Ok(()));
        let mut fs = MockFs::new();
        fs.expect_is_dir().return_const(false);
        fs.expect_exists()
            .withf(|p| p == Path::new("/t/d_download/tpl.tar.gz"))
            .return_const(true);
        let mut call = 0;
        fs.expect_create_temp_dir().returning(move |_, suffix| {
            call += 1;
            assert_eq!(suffix, if call == 1 { "_download" } else { "_extract" });
            Ok(PathBuf::from(format!("/t/d{suffix}")))
        });
        let cfg = config();
        let resolver = SourceResolver::new(&dl, &up, &fs, &cfg);

        let mut artifacts = TempArtifacts::new();
        let resolved = resolver
            .resolve(
                Some("https://example.com/dl/tpl.tar.gz"),
                Path::new("/default"),
                &mut artifacts,
            )
            .unwrap();

        assert!(resolved.owned);
        assert_eq!(resolved.dir, PathBuf::from("/t/d_extract"));
        assert_eq!(
            artifacts.paths(),
            &[
                PathBuf::from("/t/d_download"),
                PathBuf::from("/t/d_extract"),
            ]
        );
    }

    #[test]
    fn content_disposition_filename_triggers_rename() {
        let mut dl = MockDl::new();
        dl.expect_download().returning(|_, _| {
            Ok(DownloadOutcome {
                content_disposition: Some(r#"attachment; filename="tpl.tar.gz""#.into()),
                content_type: None,
            })
        });
        let mut up = MockUp::new();
        up.expect_unpack().returning(|_, _| Ok(()));
        let mut fs = MockFs::new();
        fs.expect_is_dir().return_const(false);
        fs.expect_create_temp_dir()
            .returning(|_, suffix| Ok(PathBuf::from(format!("/t/c{suffix}"))));
        fs.expect_rename()
            .withf(|from, to| {
                from == Path::new("/t/c_download/download")
                    && to == Path::new("/t/c_download/tpl.tar.gz")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        fs.expect_exists()
            .withf(|p| p == Path::new("/t/c_download/tpl.tar.gz"))
            .return_const(true);
        let cfg = config();
        let resolver = SourceResolver::new(&dl, &up, &fs, &cfg);

        let mut artifacts = TempArtifacts::new();
        let resolved = resolver
            .resolve(
                Some("https://example.com/download"),
                Path::new("/default"),
                &mut artifacts,
            )
            .unwrap();
        assert!(resolved.owned);
    }

    #[test]
    fn content_type_guess_appends_extension_when_name_has_none() {
        let mut dl = MockDl::new();
        dl.expect_download().returning(|_, _| {
            Ok(DownloadOutcome {
                content_disposition: None,
                content_type: Some("application/zip".into()),
            })
        });
        let mut up = MockUp::new();
        up.expect_unpack().returning(|_, _| Ok(()));
        let mut fs = MockFs::new();
        fs.expect_is_dir().return_const(false);
        fs.expect_create_temp_dir()
            .returning(|_, suffix| Ok(PathBuf::from(format!("/t/g{suffix}"))));
        fs.expect_rename()
            .withf(|from, to| {
                from == Path::new("/t/g_download/latest")
                    && to == Path::new("/t/g_download/latest.zip")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        fs.expect_exists()
            .withf(|p| p == Path::new("/t/g_download/latest.zip"))
            .return_const(true);
        let cfg = config();
        let resolver = SourceResolver::new(&dl, &up, &fs, &cfg);

        let mut artifacts = TempArtifacts::new();
        resolver
            .resolve(
                Some("https://example.com/latest"),
                Path::new("/default"),
                &mut artifacts,
            )
            .unwrap();
    }

    #[test]
    fn filename_with_extension_skips_content_type_guess() {
        let mut dl = MockDl::new();
        dl.expect_download().returning(|_, _| {
            Ok(DownloadOutcome {
                content_disposition: None,
                content_type: Some("application/zip".into()),
            })
        });
        let mut up = MockUp::new();
        up.expect_unpack().returning(|_, _| Ok(()));
        let mut fs = MockFs::new();
        fs.expect_is_dir().return_const(false);
        fs.expect_create_temp_dir()
            .returning(|_, suffix| Ok(PathBuf::from(format!("/t/s{suffix}"))));
        // No rename expected: the URL already names "tpl.tar.gz".
        fs.expect_rename().times(0);
        fs.expect_exists()
            .withf(|p| p == Path::new("/t/s_download/tpl.tar.gz"))
            .return_const(true);
        let cfg = config();
        let resolver = SourceResolver::new(&dl, &up, &fs, &cfg);

        let mut artifacts = TempArtifacts::new();
        resolver
            .resolve(
                Some("https://example.com/tpl.tar.gz"),
                Path::new("/default"),
                &mut artifacts,
            )
            .unwrap();
    }
}
