//! Format-sniffing archive extraction.
//!
//! The format comes from [`ArchiveFormat::from_name`] over the filename;
//! each variant maps to exactly one decoder stack. Unknown extensions fail
//! instead of guessing at the bytes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use tracing::debug;

use stencil_core::{
    application::{ApplicationError, ports::Unpacker},
    domain::ArchiveFormat,
    error::StencilResult,
};

/// Unpacker for zip and tar-family template archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveUnpacker;

impl ArchiveUnpacker {
    pub fn new() -> Self {
        Self
    }
}

impl Unpacker for ArchiveUnpacker {
    fn unpack(&self, archive: &Path, dest: &Path) -> StencilResult<()> {
        let name = archive
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let format = ArchiveFormat::from_name(name);
        debug!(archive = %archive.display(), ?format, "unpacking archive");

        let result = match format {
            ArchiveFormat::Zip => unpack_zip(archive, dest),
            ArchiveFormat::TarPlain => open(archive).and_then(|f| unpack_tar(f, dest)),
            ArchiveFormat::TarGz => {
                open(archive).and_then(|f| unpack_tar(GzDecoder::new(f), dest))
            }
            ArchiveFormat::TarBz2 => {
                open(archive).and_then(|f| unpack_tar(BzDecoder::new(f), dest))
            }
            ArchiveFormat::Unsupported => Err(format!("unrecognized archive extension on '{name}'")),
        };

        result.map_err(|reason| {
            ApplicationError::ExtractionFailed {
                archive: archive.to_path_buf(),
                dest: dest.to_path_buf(),
                reason,
            }
            .into()
        })
    }
}

fn open(path: &Path) -> Result<File, String> {
    File::open(path).map_err(|e| e.to_string())
}

fn unpack_tar<R: Read>(reader: R, dest: &Path) -> Result<(), String> {
    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(true);
    // `unpack` refuses entries that would escape `dest`.
    archive.unpack(dest).map_err(|e| e.to_string())
}

fn unpack_zip(path: &Path, dest: &Path) -> Result<(), String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| e.to_string())?;
    archive.extract(dest).map_err(|e| e.to_string())
}

// ── tests ─────────────────────────────────────────────────────────────────────
