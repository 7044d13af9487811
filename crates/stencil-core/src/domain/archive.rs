//! Archive filename handling.
//!
//! The unpacking strategy is chosen from the filename alone, as a closed
//! tagged union rather than runtime extension dispatch. The extension
//! splitter special-cases the compound `.tar.*` suffix so that
//! `project.tar.gz` splits into `("project", ".tar.gz")`.

/// Supported archive formats, selected purely from the filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarPlain,
    TarGz,
    TarBz2,
    /// Extension not recognized; extraction must fail rather than guess.
    Unsupported,
}

impl ArchiveFormat {
    /// Classify a filename (or full path) by its extension.
    pub fn from_name(name: &str) -> Self {
        let (_, ext) = splitext(name);
        match ext.to_ascii_lowercase().as_str() {
            ".zip" => Self::Zip,
            ".tar" => Self::TarPlain,
            ".tar.gz" | ".tgz" => Self::TarGz,
            ".tar.bz2" | ".tbz2" | ".tbz" => Self::TarBz2,
            _ => Self::Unsupported,
        }
    }

    /// Whether an unpacker exists for this format.
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

/// Splits a path into `(base, extension)`, keeping `.tar` attached.
///
/// Behaves like the usual last-dot split, except that a base ending in
/// `.tar` donates that suffix to the extension: `a.tar.gz` → `("a", ".tar.gz")`.
/// A lone leading dot marks a hidden file, not an extension.
pub fn splitext(path: &str) -> (String, String) {
    let (base, ext) = split_last_ext(path);
    if base.to_ascii_lowercase().ends_with(".tar") {
        let cut = base.len() - 4;
        (base[..cut].to_string(), format!("{}{ext}", &base[cut..]))
    } else {
        (base.to_string(), ext.to_string())
    }
}

fn split_last_ext(path: &str) -> (&str, &str) {
    let base_start = path.rfind('/').map_or(0, |i| i + 1);
    let base = &path[base_start..];
    // Leading dots belong to the filename (hidden files), not the extension.
    let search = base.trim_start_matches('.');
    match search.rfind('.') {
        Some(i) => {
            let dot = base_start + (base.len() - search.len()) + i;
            (&path[..dot], &path[dot..])
        }
        None => (path, ""),
    }
}

/// Maps an HTTP `content-type` to a filename extension.
///
/// Used only when a downloaded file has no extension at all; the guessed
/// extension decides which unpacker runs, never the content.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "application/zip" | "application/x-zip-compressed" => Some(".zip"),
        "application/x-tar" => Some(".tar"),
        "application/gzip" | "application/x-gzip" => Some(".gz"),
        "application/x-bzip2" => Some(".bz2"),
        _ => None,
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
