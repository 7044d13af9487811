//! Template reference inspection.
//!
//! A template reference is just a string. Everything we can learn from it
//! without touching the filesystem lives here: URL detection against the
//! scheme allow-list, `file://` stripping, `~` expansion, and the filename
//! heuristics used when a reference is downloaded.

use std::path::{Path, PathBuf};

/// Schemes treated as remote download targets.
///
/// Anything with a `:` whose prefix is *not* in this list (e.g. `git:`)
/// falls through to local-archive-path handling.
pub const URL_SCHEMES: [&str; 3] = ["http", "https", "ftp"];

/// Returns `true` if the reference looks like a downloadable URL.
pub fn is_url(reference: &str) -> bool {
    let Some((scheme, _)) = reference.split_once(':') else {
        return false;
    };
    URL_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str())
}

/// Strips a leading `file://` scheme, leaving a plain filesystem path.
pub fn strip_file_scheme(reference: &str) -> &str {
    reference.strip_prefix("file://").unwrap_or(reference)
}

/// Expands a leading `~` to the supplied home directory.
///
/// The home directory is passed in explicitly so the function stays pure;
/// the CLI layer supplies the real value. `~user` forms are not supported
/// and are returned unchanged.
pub fn expand_tilde(path: &str, home: Option<&Path>) -> PathBuf {
    if let Some(home) = home {
        if path == "~" {
            return home.to_path_buf();
        }
        if let Some(rest) = path.strip_prefix("~/") {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Derives the local filename for a downloaded URL.
///
/// Returns `(filename, display_url)`: the filename is the URL's last path
/// segment (trailing slashes stripped first); the display form keeps a
/// single trailing slash when the original had one, for log output.
pub fn download_filename(url: &str) -> (String, String) {
    let trimmed = url.trim_end_matches('/');
    let filename = trimmed.rsplit('/').next().unwrap_or(trimmed).to_string();
    let display_url = if url.ends_with('/') {
        format!("{trimmed}/")
    } else {
        url.to_string()
    };
    (filename, display_url)
}

/// Extracts the `filename` parameter from a `content-disposition` header.
///
/// Handles the common `attachment; filename="tpl.tar.gz"` shape; the
/// RFC 5987 `filename*` form is deliberately not parsed.
pub fn content_disposition_filename(header: &str) -> Option<String> {
    for part in header.split(';') {
        let part = part.trim();
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        if !key.trim().eq_ignore_ascii_case("filename") {
            continue;
        }
        let value = value.trim().trim_matches('"').trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}

// ── tests ─────────────────────────────────────────────────────────────────────
