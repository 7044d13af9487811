//! Blocking HTTP downloader built on ureq.

use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Duration;

use tracing::debug;

use stencil_core::{
    application::{
        ApplicationError,
        ports::{DownloadOutcome, Downloader},
    },
    error::StencilResult,
};

use crate::filesystem::local::map_io_error;

const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Blocking template fetcher.
///
/// One request per resolution, streamed straight to disk. Redirects are
/// whatever the underlying agent does by default; nothing else of the
/// response is interpreted beyond the two filename-refinement headers.
pub struct UreqDownloader {
    agent: ureq::Agent,
}

impl UreqDownloader {
    /// Create a downloader with a global per-request timeout.
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.new_agent(),
        }
    }
}

impl Default for UreqDownloader {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl Downloader for UreqDownloader {
    fn download(&self, url: &str, dest: &Path) -> StencilResult<DownloadOutcome> {
        // The scheme allow-list admits ftp, but this fetcher speaks HTTP only.
        let scheme = url.split(':').next().unwrap_or("").to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ApplicationError::DownloadFailed {
                url: url.to_string(),
                reason: format!("'{scheme}' URLs cannot be fetched; use http or https"),
            }
            .into());
        }

        let response = self.agent.get(url).call().map_err(|e| transport(url, e))?;
        let content_disposition = header_value(&response, "content-disposition");
        let content_type = header_value(&response, "content-type");
        debug!(url, ?content_type, "download response received");

        let mut reader = response.into_body().into_reader();
        let mut file =
            File::create(dest).map_err(|e| map_io_error(dest, e, "create download file"))?;
        io::copy(&mut reader, &mut file).map_err(|e| ApplicationError::DownloadFailed {
            url: url.to_string(),
            reason: format!("transfer interrupted: {e}"),
        })?;

        Ok(DownloadOutcome {
            content_disposition,
            content_type,
        })
    }
}

fn transport(url: &str, e: ureq::Error) -> stencil_core::error::StencilError {
    ApplicationError::DownloadFailed {
        url: url.to_string(),
        reason: e.to_string(),
    }
    .into()
}

fn header_value(response: &ureq::http::Response<ureq::Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ftp_is_recognized_but_not_fetchable() {
        let downloader = UreqDownloader::default();
        let err = downloader
            .download("ftp://example.com/tpl.tar.gz", Path::new("/tmp/ignored"))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ftp://example.com/tpl.tar.gz"));
        assert!(msg.contains("http"));
    }
}
