//! Installer download into the scratch directory.
//!
//! Stale installers from earlier runs are purged first, then the new
//! package is streamed to `<scratch>/<file name>`. No checksum or signature
//! is checked; Dell's installer verifies its own payload.

use crate::config::UpdaterConfig;
use crate::error::{Result, UpdaterError};
use crate::progress::{ProgressCallback, ProgressEvent};
use dell_support::DownloadDescriptor;
use futures_util::StreamExt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Browser-like User-Agent; the download CDN rejects some bare clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Retrieves the installer for a resolved BIOS package.
pub trait InstallerFetcher: Send + Sync {
    /// Download `descriptor` and return the local installer path.
    fn fetch(
        &self,
        descriptor: &DownloadDescriptor,
    ) -> impl Future<Output = Result<PathBuf>> + Send;
}

/// Downloads installers over HTTP(S) with reqwest.
pub struct HttpInstallerFetcher {
    client: reqwest::Client,
    scratch_dir: PathBuf,
    extension: String,
    progress: Option<ProgressCallback>,
}

impl HttpInstallerFetcher {
    /// Create a fetcher writing into the configured scratch directory.
    ///
    /// # Errors
    ///
    /// Returns [`UpdaterError::Download`] if the HTTP client cannot be built.
    pub fn new(config: &UpdaterConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            scratch_dir: config.scratch_dir.clone(),
            extension: config.installer_extension.clone(),
            progress: None,
        })
    }

    /// Report download progress to `callback`.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }
}

impl InstallerFetcher for HttpInstallerFetcher {
    async fn fetch(&self, descriptor: &DownloadDescriptor) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.scratch_dir).map_err(|e| {
            UpdaterError::Download(format!(
                "cannot create download directory {}: {e}",
                self.scratch_dir.display()
            ))
        })?;

        purge_stale_installers(&self.scratch_dir, &self.extension)?;

        let dest = self.scratch_dir.join(local_file_name(&descriptor.file_name)?);
        tracing::info!("downloading BIOS from {}", descriptor.url);
        download_file(&self.client, &descriptor.url, &dest, self.progress.as_ref()).await?;
        tracing::info!("Successfully downloaded BIOS update");

        Ok(dest)
    }
}

/// Build the HTTP client used for installer downloads.
///
/// # Errors
///
/// Returns [`UpdaterError::Download`] if the client cannot be constructed.
pub fn build_client(config: &UpdaterConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.download_timeout_secs))
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| UpdaterError::Download(format!("failed to build HTTP client: {e}")))
}

/// Delete every file in `dir` whose extension matches `extension`.
///
/// The match ignores ASCII case, as the Windows filesystem does. Other files,
/// including the activity log, are left alone. A missing directory counts as
/// already clean.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be listed or a matching file
/// cannot be removed.
pub fn purge_stale_installers(dir: &Path, extension: &str) -> Result<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches {
            tracing::info!("Potentially outdated file exists in BIOS directory, deleting");
            std::fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Reject file names that would escape the scratch directory.
fn local_file_name(file_name: &str) -> Result<&str> {
    let is_plain = Path::new(file_name)
        .file_name()
        .is_some_and(|name| name == file_name);
    if is_plain && !file_name.contains(['/', '\\']) {
        Ok(file_name)
    } else {
        Err(UpdaterError::Download(format!(
            "refusing to save download as {file_name:?}"
        )))
    }
}

/// Stream `url` to `dest`, removing the partial file on failure.
async fn download_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    progress: Option<&ProgressCallback>,
) -> Result<()> {
    let result = stream_to_file(client, url, dest, progress).await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(dest).await;
    }
    result
}

async fn stream_to_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    progress: Option<&ProgressCallback>,
) -> Result<()> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| UpdaterError::Download(format!("request for {url} failed: {e}")))?
        .error_for_status()
        .map_err(|e| UpdaterError::Download(format!("server refused {url}: {e}")))?;

    let total_bytes = response.content_length();
    let file_name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Some(cb) = progress {
        cb(ProgressEvent::DownloadStarted {
            file_name: file_name.clone(),
            total_bytes,
        });
    }

    let mut file = tokio::fs::File::create(dest).await.map_err(|e| {
        UpdaterError::Download(format!("cannot create {}: {e}", dest.display()))
    })?;

    let mut bytes_downloaded = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk =
            chunk.map_err(|e| UpdaterError::Download(format!("download interrupted: {e}")))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| UpdaterError::Download(format!("download write failed: {e}")))?;
        bytes_downloaded += chunk.len() as u64;
        if let Some(cb) = progress {
            cb(ProgressEvent::DownloadProgress {
                bytes_downloaded,
                total_bytes,
            });
        }
    }

    file.flush()
        .await
        .map_err(|e| UpdaterError::Download(format!("download write failed: {e}")))?;

    if let Some(cb) = progress {
        cb(ProgressEvent::DownloadComplete {
            file_name,
            bytes: bytes_downloaded,
        });
    }
    Ok(())
}
