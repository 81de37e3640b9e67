//! Progress events for the installer download.
//!
//! Decouples the download loop from presentation: the CLI renders events
//! with an indicatif bar, tests just collect them.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Progress events emitted while the installer downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The response arrived and streaming has begun.
    DownloadStarted {
        /// Local file name of the installer.
        file_name: String,
        /// Total size in bytes, if the server sent a length.
        total_bytes: Option<u64>,
    },

    /// Another chunk was written to disk.
    DownloadProgress {
        /// Bytes written so far.
        bytes_downloaded: u64,
        /// Total size in bytes, if known.
        total_bytes: Option<u64>,
    },

    /// The installer is fully on disk.
    DownloadComplete {
        /// Local file name of the installer.
        file_name: String,
        /// Final size in bytes.
        bytes: u64,
    },
}

/// Callback type for receiving progress events.
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

/// Progress callback that draws a terminal progress bar.
pub fn indicatif_progress() -> ProgressCallback {
    let bar: Mutex<Option<ProgressBar>> = Mutex::new(None);

    Box::new(move |event| {
        let Ok(mut guard) = bar.lock() else {
            return;
        };
        match event {
            ProgressEvent::DownloadStarted {
                file_name,
                total_bytes,
            } => {
                let pb = ProgressBar::new(total_bytes.unwrap_or(0));
                if let Ok(style) = ProgressStyle::with_template(
                    "  {msg} [{bar:30}] {bytes}/{total_bytes} {bytes_per_sec} ETA {eta}",
                ) {
                    pb.set_style(style);
                }
                pb.set_message(file_name);
                *guard = Some(pb);
            }
            ProgressEvent::DownloadProgress {
                bytes_downloaded,
                total_bytes,
            } => {
                if let Some(pb) = guard.as_ref() {
                    if let Some(total) = total_bytes {
                        pb.set_length(total);
                    }
                    pb.set_position(bytes_downloaded);
                }
            }
            ProgressEvent::DownloadComplete { .. } => {
                if let Some(pb) = guard.take() {
                    pb.finish_and_clear();
                }
            }
        }
    })
}
