//! Error types for the BIOS update flow.

use crate::console::Pause;
use dell_support::SupportError;
use std::time::Duration;

/// Top-level error type for a BIOS update run.
#[derive(Debug, thiserror::Error)]
pub enum UpdaterError {
    /// Firmware information (service tag, BIOS version) could not be read.
    #[error("firmware query error: {0}")]
    Firmware(String),

    /// Resolving the latest BIOS from the support site failed.
    #[error(transparent)]
    Support(#[from] SupportError),

    /// Installer download failed.
    #[error("download error: {0}")]
    Download(String),

    /// The installer could not be started with elevation.
    #[error("launch error: {0}")]
    Launch(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl UpdaterError {
    /// How long the console stays open after this failure is shown.
    pub fn pause(&self) -> Pause {
        match self {
            Self::Support(SupportError::RetriesExhausted { .. }) => {
                Pause::Sleep(Duration::from_secs(1))
            }
            Self::Download(_) | Self::Launch(_) => Pause::Sleep(Duration::from_secs(5)),
            _ => Pause::KeyPress,
        }
    }

    /// Console wording for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Support(SupportError::Unreachable(_)) => {
                "Unable to access the Dell support web page.".into()
            }
            Self::Support(SupportError::UnknownServiceTag(_)) => {
                "This machine does not have a working Service Tag page at Dell.com. \
                 Due to this page being missing, it is not possible to download the BIOS."
                    .into()
            }
            Self::Support(SupportError::RetriesExhausted { attempts, .. }) => {
                format!("Repeated issues loading page elements, closing. Attempts: {attempts}")
            }
            Self::Launch(e) => format!("Upgrade failed! Error: {e}"),
            other => other.to_string(),
        }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, UpdaterError>;
