//! Run configuration.
//!
//! All settings are compiled in; the CLI may override a few of them at
//! startup. There is no configuration file.

use crate::bios_dirs;
use crate::error::{Result, UpdaterError};
use dell_support::SupportConfig;
use std::path::PathBuf;

/// Settings for one update run.
#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    /// Directory holding the downloaded installer and `log.txt`.
    pub scratch_dir: PathBuf,
    /// Installer file extension, without the dot. Files with this extension
    /// are purged from `scratch_dir` before each download.
    pub installer_extension: String,
    /// Connect timeout for the installer download, in seconds.
    pub connect_timeout_secs: u64,
    /// Overall timeout for the installer download, in seconds.
    pub download_timeout_secs: u64,
    /// Use this service tag instead of the one reported by the firmware.
    pub service_tag_override: Option<String>,
    /// Report whether an update exists without downloading it.
    pub check_only: bool,
    /// Support-site resolution settings.
    pub support: SupportConfig,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            scratch_dir: bios_dirs::scratch_dir(),
            installer_extension: "exe".into(),
            connect_timeout_secs: 15,
            download_timeout_secs: 600,
            service_tag_override: None,
            check_only: false,
            support: SupportConfig::default(),
        }
    }
}

impl UpdaterConfig {
    /// Path of the activity log.
    pub fn log_file(&self) -> PathBuf {
        bios_dirs::log_file(&self.scratch_dir)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.scratch_dir.as_os_str().is_empty() {
            return Err(UpdaterError::Config("scratch_dir must not be empty".into()));
        }
        let ext = self.installer_extension.trim();
        if ext.is_empty() || ext.starts_with('.') {
            return Err(UpdaterError::Config(
                "installer_extension must be a bare extension like \"exe\"".into(),
            ));
        }
        if self.connect_timeout_secs == 0 || self.download_timeout_secs == 0 {
            return Err(UpdaterError::Config(
                "download timeouts must be greater than 0".into(),
            ));
        }
        if let Some(tag) = &self.service_tag_override {
            if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(UpdaterError::Config(format!(
                    "service tag override {tag:?} must be alphanumeric"
                )));
            }
        }
        self.support.validate()?;
        Ok(())
    }
}
