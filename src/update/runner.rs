//! The update run: identity, versions, comparison, fetch and launch.
//!
//! ```text
//! firmware query ─► latest BIOS ─► compare ─┬─ equal ──► AlreadyCurrent
//!                                           └─ differ ─► fetch ─► launch ─► InstallerLaunched
//! ```
//!
//! The runner has no console state. User-facing lines go to an optional
//! [`StatusCallback`] and every line is also logged.

use crate::console::{Pause, Status, StatusCallback};
use crate::error::Result;
use crate::firmware::{FirmwareInfoProvider, FirmwareVersion, MachineIdentity};
use crate::update::applier::InstallerFetcher;
use crate::update::checker::UpdateDecision;
use crate::update::launcher::InstallerLauncher;
use dell_support::{DownloadDescriptor, SupportConfig};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

/// Finds the newest published BIOS for a machine.
pub trait LatestFirmwareSource: Send + Sync {
    /// Resolve the latest package for `identity`.
    fn latest(
        &self,
        identity: &MachineIdentity,
    ) -> impl Future<Output = Result<DownloadDescriptor>> + Send;
}

/// Resolves the latest BIOS through the Dell support site.
#[derive(Debug, Clone)]
pub struct DellSupportSource {
    config: SupportConfig,
}

impl DellSupportSource {
    pub fn new(config: SupportConfig) -> Self {
        Self { config }
    }
}

impl LatestFirmwareSource for DellSupportSource {
    async fn latest(&self, identity: &MachineIdentity) -> Result<DownloadDescriptor> {
        Ok(dell_support::resolve_download_link(identity.as_str(), &self.config).await?)
    }
}

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The installed BIOS is the latest one; nothing was downloaded.
    AlreadyCurrent {
        /// The installed (and latest) version.
        version: FirmwareVersion,
    },
    /// An update exists but check-only mode skipped the download.
    UpdateAvailable {
        installed: FirmwareVersion,
        latest: FirmwareVersion,
        download: DownloadDescriptor,
    },
    /// The installer was downloaded and started elevated.
    InstallerLaunched {
        installed: FirmwareVersion,
        latest: FirmwareVersion,
        installer: PathBuf,
    },
}

impl Outcome {
    /// Process exit code for this outcome. Failures exit with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::AlreadyCurrent { .. } => 0,
            Self::InstallerLaunched { .. } => 2,
            Self::UpdateAvailable { .. } => 3,
        }
    }

    /// How long the console stays open after this outcome.
    pub fn pause(&self) -> Pause {
        match self {
            Self::AlreadyCurrent { .. } => Pause::Sleep(Duration::from_secs(2)),
            Self::UpdateAvailable { .. } | Self::InstallerLaunched { .. } => Pause::None,
        }
    }
}

/// Drives one update run over its collaborators.
pub struct Updater<S, F, L> {
    provider: Box<dyn FirmwareInfoProvider>,
    source: S,
    fetcher: F,
    launcher: L,
    identity_override: Option<MachineIdentity>,
    check_only: bool,
    status: Option<StatusCallback>,
}

impl<S, F, L> Updater<S, F, L>
where
    S: LatestFirmwareSource,
    F: InstallerFetcher,
    L: InstallerLauncher,
{
    pub fn new(provider: Box<dyn FirmwareInfoProvider>, source: S, fetcher: F, launcher: L) -> Self {
        Self {
            provider,
            source,
            fetcher,
            launcher,
            identity_override: None,
            check_only: false,
            status: None,
        }
    }

    /// Look up this service tag instead of the machine's own.
    pub fn with_identity_override(mut self, identity: Option<MachineIdentity>) -> Self {
        self.identity_override = identity;
        self
    }

    /// Stop after the comparison instead of downloading.
    pub fn check_only(mut self, check_only: bool) -> Self {
        self.check_only = check_only;
        self
    }

    /// Send user-facing status lines to `callback`.
    pub fn with_status(mut self, callback: StatusCallback) -> Self {
        self.status = Some(callback);
        self
    }

    /// Run the update once.
    ///
    /// # Errors
    ///
    /// Returns the first fatal failure: firmware query, latest-version
    /// resolution, download, or launch.
    pub async fn run(&self) -> Result<Outcome> {
        let record = self.provider.query()?;
        let identity = self
            .identity_override
            .clone()
            .unwrap_or_else(|| record.identity());
        let installed = record.installed_version();
        tracing::info!(%identity, %installed, "firmware queried");

        self.report(Status::info(
            "Loading Support Page. This will take a few moments.",
        ));
        let download = self.source.latest(&identity).await?;
        let latest = FirmwareVersion::new(download.version.clone());

        self.report(Status::success(format!(
            "The latest BIOS is {latest}, the current version is {installed}"
        )));

        match UpdateDecision::evaluate(&installed, &latest) {
            UpdateDecision::AlreadyCurrent => {
                self.report(Status::notice("BIOS Version is already up to date."));
                return Ok(Outcome::AlreadyCurrent { version: installed });
            }
            UpdateDecision::UpdateRequired if self.check_only => {
                self.report(Status::notice(format!(
                    "BIOS {latest} is available at {}",
                    download.url
                )));
                return Ok(Outcome::UpdateAvailable {
                    installed,
                    latest,
                    download,
                });
            }
            UpdateDecision::UpdateRequired => {}
        }

        self.report(Status::info("Downloading BIOS..."));
        let installer = self.fetcher.fetch(&download).await?;
        self.report(Status::success("File Downloaded"));

        self.report(Status::info("Starting BIOS Upgrade..."));
        self.launcher.launch_elevated(&installer)?;

        Ok(Outcome::InstallerLaunched {
            installed,
            latest,
            installer,
        })
    }

    fn report(&self, status: Status) {
        tracing::info!("{}", status.text.trim_end_matches('.'));
        if let Some(cb) = &self.status {
            cb(status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_distinguish_outcomes() {
        let current = Outcome::AlreadyCurrent {
            version: FirmwareVersion::new("A01"),
        };
        let launched = Outcome::InstallerLaunched {
            installed: FirmwareVersion::new("A01"),
            latest: FirmwareVersion::new("A02"),
            installer: PathBuf::from("BIOS_A02.EXE"),
        };
        assert_eq!(current.exit_code(), 0);
        assert_eq!(launched.exit_code(), 2);
        assert_eq!(current.pause(), Pause::Sleep(Duration::from_secs(2)));
        assert_eq!(launched.pause(), Pause::None);
    }
}
