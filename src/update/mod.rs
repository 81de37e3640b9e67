//! BIOS update pipeline.
//!
//! Compares the installed BIOS with the latest published one and, when they
//! differ, downloads the vendor installer and starts it elevated.

pub mod applier;
pub mod checker;
pub mod launcher;
pub mod runner;

pub use applier::{HttpInstallerFetcher, InstallerFetcher, purge_stale_installers};
pub use checker::UpdateDecision;
pub use launcher::{ElevatedLauncher, InstallerLauncher};
pub use runner::{DellSupportSource, LatestFirmwareSource, Outcome, Updater};
