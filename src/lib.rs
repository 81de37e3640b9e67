//! bios-updater: keeps a Dell machine's BIOS current.
//!
//! One run is a straight line:
//! firmware query → latest BIOS lookup → compare → download → elevated launch
//!
//! # Architecture
//!
//! - **Firmware**: service tag and installed BIOS version from WMI
//! - **Support site**: latest package resolved by the `dell-support` crate
//! - **Update**: version comparison, installer download, elevated launch
//! - **Presentation**: status lines and pauses kept out of the update logic
//! - **Logging**: `tracing` events appended to `<temp>/BIOS/log.txt`

pub mod bios_dirs;
pub mod config;
pub mod console;
pub mod error;
pub mod firmware;
pub mod logging;
pub mod progress;
pub mod update;

pub use config::UpdaterConfig;
pub use console::{ConsolePresenter, Pause, Severity, Status, StatusCallback};
pub use error::{Result, UpdaterError};
pub use firmware::{FirmwareInfoProvider, FirmwareRecord, FirmwareVersion, MachineIdentity};
pub use progress::{ProgressCallback, ProgressEvent};
pub use update::{Outcome, UpdateDecision, Updater};
