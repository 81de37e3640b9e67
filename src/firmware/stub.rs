//! Firmware provider for platforms without WMI.

use super::{FirmwareInfoProvider, FirmwareRecord};
use crate::error::{Result, UpdaterError};

/// Stub provider that always fails.
///
/// Dell's BIOS installers are Windows executables, so there is nothing to
/// update on other platforms.
pub struct UnsupportedFirmwareProvider;

impl FirmwareInfoProvider for UnsupportedFirmwareProvider {
    fn query(&self) -> Result<FirmwareRecord> {
        Err(UpdaterError::Firmware(
            "firmware information queries require Windows".into(),
        ))
    }
}
