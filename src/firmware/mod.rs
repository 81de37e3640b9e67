//! Machine identity and installed BIOS version.
//!
//! Both values come from one firmware-information query. On Windows that is
//! the `Win32_BIOS` WMI class; other platforms get a stub that always fails,
//! since the vendor updater only runs on Windows.

use crate::error::{Result, UpdaterError};
use std::fmt;

#[cfg(windows)]
mod windows;
#[cfg(not(windows))]
mod stub;
// Re-export stub for tests on all platforms.
#[cfg(test)]
#[cfg(windows)]
#[path = "stub.rs"]
mod stub;

/// Service tag uniquely identifying one physical machine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MachineIdentity(String);

impl MachineIdentity {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MachineIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Vendor BIOS version token such as `A02` or `1.2.3`.
///
/// Versions are compared for equality only; the token format differs
/// between product lines, so there is no ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FirmwareVersion(String);

impl FirmwareVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two firmware fields the updater needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareRecord {
    /// Machine serial number (Dell service tag).
    pub serial_number: String,
    /// Installed SMBIOS BIOS version.
    pub bios_version: String,
}

impl FirmwareRecord {
    /// Build a record, trimming padding and rejecting empty fields.
    ///
    /// # Errors
    ///
    /// Returns [`UpdaterError::Firmware`] if either field is blank.
    pub fn new(serial_number: &str, bios_version: &str) -> Result<Self> {
        let serial_number = serial_number.trim();
        let bios_version = bios_version.trim();
        if serial_number.is_empty() {
            return Err(UpdaterError::Firmware(
                "firmware reported an empty serial number".into(),
            ));
        }
        if bios_version.is_empty() {
            return Err(UpdaterError::Firmware(
                "firmware reported an empty BIOS version".into(),
            ));
        }
        Ok(Self {
            serial_number: serial_number.to_owned(),
            bios_version: bios_version.to_owned(),
        })
    }

    pub fn identity(&self) -> MachineIdentity {
        MachineIdentity::new(self.serial_number.clone())
    }

    pub fn installed_version(&self) -> FirmwareVersion {
        FirmwareVersion::new(self.bios_version.clone())
    }
}

/// Source of firmware information for the local machine.
///
/// Queries are synchronous and not retried; a failure ends the run.
pub trait FirmwareInfoProvider: Send + Sync {
    /// Read the serial number and installed BIOS version.
    ///
    /// # Errors
    ///
    /// Returns [`UpdaterError::Firmware`] if the provider is unavailable or
    /// the query fails.
    fn query(&self) -> Result<FirmwareRecord>;
}

/// The machine's service tag.
///
/// # Errors
///
/// Propagates the provider's query failure.
pub fn current_identity(provider: &dyn FirmwareInfoProvider) -> Result<MachineIdentity> {
    provider.query().map(|record| record.identity())
}

/// The installed BIOS version.
///
/// # Errors
///
/// Propagates the provider's query failure.
pub fn current_firmware_version(provider: &dyn FirmwareInfoProvider) -> Result<FirmwareVersion> {
    provider.query().map(|record| record.installed_version())
}

/// Create the platform-appropriate firmware provider.
///
/// Returns the WMI implementation on Windows, or a stub that reports the
/// platform as unsupported everywhere else.
pub fn create_provider() -> Box<dyn FirmwareInfoProvider> {
    #[cfg(windows)]
    {
        Box::new(windows::WmiFirmwareProvider)
    }
    #[cfg(not(windows))]
    {
        Box::new(stub::UnsupportedFirmwareProvider)
    }
}
