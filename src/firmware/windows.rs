//! WMI-backed firmware provider.

use super::{FirmwareInfoProvider, FirmwareRecord};
use crate::error::{Result, UpdaterError};
use serde::Deserialize;
use wmi::{COMLibrary, WMIConnection};

/// Fields of `root\cimv2\Win32_BIOS` the updater reads.
#[derive(Deserialize, Debug)]
#[serde(rename = "Win32_BIOS")]
#[serde(rename_all = "PascalCase")]
struct Win32Bios {
    serial_number: Option<String>,
    #[serde(rename = "SMBIOSBIOSVersion")]
    smbios_bios_version: Option<String>,
}

/// Reads firmware information through WMI.
pub struct WmiFirmwareProvider;

impl FirmwareInfoProvider for WmiFirmwareProvider {
    fn query(&self) -> Result<FirmwareRecord> {
        let com = COMLibrary::new().map_err(|e| {
            UpdaterError::Firmware(format!("An error occurred while querying for WMI data: {e}"))
        })?;
        let wmi = WMIConnection::new(com).map_err(|e| {
            UpdaterError::Firmware(format!("An error occurred while querying for WMI data: {e}"))
        })?;

        let rows: Vec<Win32Bios> = wmi.query().map_err(|e| {
            UpdaterError::Firmware(format!("An error occurred while querying for WMI data: {e}"))
        })?;

        // A machine has one BIOS instance; if WMI ever reports more, the last wins.
        let row = rows
            .into_iter()
            .last()
            .ok_or_else(|| UpdaterError::Firmware("Win32_BIOS returned no instances".into()))?;

        tracing::debug!(?row, "Win32_BIOS queried");
        FirmwareRecord::new(
            row.serial_number.as_deref().unwrap_or_default(),
            row.smbios_bios_version.as_deref().unwrap_or_default(),
        )
    }
}
