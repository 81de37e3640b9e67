//! Elevated launch of the downloaded installer.
//!
//! The installer is started and left running; its exit code is never
//! observed. On Windows, elevation goes through PowerShell's
//! `Start-Process -Verb RunAs`, which returns as soon as the process has
//! started and fails when the UAC prompt is declined.

use crate::error::{Result, UpdaterError};
use std::path::Path;

/// Starts an installer with administrative privileges.
pub trait InstallerLauncher: Send + Sync {
    /// Launch `installer` elevated, without waiting for it to finish.
    ///
    /// # Errors
    ///
    /// Returns [`UpdaterError::Launch`] if the process could not be started,
    /// including when elevation is denied.
    fn launch_elevated(&self, installer: &Path) -> Result<()>;
}

/// Launcher backed by PowerShell on Windows.
pub struct ElevatedLauncher;

impl InstallerLauncher for ElevatedLauncher {
    fn launch_elevated(&self, installer: &Path) -> Result<()> {
        #[cfg(windows)]
        {
            launch_windows(installer)
        }
        #[cfg(not(windows))]
        {
            Err(UpdaterError::Launch(format!(
                "cannot start {}: elevated launch requires Windows",
                installer.display()
            )))
        }
    }
}

/// PowerShell command line that starts `installer` elevated.
pub fn elevation_command(installer: &Path) -> (&'static str, Vec<String>) {
    // PowerShell single-quoted strings escape a quote by doubling it.
    let quoted = installer.display().to_string().replace('\'', "''");
    (
        "powershell.exe",
        vec![
            "-NoProfile".into(),
            "-NonInteractive".into(),
            "-Command".into(),
            format!("$ErrorActionPreference = 'Stop'; Start-Process -FilePath '{quoted}' -Verb RunAs"),
        ],
    )
}

#[cfg(windows)]
fn launch_windows(installer: &Path) -> Result<()> {
    use std::process::{Command, Stdio};

    if !installer.is_file() {
        return Err(UpdaterError::Launch(format!(
            "installer {} does not exist",
            installer.display()
        )));
    }

    let (program, args) = elevation_command(installer);
    let output = Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| UpdaterError::Launch(format!("cannot run {program}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(UpdaterError::Launch(format!(
            "Start-Process failed (exit code {:?}): {}",
            output.status.code(),
            stderr.trim()
        )));
    }

    tracing::info!("Correctly opened BIOS upgrade executable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn elevation_command_requests_runas() {
        let (program, args) = elevation_command(Path::new(r"C:\Temp\BIOS\BIOS_A02.EXE"));
        assert_eq!(program, "powershell.exe");
        assert_eq!(args[0], "-NoProfile");
        let script = args.last().expect("script arg");
        assert!(script.contains(r"Start-Process -FilePath 'C:\Temp\BIOS\BIOS_A02.EXE'"));
        assert!(script.ends_with("-Verb RunAs"));
    }

    #[test]
    fn elevation_command_escapes_single_quotes() {
        let path = PathBuf::from("C:/Users/o'brien/BIOS_A02.EXE");
        let (_, args) = elevation_command(&path);
        assert!(args[3].contains("'C:/Users/o''brien/BIOS_A02.EXE'"));
    }

    #[cfg(not(windows))]
    #[test]
    fn launch_fails_off_windows() {
        let err = ElevatedLauncher
            .launch_elevated(Path::new("/tmp/BIOS_A02.EXE"))
            .unwrap_err();
        assert!(matches!(err, UpdaterError::Launch(_)));
    }
}
