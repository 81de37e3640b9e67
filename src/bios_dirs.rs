//! Scratch directory paths for the updater.
//!
//! The installer and the activity log share one directory under the
//! platform temp dir, `<temp>/BIOS/`. Each run purges stale installers from
//! it before downloading.
//!
//! # Environment Overrides
//!
//! - `BIOS_UPDATER_DIR` overrides [`scratch_dir`]

use std::path::{Path, PathBuf};

/// Name of the append-only activity log inside the scratch directory.
pub const LOG_FILE_NAME: &str = "log.txt";

/// Scratch directory for downloads and the activity log.
///
/// Resolves to `std::env::temp_dir()/BIOS/` by default. Override with the
/// `BIOS_UPDATER_DIR` environment variable.
#[must_use]
pub fn scratch_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("BIOS_UPDATER_DIR") {
        return PathBuf::from(override_dir);
    }
    std::env::temp_dir().join("BIOS")
}

/// Activity log path inside `dir`.
#[must_use]
pub fn log_file(dir: &Path) -> PathBuf {
    dir.join(LOG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratch_dir_is_nonempty() {
        assert!(!scratch_dir().as_os_str().is_empty());
    }

    #[test]
    fn log_file_sits_in_dir() {
        let dir = PathBuf::from("/var/tmp/BIOS");
        assert_eq!(log_file(&dir), PathBuf::from("/var/tmp/BIOS/log.txt"));
    }

    #[test]
    fn scratch_dir_override_via_env() {
        let key = "BIOS_UPDATER_DIR";
        let original = std::env::var_os(key);

        // SAFETY: No other test in this crate reads or writes this variable.
        unsafe { std::env::set_var(key, "/custom/bios") };
        assert_eq!(scratch_dir(), PathBuf::from("/custom/bios"));

        unsafe { std::env::remove_var(key) };
        assert!(scratch_dir().ends_with("BIOS"));

        match original {
            Some(val) => unsafe { std::env::set_var(key, val) },
            None => unsafe { std::env::remove_var(key) },
        }
    }
}
