//! Installed-versus-latest comparison.
//!
//! Dell version tokens mix schemes (`A21`, `1.9.0`), so the check is plain
//! string equality: any difference, older or newer, means an update.

use crate::firmware::FirmwareVersion;

/// Whether the machine needs the latest BIOS package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateDecision {
    /// The installed BIOS is the latest published one.
    AlreadyCurrent,
    /// The installed BIOS differs from the latest published one.
    UpdateRequired,
}

impl UpdateDecision {
    /// Compare the installed version with the latest one.
    pub fn evaluate(installed: &FirmwareVersion, latest: &FirmwareVersion) -> Self {
        if installed == latest {
            Self::AlreadyCurrent
        } else {
            Self::UpdateRequired
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> FirmwareVersion {
        FirmwareVersion::new(s)
    }

    #[test]
    fn equal_versions_are_current() {
        assert_eq!(
            UpdateDecision::evaluate(&v("A01"), &v("A01")),
            UpdateDecision::AlreadyCurrent
        );
        assert_eq!(
            UpdateDecision::evaluate(&v("1.2.3"), &v("1.2.3")),
            UpdateDecision::AlreadyCurrent
        );
    }

    #[test]
    fn newer_latest_requires_update() {
        assert_eq!(
            UpdateDecision::evaluate(&v("A01"), &v("A02")),
            UpdateDecision::UpdateRequired
        );
    }

    #[test]
    fn older_latest_also_requires_update() {
        assert_eq!(
            UpdateDecision::evaluate(&v("A05"), &v("A04")),
            UpdateDecision::UpdateRequired
        );
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert_eq!(
            UpdateDecision::evaluate(&v("a01"), &v("A01")),
            UpdateDecision::UpdateRequired
        );
    }
}
