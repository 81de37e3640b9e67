//! Core types for download resolution.

use crate::error::SupportError;
use std::fmt;
use url::Url;

/// Length of the installer extension (`.EXE`) trailing the version token.
const EXTENSION_LEN: usize = 4;

/// A resolved BIOS package: where to fetch it and what it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadDescriptor {
    /// Full download URL as published on the support page.
    pub url: String,
    /// Final path segment of the URL, used as the local file name.
    pub file_name: String,
    /// BIOS version encoded in the file name.
    pub version: String,
}

impl DownloadDescriptor {
    /// Build a descriptor from a download link.
    ///
    /// Dell names BIOS packages `<MODEL>_<VERSION>.EXE`, so the version is
    /// the token after the last underscore with the four-character
    /// extension removed. A file name without an underscore is treated as a
    /// single token.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Parse`] if the URL is invalid, has no file
    /// name, or the version token would be empty.
    pub fn from_url(url: &str) -> Result<Self, SupportError> {
        let parsed = Url::parse(url)
            .map_err(|e| SupportError::Parse(format!("invalid download URL {url}: {e}")))?;

        let file_name = parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| SupportError::Parse(format!("download URL has no file name: {url}")))?
            .to_owned();

        let version = version_from_file_name(&file_name)?;

        Ok(Self {
            url: url.to_owned(),
            file_name,
            version,
        })
    }
}

/// Extract the version token from a package file name.
///
/// # Errors
///
/// Returns [`SupportError::Parse`] when nothing is left after removing the
/// extension.
pub fn version_from_file_name(file_name: &str) -> Result<String, SupportError> {
    let token = file_name.rsplit('_').next().unwrap_or(file_name);
    let chars = token.chars().count();
    if chars <= EXTENSION_LEN {
        return Err(SupportError::Parse(format!(
            "file name {file_name} does not carry a version before its extension"
        )));
    }
    Ok(token.chars().take(chars - EXTENSION_LEN).collect())
}

/// One retryable stage of link resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolveStep {
    /// Load the per-machine support page and check that it exists.
    OpenSupportPage,
    /// Switch to the drivers and downloads view.
    OpenDriversTab,
    /// Narrow the downloads list to the BIOS category.
    FilterCategory,
    /// Read the link of the first download entry.
    ReadDownloadLink,
}

impl ResolveStep {
    /// Returns a human-readable description of this step.
    pub fn description(&self) -> &'static str {
        match self {
            Self::OpenSupportPage => "loading the support page",
            Self::OpenDriversTab => "opening the drivers tab",
            Self::FilterCategory => "filtering downloads to BIOS",
            Self::ReadDownloadLink => "reading the BIOS download link",
        }
    }
}

impl fmt::Display for ResolveStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// What the support page showed after navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// The product page loaded normally.
    Ready,
    /// The site displayed its "service tag not found" alert.
    UnknownServiceTag,
}
