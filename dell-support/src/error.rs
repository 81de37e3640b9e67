//! Error types for the dell-support crate.
//!
//! Errors are split by how the resolver treats them: some end the run
//! immediately, the rest are retried by [`crate::retry::with_retry`] until
//! the attempt ceiling is reached.

use crate::types::ResolveStep;

/// Errors that can occur while resolving the latest BIOS download.
#[derive(Debug, thiserror::Error)]
pub enum SupportError {
    /// The vendor download host did not answer the connectivity probe.
    #[error("support site unreachable: {0}")]
    Unreachable(String),

    /// The support site has no product page for this service tag.
    #[error("no support page exists for service tag {0}")]
    UnknownServiceTag(String),

    /// The headless browser could not be started or crashed.
    #[error("browser error: {0}")]
    Browser(String),

    /// Navigation failed or an expected page element was missing.
    #[error("page error: {0}")]
    Page(String),

    /// A resolution step kept failing until the attempt ceiling was hit.
    #[error("{step} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// The step that gave up.
        step: ResolveStep,
        /// How many attempts were made.
        attempts: u32,
        /// Message of the final failure.
        last_error: String,
    },

    /// The download link could not be turned into a file name and version.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid support configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SupportError {
    /// Whether a failed step should be attempted again.
    ///
    /// Only transient browser and page failures are retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Browser(_) | Self::Page(_))
    }
}

/// Convenience type alias for dell-support results.
pub type Result<T> = std::result::Result<T, SupportError>;
