//! Support-site configuration with compiled-in defaults.
//!
//! [`SupportConfig`] holds the vendor URLs, page selectors, and retry limits.
//! Nothing is read from disk; callers override fields directly.

use crate::error::SupportError;
use std::time::Duration;

/// CSS selectors for the elements the resolver interacts with.
#[derive(Debug, Clone)]
pub struct PageSelectors {
    /// Alert shown when the service tag has no product page.
    pub missing_tag_alert: String,
    /// Tab that switches to the drivers and downloads view.
    pub drivers_tab: String,
    /// Category dropdown of the downloads list.
    pub category_filter: String,
    /// First download entry after filtering.
    pub first_download_link: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            missing_tag_alert: ".alert.alert-warning.alert-dismissable.ng-scope".into(),
            drivers_tab: "#tab-drivers".into(),
            category_filter: "#ddlcategoryFilter".into(),
            first_download_link: ".pointerCursor.text-blue.dellmetrics-driverdownloads.dld0"
                .into(),
        }
    }
}

/// Configuration for resolving the latest BIOS download.
#[derive(Debug, Clone)]
pub struct SupportConfig {
    /// Support page URL prefix; the service tag is appended.
    pub support_base_url: String,
    /// Host probed before any browser work.
    pub probe_host: String,
    /// TCP port probed on `probe_host`.
    pub probe_port: u16,
    /// Connectivity probe timeout in milliseconds.
    pub probe_timeout_ms: u64,
    /// How long element lookups wait for the page to render, in seconds.
    pub element_wait_secs: u64,
    /// Attempts per resolution step before giving up.
    pub max_attempts: u32,
    /// Pause between attempts in milliseconds.
    pub retry_delay_ms: u64,
    /// Text typed into the category filter.
    pub category: String,
    /// Browser viewport `(width, height)`.
    pub window_size: (u32, u32),
    /// Run the browser without a visible window.
    pub headless: bool,
    /// Page element selectors.
    pub selectors: PageSelectors,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            support_base_url:
                "https://www.dell.com/support/home/us/en/04/product-support/servicetag/".into(),
            probe_host: "downloads.dell.com".into(),
            probe_port: 443,
            probe_timeout_ms: 1000,
            element_wait_secs: 5,
            max_attempts: 3,
            retry_delay_ms: 1000,
            category: "BIOS".into(),
            window_size: (1280, 720),
            headless: true,
            selectors: PageSelectors::default(),
        }
    }
}

impl SupportConfig {
    /// Support page URL for one service tag.
    pub fn support_page_url(&self, service_tag: &str) -> String {
        format!("{}{service_tag}", self.support_base_url)
    }

    /// Connectivity probe timeout.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Element lookup deadline.
    pub fn element_wait(&self) -> Duration {
        Duration::from_secs(self.element_wait_secs)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    pub fn validate(&self) -> Result<(), SupportError> {
        if self.max_attempts == 0 {
            return Err(SupportError::Config(
                "max_attempts must be greater than 0".into(),
            ));
        }
        if self.probe_timeout_ms == 0 {
            return Err(SupportError::Config(
                "probe_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.support_base_url.trim().is_empty() {
            return Err(SupportError::Config(
                "support_base_url must not be empty".into(),
            ));
        }
        if self.probe_host.trim().is_empty() {
            return Err(SupportError::Config("probe_host must not be empty".into()));
        }
        let s = &self.selectors;
        if [
            &s.missing_tag_alert,
            &s.drivers_tab,
            &s.category_filter,
            &s.first_download_link,
        ]
        .iter()
        .any(|sel| sel.trim().is_empty())
        {
            return Err(SupportError::Config(
                "page selectors must not be empty".into(),
            ));
        }
        Ok(())
    }
}
