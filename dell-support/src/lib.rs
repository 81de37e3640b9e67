//! # dell-support
//!
//! Finds the newest BIOS package Dell publishes for a given service tag.
//!
//! The support site renders its download list in the browser, so this
//! crate drives headless Chromium through the product page:
//!
//! - TCP reachability probe against the download host before anything else
//! - one browser session per resolution, always torn down
//! - an independent bounded retry around every page step
//! - download link parsed into file name and BIOS version
//!
//! The session sits behind [`SupportSession`] so resolution can be exercised
//! without a browser.

pub mod chrome;
pub mod config;
pub mod error;
pub mod probe;
pub mod resolver;
pub mod retry;
pub mod session;
pub mod types;

pub use chrome::{ChromeSession, ChromeSessionFactory};
pub use config::{PageSelectors, SupportConfig};
pub use error::{Result, SupportError};
pub use probe::{ConnectivityProbe, TcpProbe};
pub use resolver::resolve_latest;
pub use retry::RetryPolicy;
pub use session::{SessionFactory, SupportSession};
pub use types::{DownloadDescriptor, PageState, ResolveStep};

/// Resolve the latest BIOS download for `service_tag` using headless Chromium.
///
/// Convenience wrapper around [`resolve_latest`] with a [`TcpProbe`] and a
/// [`ChromeSessionFactory`] built from `config`.
///
/// # Errors
///
/// Same as [`resolve_latest`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> dell_support::Result<()> {
/// let config = dell_support::SupportConfig::default();
/// let download = dell_support::resolve_download_link("7RVSVL1", &config).await?;
/// println!("{} -> {}", download.version, download.url);
/// # Ok(())
/// # }
/// ```
pub async fn resolve_download_link(
    service_tag: &str,
    config: &SupportConfig,
) -> Result<DownloadDescriptor> {
    let probe = TcpProbe::from_config(config);
    let factory = ChromeSessionFactory::new(config);
    resolve_latest(service_tag, config, &probe, &factory).await
}
