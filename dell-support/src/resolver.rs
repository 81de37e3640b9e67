//! Latest-version and download-link resolution.
//!
//! ```text
//! probe ─► open session ─► support page ─► drivers tab ─► BIOS filter ─► link
//!   │                          │  (retry)       (retry)        (retry)    (retry)
//!   └ fatal                    └ unknown tag: fatal
//! ```
//!
//! The session is opened once and closed on every exit path.

use crate::config::SupportConfig;
use crate::error::SupportError;
use crate::probe::ConnectivityProbe;
use crate::retry::{with_retry, RetryPolicy};
use crate::session::{SessionFactory, SupportSession};
use crate::types::{DownloadDescriptor, PageState, ResolveStep};

/// Resolve the newest BIOS package for `service_tag`.
///
/// # Errors
///
/// - [`SupportError::Unreachable`] if the probe fails (no browser is started).
/// - [`SupportError::UnknownServiceTag`] if the site has no page for the tag.
/// - [`SupportError::RetriesExhausted`] if any page step keeps failing.
/// - [`SupportError::Browser`] if the browser cannot be started.
/// - [`SupportError::Parse`] if the link does not follow the package naming.
pub async fn resolve_latest<P, F>(
    service_tag: &str,
    config: &SupportConfig,
    probe: &P,
    factory: &F,
) -> Result<DownloadDescriptor, SupportError>
where
    P: ConnectivityProbe,
    F: SessionFactory,
{
    config.validate()?;

    if let Err(e) = probe.check().await {
        tracing::error!("Internet Connection check failed: {e}");
        return Err(e);
    }

    let session = factory.open().await?;
    let outcome = find_download_link(&session, service_tag, config).await;

    if let Err(e) = session.close().await {
        tracing::warn!("browser teardown failed: {e}");
    }

    let link = outcome?;
    tracing::info!("Retrieved machine specific BIOS link");
    DownloadDescriptor::from_url(&link)
}

/// Walk the support site and return the raw download link.
async fn find_download_link<S: SupportSession>(
    session: &S,
    service_tag: &str,
    config: &SupportConfig,
) -> Result<String, SupportError> {
    let policy = RetryPolicy::from_config(config);
    let selectors = &config.selectors;
    let category = config.category.as_str();
    let page_url = config.support_page_url(service_tag);
    let page_url = page_url.as_str();

    let state = with_retry(&policy, ResolveStep::OpenSupportPage, move |_| async move {
        session.navigate(page_url).await?;
        // Whichever renders first decides; the alert is injected after load.
        let landmarks = [
            selectors.missing_tag_alert.as_str(),
            selectors.drivers_tab.as_str(),
        ];
        match session.first_displayed(&landmarks).await? {
            Some(0) => Ok(PageState::UnknownServiceTag),
            _ => Ok(PageState::Ready),
        }
    })
    .await?;

    if state == PageState::UnknownServiceTag {
        tracing::error!("Service Tag {service_tag} does not exist on Dell's page");
        return Err(SupportError::UnknownServiceTag(service_tag.to_owned()));
    }

    with_retry(&policy, ResolveStep::OpenDriversTab, move |_| {
        session.click(&selectors.drivers_tab)
    })
    .await?;
    tracing::info!("Successfully loaded Drivers tab");

    with_retry(&policy, ResolveStep::FilterCategory, move |_| {
        session.send_keys(&selectors.category_filter, category)
    })
    .await?;
    tracing::info!("Successfully loaded {category} section");

    with_retry(&policy, ResolveStep::ReadDownloadLink, move |_| async move {
        session
            .attribute(&selectors.first_download_link, "href")
            .await?
            .filter(|href| !href.trim().is_empty())
            .ok_or_else(|| SupportError::Page("first download entry has no link".into()))
    })
    .await
}
