//! Headless Chromium implementation of [`SupportSession`].
//!
//! The support site renders its driver list client-side, so plain HTTP
//! scraping sees an empty shell. Pages are driven over CDP with
//! `chromiumoxide` instead.

use crate::config::SupportConfig;
use crate::error::SupportError;
use crate::session::{SessionFactory, SupportSession};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use futures::StreamExt;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Extra Chromium flags: no GPU, no extensions, quiet diagnostics.
const BROWSER_ARGS: &[&str] = &[
    "--disable-gpu",
    "--disable-extensions",
    "--log-level=3",
    "--silent",
];

/// Delay between element lookups while waiting for a render.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How long teardown waits for the Chromium process to exit.
const EXIT_WAIT: Duration = Duration::from_secs(10);

/// Launches headless Chromium sessions.
#[derive(Debug, Clone)]
pub struct ChromeSessionFactory {
    config: SupportConfig,
}

impl ChromeSessionFactory {
    /// Create a factory using the browser settings from `config`.
    pub fn new(config: &SupportConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn browser_config(&self) -> Result<BrowserConfig, SupportError> {
        let (width, height) = self.config.window_size;
        let mut builder = BrowserConfig::builder()
            .window_size(width, height)
            .args(BROWSER_ARGS.iter().copied());
        if !self.config.headless {
            builder = builder.with_head();
        }
        builder
            .build()
            .map_err(|e| SupportError::Browser(format!("invalid browser configuration: {e}")))
    }
}

impl SessionFactory for ChromeSessionFactory {
    type Session = ChromeSession;

    async fn open(&self) -> Result<ChromeSession, SupportError> {
        let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|e| SupportError::Browser(format!("failed to launch Chromium: {e}")))?;

        // The CDP handler must be polled for the browser to make progress.
        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let closed = browser.close().await.is_ok();
                reap(&mut browser, closed, EXIT_WAIT).await;
                handler.abort();
                return Err(SupportError::Browser(format!("failed to open page: {e}")));
            }
        };

        tracing::debug!("Chromium session started");
        Ok(ChromeSession {
            browser,
            page,
            handler,
            element_wait: self.config.element_wait(),
        })
    }
}

/// One Chromium process with a single page.
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    element_wait: Duration,
}

impl ChromeSession {
    /// Poll for `selector` until it appears or the element wait elapses.
    async fn find(&self, selector: &str) -> Result<Element, SupportError> {
        let deadline = Instant::now() + self.element_wait;
        loop {
            match self.page.find_element(selector).await {
                Ok(element) => return Ok(element),
                Err(e) if Instant::now() >= deadline => {
                    return Err(SupportError::Page(format!(
                        "element {selector} not found: {e}"
                    )));
                }
                Err(_) => {}
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Evaluate a [`visibility_script`] once.
    async fn visible_index(&self, script: &str) -> Result<Option<usize>, SupportError> {
        let index = self
            .page
            .evaluate(script.to_owned())
            .await
            .map_err(|e| SupportError::Page(format!("visibility check failed: {e}")))?
            .into_value::<i64>()
            .map_err(|e| SupportError::Page(format!("unexpected visibility result: {e}")))?;
        Ok(usize::try_from(index).ok())
    }
}

/// Page script returning the index of the first visible match among
/// `selectors`, or -1.
///
/// Visible means the element has layout boxes, so fixed-position alerts
/// count while `display: none` elements do not.
fn visibility_script(selectors: &[&str]) -> Result<String, SupportError> {
    let quoted = serde_json::to_string(selectors)
        .map_err(|e| SupportError::Page(format!("cannot quote selectors {selectors:?}: {e}")))?;
    Ok(format!(
        "(() => {{ const selectors = {quoted}; \
         for (let i = 0; i < selectors.length; i++) {{ \
         const el = document.querySelector(selectors[i]); \
         if (el && el.getClientRects().length > 0) return i; }} \
         return -1; }})()"
    ))
}

/// Run `check` every `interval` until it reports a match or `wait` elapses.
///
/// Errors from `check` end the wait immediately.
async fn poll_until_visible<F, Fut>(
    wait: Duration,
    interval: Duration,
    mut check: F,
) -> Result<Option<usize>, SupportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<usize>, SupportError>>,
{
    let deadline = Instant::now() + wait;
    loop {
        if let Some(index) = check().await? {
            return Ok(Some(index));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        tokio::time::sleep(interval).await;
    }
}

/// The OS process behind a browser, as seen by teardown.
trait BrowserProcess {
    /// Kill the process without asking.
    fn terminate(&mut self) -> impl Future<Output = std::io::Result<()>> + Send;

    /// Wait for the process to exit.
    fn wait_exit(&mut self) -> impl Future<Output = std::io::Result<()>> + Send;
}

impl BrowserProcess for Browser {
    async fn terminate(&mut self) -> std::io::Result<()> {
        // `None` means there is no child process left to kill.
        Browser::kill(self).await.unwrap_or(Ok(()))
    }

    async fn wait_exit(&mut self) -> std::io::Result<()> {
        Browser::wait(self).await.map(|_| ())
    }
}

/// Make sure the browser process is gone.
///
/// After a failed graceful close the CDP connection may be dead, so the
/// process is killed first. The exit wait is bounded by `exit_wait`; a
/// process still running after that is killed.
async fn reap<P: BrowserProcess>(process: &mut P, closed_cleanly: bool, exit_wait: Duration) {
    if !closed_cleanly {
        if let Err(e) = process.terminate().await {
            tracing::warn!("failed to kill Chromium: {e}");
        }
    }

    let exited = tokio::time::timeout(exit_wait, process.wait_exit()).await;
    match exited {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!("waiting for Chromium to exit failed: {e}"),
        Err(_) => {
            tracing::warn!("Chromium still running after {exit_wait:?}, killing it");
            if let Err(e) = process.terminate().await {
                tracing::warn!("failed to kill Chromium: {e}");
            }
        }
    }
}

impl SupportSession for ChromeSession {
    async fn navigate(&self, url: &str) -> Result<(), SupportError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| SupportError::Page(format!("navigation to {url} failed: {e}")))?;
        Ok(())
    }

    async fn first_displayed(&self, selectors: &[&str]) -> Result<Option<usize>, SupportError> {
        let script = visibility_script(selectors)?;
        let script = script.as_str();
        poll_until_visible(self.element_wait, POLL_INTERVAL, move || {
            self.visible_index(script)
        })
        .await
    }

    async fn click(&self, selector: &str) -> Result<(), SupportError> {
        let element = self.find(selector).await?;
        element
            .click()
            .await
            .map_err(|e| SupportError::Page(format!("click on {selector} failed: {e}")))?;
        Ok(())
    }

    async fn send_keys(&self, selector: &str, text: &str) -> Result<(), SupportError> {
        let element = self.find(selector).await?;
        element
            .focus()
            .await
            .map_err(|e| SupportError::Page(format!("focus on {selector} failed: {e}")))?
            .type_str(text)
            .await
            .map_err(|e| SupportError::Page(format!("typing into {selector} failed: {e}")))?;
        Ok(())
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>, SupportError> {
        let element = self.find(selector).await?;
        element
            .attribute(name)
            .await
            .map_err(|e| SupportError::Page(format!("reading {name} of {selector} failed: {e}")))
    }

    async fn close(self) -> Result<(), SupportError> {
        let Self {
            mut browser,
            handler,
            ..
        } = self;

        let closed = browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| SupportError::Browser(format!("failed to close Chromium: {e}")));
        reap(&mut browser, closed.is_ok(), EXIT_WAIT).await;
        handler.abort();

        tracing::debug!("Chromium session closed");
        closed
    }
}
