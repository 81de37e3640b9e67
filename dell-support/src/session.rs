//! Trait definitions for the browser automation seam.
//!
//! The resolver only ever talks to a page through [`SupportSession`], so the
//! Chromium-backed implementation in [`crate::chrome`] can be swapped for a
//! scripted one in tests.

use crate::error::SupportError;
use std::future::Future;

/// A live browser page driven by the resolver.
///
/// Selectors are CSS selectors. Lookups wait for the element to render up to
/// an implementation-defined deadline before failing with
/// [`SupportError::Page`].
pub trait SupportSession: Send + Sync {
    /// Load `url` and wait for navigation to finish.
    fn navigate(&self, url: &str) -> impl Future<Output = Result<(), SupportError>> + Send;

    /// Wait for the first of `selectors` to be rendered and visible.
    ///
    /// Returns the index of the selector that matched, or `Ok(None)` if none
    /// became visible before the element wait elapsed.
    fn first_displayed(
        &self,
        selectors: &[&str],
    ) -> impl Future<Output = Result<Option<usize>, SupportError>> + Send;

    /// Click the element matching `selector`.
    fn click(&self, selector: &str) -> impl Future<Output = Result<(), SupportError>> + Send;

    /// Type `text` into the element matching `selector`.
    fn send_keys(
        &self,
        selector: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), SupportError>> + Send;

    /// Read attribute `name` of the element matching `selector`.
    fn attribute(
        &self,
        selector: &str,
        name: &str,
    ) -> impl Future<Output = Result<Option<String>, SupportError>> + Send;

    /// Tear the session down, releasing the browser process.
    fn close(self) -> impl Future<Output = Result<(), SupportError>> + Send
    where
        Self: Sized;
}

/// Opens new [`SupportSession`]s.
pub trait SessionFactory: Send + Sync {
    /// Session type produced by this factory.
    type Session: SupportSession;

    /// Start a browser and return a session on a blank page.
    fn open(&self) -> impl Future<Output = Result<Self::Session, SupportError>> + Send;
}
