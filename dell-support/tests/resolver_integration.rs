//! Integration tests for download-link resolution.
//!
//! A scripted [`SupportSession`] stands in for Chromium so every path through
//! the resolver (happy path, unreachable host, unknown service tag, step
//! retries) can be exercised without a browser or network access.

use dell_support::{
    resolve_latest, ConnectivityProbe, ResolveStep, SessionFactory, SupportConfig, SupportError,
    SupportSession,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Everything the fake browser was asked to do, in order.
#[derive(Default)]
struct Journal {
    calls: Vec<String>,
    opened: u32,
    closed: u32,
}

/// How the fake support site behaves.
#[derive(Clone, Default)]
struct Script {
    missing_tag: bool,
    /// Neither the alert nor the drivers tab renders in time.
    blank_page: bool,
    href: Option<String>,
    /// Number of leading failures per operation name.
    failures: HashMap<&'static str, u32>,
}

struct ScriptedSession {
    script: Script,
    journal: Arc<Mutex<Journal>>,
    remaining_failures: Mutex<HashMap<&'static str, u32>>,
}

impl ScriptedSession {
    fn record(&self, op: &'static str, detail: &str) -> Result<(), SupportError> {
        self.journal
            .lock()
            .expect("journal lock")
            .calls
            .push(format!("{op} {detail}"));

        let mut remaining = self.remaining_failures.lock().expect("failure lock");
        match remaining.get_mut(op) {
            Some(n) if *n > 0 => {
                *n -= 1;
                Err(SupportError::Page(format!("{op} on {detail} failed")))
            }
            _ => Ok(()),
        }
    }
}

impl SupportSession for ScriptedSession {
    async fn navigate(&self, url: &str) -> Result<(), SupportError> {
        self.record("navigate", url)
    }

    async fn first_displayed(&self, selectors: &[&str]) -> Result<Option<usize>, SupportError> {
        self.record("first_displayed", &selectors.join(" | "))?;
        let visible = if self.script.blank_page {
            None
        } else if self.script.missing_tag {
            selectors.iter().position(|s| s.contains("alert"))
        } else {
            selectors.iter().position(|s| s.starts_with("#tab-drivers"))
        };
        Ok(visible)
    }

    async fn click(&self, selector: &str) -> Result<(), SupportError> {
        self.record("click", selector)
    }

    async fn send_keys(&self, selector: &str, text: &str) -> Result<(), SupportError> {
        self.record("send_keys", &format!("{selector}={text}"))
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>, SupportError> {
        self.record("attribute", &format!("{selector}@{name}"))?;
        Ok(self.script.href.clone())
    }

    async fn close(self) -> Result<(), SupportError> {
        self.journal.lock().expect("journal lock").closed += 1;
        Ok(())
    }
}

struct ScriptedFactory {
    script: Script,
    journal: Arc<Mutex<Journal>>,
}

impl ScriptedFactory {
    fn new(script: Script) -> Self {
        Self {
            script,
            journal: Arc::new(Mutex::new(Journal::default())),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.journal.lock().expect("journal lock").calls.clone()
    }

    fn count(&self, op: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split(' ').next() == Some(op))
            .count()
    }

    fn opened(&self) -> u32 {
        self.journal.lock().expect("journal lock").opened
    }

    fn closed(&self) -> u32 {
        self.journal.lock().expect("journal lock").closed
    }
}

impl SessionFactory for ScriptedFactory {
    type Session = ScriptedSession;

    async fn open(&self) -> Result<ScriptedSession, SupportError> {
        self.journal.lock().expect("journal lock").opened += 1;
        Ok(ScriptedSession {
            script: self.script.clone(),
            journal: Arc::clone(&self.journal),
            remaining_failures: Mutex::new(self.script.failures.clone()),
        })
    }
}

struct FixedProbe {
    reachable: bool,
}

impl ConnectivityProbe for FixedProbe {
    async fn check(&self) -> Result<(), SupportError> {
        if self.reachable {
            Ok(())
        } else {
            Err(SupportError::Unreachable("downloads.dell.com:443 refused".into()))
        }
    }
}

const UP: FixedProbe = FixedProbe { reachable: true };

fn config() -> SupportConfig {
    SupportConfig {
        support_base_url: "https://support.test/servicetag/".into(),
        retry_delay_ms: 0,
        ..Default::default()
    }
}

fn script_with_link(href: &str) -> Script {
    Script {
        href: Some(href.to_owned()),
        ..Default::default()
    }
}

#[tokio::test]
async fn resolves_descriptor_and_walks_steps_in_order() {
    let factory = ScriptedFactory::new(script_with_link("https://host/path/BIOS_A02.EXE"));

    let download = resolve_latest("7RVSVL1", &config(), &UP, &factory)
        .await
        .expect("resolution succeeds");

    assert_eq!(download.file_name, "BIOS_A02.EXE");
    assert_eq!(download.version, "A02");
    assert_eq!(
        factory.calls(),
        vec![
            "navigate https://support.test/servicetag/7RVSVL1",
            "first_displayed .alert.alert-warning.alert-dismissable.ng-scope | #tab-drivers",
            "click #tab-drivers",
            "send_keys #ddlcategoryFilter=BIOS",
            "attribute .pointerCursor.text-blue.dellmetrics-driverdownloads.dld0@href",
        ]
    );
    assert_eq!(factory.opened(), 1);
    assert_eq!(factory.closed(), 1);
}

#[tokio::test]
async fn unreachable_host_never_opens_a_browser() {
    let factory = ScriptedFactory::new(script_with_link("https://host/path/BIOS_A02.EXE"));
    let probe = FixedProbe { reachable: false };

    let err = resolve_latest("7RVSVL1", &config(), &probe, &factory)
        .await
        .unwrap_err();

    assert!(matches!(err, SupportError::Unreachable(_)));
    assert_eq!(factory.opened(), 0);
    assert!(factory.calls().is_empty());
}

#[tokio::test]
async fn unknown_service_tag_stops_without_retry() {
    let factory = ScriptedFactory::new(Script {
        missing_tag: true,
        ..script_with_link("https://host/path/BIOS_A02.EXE")
    });

    let err = resolve_latest("0000000", &config(), &UP, &factory)
        .await
        .unwrap_err();

    assert!(matches!(err, SupportError::UnknownServiceTag(ref tag) if tag == "0000000"));
    assert_eq!(factory.count("navigate"), 1);
    assert_eq!(factory.count("click"), 0);
    assert_eq!(factory.closed(), 1);
}

#[tokio::test]
async fn unknown_tag_detected_in_single_landmark_wait() {
    let factory = ScriptedFactory::new(Script {
        missing_tag: true,
        ..Default::default()
    });

    let err = resolve_latest("0000000", &config(), &UP, &factory)
        .await
        .unwrap_err();

    assert!(matches!(err, SupportError::UnknownServiceTag(_)));
    // One wait covering both landmarks, never the drivers-tab click.
    assert_eq!(factory.count("first_displayed"), 1);
    assert_eq!(factory.count("click"), 0);
    assert_eq!(factory.count("attribute"), 0);
}

#[tokio::test]
async fn page_without_landmarks_falls_through_to_drivers_tab() {
    let factory = ScriptedFactory::new(Script {
        blank_page: true,
        ..script_with_link("https://host/path/BIOS_A02.EXE")
    });

    let download = resolve_latest("7RVSVL1", &config(), &UP, &factory)
        .await
        .expect("drivers tab still reachable");

    assert_eq!(download.version, "A02");
    assert_eq!(factory.count("click"), 1);
}

#[tokio::test]
async fn failing_step_is_retried_three_times_then_gives_up() {
    let mut script = script_with_link("https://host/path/BIOS_A02.EXE");
    script.failures.insert("click", u32::MAX);
    let factory = ScriptedFactory::new(script);

    let err = resolve_latest("7RVSVL1", &config(), &UP, &factory)
        .await
        .unwrap_err();

    match err {
        SupportError::RetriesExhausted { step, attempts, .. } => {
            assert_eq!(step, ResolveStep::OpenDriversTab);
            assert_eq!(attempts, 3);
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(factory.count("click"), 3);
    // Earlier steps are not repeated and later ones never run.
    assert_eq!(factory.count("navigate"), 1);
    assert_eq!(factory.count("send_keys"), 0);
    assert_eq!(factory.opened(), 1);
    assert_eq!(factory.closed(), 1);
}

#[tokio::test]
async fn transient_failures_recover_within_budget() {
    let mut script = script_with_link("https://host/path/NAME_1.2.3.EXE");
    script.failures.insert("navigate", 1);
    script.failures.insert("attribute", 2);
    let factory = ScriptedFactory::new(script);

    let download = resolve_latest("7RVSVL1", &config(), &UP, &factory)
        .await
        .expect("recovers");

    assert_eq!(download.version, "1.2.3");
    assert_eq!(factory.count("navigate"), 2);
    assert_eq!(factory.count("attribute"), 3);
    assert_eq!(factory.closed(), 1);
}

#[tokio::test]
async fn missing_href_exhausts_link_step() {
    let factory = ScriptedFactory::new(Script::default());

    let err = resolve_latest("7RVSVL1", &config(), &UP, &factory)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SupportError::RetriesExhausted {
            step: ResolveStep::ReadDownloadLink,
            ..
        }
    ));
    assert_eq!(factory.closed(), 1);
}

#[tokio::test]
async fn malformed_link_is_a_parse_error_and_session_still_closes() {
    let factory = ScriptedFactory::new(script_with_link("https://host/downloads/"));

    let err = resolve_latest("7RVSVL1", &config(), &UP, &factory)
        .await
        .unwrap_err();

    assert!(matches!(err, SupportError::Parse(_)));
    assert_eq!(factory.closed(), 1);
}

#[tokio::test]
#[ignore = "requires Chromium and network access to dell.com"]
async fn live_resolution_against_dell() {
    let config = SupportConfig::default();
    let result = dell_support::resolve_download_link("7RVSVL1", &config).await;
    assert!(result.is_ok(), "live resolution failed: {result:?}");
}
