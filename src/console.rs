//! User-facing status lines and end-of-run pauses.
//!
//! The update flow only produces [`Status`] values; colouring and waiting
//! for the user happen here, in [`ConsolePresenter`].

use console::{Term, style};
use std::time::Duration;

/// How important a status line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Progress through the normal flow.
    Info,
    /// A step completed with the desired result.
    Success,
    /// Noteworthy but not an error (e.g. nothing to do).
    Notice,
    /// The run cannot continue.
    Error,
}

impl Severity {
    /// Short tag prefixed to the message.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Success => "OK",
            Self::Notice => "NOTE",
            Self::Error => "ERROR",
        }
    }
}

/// One line of user-facing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Severity of the message.
    pub severity: Severity,
    /// Message text.
    pub text: String,
}

impl Status {
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Severity::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(Severity::Success, text)
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Self::new(Severity::Notice, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Severity::Error, text)
    }

    fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }

    /// The message with its severity tag, e.g. `[ERROR] Upgrade failed`.
    pub fn tagged(&self) -> String {
        format!("[{}] {}", self.severity.tag(), self.text)
    }
}

/// Receives status lines from the update flow.
pub type StatusCallback = Box<dyn Fn(Status) + Send + Sync>;

/// What to do before the process exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// Exit right away.
    None,
    /// Keep the window open for a fixed time.
    Sleep(Duration),
    /// Wait until the user presses a key.
    KeyPress,
}

/// Prints coloured status lines to stdout.
#[derive(Debug, Clone)]
pub struct ConsolePresenter {
    term: Term,
    pauses_enabled: bool,
}

impl ConsolePresenter {
    /// Create a presenter. With `pauses_enabled` false every [`Pause`] is
    /// skipped, for unattended runs.
    pub fn new(pauses_enabled: bool) -> Self {
        Self {
            term: Term::stdout(),
            pauses_enabled,
        }
    }

    /// Colour a status line by severity.
    pub fn render(&self, status: &Status) -> String {
        let line = status.tagged();
        match status.severity {
            Severity::Info => style(line).cyan().to_string(),
            Severity::Success => style(line).green().to_string(),
            Severity::Notice => style(line).magenta().to_string(),
            Severity::Error => style(line).red().bold().to_string(),
        }
    }

    pub fn show(&self, status: &Status) {
        // Losing a console line must not abort the update.
        let _ = self.term.write_line(&self.render(status));
    }

    /// Wrap this presenter as a [`StatusCallback`].
    pub fn callback(&self) -> StatusCallback {
        let presenter = self.clone();
        Box::new(move |status| presenter.show(&status))
    }

    /// Hold the console open as requested.
    pub fn pause(&self, pause: Pause) {
        if !self.pauses_enabled {
            return;
        }
        match pause {
            Pause::None => {}
            Pause::Sleep(duration) => std::thread::sleep(duration),
            Pause::KeyPress => {
                if !self.term.is_term() {
                    return;
                }
                let _ = self.term.write_line("Press any key to close the program");
                let _ = self.term.read_key();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_prefixes_severity() {
        assert_eq!(
            Status::error("Upgrade failed").tagged(),
            "[ERROR] Upgrade failed"
        );
        assert_eq!(Status::info("Downloading BIOS").tagged(), "[INFO] Downloading BIOS");
        assert_eq!(Status::success("File Downloaded").tagged(), "[OK] File Downloaded");
        assert_eq!(Status::notice("Up to date").tagged(), "[NOTE] Up to date");
    }

    #[test]
    fn render_keeps_message_text() {
        let presenter = ConsolePresenter::new(false);
        let rendered = presenter.render(&Status::success("File Downloaded"));
        assert!(rendered.contains("[OK] File Downloaded"));
    }

    #[test]
    fn disabled_pauses_return_immediately() {
        let presenter = ConsolePresenter::new(false);
        let start = std::time::Instant::now();
        presenter.pause(Pause::Sleep(Duration::from_secs(5)));
        presenter.pause(Pause::KeyPress);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn callback_forwards_to_presenter() {
        let presenter = ConsolePresenter::new(false);
        let callback = presenter.callback();
        callback(Status::info("Loading Support Page"));
    }
}
