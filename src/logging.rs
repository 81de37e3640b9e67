//! Tracing setup: activity log file plus stderr diagnostics.
//!
//! Every INFO+ event from this workspace is appended to
//! `<scratch>/log.txt`, one line per event:
//!
//! ```text
//! 10/19/2026 3:04:05 PM: Successfully loaded Drivers tab.
//! ```
//!
//! Stderr gets a regular `tracing-subscriber` layer filtered by `RUST_LOG`.

use crate::bios_dirs::LOG_FILE_NAME;
use crate::error::{Result, UpdaterError};
use chrono::{DateTime, Local, TimeZone};
use std::path::Path;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Default stderr filter; chromiumoxide reports unknown CDP messages as errors.
const DEFAULT_CONSOLE_FILTER: &str = "bios_updater=warn,dell_support=warn,chromiumoxide=off";

/// `M/D/YYYY h:mm:ss AM` in the given zone.
pub fn generic_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-m/%-d/%Y %-I:%M:%S %p").to_string()
}

/// Formats events as `<timestamp>: <message>.` for the activity log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ActivityLogFormat;

impl<S, N> FormatEvent<S, N> for ActivityLogFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(writer, "{}: ", generic_timestamp(&Local::now()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer, ".")
    }
}

/// Targets written to the activity log.
fn activity_targets() -> Targets {
    Targets::new()
        .with_target("bios_updater", Level::INFO)
        .with_target("dell_support", Level::INFO)
}

/// Install the global subscriber.
///
/// The returned guard flushes the log file when dropped; keep it alive
/// until the process exits.
///
/// # Errors
///
/// Returns an error if the scratch directory cannot be created or a global
/// subscriber is already installed.
pub fn init(scratch_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(scratch_dir)?;

    let appender = tracing_appender::rolling::never(scratch_dir, LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .event_format(ActivityLogFormat)
        .with_filter(activity_targets());

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_CONSOLE_FILTER)),
        );

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| UpdaterError::Config(format!("cannot install logger: {e}")))?;

    Ok(guard)
}
