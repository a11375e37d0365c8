//! Tracing setup: a plain-text log file plus a console layer.
//!
//! The subscriber is installed with `set_default`, so it lives exactly as
//! long as the returned guard.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{Result, WrapErr};
use tracing::{Event, Subscriber};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::{self as fmt_layer, FmtContext};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, prelude::*};

use crate::commands::LogFormat;

/// Timestamp layout of the log file, e.g. `2025-03-14 09:26:53,120`.
const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Formats events as `<timestamp> - <LEVEL> - <message>`.
pub(crate) struct LogLine;

impl<S, N> FormatEvent<S, N> for LogLine
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            chrono::Local::now().format(LOG_TIMESTAMP_FORMAT),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Default filter directive for a verbosity count.
pub(crate) fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "pastewatch=info",
        1 => "pastewatch=debug",
        _ => "pastewatch=trace",
    }
}

/// Install the run's subscriber. `RUST_LOG` overrides the verbosity flag.
pub(crate) fn init_tracing(
    verbose: u8,
    log_format: &LogFormat,
    log_file: &Path,
) -> Result<DefaultGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .wrap_err_with(|| format!("cannot open log file {}", log_file.display()))?;

    let file_layer = fmt_layer::layer()
        .event_format(LogLine)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    let text_layer = matches!(log_format, LogFormat::Text).then(|| {
        fmt_layer::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });
    let json_layer = matches!(log_format, LogFormat::Json)
        .then(|| fmt_layer::layer().json().with_writer(std::io::stderr));

    let guard = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(text_layer)
        .with(json_layer)
        .set_default();

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::prelude::*;
    use uuid::Uuid;

    #[test]
    fn verbosity_maps_to_directive() {
        assert_eq!(default_directive(0), "pastewatch=info");
        assert_eq!(default_directive(1), "pastewatch=debug");
        assert_eq!(default_directive(5), "pastewatch=trace");
    }

    #[test]
    fn file_lines_use_dash_separated_layout() {
        let log_file = std::env::temp_dir().join(format!("pw_log_{}.log", Uuid::now_v7()));
        std::fs::write(&log_file, "earlier run\n").unwrap();

        let writer = Mutex::new(
            OpenOptions::new()
                .append(true)
                .open(&log_file)
                .unwrap(),
        );
        let subscriber = tracing_subscriber::registry().with(
            fmt_layer::layer()
                .event_format(LogLine)
                .with_ansi(false)
                .with_writer(writer),
        );

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Extracted 4 paste IDs from archive");
            tracing::error!(paste_id = "12345678", "Failed to fetch paste 12345678");
        });

        let content = std::fs::read_to_string(&log_file).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "earlier run");

        assert!(lines[1].ends_with(" - INFO - Extracted 4 paste IDs from archive"));
        assert!(lines[2].contains(" - ERROR - Failed to fetch paste 12345678"));
        assert!(lines[2].contains("paste_id=\"12345678\""));

        // `YYYY-MM-DD HH:MM:SS,mmm` prefix
        let stamp = lines[1].split(" - ").next().unwrap();
        assert_eq!(stamp.len(), 23);
        assert_eq!(&stamp[19..20], ",");

        let _ = std::fs::remove_file(&log_file);
    }

    #[test]
    fn init_tracing_appends_to_log_file_until_guard_drops() {
        let log_file = std::env::temp_dir().join(format!("pw_log_{}.log", Uuid::now_v7()));
        std::fs::write(&log_file, "earlier run\n").unwrap();

        let guard = init_tracing(0, &LogFormat::Text, &log_file).unwrap();
        tracing::info!("Starting Pastebin Keyword Crawler");
        tracing::debug!("hidden at default verbosity");
        drop(guard);
        tracing::info!("after the guard is gone");

        let content = std::fs::read_to_string(&log_file).unwrap();
        assert!(content.starts_with("earlier run\n"));
        assert!(content.contains(" - INFO - Starting Pastebin Keyword Crawler"));
        assert!(!content.contains("after the guard is gone"));
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(!content.contains("hidden at default verbosity"));
        }

        let _ = std::fs::remove_file(&log_file);
    }

    #[test]
    fn init_tracing_fails_for_unwritable_log_path() {
        let missing_dir = std::env::temp_dir().join(format!("pw_missing_{}", Uuid::now_v7()));
        let result = init_tracing(0, &LogFormat::Json, &missing_dir.join("pastebin_crawler.log"));
        assert!(result.is_err());
    }
}
