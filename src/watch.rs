//! Transcript follower: prints links as rows are appended to a captured
//! terminal log.

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::commands::{self, LinkReport, OutputFormat, Session};
use crate::config::Config;
use crate::error::Error;
use crate::transcript;

/// Debounce delay between filesystem events and re-scan.
const DEBOUNCE_MS: u64 = 100;

/// Tracks how much of a growing transcript has already been reported.
pub struct Tail {
    /// Complete rows already reported.
    reported_rows: u32,
    /// Providers mounted over the transcript.
    session: Session,
}

impl Tail {
    /// Mount providers over an empty transcript.
    ///
    /// # Errors
    ///
    /// Returns errors from building the provider configuration.
    pub fn open(config: &Config) -> Result<Self, Error> {
        return Ok(Self {
            reported_rows: 0,
            session: Session::open(config, "")?,
        });
    }

    /// Take the current transcript text and return links on complete rows
    /// not reported yet. A trailing row without a newline is still being
    /// written and waits for the next update. A shrunken transcript was
    /// truncated or rotated, so it is reported again from the top.
    pub fn update(&mut self, text: &str) -> Vec<LinkReport> {
        self.session.transcript().replace(text);
        let complete = complete_rows(text);
        if complete < self.reported_rows {
            tracing::debug!(complete, reported = self.reported_rows, "transcript shrank, rescanning");
            self.reported_rows = 0;
        }

        let first = self.reported_rows.saturating_add(1);
        let reports = self.session.reports(first..=complete);
        self.reported_rows = complete;
        return reports;
    }

    /// Unregister the providers.
    pub fn close(self) {
        self.session.close();
    }
}

/// Number of newline-terminated rows in `text`.
fn complete_rows(text: &str) -> u32 {
    let count = text.bytes().filter(|byte| return *byte == b'\n').count();
    return u32::try_from(count).unwrap_or(u32::MAX);
}

/// Create a filesystem watcher that signals changes to `file_name` on the given channel.
///
/// # Errors
///
/// Returns `Error::WatchFailed` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<()>,
    file_name: OsString,
) -> Result<notify::RecommendedWatcher, Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_) | notify::EventKind::Modify(_) | notify::EventKind::Remove(_)
            )
            && event
                .paths
                .iter()
                .any(|path| return path.file_name() == Some(file_name.as_os_str()))
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return Error::WatchFailed {
            reason: format!("watcher setup failed: {e}"),
        };
    });
}

/// Print a batch of reports, skipping empty batches.
///
/// # Errors
///
/// Returns `Error::Json` if JSON serialization fails.
fn print_reports(reports: &[LinkReport], format: OutputFormat) -> Result<(), Error> {
    if reports.is_empty() {
        return Ok(());
    }
    print!("{}", commands::render_reports(reports, format)?);
    return Ok(());
}

/// Entry point for the watch command.
///
/// Prints links in the transcript as it is now, then follows the file and
/// prints links on newly appended rows until interrupted.
///
/// # Errors
///
/// Returns errors from reading the transcript, building the providers,
/// or watcher setup.
pub fn run(config: &Config, file: &Path, format: OutputFormat) -> Result<(), Error> {
    let mut tail = Tail::open(config)?;
    print_reports(&tail.update(&transcript::read_transcript(file)?), format)?;

    let file_name = file.file_name().map(OsString::from).ok_or_else(|| {
        return Error::WatchFailed {
            reason: format!("`{}` does not name a file", file.display()),
        };
    })?;
    let dir = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) | None => Path::new("."),
    };

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx, file_name)?;
    watcher.watch(dir, RecursiveMode::NonRecursive).map_err(|e| {
        return Error::WatchFailed {
            reason: format!("cannot watch `{}`: {e}", dir.display()),
        };
    })?;

    eprintln!("watch: following {}, press Ctrl+C to stop", file.display());

    while rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        match transcript::read_transcript(file) {
            Ok(text) => print_reports(&tail.update(&text), format)?,
            Err(Error::TranscriptNotFound { .. }) => {
                tracing::debug!(file = %file.display(), "transcript removed, waiting for it to return");
            },
            Err(e) => return Err(e),
        }
    }

    tail.close();
    return Ok(());
}
