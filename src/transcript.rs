//! In-process host over captured terminal output: a buffer of text rows and
//! a provider table. Drives the engine from the command line and in tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use crate::error::Error;
use crate::host::{LinkHost, Registration, TerminalBuffer};
use crate::link::{LinkActions, ResolvedLink};
use crate::provider::LinkProvider;
use crate::types::MouseEvent;

/// Captured terminal output, one row per line.
#[derive(Debug, Default)]
pub struct Transcript {
    /// Row text; index 0 is row 1.
    lines: RefCell<Vec<String>>,
}

impl Transcript {
    /// Split captured text into rows.
    pub fn from_text(text: &str) -> Self {
        return Self {
            lines: RefCell::new(split_rows(text)),
        };
    }

    /// Read a transcript from disk.
    ///
    /// # Errors
    ///
    /// Returns `Error::TranscriptNotFound` if the file does not exist, or
    /// `Error::Io` if it cannot be read.
    pub fn load(path: &Path) -> Result<Self, Error> {
        return Ok(Self::from_text(&read_transcript(path)?));
    }

    /// Replace the buffer contents, as when the terminal redraws.
    pub fn replace(&self, text: &str) {
        *self.lines.borrow_mut() = split_rows(text);
    }

    /// Number of rows.
    pub fn line_count(&self) -> u32 {
        return u32::try_from(self.lines.borrow().len()).unwrap_or(u32::MAX);
    }
}

impl TerminalBuffer for Transcript {
    fn line_text(&self, row: u32) -> Option<String> {
        let index = usize::try_from(row.checked_sub(1)?).ok()?;
        return self.lines.borrow().get(index).cloned();
    }
}

/// Read a transcript file, mapping a missing file to its own error.
///
/// # Errors
///
/// Returns `Error::TranscriptNotFound` or `Error::Io`.
pub fn read_transcript(path: &Path) -> Result<String, Error> {
    return match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::TranscriptNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(Error::Io(e)),
    };
}

/// Rows of `text`, without line terminators.
fn split_rows(text: &str) -> Vec<String> {
    return text.lines().map(str::to_string).collect();
}

/// Provider table shared between the host and its registration handles.
type ProviderTable = Rc<RefCell<BTreeMap<u64, Rc<dyn LinkProvider>>>>;

/// A [`LinkHost`] that keeps its providers in memory and queries them on request.
#[derive(Default)]
pub struct TranscriptHost {
    /// Id handed to the next registration.
    next_id: RefCell<u64>,
    /// Registered providers by id, in registration order.
    providers: ProviderTable,
}

impl TranscriptHost {
    /// Links on `row` from every registered provider, in registration order.
    pub fn links_at(&self, row: u32) -> Vec<ResolvedLink> {
        let providers: Vec<Rc<dyn LinkProvider>> = self.providers.borrow().values().cloned().collect();
        return providers
            .iter()
            .filter_map(|provider| return provider.provide_links(row))
            .flatten()
            .collect();
    }

    /// Number of providers currently registered.
    pub fn provider_count(&self) -> usize {
        return self.providers.borrow().len();
    }
}

impl LinkHost for TranscriptHost {
    fn register_link_provider(&self, provider: Rc<dyn LinkProvider>) -> Box<dyn Registration> {
        let mut next_id = self.next_id.borrow_mut();
        let id = *next_id;
        *next_id = next_id.saturating_add(1);
        self.providers.borrow_mut().insert(id, provider);
        return Box::new(TranscriptRegistration {
            id,
            providers: Rc::clone(&self.providers),
        });
    }
}

/// Registration handle for a [`TranscriptHost`] provider.
struct TranscriptRegistration {
    /// Key in the provider table.
    id: u64,
    /// The host's provider table.
    providers: ProviderTable,
}

impl Registration for TranscriptRegistration {
    fn dispose(self: Box<Self>) {
        self.providers.borrow_mut().remove(&self.id);
    }
}

/// Collaborator that records link interactions as log events instead of
/// opening anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceActions;

impl LinkActions for TraceActions {
    fn hide_tooltip(&self) {
        tracing::debug!("hide tooltip");
    }

    fn open_url(&self, url: &str) {
        tracing::info!(url, "open url");
    }

    fn show_file_popover(&self, event: &MouseEvent, path: &str, line: Option<u32>) {
        tracing::info!(path, ?line, ?event, "show file popover");
    }

    fn show_tooltip(&self, _event: &MouseEvent, text: &str, hint: &str) {
        tracing::debug!(text, hint, "show tooltip");
    }
}
