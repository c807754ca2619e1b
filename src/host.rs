//! Boundary with the host terminal display.

use std::rc::Rc;

use crate::provider::LinkProvider;

/// Read access to the rendered text of the host's buffer.
pub trait TerminalBuffer {
    /// Text of a one-based buffer row, or `None` when the row has no content.
    fn line_text(&self, row: u32) -> Option<String>;
}

/// The host display's link-provider registration API.
pub trait LinkHost {
    /// Register a provider. The host calls it on demand, for example when
    /// the pointer moves over a row. Dropping the returned handle does not
    /// unregister; call [`Registration::dispose`].
    fn register_link_provider(&self, provider: Rc<dyn LinkProvider>) -> Box<dyn Registration>;
}

/// Handle returned by [`LinkHost::register_link_provider`].
pub trait Registration {
    /// Unregister the provider. Consumes the handle, so it runs at most once.
    fn dispose(self: Box<Self>);
}
