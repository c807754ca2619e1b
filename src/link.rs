//! Resolved links and the collaborator interface they delegate to.

use std::fmt;
use std::rc::Rc;

use crate::platform::Platform;
use crate::types::{LinkCategory, LinkRange, LinkTarget, MouseEvent};

/// Navigation and tooltip collaborators. The engine calls these with
/// already-resolved data and never navigates on its own.
pub trait LinkActions {
    /// Hide any tooltip shown by `show_tooltip`.
    fn hide_tooltip(&self);

    /// Open a fully qualified URL.
    fn open_url(&self, url: &str);

    /// Show the file popover for an absolute path, optionally at a line.
    fn show_file_popover(&self, event: &MouseEvent, path: &str, line: Option<u32>);

    /// Show a tooltip with the link target and a modifier hint.
    fn show_tooltip(&self, event: &MouseEvent, text: &str, hint: &str);
}

/// One interactive link region handed back to the host for a single render.
///
/// Immutable once built. Equality compares category, range, text, platform,
/// and target; the collaborator handle is not part of a link's value.
#[derive(Clone)]
pub struct ResolvedLink {
    /// Collaborator that receives activate/hover/leave.
    actions: Rc<dyn LinkActions>,
    /// Matcher family that produced this link.
    category: LinkCategory,
    /// Platform whose modifier gates activation.
    platform: Platform,
    /// Cells covered by the link.
    range: LinkRange,
    /// Resolved destination.
    target: LinkTarget,
    /// The text as it appears in the terminal.
    text: String,
}

impl ResolvedLink {
    /// Assemble a link from its resolved parts.
    pub fn new(
        actions: Rc<dyn LinkActions>,
        category: LinkCategory,
        platform: Platform,
        range: LinkRange,
        target: LinkTarget,
        text: String,
    ) -> Self {
        return Self {
            actions,
            category,
            platform,
            range,
            target,
            text,
        };
    }

    /// Hand the target to the navigation collaborator, but only when the
    /// platform modifier (Cmd on macOS, Ctrl elsewhere) is held.
    pub fn activate(&self, event: &MouseEvent) {
        if !self.platform.modifier_held(event) {
            tracing::trace!(text = %self.text, "link activation ignored without modifier");
            return;
        }
        match &self.target {
            LinkTarget::File { path, line, .. } => self.actions.show_file_popover(event, path, *line),
            LinkTarget::Url(url) => self.actions.open_url(url),
        }
    }

    /// Show the target and the modifier hint.
    pub fn hover(&self, event: &MouseEvent) {
        self.actions.show_tooltip(event, &self.target.to_string(), self.platform.modifier_hint());
    }

    /// Hide the tooltip.
    pub fn leave(&self) {
        self.actions.hide_tooltip();
    }

    /// Matcher family that produced this link.
    pub const fn category(&self) -> LinkCategory {
        return self.category;
    }

    /// Cells covered by the link.
    pub const fn range(&self) -> LinkRange {
        return self.range;
    }

    /// Resolved destination.
    pub const fn target(&self) -> &LinkTarget {
        return &self.target;
    }

    /// The linked text as displayed.
    pub fn text(&self) -> &str {
        return &self.text;
    }
}

impl PartialEq for ResolvedLink {
    fn eq(&self, other: &Self) -> bool {
        return self.category == other.category
            && self.platform == other.platform
            && self.range == other.range
            && self.target == other.target
            && self.text == other.text;
    }
}

impl Eq for ResolvedLink {}

impl fmt::Debug for ResolvedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("ResolvedLink")
            .field("category", &self.category)
            .field("platform", &self.platform)
            .field("range", &self.range)
            .field("target", &self.target)
            .field("text", &self.text)
            .finish_non_exhaustive();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
    }

    impl LinkActions for Recorder {
        fn hide_tooltip(&self) {
            self.calls.borrow_mut().push("hide".to_string());
        }

        fn open_url(&self, url: &str) {
            self.calls.borrow_mut().push(format!("open {url}"));
        }

        fn show_file_popover(&self, _event: &MouseEvent, path: &str, line: Option<u32>) {
            self.calls.borrow_mut().push(format!("popover {path} {line:?}"));
        }

        fn show_tooltip(&self, _event: &MouseEvent, text: &str, hint: &str) {
            self.calls.borrow_mut().push(format!("tooltip {text} | {hint}"));
        }
    }

    fn url_link(recorder: &Rc<Recorder>, platform: Platform) -> ResolvedLink {
        ResolvedLink::new(
            recorder.clone(),
            LinkCategory::IssueRef,
            platform,
            LinkRange { end_column: 3, row: 1, start_column: 1 },
            LinkTarget::Url("https://github.com/o/r/issues/42".to_string()),
            "#42".to_string(),
        )
    }

    #[test]
    fn activation_requires_platform_modifier() {
        let recorder = Rc::new(Recorder::default());
        let link = url_link(&recorder, Platform::MacOs);

        link.activate(&MouseEvent { ctrl_key: true, meta_key: false });
        assert!(recorder.calls.borrow().is_empty());

        link.activate(&MouseEvent { ctrl_key: false, meta_key: true });
        assert_eq!(*recorder.calls.borrow(), vec!["open https://github.com/o/r/issues/42"]);
    }

    #[test]
    fn file_activation_passes_line() {
        let recorder = Rc::new(Recorder::default());
        let link = ResolvedLink::new(
            recorder.clone(),
            LinkCategory::FilePath,
            Platform::Linux,
            LinkRange { end_column: 9, row: 1, start_column: 1 },
            LinkTarget::File { column: Some(2), line: Some(7), path: "/w/a.rs".to_string() },
            "a.rs:7:2".to_string(),
        );
        link.activate(&MouseEvent { ctrl_key: true, meta_key: false });
        assert_eq!(*recorder.calls.borrow(), vec!["popover /w/a.rs Some(7)"]);
    }

    #[test]
    fn hover_and_leave_drive_tooltip() {
        let recorder = Rc::new(Recorder::default());
        let link = url_link(&recorder, Platform::Linux);
        link.hover(&MouseEvent::default());
        link.leave();
        assert_eq!(
            *recorder.calls.borrow(),
            vec!["tooltip https://github.com/o/r/issues/42 | Ctrl+Click to open", "hide"]
        );
    }

    #[test]
    fn equality_ignores_collaborator() {
        let first = url_link(&Rc::new(Recorder::default()), Platform::Linux);
        let second = url_link(&Rc::new(Recorder::default()), Platform::Linux);
        assert_eq!(first, second);
    }
}
