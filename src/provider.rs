//! Link providers: fetch a row, run the matchers, and assemble interactive links.
//!
//! Providers hold only their immutable configuration. Every call recomputes
//! the row's links from scratch; nothing is cached between renders.

use std::rc::Rc;

use crate::host::TerminalBuffer;
use crate::link::{LinkActions, ResolvedLink};
use crate::matcher;
use crate::path;
use crate::platform::Platform;
use crate::range;
use crate::remote::RemoteBase;
use crate::types::{LinkCandidate, LinkCategory, LinkTarget};

/// Reference categories in scan order.
const REFERENCE_CATEGORIES: [LinkCategory; 3] = [
    LinkCategory::CrossRepoIssueRef,
    LinkCategory::IssueRef,
    LinkCategory::CommitSha,
];

/// Something the host can ask for the links on one row.
pub trait LinkProvider {
    /// Links on a one-based buffer row, or `None` when there are none
    /// (including rows without content). Never fails.
    fn provide_links(&self, row: u32) -> Option<Vec<ResolvedLink>>;
}

/// What to do when candidates from different patterns cover the same text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// Emit every candidate, overlapping or not.
    #[default]
    KeepAll,
    /// Keep the candidate from the earlier pattern and drop later ones that
    /// intersect it.
    PreferFirst,
}

/// Construction-time configuration shared by the providers of one view.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Navigation and tooltip collaborator.
    actions: Rc<dyn LinkActions>,
    /// Source of row text.
    buffer: Rc<dyn TerminalBuffer>,
    /// How overlapping candidates are handled.
    overlap: OverlapPolicy,
    /// Platform override; detected at resolution time when `None`.
    platform: Option<Platform>,
    /// Repository web base for commit and issue links.
    remote: Option<RemoteBase>,
    /// Directory relative paths are resolved against.
    working_dir: String,
}

impl ProviderConfig {
    /// Configuration with no remote, no platform override, and `KeepAll`.
    pub fn new(
        buffer: Rc<dyn TerminalBuffer>,
        actions: Rc<dyn LinkActions>,
        working_dir: impl Into<String>,
    ) -> Self {
        return Self {
            actions,
            buffer,
            overlap: OverlapPolicy::default(),
            platform: None,
            remote: None,
            working_dir: working_dir.into(),
        };
    }

    /// Set the overlap policy.
    #[must_use]
    pub fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        return self;
    }

    /// Pin the platform instead of detecting it.
    #[must_use]
    pub fn with_platform(mut self, platform: Option<Platform>) -> Self {
        self.platform = platform;
        return self;
    }

    /// Set the repository web base; enables reference links.
    #[must_use]
    pub fn with_remote(mut self, remote: Option<RemoteBase>) -> Self {
        self.remote = remote;
        return self;
    }

    /// The configured repository web base, if any.
    pub const fn remote(&self) -> Option<&RemoteBase> {
        return self.remote.as_ref();
    }

    /// The directory relative paths resolve against.
    pub fn working_dir(&self) -> &str {
        return &self.working_dir;
    }

    /// Platform in effect right now.
    fn platform(&self) -> Platform {
        return self.platform.unwrap_or_else(Platform::detect);
    }

    /// Non-empty text of `row`.
    fn line(&self, row: u32) -> Option<String> {
        return self.buffer.line_text(row).filter(|text| return !text.trim().is_empty());
    }

    /// Wrap a candidate and its resolved target into a link.
    fn link(&self, line: &str, candidate: LinkCandidate, row: u32, platform: Platform, target: LinkTarget) -> ResolvedLink {
        let range = range::link_range(line, &candidate, row);
        return ResolvedLink::new(
            Rc::clone(&self.actions),
            candidate.category,
            platform,
            range,
            target,
            candidate.raw_text,
        );
    }
}

/// File path links: all four path shapes, resolved against the working directory.
pub struct FileLinkProvider {
    /// Immutable configuration.
    config: ProviderConfig,
}

impl FileLinkProvider {
    /// Build a provider over `config`.
    pub const fn new(config: ProviderConfig) -> Self {
        return Self { config };
    }
}

impl LinkProvider for FileLinkProvider {
    fn provide_links(&self, row: u32) -> Option<Vec<ResolvedLink>> {
        let line = self.config.line(row)?;
        let candidates = apply_overlap_policy(matcher::file_paths(&line), self.config.overlap);
        let platform = self.config.platform();

        let links = candidates
            .into_iter()
            .map(|candidate| {
                let parsed = matcher::parse_file_reference(&candidate.raw_text);
                let target = LinkTarget::File {
                    column: parsed.column,
                    line: parsed.line,
                    path: path::resolve_path(&parsed.path, &self.config.working_dir, platform),
                };
                return self.config.link(&line, candidate, row, platform, target);
            })
            .collect();

        return finish(links, row, "file");
    }
}

/// Commit, issue, and cross-repository issue links. Without a remote base
/// it reports no links and does not scan.
pub struct ReferenceLinkProvider {
    /// Immutable configuration.
    config: ProviderConfig,
}

impl ReferenceLinkProvider {
    /// Build a provider over `config`.
    pub const fn new(config: ProviderConfig) -> Self {
        return Self { config };
    }
}

impl LinkProvider for ReferenceLinkProvider {
    fn provide_links(&self, row: u32) -> Option<Vec<ResolvedLink>> {
        let remote = self.config.remote.as_ref()?;
        let line = self.config.line(row)?;
        let candidates = apply_overlap_policy(
            REFERENCE_CATEGORIES
                .iter()
                .flat_map(|category| return matcher::matches(*category, &line)),
            self.config.overlap,
        );
        let platform = self.config.platform();

        let links = candidates
            .into_iter()
            .filter_map(|candidate| {
                let url = remote.url_for(&candidate)?;
                return Some(self.config.link(&line, candidate, row, platform, LinkTarget::Url(url)));
            })
            .collect();

        return finish(links, row, "reference");
    }
}

/// Apply `policy` to candidates arriving in pattern priority order.
fn apply_overlap_policy(candidates: impl Iterator<Item = LinkCandidate>, policy: OverlapPolicy) -> Vec<LinkCandidate> {
    return match policy {
        OverlapPolicy::KeepAll => candidates.collect(),
        OverlapPolicy::PreferFirst => {
            let mut kept: Vec<LinkCandidate> = Vec::new();
            for candidate in candidates {
                if !kept.iter().any(|accepted| return accepted.overlaps(&candidate)) {
                    kept.push(candidate);
                }
            }
            kept
        },
    };
}

/// Order links left to right; an empty list becomes "no links".
fn finish(mut links: Vec<ResolvedLink>, row: u32, provider: &'static str) -> Option<Vec<ResolvedLink>> {
    links.sort_by_key(|link| return link.range().start_column);
    tracing::trace!(provider, row, count = links.len(), "provided links");
    if links.is_empty() {
        return None;
    }
    return Some(links);
}
