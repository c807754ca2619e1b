/// Core domain types for link detection: categories, candidates, ranges, targets.
use std::fmt;

/// The matcher family that produced a candidate. Closed set: every
/// dispatch on it is an exhaustive `match`.
/// Serialized names match [`LinkCategory::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum LinkCategory {
    /// Hexadecimal commit identifier such as `a1b2c3d`.
    #[serde(rename = "commit")]
    CommitSha,
    /// Issue in another repository, written `org/repo#42`.
    #[serde(rename = "cross-repo-issue")]
    CrossRepoIssueRef,
    /// File path, optionally followed by `:line[:column]`.
    #[serde(rename = "file")]
    FilePath,
    /// Issue in the configured repository, written `#42`.
    #[serde(rename = "issue")]
    IssueRef,
}

impl LinkCategory {
    /// Short lowercase label used in CLI output.
    pub const fn label(self) -> &'static str {
        return match self {
            LinkCategory::CommitSha => "commit",
            LinkCategory::CrossRepoIssueRef => "cross-repo-issue",
            LinkCategory::FilePath => "file",
            LinkCategory::IssueRef => "issue",
        };
    }
}

/// A raw match produced by a pattern matcher for one line.
/// Offsets are byte offsets into the scanned line and always fall on char
/// boundaries, with `start_offset < end_offset <= line.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    /// Which matcher produced this candidate.
    pub category: LinkCategory,
    /// Exclusive end of the match.
    pub end_offset: usize,
    /// The matched text, equal to `line[start_offset..end_offset]`.
    pub raw_text: String,
    /// Inclusive start of the match.
    pub start_offset: usize,
}

impl LinkCandidate {
    /// Whether two candidates cover at least one common byte.
    pub const fn overlaps(&self, other: &Self) -> bool {
        return self.start_offset < other.end_offset && other.start_offset < self.end_offset;
    }
}

/// A file path capture with its optional `:line[:column]` suffix split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFileReference {
    /// One-based column, only present when `line` is.
    pub column: Option<u32>,
    /// One-based line number.
    pub line: Option<u32>,
    /// The path text without the suffix.
    pub path: String,
}

/// Display range of a link. Columns count terminal cells, both ends are
/// one-based and the end column is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct LinkRange {
    /// Last cell covered by the link.
    pub end_column: u32,
    /// Buffer row, one-based.
    pub row: u32,
    /// First cell covered by the link.
    pub start_column: u32,
}

/// What activating a link hands to the navigation collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// An absolute, platform-correct file path.
    File {
        /// One-based column, if the capture carried one.
        column: Option<u32>,
        /// One-based line, if the capture carried one.
        line: Option<u32>,
        /// Absolute path.
        path: String,
    },
    /// A fully qualified web URL.
    Url(String),
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            LinkTarget::File { path, line: Some(line), column: Some(column) } => {
                write!(f, "{path}:{line}:{column}")
            },
            LinkTarget::File { path, line: Some(line), column: None } => write!(f, "{path}:{line}"),
            LinkTarget::File { path, line: None, .. } => f.write_str(path),
            LinkTarget::Url(url) => f.write_str(url),
        };
    }
}

/// Modifier state of the mouse event the host delivers to `activate`/`hover`.
/// The engine reads these flags and never synthesizes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseEvent {
    /// Control key held.
    pub ctrl_key: bool,
    /// Command (macOS) / Windows key held.
    pub meta_key: bool,
}
