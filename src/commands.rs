//! CLI commands for termlinks: scan, resolve, url.

use std::fmt::Write as _;
use std::ops::RangeInclusive;
use std::path::Path;
use std::rc::Rc;

use crate::config::Config;
use crate::error::Error;
use crate::host::TerminalBuffer;
use crate::link::ResolvedLink;
use crate::matcher;
use crate::path;
use crate::platform::Platform;
use crate::registry::ProviderRegistry;
use crate::remote::{self, RemoteBase};
use crate::transcript::{self, TraceActions, Transcript, TranscriptHost};
use crate::types::LinkCategory;

/// Output format for link reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// A JSON array of reports.
    Json,
    /// One tab-separated line per link.
    #[default]
    Text,
}

/// One detected link, flattened for printing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LinkReport {
    /// Matcher family.
    pub category: LinkCategory,
    /// Last covered cell, one-based and inclusive.
    pub end_column: u32,
    /// One-based row.
    pub row: u32,
    /// First covered cell, one-based.
    pub start_column: u32,
    /// Resolved destination, as shown in the tooltip.
    pub target: String,
    /// The linked text.
    pub text: String,
}

impl From<&ResolvedLink> for LinkReport {
    fn from(link: &ResolvedLink) -> Self {
        let range = link.range();
        return Self {
            category: link.category(),
            end_column: range.end_column,
            row: range.row,
            start_column: range.start_column,
            target: link.target().to_string(),
            text: link.text().to_string(),
        };
    }
}

/// A transcript with a mounted provider registry, as one terminal view sees it.
pub struct Session {
    /// Host that owns the registered providers.
    host: TranscriptHost,
    /// Registrations of this view.
    registry: ProviderRegistry,
    /// Rows being scanned.
    transcript: Rc<Transcript>,
}

impl Session {
    /// Load `text` and mount the providers `config` calls for.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRemoteUrl` for a malformed remote, or
    /// `Error::Io` if the working directory cannot be determined.
    pub fn open(config: &Config, text: &str) -> Result<Self, Error> {
        let transcript = Rc::new(Transcript::from_text(text));
        let buffer: Rc<dyn TerminalBuffer> = Rc::<Transcript>::clone(&transcript);
        let provider_config = config.provider_config(buffer, Rc::new(TraceActions))?;
        let host = TranscriptHost::default();
        let registry = ProviderRegistry::mount(&host, &provider_config);
        return Ok(Self { host, registry, transcript });
    }

    /// The scanned rows.
    pub fn transcript(&self) -> &Transcript {
        return &self.transcript;
    }

    /// Reports for every link on `rows`, in row order.
    pub fn reports(&self, rows: RangeInclusive<u32>) -> Vec<LinkReport> {
        return rows
            .flat_map(|row| return self.host.links_at(row))
            .map(|link| return LinkReport::from(&link))
            .collect();
    }

    /// Unregister the providers.
    pub fn close(self) {
        self.registry.dispose();
    }
}

/// Render reports in `format`.
///
/// # Errors
///
/// Returns `Error::Json` if JSON serialization fails.
pub fn render_reports(reports: &[LinkReport], format: OutputFormat) -> Result<String, Error> {
    return match format {
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(reports)?;
            out.push('\n');
            Ok(out)
        },
        OutputFormat::Text => {
            let mut out = String::new();
            for report in reports {
                let _ = writeln!(
                    out,
                    "{}:{}-{}\t{}\t{}\t{}",
                    report.row,
                    report.start_column,
                    report.end_column,
                    report.category.label(),
                    report.text,
                    report.target
                );
            }
            Ok(out)
        },
    };
}

/// Scan a transcript (stdin when `input` is `None`) and print every link.
///
/// # Errors
///
/// Returns errors from reading the transcript, building the providers,
/// or serializing the output.
pub fn scan(config: &Config, input: Option<&Path>, format: OutputFormat) -> Result<(), Error> {
    let text = match input {
        Some(path) => transcript::read_transcript(path)?,
        None => std::io::read_to_string(std::io::stdin())?,
    };

    let session = Session::open(config, &text)?;
    let rows = session.transcript().line_count();
    let reports = session.reports(1..=rows);
    session.close();

    print!("{}", render_reports(&reports, format)?);
    let count = reports.len();
    eprintln!("{count} links in {rows} rows");
    return Ok(());
}

/// Resolve a path the way a file link would and print it.
///
/// # Errors
///
/// Returns `Error::Io` if no working directory is configured and the
/// process cwd cannot be read.
pub fn resolve(config: &Config, raw: &str) -> Result<(), Error> {
    let working_dir = config.effective_working_dir()?;
    let platform = config.platform.unwrap_or_else(Platform::detect);
    println!("{}", path::resolve_path(raw, &working_dir, platform));
    return Ok(());
}

/// Print the web URL for a commit, issue, or cross-repo issue reference.
///
/// # Errors
///
/// Returns `Error::NotAReference` for unrecognized text,
/// `Error::RemoteRequired` for a commit or issue without a remote, or
/// `Error::InvalidRemoteUrl` for a malformed remote.
pub fn url(config: &Config, reference: &str) -> Result<(), Error> {
    let remote = config.remote_base()?;
    println!("{}", reference_url(reference.trim(), remote.as_ref())?);
    return Ok(());
}

/// URL for text that is exactly one reference. Cross-repo references need
/// no remote; commit and issue references do.
///
/// # Errors
///
/// Returns `Error::NotAReference` or `Error::RemoteRequired`.
pub fn reference_url(reference: &str, remote: Option<&RemoteBase>) -> Result<String, Error> {
    let candidate = [LinkCategory::CrossRepoIssueRef, LinkCategory::IssueRef, LinkCategory::CommitSha]
        .into_iter()
        .find_map(|category| {
            return matcher::matches(category, reference)
                .find(|c| return c.start_offset == 0 && c.end_offset == reference.len());
        })
        .ok_or_else(|| {
            return Error::NotAReference {
                text: reference.to_string(),
            };
        })?;

    if candidate.category == LinkCategory::CrossRepoIssueRef
        && let Some((repo, number)) = reference.split_once('#')
        && let Some((org, name)) = repo.split_once('/')
    {
        return Ok(remote::cross_repo_issue_url(org, name, number));
    }

    let remote = remote.ok_or_else(|| {
        return Error::RemoteRequired {
            reference: reference.to_string(),
        };
    })?;
    return remote.url_for(&candidate).ok_or_else(|| {
        return Error::NotAReference {
            text: reference.to_string(),
        };
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            platform: Some(Platform::Linux),
            remote_url: Some("https://github.com/acme/widgets".to_string()),
            working_dir: Some("/home/u/project".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn session_reports_every_row() {
        let session = Session::open(&config(), "build ok\nsee src/app.ts:3 and #42\n\nfixed in abc1234\n").unwrap();
        let reports = session.reports(1..=4);
        session.close();

        let summary: Vec<(u32, &str, &str)> = reports
            .iter()
            .map(|r| (r.row, r.text.as_str(), r.target.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (2, "src/app.ts:3", "/home/u/project/src/app.ts:3"),
                (2, "#42", "https://github.com/acme/widgets/issues/42"),
                (4, "abc1234", "https://github.com/acme/widgets/commit/abc1234"),
            ]
        );
    }

    #[test]
    fn reports_cover_only_requested_rows() {
        let session = Session::open(&config(), "/a.rs\n/b.rs\n").unwrap();
        let reports = session.reports(2..=2);
        session.close();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].text, "/b.rs");
    }

    #[test]
    fn text_rendering_is_tab_separated() {
        let report = LinkReport {
            category: LinkCategory::IssueRef,
            end_column: 3,
            row: 1,
            start_column: 1,
            target: "https://github.com/o/r/issues/42".to_string(),
            text: "#42".to_string(),
        };
        assert_eq!(
            render_reports(&[report], OutputFormat::Text).unwrap(),
            "1:1-3\tissue\t#42\thttps://github.com/o/r/issues/42\n"
        );
    }

    fn report_for(category: LinkCategory) -> LinkReport {
        LinkReport {
            category,
            end_column: 5,
            row: 1,
            start_column: 1,
            target: "https://github.com/o/r/issues/4".to_string(),
            text: "o/r#4".to_string(),
        }
    }

    #[test]
    fn json_and_text_share_category_labels() {
        let json = render_reports(&[report_for(LinkCategory::CrossRepoIssueRef)], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["category"], "cross-repo-issue");
        assert_eq!(value[0]["row"], 1);

        let text = render_reports(&[report_for(LinkCategory::CrossRepoIssueRef)], OutputFormat::Text).unwrap();
        assert!(text.contains("\tcross-repo-issue\t"));
    }

    #[test]
    fn reference_urls() {
        let remote = RemoteBase::parse("https://github.com/acme/widgets").unwrap();
        assert_eq!(
            reference_url("#42", Some(&remote)).unwrap(),
            "https://github.com/acme/widgets/issues/42"
        );
        assert_eq!(
            reference_url("abc1234", Some(&remote)).unwrap(),
            "https://github.com/acme/widgets/commit/abc1234"
        );
        assert_eq!(
            reference_url("org/repo#42", None).unwrap(),
            "https://github.com/org/repo/issues/42"
        );
    }

    #[test]
    fn reference_url_errors() {
        assert!(matches!(reference_url("#42", None), Err(Error::RemoteRequired { .. })));
        assert!(matches!(reference_url("hello", None), Err(Error::NotAReference { .. })));
        assert!(matches!(reference_url("see #42", None), Err(Error::NotAReference { .. })));
    }
}
