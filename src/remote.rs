//! Reference-URL building: commit and issue references to web URLs.

use url::Url;

use crate::error::Error;
use crate::types::{LinkCandidate, LinkCategory};

/// Host used for `org/repo#N` references. They name a repository other than
/// the configured remote, so they always point at the public host.
pub const CROSS_REPO_HOST: &str = "https://github.com";

/// Web base URL of a repository, such as `https://github.com/org/repo`.
/// Never ends with `/` or `.git`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBase(
    /// The normalized base URL.
    String,
);

impl RemoteBase {
    /// Normalize a remote URL into a web base URL.
    ///
    /// Accepts `https://host/org/repo[.git]`, `http://…`,
    /// `ssh://git@host/org/repo.git`, and `git@host:org/repo.git`.
    /// SSH forms become `https://host/org/repo`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRemoteUrl` if the URL has no host, no
    /// repository path, or an unsupported scheme.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let trimmed = raw.trim();
        let invalid = |reason: &str| {
            return Error::InvalidRemoteUrl {
                reason: reason.to_string(),
                url: raw.to_string(),
            };
        };

        let candidate = scp_to_ssh_url(trimmed).unwrap_or_else(|| return trimmed.to_string());
        let parsed = Url::parse(&candidate).map_err(|e| return invalid(&e.to_string()))?;

        let scheme = match parsed.scheme() {
            "http" => "http",
            "https" | "ssh" | "git" | "git+ssh" => "https",
            other => return Err(invalid(&format!("unsupported scheme `{other}`"))),
        };
        let host = parsed.host_str().ok_or_else(|| return invalid("missing host"))?;

        let repo_path = parsed.path().trim_matches('/');
        let repo_path = repo_path.strip_suffix(".git").unwrap_or(repo_path);
        if repo_path.is_empty() {
            return Err(invalid("missing repository path"));
        }

        let base = match parsed.port() {
            Some(port) if scheme == "http" || parsed.scheme() == "https" => {
                format!("{scheme}://{host}:{port}/{repo_path}")
            },
            Some(_) | None => format!("{scheme}://{host}/{repo_path}"),
        };
        return Ok(Self(base));
    }

    /// The base URL as a string slice.
    pub fn as_str(&self) -> &str {
        return &self.0;
    }

    /// `<base>/commit/<sha>`.
    pub fn commit_url(&self, sha: &str) -> String {
        return format!("{}/commit/{sha}", self.0);
    }

    /// `<base>/issues/<number>`.
    pub fn issue_url(&self, number: &str) -> String {
        return format!("{}/issues/{number}", self.0);
    }

    /// URL for a reference candidate. `None` for file paths and for
    /// candidates whose text does not have the expected shape.
    pub fn url_for(&self, candidate: &LinkCandidate) -> Option<String> {
        let text = candidate.raw_text.as_str();
        return match candidate.category {
            LinkCategory::CommitSha => Some(self.commit_url(text)),
            LinkCategory::CrossRepoIssueRef => {
                let (repo, number) = text.split_once('#')?;
                let (org, name) = repo.split_once('/')?;
                Some(cross_repo_issue_url(org, name, number))
            },
            LinkCategory::FilePath => None,
            LinkCategory::IssueRef => text.strip_prefix('#').map(|number| return self.issue_url(number)),
        };
    }
}

/// `https://github.com/<org>/<repo>/issues/<number>`, independent of any remote.
pub fn cross_repo_issue_url(org: &str, repo: &str, number: &str) -> String {
    return format!("{CROSS_REPO_HOST}/{org}/{repo}/issues/{number}");
}

/// Rewrite scp-like `user@host:path` into `ssh://user@host/path`.
/// Returns `None` for anything that already has a scheme.
fn scp_to_ssh_url(raw: &str) -> Option<String> {
    if raw.contains("://") {
        return None;
    }
    let (user_host, path) = raw.split_once(':')?;
    if user_host.is_empty() || user_host.contains('/') {
        return None;
    }
    return Some(format!("ssh://{user_host}/{path}"));
}
