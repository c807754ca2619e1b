//! Pattern matchers: one line of terminal text in, raw link candidates out.
//!
//! Compiled patterns are immutable statics. Every call builds a fresh
//! iterator, so the scan cursor never outlives the call that created it and
//! the same line can be matched any number of times in any order.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::types::{LinkCandidate, LinkCategory, ParsedFileReference};

/// A lazily compiled pattern. `None` when compilation failed, in which case
/// the matcher contributes nothing.
type Pattern = LazyLock<Option<Regex>>;

/// (a) `/abs/path`, `./rel/path`, `../rel/path`, `~/home/path`, optional `:line[:column]`.
static UNIX_PATH: Pattern = LazyLock::new(|| {
    return compile(
        "unix-path",
        r#"(?:^|[\s('"`\[{<=])(?P<link>(?:~/|\.\./|\./|/)[^\s:'"`()\[\]{}<>,;]*[^\s:'"`()\[\]{}<>,;.](?::\d+(?::\d+)?)?)"#,
    );
});

/// (b) `"C:\Program Files\app\main.rs"`, spaces allowed inside the quotes.
static QUOTED_WINDOWS_PATH: Pattern = LazyLock::new(|| {
    return compile("quoted-windows-path", r#""(?P<link>[A-Za-z]:[\\/][^"\r\n]*)""#);
});

/// (c) `C:\src\main.rs:10`, no spaces.
static UNQUOTED_WINDOWS_PATH: Pattern = LazyLock::new(|| {
    return compile(
        "windows-path",
        r#"(?:^|[\s('`\[{<=])(?P<link>[A-Za-z]:[\\/][^\s"'`<>|*?()\[\]{},;:]*[^\s"'`<>|*?()\[\]{},;:.](?::\d+(?::\d+)?)?)"#,
    );
});

/// (d) `src/app.ts:12[:3]`, the `:line` suffix is mandatory.
static BARE_RELATIVE_PATH: Pattern = LazyLock::new(|| {
    return compile(
        "relative-path",
        r#"(?:^|[\s('"`\[{<=])(?P<link>[\w\-][\w./\-]*\.[A-Za-z0-9]+:\d+(?::\d+)?)"#,
    );
});

/// File path sub-patterns in priority order.
static FILE_PATH_PATTERNS: [&Pattern; 4] = [
    &UNIX_PATH,
    &QUOTED_WINDOWS_PATH,
    &UNQUOTED_WINDOWS_PATH,
    &BARE_RELATIVE_PATH,
];

/// 7 to 40 hex characters, word-bounded, never the digits of an `#N` issue.
static COMMIT_SHA: Pattern = LazyLock::new(|| {
    return compile("commit-sha", r"(?:^|[^#\w])(?P<link>[0-9a-fA-F]{7,40})\b");
});

/// `#42` at line start or after whitespace/punctuation.
static ISSUE_REF: Pattern = LazyLock::new(|| {
    return compile("issue-ref", r#"(?:^|[\s(\[{,;:.!?'"`])(?P<link>#\d+)\b"#);
});

/// `org/repo#42`, identifiers matched case-insensitively.
static CROSS_REPO_ISSUE_REF: Pattern = LazyLock::new(|| {
    return compile(
        "cross-repo-issue-ref",
        r"(?i)(?:^|[^\w./\-])(?P<link>[a-z0-9][\w.\-]*/[a-z0-9][\w.\-]*#\d+)\b",
    );
});

/// Compile one pattern, logging and disabling it on failure.
fn compile(name: &'static str, source: &str) -> Option<Regex> {
    return match Regex::new(source) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!(pattern = name, error = %e, "link pattern failed to compile; matcher disabled");
            None
        },
    };
}

/// Run the matcher for `category` over `line`.
pub fn matches(category: LinkCategory, line: &str) -> Box<dyn Iterator<Item = LinkCandidate> + '_> {
    return match category {
        LinkCategory::CommitSha => Box::new(commit_shas(line)),
        LinkCategory::CrossRepoIssueRef => Box::new(cross_repo_issue_refs(line)),
        LinkCategory::FilePath => Box::new(file_paths(line)),
        LinkCategory::IssueRef => Box::new(issue_refs(line)),
    };
}

/// File path candidates from all four sub-patterns, in sub-pattern order.
/// Spans found by different sub-patterns may overlap; no deduplication here.
pub fn file_paths(line: &str) -> impl Iterator<Item = LinkCandidate> + '_ {
    return FILE_PATH_PATTERNS
        .iter()
        .flat_map(move |pattern| return candidates(*pattern, line, LinkCategory::FilePath));
}

/// Commit identifier candidates.
pub fn commit_shas(line: &str) -> impl Iterator<Item = LinkCandidate> + '_ {
    return candidates(&COMMIT_SHA, line, LinkCategory::CommitSha);
}

/// Same-repository issue candidates (`#42`).
pub fn issue_refs(line: &str) -> impl Iterator<Item = LinkCandidate> + '_ {
    return candidates(&ISSUE_REF, line, LinkCategory::IssueRef);
}

/// Cross-repository issue candidates (`org/repo#42`).
pub fn cross_repo_issue_refs(line: &str) -> impl Iterator<Item = LinkCandidate> + '_ {
    return candidates(&CROSS_REPO_ISSUE_REF, line, LinkCategory::CrossRepoIssueRef);
}

/// Fresh capture iterator over `line` for one pattern.
fn candidates<'a>(
    pattern: &'static Pattern,
    line: &'a str,
    category: LinkCategory,
) -> impl Iterator<Item = LinkCandidate> + 'a {
    return pattern
        .as_ref()
        .into_iter()
        .flat_map(move |regex| return regex.captures_iter(line))
        .filter_map(move |captures| return candidate_from_captures(&captures, category));
}

/// Turn the `link` group of a capture into a candidate. Empty spans are dropped.
fn candidate_from_captures(captures: &Captures<'_>, category: LinkCategory) -> Option<LinkCandidate> {
    let link = captures.name("link")?;
    if link.is_empty() {
        return None;
    }
    return Some(LinkCandidate {
        category,
        end_offset: link.end(),
        raw_text: link.as_str().to_string(),
        start_offset: link.start(),
    });
}

/// Split a trailing `:line[:column]` suffix off a path capture.
///
/// A suffix that is not all ASCII digits, or does not fit in `u32`, is left
/// on the path. Drive letters (`C:\…`) are never mistaken for a suffix
/// because the part after their colon is not numeric.
pub fn parse_file_reference(raw: &str) -> ParsedFileReference {
    let bare = || {
        return ParsedFileReference {
            column: None,
            line: None,
            path: raw.to_string(),
        };
    };

    let Some((head, last)) = raw.rsplit_once(':') else {
        return bare();
    };
    let Some(last_number) = parse_number(last) else {
        return bare();
    };

    if let Some((path, line)) = head.rsplit_once(':')
        && let Some(line_number) = parse_number(line)
        && !path.is_empty()
    {
        return ParsedFileReference {
            column: Some(last_number),
            line: Some(line_number),
            path: path.to_string(),
        };
    }

    if head.is_empty() {
        return bare();
    }
    return ParsedFileReference {
        column: None,
        line: Some(last_number),
        path: head.to_string(),
    };
}

/// Parse a run of ASCII digits. Signs and empty strings are rejected.
fn parse_number(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| return b.is_ascii_digit()) {
        return None;
    }
    return text.parse().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(iter: impl Iterator<Item = LinkCandidate>) -> Vec<String> {
        iter.map(|c| c.raw_text).collect()
    }

    #[test]
    fn unix_path_with_line_and_column() {
        let line = "error at /a/b/c.ts:10:5 while compiling";
        let found: Vec<LinkCandidate> = file_paths(line).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].raw_text, "/a/b/c.ts:10:5");
        assert_eq!(&line[found[0].start_offset..found[0].end_offset], "/a/b/c.ts:10:5");

        let parsed = parse_file_reference(&found[0].raw_text);
        assert_eq!(parsed.path, "/a/b/c.ts");
        assert_eq!(parsed.line, Some(10));
        assert_eq!(parsed.column, Some(5));
    }

    #[test]
    fn unix_path_prefixes() {
        let line = "./run.sh and ~/notes/todo.md and /etc/hosts";
        assert_eq!(
            texts(file_paths(line)),
            vec!["./run.sh", "~/notes/todo.md", "/etc/hosts"]
        );
    }

    #[test]
    fn parent_relative_paths() {
        let found: Vec<LinkCandidate> = file_paths("see ../foo/bar.rs:3 and ../../x.ts").collect();
        assert_eq!(
            found.iter().map(|c| c.raw_text.as_str()).collect::<Vec<_>>(),
            vec!["../foo/bar.rs:3", "../../x.ts"]
        );
        assert_eq!(parse_file_reference(&found[0].raw_text).path, "../foo/bar.rs");
    }

    #[test]
    fn urls_are_not_unix_paths() {
        assert!(file_paths("see https://example.com/docs/page").next().is_none());
    }

    #[test]
    fn trailing_sentence_punctuation_is_dropped() {
        assert_eq!(texts(file_paths("Wrote /tmp/out.log.")), vec!["/tmp/out.log"]);
        assert_eq!(texts(file_paths("(see /tmp/a.txt)")), vec!["/tmp/a.txt"]);
    }

    #[test]
    fn quoted_windows_path_may_contain_spaces() {
        let line = r#"open "C:\Program Files\App\main.rs" now"#;
        assert_eq!(texts(file_paths(line)), vec![r"C:\Program Files\App\main.rs"]);
    }

    #[test]
    fn unquoted_windows_path_with_line() {
        let line = r"  --> C:\src\lib.rs:42:7";
        let found: Vec<LinkCandidate> = file_paths(line).collect();
        assert_eq!(found.len(), 1);
        let parsed = parse_file_reference(&found[0].raw_text);
        assert_eq!(parsed.path, r"C:\src\lib.rs");
        assert_eq!(parsed.line, Some(42));
        assert_eq!(parsed.column, Some(7));
    }

    #[test]
    fn bare_relative_requires_line_suffix() {
        assert_eq!(texts(file_paths("src/app.ts:12 failed")), vec!["src/app.ts:12"]);
        assert!(file_paths("src/app.ts failed").next().is_none());
        assert_eq!(
            texts(file_paths("  --> src/main.rs:10:5: error")),
            vec!["src/main.rs:10:5"]
        );
    }

    #[test]
    fn overlapping_sub_patterns_are_both_emitted() {
        let line = r#""C:\work dir /sub/file.ts""#;
        let found = texts(file_paths(line));
        assert_eq!(found, vec!["/sub/file.ts", r"C:\work dir /sub/file.ts"]);
    }

    #[test]
    fn commit_sha_bounds() {
        let full = "a".repeat(40);
        let line = format!("merged {full} and abc1234 but not abc123 or {}", "b".repeat(41));
        assert_eq!(texts(commit_shas(&line)), vec![full, "abc1234".to_string()]);
    }

    #[test]
    fn issue_numbers_are_not_commits() {
        assert!(commit_shas("fixes #1234567 today").next().is_none());
        assert!(commit_shas("see org/repo#12345678").next().is_none());
        assert_eq!(texts(commit_shas("abc1234 def5678")), vec!["abc1234", "def5678"]);
    }

    #[test]
    fn commit_sha_accepts_uppercase() {
        assert_eq!(texts(commit_shas("HEAD is DEADBEEF1")), vec!["DEADBEEF1"]);
    }

    #[test]
    fn issue_ref_needs_boundary() {
        assert_eq!(texts(issue_refs("#42 fixes (#7), not a#9")), vec!["#42", "#7"]);
    }

    #[test]
    fn cross_repo_issue_ref() {
        let line = "See Org-Name/Repo.rs#42 and https://github.com/a/b#1";
        assert_eq!(texts(cross_repo_issue_refs(line)), vec!["Org-Name/Repo.rs#42"]);
        assert!(issue_refs("org/repo#42").next().is_none());
    }

    #[test]
    fn dispatch_covers_every_category() {
        let line = "/x/y.rs:1 abc1234 #5 o/r#6";
        assert_eq!(matches(LinkCategory::FilePath, line).count(), 1);
        assert_eq!(matches(LinkCategory::CommitSha, line).count(), 1);
        assert_eq!(matches(LinkCategory::IssueRef, line).count(), 1);
        assert_eq!(matches(LinkCategory::CrossRepoIssueRef, line).count(), 1);
    }

    #[test]
    fn matching_is_restartable() {
        let line = "/a/b.rs:1 and /c/d.rs:2";
        let first: Vec<LinkCandidate> = file_paths(line).collect();
        let second: Vec<LinkCandidate> = file_paths(line).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn suffix_parsing_edge_cases() {
        let bare = parse_file_reference("/a/b.rs");
        assert_eq!((bare.line, bare.column), (None, None));

        let line_only = parse_file_reference("/a/b.rs:7");
        assert_eq!(line_only.path, "/a/b.rs");
        assert_eq!((line_only.line, line_only.column), (Some(7), None));

        let non_numeric = parse_file_reference("/a/b.rs:x:3");
        assert_eq!(non_numeric.path, "/a/b.rs:x");
        assert_eq!(non_numeric.line, Some(3));

        let signed = parse_file_reference("/a/b.rs:+3");
        assert_eq!(signed.path, "/a/b.rs:+3");
        assert_eq!(signed.line, None);

        let overflow = parse_file_reference("/a/b.rs:99999999999");
        assert_eq!(overflow.line, None);

        let drive = parse_file_reference(r"C:\x.ts");
        assert_eq!(drive.path, r"C:\x.ts");
        assert_eq!(drive.line, None);
    }
}
