use std::path::Path;

use crate::config::CONFIG_FILE;
use crate::error::Error;

/// ANSI bold.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is
/// one, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::ConfigNotFound { path } => render_config_not_found(path),
        Error::InvalidRemoteUrl { reason, url } => render_invalid_remote(url, reason),
        Error::Io(e) => format!("# Error: I/O\n\n{e}\n"),
        Error::Json(e) => format!("# Error: JSON Output\n\n{e}\n"),
        Error::NotAReference { text } => render_not_a_reference(text),
        Error::RemoteRequired { reference } => render_remote_required(reference),
        Error::TomlDe(e) => format!(
            "\
# Error: Invalid Config

`{CONFIG_FILE}` could not be parsed:

{e}

## Fix

Valid keys are `working_dir`, `remote_url`, `overlap` (`\"keep-all\"` or
`\"prefer-first\"`), and `platform` (`\"linux\"`, `\"macos\"`, or `\"windows\"`).
"
        ),
        Error::TranscriptNotFound { path } => render_transcript_not_found(path),
        Error::WatchFailed { reason } => format!("# Error: Watch Failed\n\n{reason}\n"),
    };
}

/// Explicit `--config` file is missing.
fn render_config_not_found(path: &Path) -> String {
    return format!(
        "\
# Error: Config Not Found

`{}` does not exist.

## Fix

Check the `--config` path, or drop the flag to use `{CONFIG_FILE}` from the
working directory.
",
        path.display()
    );
}

/// Remote URL could not be normalized.
fn render_invalid_remote(url: &str, reason: &str) -> String {
    return format!(
        "\
# Error: Invalid Remote URL

`{url}` is not a usable repository remote: {reason}

## Fix

Use one of these forms:

    https://github.com/org/repo
    git@github.com:org/repo.git
    ssh://git@host/org/repo.git
"
    );
}

/// Text given to `url` is not one reference.
fn render_not_a_reference(text: &str) -> String {
    return format!(
        "\
# Error: Not a Reference

`{text}` is not a commit hash, issue, or cross-repo issue.

## Fix

Pass exactly one reference:

    termlinks url abc1234
    termlinks url '#42'
    termlinks url org/repo#42
"
    );
}

/// Commit or issue reference without a remote.
fn render_remote_required(reference: &str) -> String {
    return format!(
        "\
# Error: No Remote Configured

`{reference}` resolves against the repository remote, and none is set.

## Fix

Pass `--remote <URL>` or set `remote_url` in `{CONFIG_FILE}`.
"
    );
}

/// Transcript file is missing.
fn render_transcript_not_found(path: &Path) -> String {
    return format!(
        "\
# Error: Transcript Not Found

`{}` does not exist.

## Fix

Check the path, or pipe the output into `termlinks scan` without a file.
",
        path.display()
    );
}
