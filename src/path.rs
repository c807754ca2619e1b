//! Path resolution: raw path captures to absolute, platform-correct paths.
//!
//! Resolution is lexical. Nothing here touches the filesystem; whether the
//! file exists is the navigation collaborator's concern.

use crate::platform::Platform;

/// Resolve a raw path capture against `working_dir`.
///
/// Absolute inputs (`/…` or a drive letter such as `C:`) are returned
/// unchanged. `~/…` expands to the home directory when one is known.
/// Everything else is joined onto `working_dir`, with repeated separators
/// collapsed and `.`/`..` folded. On Windows the result uses backslashes.
pub fn resolve_path(raw: &str, working_dir: &str, platform: Platform) -> String {
    let home = dirs::home_dir().map(|h| return h.to_string_lossy().into_owned());
    return resolve_path_with_home(raw, working_dir, platform, home.as_deref());
}

/// `resolve_path` with the home directory supplied by the caller.
fn resolve_path_with_home(raw: &str, working_dir: &str, platform: Platform, home: Option<&str>) -> String {
    if is_absolute(raw) {
        return raw.to_string();
    }

    let joined = match (raw.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => format!("{home}/{rest}"),
        _ => format!("{working_dir}/{raw}"),
    };

    let normalized = fold_segments(&joined, platform);
    if platform.uses_backslash() {
        return normalized.replace('/', "\\");
    }
    return normalized;
}

/// Whether the path starts with `/` or a drive-letter prefix.
pub fn is_absolute(path: &str) -> bool {
    return path.starts_with('/') || has_drive_prefix(path);
}

/// `X:` at the start of the string.
fn has_drive_prefix(path: &str) -> bool {
    let mut chars = path.chars();
    return matches!((chars.next(), chars.next()), (Some(letter), Some(':')) if letter.is_ascii_alphabetic());
}

/// Collapse empty and `.` segments and fold `..` without touching the filesystem.
/// A leading separator is preserved; `..` never climbs above a root or drive.
fn fold_segments(joined: &str, platform: Platform) -> String {
    let separators: &[char] = if platform.uses_backslash() { &['/', '\\'] } else { &['/'] };
    let rooted = joined.starts_with(separators);

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split(separators) {
        push_normalized_segment(&mut segments, segment, rooted);
    }

    let body = segments.join("/");
    if rooted {
        return format!("/{body}");
    }
    return body;
}

/// Handle a single segment during folding.
/// Pops the last segment for `..` when it is an ordinary name, drops `..`
/// at a root, and keeps it otherwise.
fn push_normalized_segment<'a>(segments: &mut Vec<&'a str>, segment: &'a str, rooted: bool) {
    match segment {
        "" | "." => {},
        ".." => {
            let can_pop = matches!(
                segments.last(),
                Some(last) if *last != ".." && !has_drive_prefix(last)
            );
            let at_root = segments.last().map_or(rooted, |last| return has_drive_prefix(last));
            if can_pop {
                segments.pop();
            } else if !at_root {
                segments.push(segment);
            }
        },
        other => segments.push(other),
    }
}
