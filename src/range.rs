/// Offset-to-range conversion for the display layer.
use unicode_width::UnicodeWidthStr as _;

use crate::types::{LinkCandidate, LinkRange};

/// Convert a candidate's byte offsets into a one-based, end-inclusive cell
/// range on `row`. Wide characters before or inside the match count as two
/// cells, so the range lines up with what the terminal draws.
pub fn link_range(line: &str, candidate: &LinkCandidate, row: u32) -> LinkRange {
    let cells_before = cell_width(line.get(..candidate.start_offset).unwrap_or(""));
    let cells_through_end = cell_width(line.get(..candidate.end_offset).unwrap_or(line));

    let start_column = cells_before.saturating_add(1);
    // Zero-width matches (combining marks only) still cover one cell.
    let end_column = cells_through_end.max(start_column);

    return LinkRange {
        end_column,
        row,
        start_column,
    };
}

/// Display width of `text` in terminal cells, saturating at `u32::MAX`.
fn cell_width(text: &str) -> u32 {
    return u32::try_from(text.width()).unwrap_or(u32::MAX);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher;

    fn first_file_range(line: &str) -> LinkRange {
        let candidate = matcher::file_paths(line).next().unwrap();
        link_range(line, &candidate, 3)
    }

    #[test]
    fn range_at_line_start() {
        let range = first_file_range("/a/b/c.ts:10:5");
        assert_eq!(range, LinkRange { end_column: 14, row: 3, start_column: 1 });
    }

    #[test]
    fn range_after_prefix() {
        let range = first_file_range("at /x.rs");
        assert_eq!((range.start_column, range.end_column), (4, 8));
    }

    #[test]
    fn wide_characters_shift_columns() {
        // Each CJK ideograph occupies two cells.
        let range = first_file_range("错误 /x.rs");
        assert_eq!((range.start_column, range.end_column), (6, 10));
    }
}
