//! Conversion between LSP positions (UTF-16 code units) and byte columns.

use comment_translate_core::SpanRange;
use tower_lsp_server::ls_types::{Position, Range};

/// Byte offset of the UTF-16 `character` in `line`, clamped to the line end.
pub fn utf16_to_byte(line: &str, character: u32) -> usize {
    let target = character as usize;
    let mut units = 0;
    for (offset, c) in line.char_indices() {
        if units >= target {
            return offset;
        }
        units += c.len_utf16();
    }
    line.len()
}

/// UTF-16 column of byte `offset` in `line`.
///
/// Offsets inside a multi-byte character round down to its start.
pub fn byte_to_utf16(line: &str, offset: usize) -> u32 {
    line.char_indices()
        .take_while(|(start, _)| *start < offset)
        .map(|(_, c)| c.len_utf16() as u32)
        .sum()
}

/// Converts a byte-based span range to an LSP range using `line_text` to
/// look up each line.
pub fn to_lsp_range<'a>(range: SpanRange, line_text: impl Fn(usize) -> Option<&'a str>) -> Range {
    let convert = |line: usize, column: usize| {
        let character = line_text(line).map_or(0, |text| byte_to_utf16(text, column));
        Position::new(line as u32, character)
    };

    Range::new(
        convert(range.start_line, range.start_col),
        convert(range.end_line, range.end_col),
    )
}
