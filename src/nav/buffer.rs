// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::ops::Range;

/// The rendered content of one source file plus its line index.
///
/// Rebuilt from scratch on every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    text: String,
    // Byte range of each line, without the terminator.
    lines: Vec<Range<usize>>,
    // Character offset at which each line starts.
    char_starts: Vec<usize>,
}

/// One entry of the line-number gutter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GutterEntry {
    pub number: usize,
    pub anchor: String,
}

impl SourceBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut lines = Vec::new();
        let mut char_starts = Vec::new();
        let mut byte_start = 0usize;
        let mut char_start = 0usize;

        for line in text.split_inclusive('\n') {
            let content = line.strip_suffix('\n').unwrap_or(line);
            let content = content.strip_suffix('\r').unwrap_or(content);
            lines.push(byte_start..byte_start + content.len());
            char_starts.push(char_start);
            byte_start += line.len();
            char_start += line.chars().count();
        }

        Self {
            text,
            lines,
            char_starts,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns line `number` (1-based) without its terminator.
    pub fn line(&self, number: usize) -> Option<&str> {
        let range = self.lines.get(number.checked_sub(1)?)?;
        Some(&self.text[range.clone()])
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(|range| &self.text[range.clone()])
    }

    pub fn gutter(&self) -> impl Iterator<Item = GutterEntry> + '_ {
        (1..=self.line_count()).map(|number| GutterEntry {
            number,
            anchor: line_anchor(number),
        })
    }

    /// Width in cells of the widest line number.
    pub fn gutter_width(&self) -> usize {
        self.line_count().max(1).to_string().len()
    }

    /// Character offset of (`number`, `col`), where `col` counts characters from the line start.
    ///
    /// Columns past the line end clamp to the end of that line.
    pub fn char_offset(&self, number: usize, col: usize) -> Option<usize> {
        let idx = number.checked_sub(1)?;
        let start = *self.char_starts.get(idx)?;
        let len = self.line(number)?.chars().count();
        Some(start + col.min(len))
    }

    /// Inverse of [`SourceBuffer::char_offset`]: returns `(line, col)`.
    pub fn line_col_of(&self, offset: usize) -> Option<(usize, usize)> {
        if self.char_starts.is_empty() {
            return None;
        }
        let idx = match self.char_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.checked_sub(1)?,
        };
        let number = idx + 1;
        let len = self.line(number)?.chars().count();
        Some((number, (offset - self.char_starts[idx]).min(len)))
    }
}

/// The anchor id of a gutter line, e.g. `L12`.
pub fn line_anchor(number: usize) -> String {
    format!("L{number}")
}

#[cfg(test)]
mod tests {
    use super::{line_anchor, SourceBuffer};

    #[test]
    fn gutter_has_one_entry_per_line() {
        let buffer = SourceBuffer::new("package a\n\nfunc f() {}\n");
        assert_eq!(buffer.line_count(), 3);
        let gutter: Vec<_> = buffer.gutter().collect();
        assert_eq!(gutter.len(), 3);
        assert_eq!(gutter[0].number, 1);
        assert_eq!(gutter[2].anchor, "L3");
    }

    #[test]
    fn last_line_without_newline_still_counts() {
        let buffer = SourceBuffer::new("a\nb");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line(2), Some("b"));
        assert_eq!(buffer.line(3), None);
        assert_eq!(buffer.line(0), None);
    }

    #[test]
    fn empty_text_has_no_lines() {
        let buffer = SourceBuffer::new("");
        assert_eq!(buffer.line_count(), 0);
        assert_eq!(buffer.gutter().count(), 0);
        assert_eq!(buffer.gutter_width(), 1);
        assert_eq!(buffer.line_col_of(0), None);
    }

    #[test]
    fn crlf_terminators_are_not_part_of_lines() {
        let buffer = SourceBuffer::new("a\r\nbc\r\n");
        assert_eq!(buffer.lines().collect::<Vec<_>>(), vec!["a", "bc"]);
    }

    #[test]
    fn char_offsets_count_characters_not_bytes() {
        let buffer = SourceBuffer::new("// ü\nx := 1\n");
        assert_eq!(buffer.char_offset(1, 3), Some(3));
        assert_eq!(buffer.char_offset(2, 0), Some(5));
        assert_eq!(buffer.char_offset(2, 100), Some(11));
        assert_eq!(buffer.line_col_of(5), Some((2, 0)));
        assert_eq!(buffer.line_col_of(7), Some((2, 2)));
        assert_eq!(buffer.line_col_of(4), Some((1, 4)));
    }

    #[test]
    fn anchors_are_prefixed() {
        assert_eq!(line_anchor(42), "L42");
    }
}
