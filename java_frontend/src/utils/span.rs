//! Source location tracking
//!
//! Byte offsets are authoritative. Lines and columns are derived and exist for
//! diagnostics. Columns count code points, and `\n`, `\r` and `\r\n` each end
//! one line, matching Java's line terminators.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Offset 0, line 1, column 1
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Advance position by one character
    pub fn advance(self, ch: char) -> Self {
        match ch {
            '\n' | '\r' => Self::new(self.offset + 1, self.line + 1, 1),
            _ => Self::new(self.offset + ch.len_utf8(), self.line, self.column + 1),
        }
    }

    /// Advance position over a string, treating `\r\n` as one line break
    pub fn advance_str(self, s: &str) -> Self {
        let mut pos = self;
        let mut chars = s.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
                pos = Self::new(pos.offset + 2, pos.line + 1, 1);
            } else {
                pos = pos.advance(ch);
            }
        }
        pos
    }

    /// Advance by n bytes of known single-line ASCII
    pub fn advance_bytes(self, n: usize) -> Self {
        Self::new(self.offset + n, self.line, self.column + n as u32)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start (inclusive) to end (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    /// Empty span at a position
    pub fn at(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Span from byte offsets only (useful for testing)
    pub fn from_offsets(start: usize, end: usize) -> Self {
        Self {
            start: Position::new(start, 0, 0),
            end: Position::new(end, 0, 0),
        }
    }

    /// Smallest span covering both
    pub fn merge(self, other: Self) -> Self {
        let start = if self.start.offset <= other.start.offset {
            self.start
        } else {
            other.start
        };
        let end = if self.end.offset >= other.end.offset {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.offset >= self.start.offset && pos.offset < self.end.offset
    }

    pub fn contains_span(&self, other: &Span) -> bool {
        other.start.offset >= self.start.offset && other.end.offset <= self.end.offset
    }

    /// Source text for this span. Out-of-range or non-boundary spans yield "".
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        input.get(self.start.offset..self.end.offset).unwrap_or("")
    }

    /// Placeholder span for synthesized nodes
    pub fn dummy() -> Self {
        Self::at(Position::start())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A value with its source location
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    /// Map the value while preserving the span
    pub fn map<U, F>(self, f: F) -> Spanned<U>
    where
        F: FnOnce(T) -> U,
    {
        Spanned {
            value: f(self.value),
            span: self.span,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: fmt::Display> fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Line index over a source text for offset to position lookup
#[derive(Debug, Clone)]
pub struct SourceMap {
    pub source: String,
    /// Byte offsets of line starts
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: String) -> Self {
        let mut line_starts = vec![0];
        let bytes = source.as_bytes();
        for (offset, &b) in bytes.iter().enumerate() {
            match b {
                b'\n' => line_starts.push(offset + 1),
                b'\r' if bytes.get(offset + 1) != Some(&b'\n') => line_starts.push(offset + 1),
                _ => {}
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line and column for a byte offset. Offsets past the end clamp to it.
    pub fn position_at(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.source.len());
        while !self.source.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = self.line_starts[line];
        let column = self.source[line_start..offset].chars().count();

        Position::new(offset, (line + 1) as u32, (column + 1) as u32)
    }

    /// Text of a line (1-based) without its terminator
    pub fn get_line(&self, line_num: u32) -> Option<&str> {
        let line_idx = (line_num as usize).checked_sub(1)?;
        let start = *self.line_starts.get(line_idx)?;
        let end = self
            .line_starts
            .get(line_idx + 1)
            .copied()
            .unwrap_or(self.source.len());

        Some(self.source[start..end].trim_end_matches(['\n', '\r']))
    }

    pub fn span_text(&self, span: &Span) -> &str {
        span.slice(&self.source)
    }

    /// Render a message with the offending line and a caret underline
    pub fn format_error(&self, span: &Span, message: &str) -> String {
        let start = self.position_at(span.start.offset);
        let end = self.position_at(span.end.offset);
        let mut result = format!("Error: {}\n  --> {}:{}\n", message, start.line, start.column);

        if let Some(line) = self.get_line(start.line) {
            let line_num_str = start.line.to_string();
            let padding = " ".repeat(line_num_str.len());

            result.push_str(&format!("   {} |\n", padding));
            result.push_str(&format!("{} | {}\n", line_num_str, line));

            let caret_count = if start.line == end.line {
                (end.column - start.column) as usize
            } else {
                line.chars().count() + 1 - start.column as usize
            };

            result.push_str(&format!(
                "   {} | {}{}\n",
                padding,
                " ".repeat(start.column as usize - 1),
                "^".repeat(caret_count.max(1))
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_counts_code_points() {
        let pos = Position::start().advance_str("aé\tb");
        assert_eq!(pos.offset, 5);
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 5);
    }

    #[test]
    fn test_advance_line_terminators() {
        let pos = Position::start().advance_str("a\r\nb\rc\nd");
        assert_eq!(pos.line, 4);
        assert_eq!(pos.column, 2);
        assert_eq!(pos.offset, 8);
    }

    #[test]
    fn test_merge_and_contains() {
        let a = Span::from_offsets(2, 5);
        let b = Span::from_offsets(4, 9);
        let merged = a.merge(b);
        assert_eq!(merged, Span::from_offsets(2, 9));
        assert!(merged.contains_span(&a));
        assert!(merged.contains(Position::new(8, 1, 1)));
        assert!(!merged.contains(Position::new(9, 1, 1)));
        assert_eq!(merged.len(), 7);
    }

    #[test]
    fn test_slice_out_of_range_is_empty() {
        assert_eq!(Span::from_offsets(0, 3).slice("abcdef"), "abc");
        assert_eq!(Span::from_offsets(4, 40).slice("abcdef"), "");
    }

    #[test]
    fn test_source_map_positions() {
        let map = SourceMap::new("int x;\r\nx = 1;\ry++;".to_string());
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.position_at(8), Position::new(8, 2, 1));
        assert_eq!(map.position_at(15), Position::new(15, 3, 1));
        assert_eq!(map.get_line(2), Some("x = 1;"));
        assert_eq!(map.get_line(0), None);
        assert_eq!(map.get_line(9), None);
    }

    #[test]
    fn test_format_error_underlines_span() {
        let map = SourceMap::new("int x = @;\n".to_string());
        let span = Span::new(map.position_at(8), map.position_at(9));
        let rendered = map.format_error(&span, "invalid character");
        assert!(rendered.contains("--> 1:9"));
        assert!(rendered.contains("1 | int x = @;"));
        assert!(rendered.contains("|         ^\n"));
    }
}
