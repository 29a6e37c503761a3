use std::ops::Range;

use serde::Serialize;

#[derive(Debug, Default, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub start_byte: usize,
    pub end_byte: usize,
}

impl Location {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start_byte: start,
            end_byte: end,
        }
    }

    pub fn to_range(&self) -> Range<usize> {
        self.start_byte..self.end_byte
    }

    pub fn is_empty(&self) -> bool {
        self.start_byte == self.end_byte
    }
}

impl From<(usize, usize)> for Location {
    fn from((start_byte, end_byte): (usize, usize)) -> Self {
        Self {
            start_byte,
            end_byte,
        }
    }
}

/// A line/column pair. Lines start at 1, columns are character offsets
/// starting at 0.
#[derive(Debug, Default, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte offsets of every line start, used to translate locations into
/// positions without rescanning the whole source each time.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let bytes = content.as_bytes();
        let mut line_starts = vec![0];
        // `\r\n`, `\n` and a lone `\r` all end a line
        line_starts.extend(bytes.iter().enumerate().filter_map(|(offset, byte)| match byte {
            b'\n' => Some(offset + 1),
            b'\r' if bytes.get(offset + 1) != Some(&b'\n') => Some(offset + 1),
            _ => None,
        }));
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn position(&self, content: &str, byte_offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&byte_offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };

        let line_start = self.line_starts[line];
        let end = byte_offset.min(content.len());
        let column = content
            .get(line_start..end)
            .map(|prefix| prefix.chars().count())
            .unwrap_or_default();

        Position::new(line + 1, column)
    }

    /// Text of a 1-based line without its line terminator.
    pub fn line_text<'src>(&self, content: &'src str, line: usize) -> &'src str {
        let Some(start) = line.checked_sub(1).and_then(|idx| self.line_starts.get(idx)) else {
            return "";
        };
        let end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(content.len());

        content[*start..end].trim_end_matches(['\n', '\r'])
    }
}
