/// A line-aligned slice of the full script text.
///
/// `start_line` is the absolute (0-based) number of the first line in `text`.
/// `ends_with_break` records whether the newline that terminated this chunk was
/// consumed by the segmenter; it is false only for the final chunk and for
/// hard splits inside a single oversized line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub start_line: usize,
    pub ends_with_break: bool,
}

/// One line of a chunk with its absolute position in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    pub absolute_line_number: usize,
    pub content: &'a str,
}

impl Chunk {
    pub fn new(text: String, start_line: usize, ends_with_break: bool) -> Self {
        Self {
            text,
            start_line,
            ends_with_break,
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = RawLine<'_>> {
        let start = self.start_line;
        self.text
            .split('\n')
            .enumerate()
            .map(move |(index, content)| RawLine {
                absolute_line_number: start + index,
                content,
            })
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Absolute number of the last line contained in this chunk.
    pub fn last_line(&self) -> usize {
        self.start_line + self.line_count() - 1
    }
}
