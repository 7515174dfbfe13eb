use std::fmt::Display;

use crate::parser::QueryParser;

/// Lines of source shown above the failing position.
const SNIPPET_LINES: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
    /// byte offset of the failing position
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub snippet: String,
}

impl ParseError {
    pub fn new(message: &str, pivot: usize, parser: &QueryParser) -> Self {
        let position = parser.position.min(parser.length);
        let (line, column) = Self::line_and_column(&parser.text_v, position);

        Self {
            message: message.to_string(),
            text: parser.text_from_range(pivot, position + 1),
            start: pivot,
            end: position,
            offset: parser.byte_offset(position),
            line,
            column,
            snippet: Self::render_snippet(&parser.text, line, column),
        }
    }

    /// Error located at offset zero, for input rejected before parsing starts.
    pub fn at_start(message: &str, source: &str) -> Self {
        Self {
            message: message.to_string(),
            text: String::new(),
            start: 0,
            end: 0,
            offset: 0,
            line: 1,
            column: 1,
            snippet: Self::render_snippet(source, 1, 1),
        }
    }

    pub fn err<T>(self) -> Result<T, ParseError> { Err(self) }

    fn line_and_column(text: &[char], position: usize) -> (usize, usize) {
        let mut line = 1;
        let mut column = 1;
        for ch in &text[..position] {
            if *ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line, column)
    }

    fn render_snippet(source: &str, line: usize, column: usize) -> String {
        let first = line.saturating_sub(SNIPPET_LINES - 1).max(1);
        let mut snippet = String::new();
        for (index, text) in source.split('\n').enumerate().skip(first - 1).take(line + 1 - first) {
            snippet.push_str(&format!("{:>4} | {}\n", index + 1, text.trim_end_matches('\r')));
        }
        snippet.push_str(&format!("     | {}^", " ".repeat(column - 1)));
        snippet
    }
}

impl Display for ParseError  {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ParseError: {}\n --> Line {}, Col {}\n{}", self.message, self.line, self.column, self.snippet)
    }
}

impl std::error::Error for ParseError {}
