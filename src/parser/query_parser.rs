use crate::parser::{ParseError, QueryComparers, WordComparer};

pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, Default)]
pub struct QueryParser {
    pub position: usize,
    pub length: usize,
    pub text_v: Vec<char>,
    pub text: String,
    /// byte offset of every char, plus one trailing entry for the end of input
    offsets: Vec<usize>,
    pub depth: usize,
    pub max_depth: usize,

    pub comparers: QueryComparers,
}

impl QueryParser {
    pub fn new(query: &str) -> Self {
        let text_v: Vec<char> = query.chars().collect();
        let mut offsets = Vec::with_capacity(text_v.len() + 1);
        offsets.extend(query.char_indices().map(|(offset, _)| offset));
        offsets.push(query.len());

        Self {
            position: 0,
            length: text_v.len(),
            text_v,
            text: query.to_string(),
            offsets,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            comparers: QueryComparers::new(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn eof(&self) -> bool {
        self.position >= self.length
    }

    pub fn current(&self) -> char {
        self.peek(0)
    }

    pub fn peek(&self, ahead: usize) -> char {
        match self.text_v.get(self.position + ahead) {
            Some(ch) => *ch,
            None => '\0',
        }
    }

    pub fn next(&mut self) {
        if self.position < self.length {
            self.position += 1;
        }
    }

    pub fn jump(&mut self, ahead: usize) {
        self.position = (self.position + ahead).min(self.length);
    }

    pub fn rewind(&mut self, pivot: usize) {
        self.position = pivot.min(self.length);
    }

    pub fn byte_offset(&self, position: usize) -> usize {
        self.offsets[position.min(self.length)]
    }

    /// Remaining input from the cursor, as a str slice for regex matching.
    pub fn rest(&self) -> &str {
        &self.text[self.byte_offset(self.position)..]
    }

    /// Advances over `bytes` bytes of `rest()`, which must end on a char boundary.
    pub fn jump_bytes(&mut self, bytes: usize) {
        let target = self.byte_offset(self.position) + bytes;
        while self.position < self.length && self.offsets[self.position] < target {
            self.position += 1;
        }
    }

    pub fn text_from_range(&self, start: usize, end: usize) -> String {
        let end = end.min(self.length);
        let start = start.min(end);
        self.text_v[start..end].iter().collect()
    }

    pub fn text_from_pivot(&self, pivot: usize) -> String {
        self.text_from_range(pivot, self.position)
    }

    /// True when no identifier char follows `position`.
    pub fn is_word_boundary(&self, position: usize) -> bool {
        match self.text_v.get(position) {
            Some(ch) => !WordComparer::is_word_char(*ch),
            None => true,
        }
    }

    /// Skips whitespace, `-- line` comments and `/* block */` comments.
    pub fn next_non_whitespace(&mut self) -> Result<(), ParseError> {
        loop {
            let current = self.current();
            if current.is_whitespace() {
                self.next();
            } else if current == '-' && self.peek(1) == '-' {
                while !self.eof() && !WordComparer::is_break_line(self.current()) {
                    self.next();
                }
            } else if current == '/' && self.peek(1) == '*' {
                let pivot = self.position;
                self.jump(2);
                loop {
                    if self.eof() {
                        return ParseError::new("An unexpected termination has appeared in the block comment.", pivot, self).err();
                    }
                    if self.current() == '*' && self.peek(1) == '/' {
                        self.jump(2);
                        break;
                    }
                    self.next();
                }
            } else {
                return Ok(());
            }
        }
    }

    /// Whitespace must be present here (a comment counts).
    pub fn expect_whitespace(&mut self, message: &str) -> Result<(), ParseError> {
        let pivot = self.position;
        self.next_non_whitespace()?;
        if self.position == pivot && !self.eof() {
            return ParseError::new(message, pivot, self).err();
        }
        Ok(())
    }

    pub fn consume_char(&mut self, ch: char) -> bool {
        if self.current() == ch && !self.eof() {
            self.next();
            return true;
        }
        false
    }

    pub fn expect_char(&mut self, ch: char, message: &str) -> Result<(), ParseError> {
        if self.consume_char(ch) {
            return Ok(());
        }
        ParseError::new(message, self.position, self).err()
    }

    pub fn enter_nesting(&mut self) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            return ParseError::new("The expression is nested too deeply.", self.position, self).err();
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave_nesting(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Looks past whitespace without moving the cursor.
    pub fn lookahead<T>(&mut self, check: impl FnOnce(&Self) -> T) -> Result<T, ParseError> {
        let pivot = self.position;
        self.next_non_whitespace()?;
        let result = check(self);
        self.rewind(pivot);
        Ok(result)
    }

    /// Moves the cursor past the selected keyword when it matches.
    pub fn consume_keyword(&mut self, keyword: impl Fn(&QueryComparers) -> &WordComparer) -> bool {
        match keyword(&self.comparers).match_length(self) {
            Some(length) => {
                self.jump(length);
                true
            },
            None => false,
        }
    }

    pub fn is_reserved_ahead(&self) -> bool {
        self.comparers.is_reserved(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::QueryParser;

    #[test]
    pub fn test_cursor_over_multibyte_text() {
        let mut parser = QueryParser::new("é 'x'");

        assert_eq!(parser.current(), 'é');
        parser.next();
        assert_eq!(parser.byte_offset(parser.position), 2);
        assert_eq!(parser.rest(), " 'x'");
    }

    #[test]
    pub fn test_skip_comments() {
        let text = "  -- line comment\n /* block\n comment */ SELECT";
        let mut parser = QueryParser::new(text);

        parser.next_non_whitespace().expect("Failed to skip comments");

        assert_eq!(parser.text_from_range(parser.position, parser.length), "SELECT");
    }

    #[test]
    pub fn test_unterminated_block_comment() {
        let mut parser = QueryParser::new("/* never closed");

        match parser.next_non_whitespace() {
            Ok(_) => panic!(),
            Err(err) => assert_eq!(err.start, 0),
        }
    }

    #[test]
    pub fn test_word_boundary() {
        let parser = QueryParser::new("ab c$d");

        assert!(!parser.is_word_boundary(1));
        assert!(parser.is_word_boundary(2));
        assert!(!parser.is_word_boundary(4));
        assert!(parser.is_word_boundary(6));
    }

    #[test]
    pub fn test_nesting_limit() {
        let mut parser = QueryParser::new("((").with_max_depth(1);

        parser.enter_nesting().expect("First level is allowed");
        assert!(parser.enter_nesting().is_err());
        parser.leave_nesting();
        assert_eq!(parser.depth, 0);
    }

    #[test]
    pub fn test_consume_keyword() {
        let mut parser = QueryParser::new("FROM Contact");

        assert!(parser.consume_keyword(|keywords| &keywords.from));
        assert_eq!(parser.position, 4);
        assert!(!parser.consume_keyword(|keywords| &keywords.from));
    }

    #[test]
    pub fn test_jump_bytes() {
        let mut parser = QueryParser::new("ü2020-01-01 rest");
        parser.next();
        parser.jump_bytes(10);

        assert_eq!(parser.current(), ' ');
    }
}
