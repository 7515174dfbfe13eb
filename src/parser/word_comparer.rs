use crate::parser::QueryParser;

/// Case-insensitive keyword matcher. Multi-word keywords ("ORDER BY")
/// accept any run of whitespace between their words.
#[derive(Debug, Default)]
pub struct WordComparer {
    pub keyword: String,
    words: Vec<Vec<char>>,
    word_boundary: bool,
}

impl WordComparer {
    pub fn new(word: &str) -> Self {
        Self {
            keyword: word.to_string(),
            words: word
                .split_whitespace()
                .map(|part| part.to_uppercase().chars().collect())
                .collect(),
            word_boundary: false,
        }
    }

    pub fn with_word_boundary(mut self) -> Self { self.word_boundary = true; self }

    pub fn is_word_char(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_' || ch == '$'
    }

    pub fn is_block_delimiter(ch: char) -> bool {
        ch.is_whitespace()
    }

    pub fn is_break_line(ch: char) -> bool {
        ch == '\r' || ch == '\n'
    }

    /// Number of chars the keyword spans at the cursor, if it matches.
    pub fn match_length(&self, parser: &QueryParser) -> Option<usize> {
        let mut position = parser.position;
        for (index, word) in self.words.iter().enumerate() {
            if index > 0 {
                let gap = position;
                while position < parser.length && Self::is_block_delimiter(parser.text_v[position]) {
                    position += 1;
                }
                if gap == position {
                    return None;
                }
            }
            for ch in word {
                if position >= parser.length || parser.text_v[position].to_uppercase().ne(ch.to_uppercase()) {
                    return None;
                }
                position += 1;
            }
        }

        if self.word_boundary && !parser.is_word_boundary(position) {
            return None;
        }

        Some(position - parser.position)
    }

    pub fn compare(&self, parser: &QueryParser) -> bool {
        self.match_length(parser).is_some()
    }
}
