use crate::config::SplitRule;
use std::io::{self, BufRead};

/// A word of the input, located by its 1-based line and column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub line: usize,
    pub column: usize,
}

/// The segments of one non-empty input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexedLine {
    pub number: usize,
    pub segments: Vec<Segment>,
}

/// Splits the lines of a reader into word segments.
///
/// Blank lines and comments (from a `#` word up to the end of the line) are skipped. The lexer only
/// cuts; classifying segments is the job of the [`Tokenizer`](crate::Tokenizer).
pub struct Lexer<R> {
    reader: R,
    split_rule: SplitRule,
    line_number: usize,
    buffer: String,
}

impl<R: BufRead> Lexer<R> {
    pub fn new(reader: R, split_rule: SplitRule) -> Self {
        Self {
            reader,
            split_rule,
            line_number: 0,
            buffer: String::new(),
        }
    }

    /// Returns the number of the last line read.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn read_line(&mut self) -> io::Result<bool> {
        self.buffer.clear();
        if self.reader.read_line(&mut self.buffer)? == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        Ok(true)
    }

    fn split_line(&self) -> Vec<Segment> {
        let line = self.buffer.trim_end_matches(['\n', '\r']);
        let mut segments = Vec::new();
        for word in self.split_rule.regex().find_iter(line) {
            if word.as_str().starts_with('#') {
                break;
            }
            segments.push(Segment {
                text: word.as_str().to_owned(),
                line: self.line_number,
                column: line[..word.start()].chars().count() + 1,
            });
        }
        segments
    }
}

impl<R: BufRead> Iterator for Lexer<R> {
    type Item = io::Result<LexedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.read_line() {
                Ok(true) => {}
                Ok(false) => return None,
                Err(error) => return Some(Err(error)),
            }
            let segments = self.split_line();
            if !segments.is_empty() {
                return Some(Ok(LexedLine {
                    number: self.line_number,
                    segments,
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Vec<(String, usize, usize)>> {
        Lexer::new(input.as_bytes(), SplitRule::turtle())
            .map(|line| {
                line.unwrap()
                    .segments
                    .into_iter()
                    .map(|s| (s.text, s.line, s.column))
                    .collect()
            })
            .collect()
    }

    fn words(input: &str) -> Vec<String> {
        lex(input)
            .into_iter()
            .flatten()
            .map(|(text, _, _)| text)
            .collect()
    }

    #[test]
    fn skips_blank_lines_and_comments() {
        let lines = lex("# a comment\n\n<a> <b> <c> . # trailing\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0],
            vec![
                ("<a>".to_owned(), 3, 1),
                ("<b>".to_owned(), 3, 5),
                ("<c>".to_owned(), 3, 9),
                (".".to_owned(), 3, 13),
            ]
        );
    }

    #[test]
    fn keeps_iris_and_literals_atomic() {
        assert_eq!(
            words(r#"<http://ex.com/a#b> ex:p "hello world", 'it is'."#),
            vec![
                "<http://ex.com/a#b>",
                "ex:p",
                "\"hello world\"",
                ",",
                "'it is'",
                "."
            ]
        );
    }

    #[test]
    fn splits_literal_suffixes() {
        assert_eq!(
            words(r#""22"^^xsd:integer; "chat"@fr ; "x"^^<http://ex.com/t>."#),
            vec![
                "\"22\"",
                "^^xsd:integer",
                ";",
                "\"chat\"",
                "@fr",
                ";",
                "\"x\"",
                "^^<http://ex.com/t>",
                "."
            ]
        );
    }

    #[test]
    fn splits_punctuation_off_bare_words() {
        assert_eq!(
            words("ex:a ex:p [ex:q ex:r], ex:s."),
            vec!["ex:a", "ex:p", "[", "ex:q", "ex:r", "]", ",", "ex:s", "."]
        );
    }

    #[test]
    fn keeps_numbers_with_a_leading_dot() {
        assert_eq!(
            words("<a> <p> .5 , -.5 , .5e3 , 1.5."),
            vec!["<a>", "<p>", ".5", ",", "-.5", ",", ".5e3", ",", "1.5", "."]
        );
    }

    #[test]
    fn keeps_escaped_quotes_inside_literals() {
        assert_eq!(words(r#""say \"hi\"" ."#), vec![r#""say \"hi\"""#, "."]);
    }

    #[test]
    fn counts_columns_in_characters() {
        let lines = lex("\"é\" <b>");
        assert_eq!(lines[0][1], ("<b>".to_owned(), 1, 5));
    }
}
