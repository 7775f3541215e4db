use crate::config::SplitRule;
use crate::error::{TurtleParseError, TurtleSyntaxError};
use crate::lexer::{LexedLine, Lexer, Segment};
use crate::token::{enclosed, Token, TokenKind};
use std::collections::VecDeque;
use std::io::BufRead;

const EXPECTED_PREFIX_NAME: &str = "a prefix name ending with ':'";
const EXPECTED_PREFIX_IRI: &str = "an IRI enclosed in '<' and '>'";
const EXPECTED_PREFIX_END: &str = "'.' closing the declaration";

/// Progress through the `name: <iri> .` micro-grammar of a prefix declaration.
#[derive(Debug)]
enum PrefixScan {
    Name,
    Iri { name: String },
    End { name: String, iri: String },
    Done,
}

/// The prefix-scanning sub-state, active for the whole line whose first word is `@prefix` (or
/// the SPARQL-style `PREFIX`, which has no closing `.`).
#[derive(Debug)]
struct PrefixLine {
    scan: PrefixScan,
    sparql: bool,
}

/// Turns the segments produced by a [`Lexer`] into classified [`Token`]s, lazily.
///
/// The tokenizer stops after the first [`TokenKind::Illegal`] token or I/O error.
pub struct Tokenizer<R> {
    lexer: Lexer<R>,
    pending: VecDeque<Segment>,
    prefix_line: Option<PrefixLine>,
    line_number: usize,
    finished: bool,
}

impl<R: BufRead> Tokenizer<R> {
    pub fn new(reader: R, split_rule: SplitRule) -> Self {
        Self {
            lexer: Lexer::new(reader, split_rule),
            pending: VecDeque::new(),
            prefix_line: None,
            line_number: 0,
            finished: false,
        }
    }

    /// Returns the number of the last line read.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn start_line(&mut self, line: LexedLine) {
        self.line_number = line.number;
        self.pending = line.segments.into();
        self.prefix_line = match self.pending.front().map(|s| s.text.as_str()) {
            Some("@prefix") => Some(PrefixLine {
                scan: PrefixScan::Done,
                sparql: false,
            }),
            Some(word) if word.eq_ignore_ascii_case("PREFIX") => Some(PrefixLine {
                scan: PrefixScan::Done,
                sparql: true,
            }),
            _ => None,
        };
    }

    /// Checks that a prefix declaration is not left incomplete at the end of the line.
    fn end_line(&mut self) -> Option<Token> {
        let prefix_line = self.prefix_line.take()?;
        let expected = match prefix_line.scan {
            PrefixScan::Done => return None,
            PrefixScan::Name => EXPECTED_PREFIX_NAME,
            PrefixScan::Iri { .. } => EXPECTED_PREFIX_IRI,
            PrefixScan::End { .. } => EXPECTED_PREFIX_END,
        };
        let segment = Segment {
            text: "end of line".to_owned(),
            line: self.line_number,
            column: 0,
        };
        let error = TurtleSyntaxError::MalformedPrefixDeclaration {
            token: segment.text.clone(),
            expected,
            line: segment.line,
            column: segment.column,
        };
        Some(Token::new(TokenKind::Illegal(error), segment))
    }

    /// Routes a word of a prefix line through the declaration micro-grammar.
    ///
    /// Returns `None` if the word was consumed without completing a declaration.
    fn scan_prefix(prefix_line: &mut PrefixLine, segment: Segment) -> Option<Token> {
        let word = segment.text.as_str();
        let scan = std::mem::replace(&mut prefix_line.scan, PrefixScan::Done);
        let malformed = |expected| TurtleSyntaxError::MalformedPrefixDeclaration {
            token: segment.text.clone(),
            expected,
            line: segment.line,
            column: segment.column,
        };

        let error = match scan {
            PrefixScan::Done if is_prefix_keyword(word, prefix_line.sparql) => {
                prefix_line.scan = PrefixScan::Name;
                return None;
            }
            PrefixScan::Done => TurtleSyntaxError::UnexpectedPrefixToken {
                token: segment.text.clone(),
                line: segment.line,
                column: segment.column,
            },
            PrefixScan::Name => match word.strip_suffix(':') {
                Some(name) if !name.contains(':') => {
                    prefix_line.scan = PrefixScan::Iri {
                        name: name.to_owned(),
                    };
                    return None;
                }
                _ => malformed(EXPECTED_PREFIX_NAME),
            },
            PrefixScan::Iri { name } => match enclosed(word, '<', '>') {
                Some(iri) if prefix_line.sparql => {
                    let kind = TokenKind::PrefixDecl {
                        name,
                        iri: iri.to_owned(),
                    };
                    return Some(Token::new(kind, segment));
                }
                Some(iri) => {
                    prefix_line.scan = PrefixScan::End {
                        name,
                        iri: iri.to_owned(),
                    };
                    return None;
                }
                None => malformed(EXPECTED_PREFIX_IRI),
            },
            PrefixScan::End { name, iri } if word == "." => {
                return Some(Token::new(TokenKind::PrefixDecl { name, iri }, segment));
            }
            PrefixScan::End { .. } => malformed(EXPECTED_PREFIX_END),
        };
        Some(Token::new(TokenKind::Illegal(error), segment))
    }

    fn next_token(&mut self) -> Option<Result<Token, TurtleParseError>> {
        loop {
            let Some(segment) = self.pending.pop_front() else {
                if let Some(token) = self.end_line() {
                    return Some(Ok(token));
                }
                match self.lexer.next()? {
                    Ok(line) => self.start_line(line),
                    Err(error) => return Some(Err(error.into())),
                }
                continue;
            };

            match &mut self.prefix_line {
                Some(prefix_line) => {
                    if let Some(token) = Self::scan_prefix(prefix_line, segment) {
                        return Some(Ok(token));
                    }
                }
                None => return Some(Ok(Token::classify(segment))),
            }
        }
    }
}

fn is_prefix_keyword(word: &str, sparql: bool) -> bool {
    if sparql {
        word.eq_ignore_ascii_case("PREFIX")
    } else {
        word == "@prefix"
    }
}

impl<R: BufRead> Iterator for Tokenizer<R> {
    type Item = Result<Token, TurtleParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let next = self.next_token();
        match &next {
            None | Some(Err(_)) => self.finished = true,
            Some(Ok(token)) if matches!(token.kind, TokenKind::Illegal(_)) => self.finished = true,
            Some(Ok(_)) => {}
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input.as_bytes(), SplitRule::turtle())
            .map(|token| token.unwrap().kind)
            .collect()
    }

    fn illegal_message(input: &str) -> String {
        match tokenize(input).pop() {
            Some(TokenKind::Illegal(error)) => error.to_string(),
            other => format!("no illegal token: {other:?}"),
        }
    }

    #[test]
    fn scans_prefix_declarations() {
        assert_eq!(
            tokenize("@prefix foaf: <http://xmlns.com/foaf/0.1/> .\n"),
            vec![TokenKind::PrefixDecl {
                name: "foaf".to_owned(),
                iri: "http://xmlns.com/foaf/0.1/".to_owned()
            }]
        );
    }

    #[test]
    fn scans_sparql_style_prefix_declarations() {
        assert_eq!(
            tokenize("PREFIX : <http://ex.com/>\n<a> <b> <c> ."),
            vec![
                TokenKind::PrefixDecl {
                    name: String::new(),
                    iri: "http://ex.com/".to_owned()
                },
                TokenKind::Uri("a".to_owned()),
                TokenKind::Uri("b".to_owned()),
                TokenKind::Uri("c".to_owned()),
                TokenKind::End('.'),
            ]
        );
    }

    #[test]
    fn prefix_state_only_lasts_for_the_line() {
        let tokens = tokenize("@prefix ex: <http://ex.com/> .\nex:a ex:b ex:c .\n");
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[1], TokenKind::PrefixedUri("ex:a".to_owned()));
    }

    #[test]
    fn illegal_token_message() {
        insta::assert_snapshot!(
            illegal_message("illegal_token\n"),
            @"Unexpected token when scanning 'illegal_token' at line : 1 row : 1"
        );
    }

    #[test]
    fn malformed_prefix_name() {
        insta::assert_snapshot!(
            illegal_message("@prefix foaf <http://xmlns.com/foaf/0.1/> .\n"),
            @"Malformed prefix declaration when scanning 'foaf' at line : 1 row : 9, expected a prefix name ending with ':'"
        );
    }

    #[test]
    fn malformed_prefix_iri() {
        insta::assert_snapshot!(
            illegal_message("@prefix foaf: http://xmlns.com/foaf/0.1/ .\n"),
            @"Malformed prefix declaration when scanning 'http://xmlns.com/foaf/0.1/' at line : 1 row : 15, expected an IRI enclosed in '<' and '>'"
        );
    }

    #[test]
    fn out_of_sequence_prefix_token() {
        insta::assert_snapshot!(
            illegal_message("@prefix ex: <http://ex.com/> . ex:a\n"),
            @"Unexpected token when scanning 'ex:a', expected a prefix definition at line : 1 row : 32"
        );
    }

    #[test]
    fn incomplete_prefix_declaration() {
        insta::assert_snapshot!(
            illegal_message("@prefix ex: <http://ex.com/>\n<a> <b> <c> .\n"),
            @"Malformed prefix declaration when scanning 'end of line' at line : 1 row : 0, expected '.' closing the declaration"
        );
    }

    #[test]
    fn stops_after_an_illegal_token() {
        let tokens = tokenize("<a> oops <c> .\n<d> <e> <f> .\n");
        assert_eq!(tokens.len(), 2);
        assert!(matches!(tokens[1], TokenKind::Illegal(_)));
    }

    #[test]
    fn tracks_rows_of_tokens() {
        let tokens = Tokenizer::new("\n  <a> <b>   <c> .".as_bytes(), SplitRule::turtle())
            .map(|token| {
                let token = token.unwrap();
                (token.line, token.column)
            })
            .collect::<Vec<_>>();
        assert_eq!(tokens, vec![(2, 3), (2, 7), (2, 13), (2, 17)]);
    }
}
