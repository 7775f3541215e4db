use crate::config::ParserConfig;
use crate::error::{TurtleParseError, TurtleSyntaxError};
use crate::lexer::{LexedLine, Lexer};
use crate::token::{enclosed, Token, TokenKind};
use std::io::BufRead;
use tracing::warn;
use triplestream_model::{Literal, Node, Triple};

/// A streaming parser for the [N-Triples](https://www.w3.org/TR/n-triples/) subset: one
/// `subject predicate object .` triple per line.
///
/// The parser shares the [`Lexer`] and the token classification of the Turtle parser but allows no
/// prefixes, no abbreviations and no bare literals.
pub struct NTriplesParser<R> {
    lexer: Lexer<R>,
    finished: bool,
}

impl<R: BufRead> NTriplesParser<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, &ParserConfig::default())
    }

    pub fn with_config(reader: R, config: &ParserConfig) -> Self {
        Self {
            lexer: Lexer::new(reader, config.split_rule.clone()),
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for NTriplesParser<R> {
    type Item = Result<Triple, TurtleParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = match self.lexer.next()? {
            Ok(line) => parse_line(line).map_err(TurtleParseError::from),
            Err(error) => Err(error.into()),
        };
        if let Err(error) = &result {
            warn!("Aborting N-Triples parse: {error}");
            self.finished = true;
        }
        Some(result)
    }
}

fn parse_line(line: LexedLine) -> Result<Triple, TurtleSyntaxError> {
    let line_number = line.number;
    let mut tokens = line.segments.into_iter().map(Token::classify);
    let mut next = |expected: &'static str| -> Result<Token, TurtleSyntaxError> {
        let token = tokens.next().ok_or(TurtleSyntaxError::UnexpectedToken {
            token: "end of line".to_owned(),
            expected,
            line: line_number,
            column: 0,
        })?;
        match token.kind {
            TokenKind::Illegal(error) => Err(error),
            _ => Ok(token),
        }
    };

    let subject = match next("a subject")? {
        Token {
            kind: TokenKind::Uri(iri),
            ..
        } => Node::Uri(iri),
        Token {
            kind: TokenKind::BlankNode(label),
            ..
        } => Node::BlankNode(label),
        token => return Err(unexpected(&token, "a URI or a blank node as subject")),
    };
    let predicate = match next("a predicate")? {
        Token {
            kind: TokenKind::Uri(iri),
            ..
        } => Node::Uri(iri),
        token => return Err(unexpected(&token, "a URI as predicate")),
    };
    let object_token = next("an object")?;
    let mut object = match &object_token.kind {
        TokenKind::Uri(iri) => Node::Uri(iri.clone()),
        TokenKind::BlankNode(label) => Node::BlankNode(label.clone()),
        TokenKind::Literal(literal) if object_token.text.starts_with('"') => {
            Node::Literal(literal.clone())
        }
        _ => {
            return Err(unexpected(
                &object_token,
                "a URI, a blank node or a quoted literal as object",
            ))
        }
    };

    let mut end = next("'.'")?;
    if let Node::Literal(literal) = &object {
        let value = literal.value().to_owned();
        match &end.kind {
            TokenKind::Lang(language) => {
                object = Node::Literal(Literal::new_language_tagged_literal(value, language));
                end = next("'.'")?;
            }
            TokenKind::Datatype(datatype) => {
                let Some(iri) = enclosed(datatype, '<', '>') else {
                    return Err(unexpected(&end, "a datatype IRI enclosed in '<' and '>'"));
                };
                object = Node::Literal(Literal::new_typed_literal(value, iri));
                end = next("'.'")?;
            }
            _ => {}
        }
    }

    if end.kind != TokenKind::End('.') {
        return Err(unexpected(&end, "'.' ending the triple"));
    }
    if let Some(extra) = tokens.next() {
        return Err(unexpected(&extra, "the end of the line after '.'"));
    }
    Ok(Triple::new(subject, predicate, object))
}

fn unexpected(token: &Token, expected: &'static str) -> TurtleSyntaxError {
    TurtleSyntaxError::UnexpectedToken {
        token: token.text.clone(),
        expected,
        line: token.line,
        column: token.column,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Vec<Result<Triple, String>> {
        NTriplesParser::new(input.as_bytes())
            .map(|result| result.map_err(|e| e.to_string()))
            .collect()
    }

    #[test]
    fn parses_one_triple_per_line() {
        let triples = parse(concat!(
            "<http://ex.com/Tom> <http://ex.com/age> \"22\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n",
            "# comment\n",
            "_:b0 <http://ex.com/name> \"chat\"@fr .\n",
            "<http://ex.com/Tom> <http://ex.com/knows> _:b0 .\n",
        ));
        assert_eq!(
            triples,
            vec![
                Ok(Triple::new(
                    Node::uri("http://ex.com/Tom"),
                    Node::uri("http://ex.com/age"),
                    Literal::new_typed_literal("22", "http://www.w3.org/2001/XMLSchema#integer"),
                )),
                Ok(Triple::new(
                    Node::blank_node("b0"),
                    Node::uri("http://ex.com/name"),
                    Literal::new_language_tagged_literal("chat", "fr"),
                )),
                Ok(Triple::new(
                    Node::uri("http://ex.com/Tom"),
                    Node::uri("http://ex.com/knows"),
                    Node::blank_node("b0"),
                )),
            ]
        );
    }

    #[test]
    fn rejects_prefixed_names() {
        let results = parse("ex:a <http://ex.com/p> <http://ex.com/o> .\n<a> <b> <c> .\n");
        assert_eq!(results.len(), 1);
        insta::assert_snapshot!(
            results[0].clone().unwrap_err(),
            @"Unexpected token when scanning 'ex:a' at line : 1 row : 1, expected a URI or a blank node as subject"
        );
    }

    #[test]
    fn rejects_missing_dot() {
        let results = parse("<a> <b> <c>\n");
        insta::assert_snapshot!(
            results[0].clone().unwrap_err(),
            @"Unexpected token when scanning 'end of line' at line : 1 row : 0, expected '.'"
        );
    }

    #[test]
    fn rejects_trailing_words() {
        let results = parse("<a> <b> <c> . <d>\n");
        assert!(results[0].is_err());
    }
}
