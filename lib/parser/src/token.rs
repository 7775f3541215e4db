use crate::error::TurtleSyntaxError;
use crate::lexer::Segment;
use regex::Regex;
use std::sync::LazyLock;
use triplestream_model::vocab::{rdf, xsd};
use triplestream_model::Literal;

#[allow(clippy::expect_used, reason = "The patterns are valid constants")]
static NUMERIC_LITERALS: LazyLock<[(Regex, &'static str); 3]> = LazyLock::new(|| {
    [
        (Regex::new(r"^[+-]?\d+$").expect("valid pattern"), xsd::INTEGER),
        (Regex::new(r"^[+-]?\d*\.\d+$").expect("valid pattern"), xsd::DECIMAL),
        (
            Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)[eE][+-]?\d+$").expect("valid pattern"),
            xsd::DOUBLE,
        ),
    ]
});

/// A classified word of a Turtle document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// An IRI in angle brackets, without the brackets.
    Uri(String),
    /// A quoted string (unescaped, without quotes), or a bare number or boolean.
    Literal(Literal),
    /// `_:label`, without the `_:`.
    BlankNode(String),
    /// `?name`, without the `?`.
    Variable(String),
    /// `prefix:local`, to be expanded against the declared prefixes.
    PrefixedUri(String),
    /// A complete `@prefix name: <iri> .` declaration.
    PrefixDecl { name: String, iri: String },
    /// `@tag`, without the `@`.
    Lang(String),
    /// `^^datatype`, without the `^^`. Either `<iri>` or a prefixed name.
    Datatype(String),
    /// One of `;`, `,` and `[`.
    Separator(char),
    /// One of `.` and `]`.
    End(char),
    /// A word that could not be classified.
    Illegal(TurtleSyntaxError),
}

/// A token together with the text and position it was read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, segment: Segment) -> Self {
        Self {
            kind,
            text: segment.text,
            line: segment.line,
            column: segment.column,
        }
    }

    /// Classifies a word outside of prefix declarations.
    pub fn classify(segment: Segment) -> Self {
        let kind = classify_word(&segment);
        Self::new(kind, segment)
    }
}

fn classify_word(segment: &Segment) -> TokenKind {
    let word = segment.text.as_str();
    match word {
        "." | "]" => return TokenKind::End(first_char(word)),
        ";" | "," | "[" => return TokenKind::Separator(first_char(word)),
        "a" => return TokenKind::Uri(rdf::TYPE.to_owned()),
        "true" | "false" => {
            return TokenKind::Literal(Literal::new_typed_literal(word, xsd::BOOLEAN))
        }
        _ => {}
    }

    if let Some(iri) = enclosed(word, '<', '>') {
        TokenKind::Uri(iri.to_owned())
    } else if let Some(value) = enclosed(word, '"', '"').or_else(|| enclosed(word, '\'', '\'')) {
        TokenKind::Literal(Literal::new_simple_literal(unescape(value)))
    } else if let Some(datatype) = word.strip_prefix("^^").filter(|d| !d.is_empty()) {
        TokenKind::Datatype(datatype.to_owned())
    } else if let Some(language) = word.strip_prefix('@').filter(|l| !l.is_empty()) {
        TokenKind::Lang(language.to_owned())
    } else if let Some(label) = word.strip_prefix("_:").filter(|l| !l.is_empty()) {
        TokenKind::BlankNode(label.to_owned())
    } else if let Some(name) = word.strip_prefix('?').filter(|n| !n.is_empty()) {
        TokenKind::Variable(name.to_owned())
    } else if word.contains(':') {
        TokenKind::PrefixedUri(word.to_owned())
    } else if let Some((_, datatype)) = NUMERIC_LITERALS.iter().find(|(re, _)| re.is_match(word)) {
        TokenKind::Literal(Literal::new_typed_literal(word, *datatype))
    } else {
        TokenKind::Illegal(TurtleSyntaxError::UnrecognizedToken {
            token: word.to_owned(),
            line: segment.line,
            column: segment.column,
        })
    }
}

fn first_char(word: &str) -> char {
    word.chars().next().unwrap_or_default()
}

/// Returns the inside of `word` if it starts with `open` and ends with `close`.
pub(crate) fn enclosed(word: &str, open: char, close: char) -> Option<&str> {
    if word.len() < open.len_utf8() + close.len_utf8() {
        return None;
    }
    word.strip_prefix(open)?.strip_suffix(close)
}

/// Resolves the string escapes of a quoted literal. Unknown escapes are kept verbatim.
pub(crate) fn unescape(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('b') => result.push('\u{8}'),
            Some('f') => result.push('\u{c}'),
            Some(c @ ('"' | '\'' | '\\')) => result.push(c),
            Some(c @ ('u' | 'U')) => {
                let len = if c == 'u' { 4 } else { 8 };
                let code = chars.by_ref().take(len).collect::<String>();
                match u32::from_str_radix(&code, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if code.len() == len => result.push(decoded),
                    _ => {
                        result.push('\\');
                        result.push(c);
                        result.push_str(&code);
                    }
                }
            }
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(word: &str) -> TokenKind {
        Token::classify(Segment {
            text: word.to_owned(),
            line: 1,
            column: 1,
        })
        .kind
    }

    #[test]
    fn classifies_punctuation() {
        assert_eq!(kind("."), TokenKind::End('.'));
        assert_eq!(kind("]"), TokenKind::End(']'));
        assert_eq!(kind(";"), TokenKind::Separator(';'));
        assert_eq!(kind(","), TokenKind::Separator(','));
        assert_eq!(kind("["), TokenKind::Separator('['));
    }

    #[test]
    fn classifies_terms() {
        assert_eq!(
            kind("<http://ex.com/a>"),
            TokenKind::Uri("http://ex.com/a".to_owned())
        );
        assert_eq!(
            kind("\"Toto\""),
            TokenKind::Literal(Literal::new_simple_literal("Toto"))
        );
        assert_eq!(
            kind("'Toto'"),
            TokenKind::Literal(Literal::new_simple_literal("Toto"))
        );
        assert_eq!(kind("_:b1"), TokenKind::BlankNode("b1".to_owned()));
        assert_eq!(kind("?x"), TokenKind::Variable("x".to_owned()));
        assert_eq!(kind("ex:foo"), TokenKind::PrefixedUri("ex:foo".to_owned()));
        assert_eq!(kind("a"), TokenKind::Uri(rdf::TYPE.to_owned()));
    }

    #[test]
    fn classifies_literal_metadata() {
        assert_eq!(
            kind("^^xsd:integer"),
            TokenKind::Datatype("xsd:integer".to_owned())
        );
        assert_eq!(kind("@en"), TokenKind::Lang("en".to_owned()));
    }

    #[test]
    fn classifies_bare_numbers_and_booleans() {
        assert_eq!(
            kind("22"),
            TokenKind::Literal(Literal::new_typed_literal("22", xsd::INTEGER))
        );
        assert_eq!(
            kind("-3.5"),
            TokenKind::Literal(Literal::new_typed_literal("-3.5", xsd::DECIMAL))
        );
        assert_eq!(
            kind("1e3"),
            TokenKind::Literal(Literal::new_typed_literal("1e3", xsd::DOUBLE))
        );
        assert_eq!(
            kind("true"),
            TokenKind::Literal(Literal::new_typed_literal("true", xsd::BOOLEAN))
        );
    }

    #[test]
    fn unknown_words_are_illegal() {
        insta::assert_snapshot!(
            kind("illegal_token").to_illegal_message(),
            @"Unexpected token when scanning 'illegal_token' at line : 1 row : 1"
        );
        assert!(matches!(kind("\""), TokenKind::Illegal(_)));
        assert!(matches!(kind("^^"), TokenKind::Illegal(_)));
    }

    #[test]
    fn unescapes_literals() {
        assert_eq!(unescape(r#"a\"b\\c\nd"#), "a\"b\\c\nd");
        assert_eq!(unescape(r"ét\U0001F600"), "\u{e9}t\u{1F600}");
        assert_eq!(unescape(r"\q\u12"), r"\q\u12");
    }

    impl TokenKind {
        fn to_illegal_message(&self) -> String {
            match self {
                TokenKind::Illegal(error) => error.to_string(),
                other => format!("not illegal: {other:?}"),
            }
        }
    }
}
