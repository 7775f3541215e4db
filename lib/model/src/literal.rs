use std::fmt::{Display, Formatter, Write};

/// An RDF literal, consisting of a lexical value and optional metadata.
///
/// A literal carries either a datatype IRI, a language tag, or neither (a simple literal). Language
/// tags are normalized to lowercase on construction, as they are case-insensitive.
#[derive(Clone, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct Literal {
    value: String,
    datatype: Option<String>,
    language: Option<String>,
}

impl Literal {
    /// Creates a simple literal without any metadata.
    pub fn new_simple_literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Creates a literal with the datatype `datatype`.
    pub fn new_typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    /// Creates a literal tagged with `language`.
    pub fn new_language_tagged_literal(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: Some(language.into().to_ascii_lowercase()),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Returns true if neither a datatype nor a language tag is attached.
    pub fn is_simple(&self) -> bool {
        self.datatype.is_none() && self.language.is_none()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_char('"')?;
        for c in self.value.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                c => f.write_char(c)?,
            }
        }
        f.write_char('"')?;
        if let Some(language) = &self.language {
            write!(f, "@{language}")
        } else if let Some(datatype) = &self.datatype {
            write!(f, "^^<{datatype}>")
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_tags_are_normalized() {
        let literal = Literal::new_language_tagged_literal("chat", "FR");
        assert_eq!(literal.language(), Some("fr"));
        assert_eq!(literal, Literal::new_language_tagged_literal("chat", "fr"));
    }

    #[test]
    fn display_escapes_special_characters() {
        let literal = Literal::new_simple_literal("say \"hi\"\n");
        assert_eq!(literal.to_string(), r#""say \"hi\"\n""#);
    }

    #[test]
    fn display_typed_literal() {
        let literal = Literal::new_typed_literal("22", "http://www.w3.org/2001/XMLSchema#integer");
        assert_eq!(
            literal.to_string(),
            "\"22\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }
}
