use crate::config::ParserConfig;
use crate::error::{IncompleteParse, TurtleParseError, TurtleSyntaxError};
use crate::token::{enclosed, Token, TokenKind};
use crate::tokenizer::Tokenizer;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};
use triplestream_model::{Literal, Node, Triple};

const EXPECTED_SUBJECT: &str = "a URI, a blank node or a variable as subject";
const EXPECTED_PREDICATE: &str = "a URI or a variable as predicate";
const EXPECTED_STATEMENT_END: &str = "'.', ',' or ';' after the object";
const EXPECTED_OBJECT: &str = "an object before the separator";
const EXPECTED_LITERAL: &str = "a literal before its datatype or language tag";
const EXPECTED_SINGLE_METADATA: &str = "at most one datatype or language tag per literal";
const EXPECTED_DATATYPE: &str = "a datatype IRI or prefixed name";
const EXPECTED_COMPLETE_STATEMENT: &str = "a complete statement";

/// The context saved when entering a blank node property list.
#[derive(Debug)]
struct Frame {
    subject: Option<Node>,
    predicate: Option<Node>,
    node: Node,
}

/// A literal waiting for a possible datatype or language tag.
#[derive(Debug)]
struct PendingLiteral {
    literal: Literal,
    token: Token,
}

/// A streaming parser for the [Turtle](https://www.w3.org/TR/turtle/) subset.
///
/// The parser is a stack machine driven by a pull-based [`Tokenizer`]. Triples are yielded as soon
/// as their object is read, in document order. The first error ends the parse: the triples completed
/// before it are still yielded, then the error is yielded once and the iterator is fused.
///
/// ```
/// use triplestream_parser::TurtleParser;
///
/// let document = "@prefix ex: <http://example.com/> .\nex:Tom ex:knows [ ex:name \"Ann\" ] .";
/// let triples = TurtleParser::new(document.as_bytes())
///     .collect::<Result<Vec<_>, _>>()
///     .unwrap();
/// assert_eq!(triples.len(), 2);
/// ```
pub struct TurtleParser<R> {
    tokens: Tokenizer<R>,
    prefixes: FxHashMap<String, String>,
    stack: Vec<Frame>,
    subject: Option<Node>,
    predicate: Option<Node>,
    object_filled: bool,
    statement_triples: usize,
    pending_literal: Option<PendingLiteral>,
    ready: VecDeque<Triple>,
    blank_node_prefix: String,
    blank_node_counter: u64,
    failure: Option<TurtleParseError>,
    finished: bool,
}

impl TurtleParser<BufReader<File>> {
    /// Opens the file at `path` for parsing. Fails before any token is read if the file cannot be
    /// opened.
    pub fn open(path: impl AsRef<Path>, config: &ParserConfig) -> Result<Self, TurtleParseError> {
        let file = File::open(path)?;
        Ok(Self::with_config(BufReader::new(file), config))
    }
}

impl<R: BufRead> TurtleParser<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, &ParserConfig::default())
    }

    pub fn with_config(reader: R, config: &ParserConfig) -> Self {
        Self {
            tokens: Tokenizer::new(reader, config.split_rule.clone()),
            prefixes: FxHashMap::default(),
            stack: Vec::new(),
            subject: None,
            predicate: None,
            object_filled: false,
            statement_triples: 0,
            pending_literal: None,
            ready: VecDeque::new(),
            blank_node_prefix: config.blank_node_prefix.clone(),
            blank_node_counter: 0,
            failure: None,
            finished: false,
        }
    }

    /// Declares `prefixes` before the first statement is read, as if the document started with
    /// matching `@prefix` declarations.
    #[must_use]
    pub fn with_prefixes(
        mut self,
        prefixes: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        self.prefixes.extend(
            prefixes
                .into_iter()
                .map(|(name, iri)| (name.into(), iri.into())),
        );
        self
    }

    /// Returns the prefixes declared so far.
    pub fn prefixes(&self) -> &FxHashMap<String, String> {
        &self.prefixes
    }

    /// Parses the whole remaining input.
    ///
    /// On failure, the triples parsed before the error are returned alongside it.
    pub fn collect_triples(mut self) -> Result<Vec<Triple>, IncompleteParse> {
        let mut triples = Vec::new();
        for triple in &mut self {
            match triple {
                Ok(triple) => triples.push(triple),
                Err(error) => return Err(IncompleteParse { triples, error }),
            }
        }
        Ok(triples)
    }

    fn step(&mut self) -> Result<(), TurtleParseError> {
        match self.tokens.next() {
            Some(token) => self.interpret(token?)?,
            None => {
                self.end_of_input()?;
                self.finished = true;
            }
        }
        Ok(())
    }

    fn interpret(&mut self, token: Token) -> Result<(), TurtleSyntaxError> {
        if matches!(token.kind, TokenKind::Datatype(_) | TokenKind::Lang(_)) {
            return self.attach_metadata(token);
        }
        self.flush_literal()?;

        match &token.kind {
            TokenKind::Uri(iri) => self.place(Node::Uri(iri.clone()), &token),
            TokenKind::BlankNode(label) => self.place(Node::BlankNode(label.clone()), &token),
            TokenKind::Variable(name) => self.place(Node::Variable(name.clone()), &token),
            TokenKind::PrefixedUri(name) => {
                let iri = self.expand(name, &token)?;
                self.place(Node::Uri(iri), &token)
            }
            TokenKind::Literal(literal) => {
                self.pending_literal = Some(PendingLiteral {
                    literal: literal.clone(),
                    token: token.clone(),
                });
                Ok(())
            }
            TokenKind::PrefixDecl { name, iri } => {
                if self.subject.is_some() {
                    return Err(unexpected(&token, EXPECTED_COMPLETE_STATEMENT));
                }
                debug!("Declared prefix {name}: <{iri}>");
                self.prefixes.insert(name.clone(), iri.clone());
                Ok(())
            }
            TokenKind::Separator(',') => self.next_object(&token),
            TokenKind::Separator(';') => self.next_predicate(&token),
            TokenKind::Separator(_) => self.open_property_list(&token),
            TokenKind::End(']') => self.close_property_list(&token),
            TokenKind::End(_) => self.end_statement(&token),
            TokenKind::Illegal(error) => Err(error.clone()),
            TokenKind::Datatype(_) | TokenKind::Lang(_) => Ok(()),
        }
    }

    /// Fills the first empty slot among subject, predicate and object. Filling the object emits the
    /// triple.
    fn place(&mut self, node: Node, token: &Token) -> Result<(), TurtleSyntaxError> {
        match (&self.subject, &self.predicate) {
            (None, _) => {
                if matches!(node, Node::Literal(_)) {
                    return Err(unexpected(token, EXPECTED_SUBJECT));
                }
                self.subject = Some(node);
            }
            (Some(_), None) => {
                if !matches!(node, Node::Uri(_) | Node::Variable(_)) {
                    return Err(unexpected(token, EXPECTED_PREDICATE));
                }
                self.predicate = Some(node);
                self.object_filled = false;
            }
            (Some(subject), Some(predicate)) => {
                if self.object_filled {
                    return Err(unexpected(token, EXPECTED_STATEMENT_END));
                }
                let triple = Triple::new(subject.clone(), predicate.clone(), node);
                self.emit(triple);
            }
        }
        Ok(())
    }

    fn emit(&mut self, triple: Triple) {
        self.object_filled = true;
        self.statement_triples += 1;
        self.ready.push_back(triple);
    }

    fn attach_metadata(&mut self, token: Token) -> Result<(), TurtleSyntaxError> {
        let Some(pending) = self.pending_literal.take() else {
            return Err(unexpected(&token, EXPECTED_LITERAL));
        };
        if !pending.literal.is_simple() {
            return Err(unexpected(&token, EXPECTED_SINGLE_METADATA));
        }
        let value = pending.literal.value().to_owned();
        let literal = match &token.kind {
            TokenKind::Lang(language) => Literal::new_language_tagged_literal(value, language),
            TokenKind::Datatype(datatype) => {
                let datatype = match enclosed(datatype, '<', '>') {
                    Some(iri) => iri.to_owned(),
                    None if datatype.contains(':') => self.expand(datatype, &token)?,
                    None => return Err(unexpected(&token, EXPECTED_DATATYPE)),
                };
                Literal::new_typed_literal(value, datatype)
            }
            _ => return Err(unexpected(&token, EXPECTED_LITERAL)),
        };
        self.pending_literal = Some(PendingLiteral {
            literal,
            token: pending.token,
        });
        Ok(())
    }

    fn flush_literal(&mut self) -> Result<(), TurtleSyntaxError> {
        match self.pending_literal.take() {
            Some(pending) => self.place(Node::Literal(pending.literal), &pending.token),
            None => Ok(()),
        }
    }

    /// Expands a prefixed name against the declared prefixes.
    fn expand(&self, name: &str, token: &Token) -> Result<String, TurtleSyntaxError> {
        let (prefix, local) = name.split_once(':').unwrap_or((name, ""));
        match self.prefixes.get(prefix) {
            Some(iri) => Ok(format!("{iri}{local}")),
            None => Err(TurtleSyntaxError::UndefinedPrefix {
                prefix: prefix.to_owned(),
                token: token.text.clone(),
                line: token.line,
                column: token.column,
            }),
        }
    }

    /// `,`: the next term is another object for the same subject and predicate.
    fn next_object(&mut self, token: &Token) -> Result<(), TurtleSyntaxError> {
        if self.predicate.is_none() || !self.object_filled {
            return Err(unexpected(token, EXPECTED_OBJECT));
        }
        self.object_filled = false;
        Ok(())
    }

    /// `;`: the next term is a new predicate for the same subject.
    fn next_predicate(&mut self, token: &Token) -> Result<(), TurtleSyntaxError> {
        if self.subject.is_none() || (self.predicate.is_some() && !self.object_filled) {
            return Err(unexpected(token, EXPECTED_OBJECT));
        }
        self.predicate = None;
        self.object_filled = false;
        Ok(())
    }

    /// `[`: allocates a fresh blank node, used as the object of the triple in progress, and makes
    /// it the subject of the property list.
    fn open_property_list(&mut self, token: &Token) -> Result<(), TurtleSyntaxError> {
        let node = Node::BlankNode(format!(
            "{}{}",
            self.blank_node_prefix, self.blank_node_counter
        ));
        self.blank_node_counter += 1;

        match (&self.subject, &self.predicate) {
            (Some(_), None) => return Err(unexpected(token, EXPECTED_PREDICATE)),
            (Some(_), Some(_)) if self.object_filled => {
                return Err(unexpected(token, EXPECTED_STATEMENT_END))
            }
            (Some(subject), Some(predicate)) => {
                let triple = Triple::new(subject.clone(), predicate.clone(), node.clone());
                self.emit(triple);
            }
            (None, _) => {}
        }

        self.stack.push(Frame {
            subject: self.subject.take(),
            predicate: self.predicate.take(),
            node: node.clone(),
        });
        self.subject = Some(node);
        self.object_filled = false;
        Ok(())
    }

    /// `]`: restores the context enclosing the property list.
    fn close_property_list(&mut self, token: &Token) -> Result<(), TurtleSyntaxError> {
        if self.predicate.is_some() && !self.object_filled {
            return Err(unexpected(token, EXPECTED_OBJECT));
        }
        let frame = self.stack.pop().ok_or_else(|| unbalanced(token))?;
        match frame.subject {
            Some(subject) => {
                self.subject = Some(subject);
                self.predicate = frame.predicate;
                self.object_filled = true;
            }
            None => {
                // The list stood in subject position.
                self.subject = Some(frame.node);
                self.predicate = None;
                self.object_filled = false;
            }
        }
        Ok(())
    }

    /// `.`: closes the statement.
    fn end_statement(&mut self, token: &Token) -> Result<(), TurtleSyntaxError> {
        if !self.stack.is_empty() {
            return Err(unbalanced(token));
        }
        let incomplete = (self.predicate.is_some() && !self.object_filled)
            || (self.subject.is_some() && self.statement_triples == 0);
        if incomplete {
            return Err(unexpected(token, EXPECTED_COMPLETE_STATEMENT));
        }
        if self.statement_triples > 0 {
            debug!(
                "Statement ending at line {} produced {} triples",
                token.line, self.statement_triples
            );
        }
        self.subject = None;
        self.predicate = None;
        self.object_filled = false;
        self.statement_triples = 0;
        Ok(())
    }

    fn end_of_input(&mut self) -> Result<(), TurtleSyntaxError> {
        self.flush_literal()?;
        if self.subject.is_some() || !self.stack.is_empty() {
            return Err(TurtleSyntaxError::UnexpectedEndOfInput {
                line: self.tokens.line_number(),
            });
        }
        Ok(())
    }
}

impl<R: BufRead> Iterator for TurtleParser<R> {
    type Item = Result<Triple, TurtleParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(triple) = self.ready.pop_front() {
                return Some(Ok(triple));
            }
            if let Some(error) = self.failure.take() {
                return Some(Err(error));
            }
            if self.finished {
                return None;
            }
            if let Err(error) = self.step() {
                warn!("Aborting Turtle parse: {error}");
                self.finished = true;
                self.failure = Some(error);
            }
        }
    }
}

fn unexpected(token: &Token, expected: &'static str) -> TurtleSyntaxError {
    TurtleSyntaxError::UnexpectedToken {
        token: token.text.clone(),
        expected,
        line: token.line,
        column: token.column,
    }
}

fn unbalanced(token: &Token) -> TurtleSyntaxError {
    TurtleSyntaxError::UnbalancedBlankNodeList {
        token: token.text.clone(),
        line: token.line,
        column: token.column,
    }
}
