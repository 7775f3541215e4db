//! API to load, match and query an in-memory RDF graph.
//!
//! The entry point of the module is the [`Store`] struct.
//!
//! Usage example:
//! ```
//! use futures::TryStreamExt;
//! use triplestream::model::{Node, Triple, TriplePattern};
//! use triplestream::store::Store;
//!
//! # tokio_test::block_on(async {
//! let store = Store::default();
//!
//! // insertion
//! let ex = Node::uri("http://example.com");
//! let triple = Triple::new(ex.clone(), ex.clone(), ex.clone());
//! store.insert(triple.clone()).await?;
//!
//! // triple filter
//! let any = TriplePattern::new(Node::variable("s"), Node::variable("p"), Node::variable("o"));
//! let results = store.triples_for_pattern(&any).await?.try_collect::<Vec<_>>().await?;
//! assert_eq!(vec![triple], results);
//!
//! // basic graph pattern
//! let groups = store.query([any]).try_collect::<Vec<_>>().await?;
//! assert_eq!(groups[0].get("s"), Some(&ex));
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! # }).unwrap();
//! ```

use crate::error::LoaderError;
use crate::io::RdfFormat;
use futures::StreamExt;
use rustc_hash::FxHashMap;
use std::io::{BufRead, Write};
use std::mem;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;
use triplestream_common::error::StorageError;
use triplestream_common::{Graph, Slice, StorageResult, TripleStream};
use triplestream_execution::{
    spawn_triple_reader, BasicGraphPattern, BindingsStream, ExecutionConfig,
};
use triplestream_model::{BlankNodeMatchingMode, Node, Triple, TriplePattern};
use triplestream_parser::{NTriplesParser, ParserConfig, TurtleParseError, TurtleParser};
use triplestream_storage::memory::MemGraph;

/// The number of parsed triples inserted into the graph at once while loading.
const LOAD_BATCH_SIZE: usize = 1024;

/// Holds the configuration of a [`Store`].
#[derive(Clone, Debug, Default)]
pub struct StoreConfig {
    pub parser: ParserConfig,
    pub execution: ExecutionConfig,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    #[must_use]
    pub fn with_execution(mut self, execution: ExecutionConfig) -> Self {
        self.execution = execution;
        self
    }
}

/// An RDF graph that can be loaded from documents and queried with basic graph patterns.
///
/// Cloning a store is cheap: clones share the same graph.
///
/// Usage example:
/// ```
/// use futures::TryStreamExt;
/// use triplestream::store::Store;
///
/// # tokio_test::block_on(async {
/// let store = Store::new();
/// store
///     .load_turtle("@prefix ex: <http://example.com/> .\nex:Tom ex:knows ex:Ann .".as_bytes())
///     .await?;
///
/// let groups = store.query_str("?who ex:knows ex:Ann .")?.try_collect::<Vec<_>>().await?;
/// assert_eq!(groups.len(), 1);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// # }).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct Store {
    graph: Arc<dyn Graph>,
    config: StoreConfig,
    prefixes: Arc<Mutex<FxHashMap<String, String>>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates a [`Store`] with a [`MemGraph`] as backing graph.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_graph(Arc::new(MemGraph::new()), config)
    }

    /// Creates a [`Store`] on top of an arbitrary [`Graph`] implementation.
    pub fn with_graph(graph: Arc<dyn Graph>, config: StoreConfig) -> Self {
        Self {
            graph,
            config,
            prefixes: Arc::default(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn graph(&self) -> &Arc<dyn Graph> {
        &self.graph
    }

    /// Returns the prefixes declared by the Turtle documents loaded so far.
    ///
    /// Later declarations of the same prefix override earlier ones.
    pub fn prefixes(&self) -> FxHashMap<String, String> {
        self.prefixes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Loads a Turtle document into the store. Returns the number of new triples.
    ///
    /// Parsing runs on the blocking thread pool while the triples are inserted in batches. If the
    /// document is invalid, the triples read before the error stay in the store and the error
    /// reports how many were inserted.
    ///
    /// Must be called within a Tokio runtime.
    ///
    /// Usage example:
    /// ```
    /// use triplestream::error::LoaderError;
    /// use triplestream::store::Store;
    ///
    /// # tokio_test::block_on(async {
    /// let store = Store::new();
    /// let document = "<http://example.com/a> <http://example.com/b> \"c\" .\n<http://example.com/a> ] .";
    /// let Err(LoaderError::Parsing { inserted, .. }) = store.load_turtle(document.as_bytes()).await
    /// else {
    ///     panic!("the document is invalid");
    /// };
    /// assert_eq!(inserted, 1);
    /// assert_eq!(store.len().await?, 1);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// # }).unwrap();
    /// ```
    pub async fn load_turtle(
        &self,
        reader: impl BufRead + Send + 'static,
    ) -> Result<usize, LoaderError> {
        let parser = RecordPrefixes {
            parser: TurtleParser::with_config(reader, &self.config.parser),
            prefixes: Arc::clone(&self.prefixes),
        };
        self.load_triples(parser).await
    }

    /// Loads an N-Triples document into the store. Returns the number of new triples.
    ///
    /// See [`Store::load_turtle`] for the error behavior. Must be called within a Tokio runtime.
    pub async fn load_ntriples(
        &self,
        reader: impl BufRead + Send + 'static,
    ) -> Result<usize, LoaderError> {
        let parser = NTriplesParser::with_config(reader, &self.config.parser);
        self.load_triples(parser).await
    }

    /// Loads a document of the given `format` into the store. Returns the number of new triples.
    ///
    /// Must be called within a Tokio runtime.
    pub async fn load(
        &self,
        reader: impl BufRead + Send + 'static,
        format: RdfFormat,
    ) -> Result<usize, LoaderError> {
        match format {
            RdfFormat::Turtle => self.load_turtle(reader).await,
            RdfFormat::NTriples => self.load_ntriples(reader).await,
        }
    }

    async fn load_triples<P>(&self, parser: P) -> Result<usize, LoaderError>
    where
        P: Iterator<Item = Result<Triple, TurtleParseError>> + Send + 'static,
    {
        let mut reader = spawn_triple_reader(parser, self.config.execution.channel_capacity);
        let mut batch = Vec::with_capacity(LOAD_BATCH_SIZE);
        let mut inserted = 0;
        while let Some(triple) = reader.next().await {
            match triple {
                Ok(triple) => {
                    batch.push(triple);
                    if batch.len() >= LOAD_BATCH_SIZE {
                        inserted += self.graph.extend(mem::take(&mut batch)).await?;
                    }
                }
                Err(error) => {
                    inserted += self.graph.extend(batch).await?;
                    debug!("Loading stopped after {inserted} triples: {error}");
                    return Err(LoaderError::Parsing { inserted, error });
                }
            }
        }
        inserted += self.graph.extend(batch).await?;
        let parsed = reader.join().await?;
        debug!("Loaded {inserted} new triples out of {parsed} parsed");
        Ok(inserted)
    }

    /// Adds a triple to the store. Returns `true` if it was not already present.
    pub async fn insert(&self, triple: Triple) -> StorageResult<bool> {
        self.graph.add(triple).await
    }

    /// Adds triples to the store. Returns the number of triples that were not already present.
    pub async fn extend(&self, triples: impl IntoIterator<Item = Triple>) -> StorageResult<usize> {
        self.graph.extend(triples.into_iter().collect()).await
    }

    /// Removes every triple matching `pattern`. Returns the number of removed triples.
    ///
    /// Blank nodes of `pattern` only match themselves.
    ///
    /// Usage example:
    /// ```
    /// use triplestream::model::{Node, Triple, TriplePattern};
    /// use triplestream::store::Store;
    ///
    /// # tokio_test::block_on(async {
    /// let ex = Node::uri("http://example.com");
    /// let store = Store::new();
    /// store.insert(Triple::new(ex.clone(), ex.clone(), ex.clone())).await?;
    /// store.insert(Triple::new(ex.clone(), ex.clone(), Node::literal("ex"))).await?;
    ///
    /// let removed = store
    ///     .remove(&TriplePattern::new(ex.clone(), ex.clone(), Node::variable("o")))
    ///     .await?;
    /// assert_eq!(removed, 2);
    /// assert!(store.is_empty().await?);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// # }).unwrap();
    /// ```
    pub async fn remove(&self, pattern: &TriplePattern) -> StorageResult<usize> {
        self.graph.delete(pattern).await
    }

    /// Returns the number of triples in the store.
    pub async fn len(&self) -> StorageResult<usize> {
        self.graph.len().await
    }

    pub async fn is_empty(&self) -> StorageResult<bool> {
        self.graph.is_empty().await
    }

    /// Returns the triples matching `pattern`, in insertion order.
    pub async fn triples_for_pattern(
        &self,
        pattern: &TriplePattern,
    ) -> StorageResult<TripleStream> {
        self.graph
            .filter(pattern, self.config.execution.blank_node_mode)
            .await
    }

    /// Returns the window `slice` of [`Store::triples_for_pattern`].
    pub async fn triples_for_pattern_slice(
        &self,
        pattern: &TriplePattern,
        slice: Slice,
    ) -> StorageResult<TripleStream> {
        self.graph
            .filter_subset(pattern, self.config.execution.blank_node_mode, slice)
            .await
    }

    /// Evaluates the conjunction of `patterns` and streams one group of bindings per solution.
    ///
    /// If the store is configured as [pipelined](ExecutionConfig::pipelined), every pattern runs in
    /// its own task and this must be called within a Tokio runtime.
    pub fn query(&self, patterns: impl IntoIterator<Item = TriplePattern>) -> BindingsStream {
        let execution = &self.config.execution;
        let bgp = BasicGraphPattern::from_patterns(patterns, &self.graph, execution);
        if execution.pipelined {
            bgp.execute_pipelined(execution)
        } else {
            bgp.execute()
        }
    }

    /// Parses `query` as a sequence of Turtle triple patterns and evaluates it with
    /// [`Store::query`].
    ///
    /// The prefixes of the documents loaded so far can be used without being declared again.
    pub fn query_str(&self, query: &str) -> Result<BindingsStream, TurtleParseError> {
        let patterns = TurtleParser::with_config(query.as_bytes(), &self.config.parser)
            .with_prefixes(self.prefixes())
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Parsed a query of {} patterns", patterns.len());
        Ok(self.query(patterns))
    }

    /// Writes all triples of the store as N-Triples into `writer` and returns it.
    pub async fn dump_to_writer<W: Write>(&self, mut writer: W) -> Result<W, StorageError> {
        let mut triples = self
            .graph
            .filter(&any_triple(), BlankNodeMatchingMode::Filter)
            .await?;
        while let Some(triple) = triples.next().await {
            writeln!(writer, "{}", triple?)?;
        }
        writer.flush()?;
        Ok(writer)
    }
}

fn any_triple() -> TriplePattern {
    TriplePattern::new(
        Node::variable("subject"),
        Node::variable("predicate"),
        Node::variable("object"),
    )
}

/// Publishes the prefixes of a Turtle parser into the store once parsing stops.
struct RecordPrefixes<R> {
    parser: TurtleParser<R>,
    prefixes: Arc<Mutex<FxHashMap<String, String>>>,
}

impl<R: BufRead> Iterator for RecordPrefixes<R> {
    type Item = Result<Triple, TurtleParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.parser.next();
        if matches!(item, None | Some(Err(_))) {
            self.prefixes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend(
                    self.parser
                        .prefixes()
                        .iter()
                        .map(|(name, iri)| (name.clone(), iri.clone())),
                );
        }
        item
    }
}
