use clap::{ArgAction, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "triplestream")]
/// triplestream command line toolkit: load Turtle documents and match basic graph patterns
pub struct Args {
    /// Increases the logging verbosity (-v for debug, -vv for trace)
    ///
    /// The RUST_LOG environment variable takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a RDF file and report how many triples it contains
    Load {
        /// File to load
        ///
        /// If no file is given, stdin is read.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// The format of the file to load
        ///
        /// It can be an extension like "ttl" or a MIME type like "text/turtle".
        ///
        /// By default the format is guessed from the file extension.
        #[arg(long, required_unless_present = "file")]
        format: Option<String>,
        /// Prefix of the blank nodes allocated for anonymous nodes
        #[arg(long, default_value = "b")]
        blank_node_prefix: String,
        /// Writes the loaded triples to stdout as N-Triples
        #[arg(long)]
        dump: bool,
    },
    /// Match a basic graph pattern against a RDF file
    Query {
        /// File to query
        ///
        /// If no file is given, stdin is read.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// The format of the file to query
        ///
        /// It can be an extension like "ttl" or a MIME type like "text/turtle".
        ///
        /// By default the format is guessed from the file extension.
        #[arg(long, required_unless_present = "file")]
        format: Option<String>,
        /// The triple patterns to match, in Turtle syntax with variables
        ///
        /// The prefixes declared by the queried file can be used.
        #[arg(short, long, required_unless_present = "query_file")]
        query: Option<String>,
        /// File containing the triple patterns to match
        #[arg(long, conflicts_with = "query", value_hint = ValueHint::FilePath)]
        query_file: Option<PathBuf>,
        /// Maximal number of solutions to print
        #[arg(long)]
        limit: Option<usize>,
        /// Runs every triple pattern in its own task
        #[arg(long)]
        pipelined: bool,
        /// Capacity of the channels between pipelined tasks
        #[arg(long, default_value_t = 64)]
        channel_capacity: usize,
        /// Only matches blank nodes of the patterns with themselves instead of treating them as
        /// variables
        #[arg(long)]
        blank_nodes_as_constants: bool,
    },
}
