#![allow(clippy::print_stderr, reason = "The CLI reports progress on stderr")]
use crate::cli::{Args, Command};
use anyhow::{bail, Context};
use clap::Parser;
use futures::{StreamExt, TryStreamExt};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{stdin, stdout, BufRead, BufReader, Write};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use triplestream::execution::ExecutionConfig;
use triplestream::io::RdfFormat;
use triplestream::model::BlankNodeMatchingMode;
use triplestream::parser::ParserConfig;
use triplestream::store::{Store, StoreConfig};

mod cli;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let matches = Args::parse();
    init_tracing(matches.verbose);
    match matches.command {
        Command::Load {
            file,
            format,
            blank_node_prefix,
            dump,
        } => {
            let format = input_format(format.as_deref(), file.as_deref())?;
            let store = Store::with_config(
                StoreConfig::new()
                    .with_parser(ParserConfig::new().with_blank_node_prefix(blank_node_prefix)),
            );
            let inserted = store.load(open_input(file.as_deref())?, format).await?;
            eprintln!("{inserted} triples loaded");
            if dump {
                store.dump_to_writer(stdout().lock()).await?;
            }
            Ok(())
        }
        Command::Query {
            file,
            format,
            query,
            query_file,
            limit,
            pipelined,
            channel_capacity,
            blank_nodes_as_constants,
        } => {
            let format = input_format(format.as_deref(), file.as_deref())?;
            let query = match (query, query_file) {
                (Some(query), _) => query,
                (None, Some(path)) => fs::read_to_string(&path).with_context(|| {
                    format!("Not able to read the query file {}", path.display())
                })?,
                (None, None) => bail!("Either --query or --query-file must be set"),
            };
            let blank_node_mode = if blank_nodes_as_constants {
                BlankNodeMatchingMode::Filter
            } else {
                BlankNodeMatchingMode::Variable
            };
            let store = Store::with_config(
                StoreConfig::new().with_execution(
                    ExecutionConfig::new()
                        .with_pipelined(pipelined)
                        .with_channel_capacity(channel_capacity)
                        .with_blank_node_mode(blank_node_mode),
                ),
            );
            store.load(open_input(file.as_deref())?, format).await?;

            let solutions = store
                .query_str(&query)
                .context("The query is not a valid sequence of triple patterns")?;
            let mut solutions = match limit {
                Some(limit) => solutions.take(limit).boxed(),
                None => solutions,
            };
            let mut stdout = stdout().lock();
            let mut count = 0_usize;
            while let Some(group) = solutions.try_next().await? {
                writeln!(stdout, "{group}")?;
                count += 1;
            }
            stdout.flush()?;
            debug!("Printed {count} solutions");
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_input(file: Option<&Path>) -> anyhow::Result<Box<dyn BufRead + Send>> {
    Ok(match file {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Not able to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(stdin())),
    })
}

fn input_format(format: Option<&str>, file: Option<&Path>) -> anyhow::Result<RdfFormat> {
    if let Some(format) = format {
        rdf_format_from_name(format)
    } else if let Some(file) = file {
        rdf_format_from_path(file)
    } else {
        bail!("The --format option must be set when reading from stdin")
    }
}

fn rdf_format_from_path(path: &Path) -> anyhow::Result<RdfFormat> {
    if let Some(ext) = path.extension().and_then(OsStr::to_str) {
        RdfFormat::from_extension(ext)
            .with_context(|| format!("The file extension '{ext}' is unknown"))
            .context(format!(
                "Not able to guess the file format from file name extension '{ext}'"
            ))
    } else {
        bail!(
            "The path {} has no extension to guess a file format from",
            path.display()
        )
    }
}

fn rdf_format_from_name(name: &str) -> anyhow::Result<RdfFormat> {
    Ok(name.parse::<RdfFormat>()?)
}
