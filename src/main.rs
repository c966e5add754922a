mod diag;
mod error;
mod index;
mod query;

use crate::diag::{Diag, Event};
use crate::error::Error;
use crate::index::{IndexStore, SuffixArrayIndex};
use crate::query::{QueryExecutor, QuerySource, StdinPoll, StreamProbe};
use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fmlocate")]
#[command(about = "Build a cached full-text index of a reference and locate exact-match queries")]
#[command(after_help = "\
Output:
    Creates a text index <reference>.fm9 and a record index <reference>.idx
    next to the reference if not present. Then produces one TAB-separated
    row per exact match:

        sourceName  recordId  recordLength  queryId  hitBegin  hitEnd

    IDs and coordinates are zero-based. Coordinates are right-open.
    Diagnostics are emitted as JSON lines on standard error.

    Note: no output is produced when no queries are given.")]
struct Cli {
    /// Directory for temporary files (default: system temp dir)
    #[arg(short = 'P', value_name = "dir")]
    work_dir: Option<PathBuf>,

    /// Reference text file with one record per line
    #[arg(value_name = "reference")]
    reference: PathBuf,

    /// Query files (one pattern per line); standard input queries are
    /// located before all others
    #[arg(value_name = "queries")]
    query_files: Vec<PathBuf>,
}

// Exit codes: 1 usage, 2 validated runtime error, 3 unexpected error,
// 4 unexpected fault.
fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here as well; only errors that
            // clap routes to stderr are failures.
            let failure = err.use_stderr();
            let _ = err.print();
            std::process::exit(if failure { 1 } else { 0 });
        }
    };

    let work_dir = cli.work_dir.unwrap_or_else(std::env::temp_dir);
    if !work_dir.is_dir() {
        // Rendered like a parse failure: the message plus the usage text.
        let err = Cli::command().error(
            clap::error::ErrorKind::InvalidValue,
            format!("Cannot open temporary directory: {}", work_dir.display()),
        );
        let _ = err.print();
        std::process::exit(1);
    }

    let reference = cli.reference;
    let query_files = cli.query_files;
    let outcome = std::panic::catch_unwind(move || run(&reference, &work_dir, &query_files));

    let exit_code = match outcome {
        Ok(Ok(())) => 0,
        Ok(Err(err)) => {
            if err.downcast_ref::<Error>().is_some() {
                eprintln!("error: {err:#}");
                2
            } else {
                eprintln!("critical error: {err:#}");
                3
            }
        }
        Err(_) => {
            eprintln!("critical error: unexpected fault.");
            4
        }
    };
    std::process::exit(exit_code);
}

fn run(reference: &Path, work_dir: &Path, query_files: &[PathBuf]) -> Result<()> {
    let mut diag = Diag::stderr();
    let store = IndexStore::new(reference, work_dir);

    let index: SuffixArrayIndex = store.ensure_index(&mut diag)?;
    let boundaries = store.ensure_boundaries(&index, &mut diag)?;

    // Caches are now warm; without queries there is nothing more to do.
    let stdin_ready = StdinPoll.has_data_now();
    if !stdin_ready && query_files.is_empty() {
        return Ok(());
    }

    let executor = QueryExecutor::new(&index, &boundaries);
    let stdout = io::stdout();
    let mut out = BufWriter::with_capacity(65536, stdout.lock());

    if stdin_ready {
        let mut source = QuerySource::stdin(StdinPoll);
        executor.run_source(&mut source, &mut out, &mut diag)?;
    }

    for path in query_files {
        let mut source = match QuerySource::open(path) {
            Ok(source) => source,
            Err(_) => {
                diag.emit(&Event::warning("File does not exist. Skipping.").with_file(path));
                continue;
            }
        };
        executor.run_source(&mut source, &mut out, &mut diag)?;
    }

    Ok(())
}
