//! # fmlocate - Exact-Match Reference Search
//!
//! fmlocate builds a full-text index over a line-delimited reference file,
//! caches it on disk next to the reference, and locates every exact
//! occurrence of query patterns in it. Hits are reported as TAB-separated
//! rows with record-relative, zero-based, right-open coordinates.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`index`] - Text index construction, record boundaries, cache files
//! - [`query`] - Query sources (stdin and files) and hit resolution
//! - [`diag`] - Structured JSON diagnostics on the error stream
//! - [`error`] - Validated runtime failures
//!
//! ## Quick Start
//!
//! ```ignore
//! use fmlocate::diag::Diag;
//! use fmlocate::index::{IndexStore, SuffixArrayIndex};
//! use fmlocate::query::{QueryExecutor, QuerySource};
//!
//! let mut diag = Diag::stderr();
//! let store = IndexStore::new("genome.txt", std::env::temp_dir());
//!
//! // Loads genome.txt.fm9 and genome.txt.idx, building them on first use.
//! let index: SuffixArrayIndex = store.ensure_index(&mut diag)?;
//! let boundaries = store.ensure_boundaries(&index, &mut diag)?;
//!
//! let executor = QueryExecutor::new(&index, &boundaries);
//! let mut queries = QuerySource::open("queries.txt".as_ref())?;
//! executor.run_source(&mut queries, &mut std::io::stdout().lock(), &mut diag)?;
//! ```
//!
//! ## Caching
//!
//! Index construction dominates the cost of a run, so both artifacts are
//! persisted beside the reference and reused as long as they exist. Once
//! the caches are present the reference file itself is never reopened;
//! queries run against the indexed text, memory-mapped from the cache.

pub mod diag;
pub mod error;
pub mod index;
pub mod query;
