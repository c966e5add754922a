//! Runs queries against the index and writes hit rows.
//!
//! Each hit becomes one TAB-separated row on the result stream:
//!
//! ```text
//! sourceName  recordId  recordLength  queryId  hitBegin  hitEnd
//! ```
//!
//! IDs and coordinates are zero-based; `[hitBegin, hitEnd)` is right-open
//! and relative to the start of the record containing the hit. A pattern
//! that spans a record terminator is attributed to the record where it
//! begins, so `hitEnd` can exceed that record's length.

use crate::diag::{Diag, Event};
use crate::error::Error;
use crate::index::{BoundaryMap, TextIndex};
use crate::query::source::{Query, QuerySource};
use std::io::Write;
use std::time::Instant;

/// Locates queries against one index/boundary pair.
pub struct QueryExecutor<'a, I: TextIndex> {
    index: &'a I,
    boundaries: &'a BoundaryMap,
}

impl<'a, I: TextIndex> QueryExecutor<'a, I> {
    pub fn new(index: &'a I, boundaries: &'a BoundaryMap) -> Self {
        Self { index, boundaries }
    }

    /// Locate one query and write its hit rows, ordered by text position.
    /// Returns the number of hits.
    pub fn locate_query<W: Write>(
        &self,
        source_name: &str,
        query: &Query,
        out: &mut W,
    ) -> Result<u64, Error> {
        let mut offsets = self.index.locate(&query.pattern);
        offsets.sort_unstable();

        for &begin in &offsets {
            let end = begin + query.pattern.len() as u64;
            let record = self
                .boundaries
                .record_at(begin)
                .ok_or(Error::UnmappedHit { offset: begin })?;

            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}\t{}",
                source_name,
                record.id,
                record.len,
                query.id,
                begin - record.start,
                end - record.start
            )
            .map_err(|err| Error::OutputWrite { source: err })?;
        }

        Ok(offsets.len() as u64)
    }

    /// Drain one query source, flushing the result stream after every
    /// query so hits appear as soon as their query is answered.
    /// Returns the source's total hit count.
    pub fn run_source<W: Write, D: Write>(
        &self,
        source: &mut QuerySource,
        out: &mut W,
        diag: &mut Diag<D>,
    ) -> Result<u64, Error> {
        let source_name = source.name().to_string();

        diag.emit(&Event::info("Processing queries.").with_source(source_name.clone()));
        let started = Instant::now();

        let mut num_hits = 0;
        loop {
            let query = source.next_query().map_err(|err| Error::QueryRead {
                source_name: source_name.clone(),
                source: err,
            })?;
            let Some(query) = query else { break };

            num_hits += self.locate_query(&source_name, &query, out)?;
            out.flush().map_err(|err| Error::OutputWrite { source: err })?;
        }

        diag.emit(
            &Event::info("Finished queries.")
                .with_source(source_name)
                .with_num_hits(num_hits)
                .with_elapsed_secs(started.elapsed().as_secs_f64()),
        );

        Ok(num_hits)
    }
}
