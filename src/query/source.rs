//! Query acquisition.
//!
//! A query source yields one pattern per line, as raw bytes; queries are
//! never required to be valid UTF-8. Line terminators (`\n` or `\r\n`) are
//! stripped, blank lines are skipped, and every source numbers its queries
//! independently from zero. Blank lines do not consume an id.
//!
//! The standard input source carries a probe so that an interactive session
//! ends as soon as the stream has no more data to offer, instead of blocking
//! on a terminal that will never close.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Source name under which standard input queries are reported.
pub const STDIN_SOURCE_NAME: &str = "stdin";

/// One pattern to locate, tagged with its position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Zero-based index among the non-blank lines of the source.
    pub id: u64,
    /// The raw pattern bytes, line terminator stripped.
    pub pattern: Vec<u8>,
}

/// Answers whether a stream has data to read right now.
pub trait StreamProbe {
    fn has_data_now(&self) -> bool;
}

impl<F: Fn() -> bool> StreamProbe for F {
    fn has_data_now(&self) -> bool {
        self()
    }
}

/// Probe for the process's standard input, via a zero-timeout poll.
///
/// A stream at end-of-file still polls as readable; the subsequent read
/// returns no bytes and ends the source. Only a stream that is open but
/// currently empty (an idle terminal) probes false.
pub struct StdinPoll;

impl StreamProbe for StdinPoll {
    #[cfg(unix)]
    fn has_data_now(&self) -> bool {
        let mut pfd = libc::pollfd {
            fd: libc::STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        };
        unsafe { libc::poll(&mut pfd, 1, 0) > 0 }
    }

    #[cfg(not(unix))]
    fn has_data_now(&self) -> bool {
        false
    }
}

/// A stream of queries read line by line from one input.
pub struct QuerySource {
    name: String,
    reader: Box<dyn BufRead>,
    probe: Option<Box<dyn StreamProbe>>,
    next_id: u64,
}

impl QuerySource {
    /// Source over the process's standard input.
    pub fn stdin(probe: impl StreamProbe + 'static) -> Self {
        Self::from_reader(STDIN_SOURCE_NAME, io::stdin().lock()).with_probe(probe)
    }

    /// Source over a query file. The file's path becomes the source name.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(
            path.display().to_string(),
            BufReader::new(file),
        ))
    }

    /// Source over any buffered reader.
    pub fn from_reader(name: impl Into<String>, reader: impl BufRead + 'static) -> Self {
        Self {
            name: name.into(),
            reader: Box::new(reader),
            probe: None,
            next_id: 0,
        }
    }

    /// Attach a data-availability probe, checked before every read.
    pub fn with_probe(mut self, probe: impl StreamProbe + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    /// Name under which this source's hits are reported.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The next non-blank query, or `None` once the source is exhausted.
    pub fn next_query(&mut self) -> io::Result<Option<Query>> {
        loop {
            if let Some(probe) = &self.probe {
                if !probe.has_data_now() {
                    return Ok(None);
                }
            }

            let mut pattern = Vec::new();
            if self.reader.read_until(b'\n', &mut pattern)? == 0 {
                return Ok(None);
            }

            if pattern.last() == Some(&b'\n') {
                pattern.pop();
                if pattern.last() == Some(&b'\r') {
                    pattern.pop();
                }
            }

            if pattern.is_empty() {
                continue;
            }

            let id = self.next_id;
            self.next_id += 1;
            return Ok(Some(Query { id, pattern }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Cursor;
    use std::rc::Rc;

    fn drain(source: &mut QuerySource) -> Vec<Query> {
        let mut queries = Vec::new();
        while let Some(query) = source.next_query().unwrap() {
            queries.push(query);
        }
        queries
    }

    #[test]
    fn test_ids_skip_blank_lines() {
        let mut source =
            QuerySource::from_reader("queries.txt", Cursor::new(&b"ACG\n\n\nTTT\n"[..]));

        let queries = drain(&mut source);
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0], Query { id: 0, pattern: b"ACG".to_vec() });
        assert_eq!(queries[1], Query { id: 1, pattern: b"TTT".to_vec() });
    }

    #[test]
    fn test_crlf_and_missing_final_newline() {
        let mut source = QuerySource::from_reader("queries.txt", Cursor::new(&b"AB\r\nCD"[..]));

        let queries = drain(&mut source);
        assert_eq!(queries[0].pattern, b"AB");
        assert_eq!(queries[1].pattern, b"CD");
    }

    #[test]
    fn test_blank_crlf_line_is_skipped() {
        let mut source = QuerySource::from_reader("queries.txt", Cursor::new(&b"\r\nAB\r\n"[..]));

        let queries = drain(&mut source);
        assert_eq!(queries, vec![Query { id: 0, pattern: b"AB".to_vec() }]);
    }

    #[test]
    fn test_patterns_are_raw_bytes() {
        let data: &[u8] = &[0xff, 0xfe, b'\n', b'A', b'\n'];
        let mut source = QuerySource::from_reader("queries.bin", Cursor::new(data));

        let queries = drain(&mut source);
        assert_eq!(queries[0].pattern, vec![0xff, 0xfe]);
        assert_eq!(queries[1].pattern, b"A");
    }

    #[test]
    fn test_probe_ends_source_when_stream_runs_dry() {
        // Probe grants two reads, then reports the stream empty; the third
        // line must never be read.
        let grants = Rc::new(Cell::new(2u32));
        let probe_grants = grants.clone();

        let mut source = QuerySource::from_reader("stdin", Cursor::new(&b"A\nB\nC\n"[..]))
            .with_probe(move || {
                let left = probe_grants.get();
                if left == 0 {
                    return false;
                }
                probe_grants.set(left - 1);
                true
            });

        let queries = drain(&mut source);
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].pattern, b"A");
        assert_eq!(queries[1].pattern, b"B");
    }

    #[test]
    fn test_open_missing_file_fails() {
        assert!(QuerySource::open(Path::new("/no/such/queries.txt")).is_err());
    }

    #[test]
    fn test_source_names() {
        let source = QuerySource::from_reader("a/b.txt", Cursor::new(&b""[..]));
        assert_eq!(source.name(), "a/b.txt");
        assert_eq!(STDIN_SOURCE_NAME, "stdin");
    }
}
