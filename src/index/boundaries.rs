//! Record boundary map for the reference text.
//!
//! The reference is a flat byte string; records are its newline-terminated
//! segments. Hits come back from the text index as absolute offsets, and this
//! map turns an offset into the record that contains it so results can be
//! reported in record-relative coordinates.
//!
//! ## File format
//!
//! The serialized map is the raw start-offset vector: `R + 1` little-endian
//! `u64` values, one per record plus a final sentinel one past the last
//! terminator. No header; the cache key is the path next to the reference.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Byte that ends every record in the reference.
pub const RECORD_TERMINATOR: u8 = b'\n';

/// One resolved record, as seen by an offset lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// Zero-based position of the record in the reference.
    pub id: u64,
    /// Absolute offset of the record's first byte.
    pub start: u64,
    /// Record length in bytes, terminator excluded.
    pub len: u64,
}

/// Start offsets of every record, plus a trailing sentinel.
///
/// `starts` is strictly increasing and begins with 0; entry `i` and `i + 1`
/// bracket record `i` as the half-open byte range `[starts[i], starts[i+1])`,
/// whose final byte is the terminator.
pub struct BoundaryMap {
    starts: Vec<u64>,
}

impl BoundaryMap {
    /// Build the map from the text offsets of every record terminator.
    ///
    /// The offsets may arrive in any order (a suffix-array locate returns
    /// them unsorted). A trailing unterminated segment is not a record:
    /// offsets inside it will not resolve.
    pub fn from_terminators(mut terminators: Vec<u64>) -> Self {
        terminators.sort_unstable();

        let mut starts = Vec::with_capacity(terminators.len() + 1);
        starts.push(0);
        for &terminator in &terminators {
            starts.push(terminator + 1);
        }

        Self { starts }
    }

    /// Number of records.
    pub fn num_records(&self) -> u64 {
        (self.starts.len() - 1) as u64
    }

    /// Resolve an absolute text offset to its containing record.
    ///
    /// Returns `None` when the offset falls outside every record, which for
    /// a well-formed reference only happens in an unterminated trailing
    /// segment (or with a map that does not belong to this text).
    pub fn record_at(&self, offset: u64) -> Option<Record> {
        // partition_point returns how many starts are <= offset; the record
        // candidate is the one starting at the last of them.
        let i = self.starts.partition_point(|&start| start <= offset);
        if i == 0 || i >= self.starts.len() {
            return None;
        }

        let start = self.starts[i - 1];
        let end = self.starts[i];
        Some(Record {
            id: (i - 1) as u64,
            start,
            len: end - start - 1,
        })
    }

    /// Read a serialized map.
    ///
    /// Any inconsistency yields `None`; the caller rebuilds from scratch.
    pub fn load(path: &Path) -> Option<Self> {
        let bytes = std::fs::read(path).ok()?;
        if bytes.is_empty() || bytes.len() % 8 != 0 {
            return None;
        }

        let starts: Vec<u64> = bytes
            .chunks_exact(8)
            .map(|chunk| u64::from_le_bytes(chunk.try_into().unwrap()))
            .collect();

        if starts[0] != 0 {
            return None;
        }
        if !starts.windows(2).all(|pair| pair[0] < pair[1]) {
            return None;
        }

        Some(Self { starts })
    }

    /// Serialize the map.
    pub fn store(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::with_capacity(65536, File::create(path)?);
        for &start in &self.starts {
            out.write_all(&start.to_le_bytes())?;
        }
        out.flush()
    }

    /// Serialized size in bytes.
    pub fn size_bytes(&self) -> u64 {
        (self.starts.len() * 8) as u64
    }
}
