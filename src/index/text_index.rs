//! The capability interface every full-text engine must satisfy.
//!
//! The rest of the crate only ever talks to this trait, so the concrete
//! scheme (plain suffix array today, a compressed variant tomorrow) can be
//! swapped without touching the lifecycle, boundary, or query code.

use std::io;
use std::path::Path;

/// A full-text index over one immutable byte text, supporting exact-match
/// occurrence queries.
pub trait TextIndex: Sized {
    /// Build an index over the given text. The index owns the text from
    /// here on; the caller never needs the raw bytes again.
    fn construct(text: Vec<u8>) -> Self;

    /// All absolute byte offsets at which `pattern` occurs verbatim,
    /// overlapping occurrences included. Order is unspecified; an empty
    /// pattern locates nothing.
    fn locate(&self, pattern: &[u8]) -> Vec<u64>;

    /// Deserialize an index previously written by [`store`](Self::store).
    /// Any failure (missing file, unreadable, malformed) yields `None` so
    /// the caller can fall back to a rebuild.
    fn load(path: &Path) -> Option<Self>;

    /// Serialize the index so that [`load`](Self::load) reproduces it with
    /// identical locate results.
    fn store(&self, path: &Path) -> io::Result<()>;

    /// Size of the serialized form in bytes.
    fn size_bytes(&self) -> u64;
}
