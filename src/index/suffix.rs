//! Suffix-array implementation of the full-text capability interface.
//!
//! Construction sorts every suffix position of the text; lookups run two
//! binary searches to find the contiguous suffix-array range whose suffixes
//! start with the pattern. O(m log n) per query, overlapping occurrences
//! included.
//!
//! ## File format
//!
//! One serialized file, little-endian throughout:
//!
//! - magic (`u32`, `"FMX9"`)
//! - version (`u32`)
//! - text length `n` (`u64`)
//! - `n` suffix entries (`u64` each)
//! - the `n` text bytes
//!
//! The load path memory-maps the file and searches it in place, so a cached
//! index far larger than RAM never has to be fully resident.

use crate::index::text_index::TextIndex;
use memmap2::Mmap;
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Magic number at the start of a serialized index.
pub const INDEX_MAGIC: u32 = u32::from_le_bytes(*b"FMX9");

/// Current serialized format version.
pub const INDEX_VERSION: u32 = 1;

/// Bytes of magic + version + text length.
const HEADER_LEN: usize = 4 + 4 + 8;

/// Texts above this size are sorted with rayon's parallel sort.
const PARALLEL_SORT_THRESHOLD: usize = 100_000;

#[derive(Debug)]
enum Backing {
    /// Freshly constructed, buffers in memory.
    Owned { text: Vec<u8>, suffixes: Vec<u64> },
    /// Loaded from disk, searched through the mapping.
    Mapped { map: Mmap, text_len: usize },
}

/// A suffix array over one immutable byte text.
#[derive(Debug)]
pub struct SuffixArrayIndex {
    backing: Backing,
}

impl SuffixArrayIndex {
    /// The indexed text.
    pub fn text(&self) -> &[u8] {
        match &self.backing {
            Backing::Owned { text, .. } => text,
            Backing::Mapped { map, text_len } => &map[HEADER_LEN + text_len * 8..],
        }
    }

    fn suffix_count(&self) -> usize {
        match &self.backing {
            Backing::Owned { suffixes, .. } => suffixes.len(),
            Backing::Mapped { text_len, .. } => *text_len,
        }
    }

    #[inline]
    fn suffix_at(&self, i: usize) -> u64 {
        match &self.backing {
            Backing::Owned { suffixes, .. } => suffixes[i],
            Backing::Mapped { map, .. } => {
                let offset = HEADER_LEN + i * 8;
                u64::from_le_bytes(map[offset..offset + 8].try_into().unwrap())
            }
        }
    }

    /// First suffix-array position whose suffix is not less than the pattern.
    fn lower_bound(&self, pattern: &[u8]) -> usize {
        let mut lo = 0;
        let mut hi = self.suffix_count();

        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let suffix = &self.text()[self.suffix_at(mid) as usize..];
            let cmp_len = pattern.len().min(suffix.len());

            if &suffix[..cmp_len] < pattern {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        lo
    }

    /// First suffix-array position past `start` whose suffix does not start
    /// with the pattern.
    fn upper_bound(&self, pattern: &[u8], start: usize) -> usize {
        let mut lo = start;
        let mut hi = self.suffix_count();

        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let suffix = &self.text()[self.suffix_at(mid) as usize..];
            let starts_with =
                suffix.len() >= pattern.len() && &suffix[..pattern.len()] == pattern;

            if starts_with {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        lo
    }
}

impl TextIndex for SuffixArrayIndex {
    fn construct(text: Vec<u8>) -> Self {
        let suffixes = build_suffix_array(&text);
        Self {
            backing: Backing::Owned { text, suffixes },
        }
    }

    fn locate(&self, pattern: &[u8]) -> Vec<u64> {
        if pattern.is_empty() || self.suffix_count() == 0 {
            return Vec::new();
        }

        let lo = self.lower_bound(pattern);
        let hi = self.upper_bound(pattern, lo);
        (lo..hi).map(|i| self.suffix_at(i)).collect()
    }

    fn load(path: &Path) -> Option<Self> {
        let file = File::open(path).ok()?;
        let map = unsafe { Mmap::map(&file) }.ok()?;

        if map.len() < HEADER_LEN {
            return None;
        }

        let magic = u32::from_le_bytes(map[0..4].try_into().unwrap());
        if magic != INDEX_MAGIC {
            return None;
        }

        let version = u32::from_le_bytes(map[4..8].try_into().unwrap());
        if version != INDEX_VERSION {
            return None;
        }

        let text_len = u64::from_le_bytes(map[8..16].try_into().unwrap());
        let text_len = usize::try_from(text_len).ok()?;

        // Each text byte contributes one u64 suffix entry plus itself.
        let expected_len = text_len.checked_mul(9)?.checked_add(HEADER_LEN)?;
        if map.len() != expected_len {
            return None;
        }

        Some(Self {
            backing: Backing::Mapped { map, text_len },
        })
    }

    fn store(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::with_capacity(65536, File::create(path)?);

        match &self.backing {
            // A mapped index is already in serialized form.
            Backing::Mapped { map, .. } => out.write_all(map)?,
            Backing::Owned { text, suffixes } => {
                out.write_all(&INDEX_MAGIC.to_le_bytes())?;
                out.write_all(&INDEX_VERSION.to_le_bytes())?;
                out.write_all(&(text.len() as u64).to_le_bytes())?;

                let mut buffer = Vec::with_capacity(8 * 1024);
                for &entry in suffixes {
                    buffer.extend_from_slice(&entry.to_le_bytes());
                    if buffer.len() >= 8 * 1024 {
                        out.write_all(&buffer)?;
                        buffer.clear();
                    }
                }
                if !buffer.is_empty() {
                    out.write_all(&buffer)?;
                }

                out.write_all(text)?;
            }
        }

        out.flush()
    }

    fn size_bytes(&self) -> u64 {
        match &self.backing {
            Backing::Owned { text, .. } => (HEADER_LEN + text.len() * 9) as u64,
            Backing::Mapped { map, .. } => map.len() as u64,
        }
    }
}

/// Sort all suffix positions of the text.
///
/// Comparisons are unbounded: suffixes sharing arbitrarily long prefixes
/// (common in genomic references) must still order totally, or the binary
/// searches above would miss occurrences.
fn build_suffix_array(text: &[u8]) -> Vec<u64> {
    let n = text.len();
    let mut suffixes: Vec<u64> = (0..n as u64).collect();

    if n > PARALLEL_SORT_THRESHOLD {
        suffixes.par_sort_unstable_by(|&a, &b| text[a as usize..].cmp(&text[b as usize..]));
    } else {
        suffixes.sort_unstable_by(|&a, &b| text[a as usize..].cmp(&text[b as usize..]));
    }

    suffixes
}
