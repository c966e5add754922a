//! Cache lifecycle for the two on-disk artifacts of a reference.
//!
//! Every reference owns two cache files placed next to it: the serialized
//! text index (`<reference>.fm9`) and the record boundary map
//! (`<reference>.idx`). A run loads whichever of the two already exists and
//! rebuilds the rest, emitting progress events on the diagnostic stream.
//! Once both caches exist the reference file itself is never opened again.
//!
//! Rebuilt artifacts are staged as temporary files in the work directory and
//! renamed into place, so an interrupted run cannot leave a truncated cache
//! that a later run would trust.

use crate::diag::{Diag, Event};
use crate::error::Error;
use crate::index::{BoundaryMap, TextIndex, RECORD_TERMINATOR};
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Appended to the reference path to name the text index cache.
pub const INDEX_SUFFIX: &str = ".fm9";

/// Appended to the reference path to name the boundary map cache.
pub const BOUNDARY_SUFFIX: &str = ".idx";

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Resolves and maintains the cache files of one reference.
pub struct IndexStore {
    reference: PathBuf,
    work_dir: PathBuf,
}

impl IndexStore {
    /// `work_dir` is where staged files are written before the final
    /// rename; it must be an existing directory.
    pub fn new(reference: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            reference: reference.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Path of the text index cache.
    pub fn index_path(&self) -> PathBuf {
        cache_path(&self.reference, INDEX_SUFFIX)
    }

    /// Path of the boundary map cache.
    pub fn boundary_path(&self) -> PathBuf {
        cache_path(&self.reference, BOUNDARY_SUFFIX)
    }

    /// Load the cached text index, or build it from the reference.
    ///
    /// With a cache hit the reference file is not touched at all, so a
    /// reference that has been deleted (or changed) since the cache was
    /// written still serves queries against the cached text.
    pub fn ensure_index<I: TextIndex, W: Write>(&self, diag: &mut Diag<W>) -> Result<I, Error> {
        let index_path = self.index_path();

        if let Some(index) = I::load(&index_path) {
            return Ok(index);
        }

        let text = std::fs::read(&self.reference).map_err(|_| Error::ReferenceMissing {
            path: self.reference.clone(),
        })?;

        diag.emit(&Event::info("Index does not exist. Building it now.").with_file(&index_path));
        let started = Instant::now();

        let index = I::construct(text);
        self.persist(&index_path, |staged| index.store(staged))?;

        diag.emit(
            &Event::info("Built index.")
                .with_file(&index_path)
                .with_elapsed_secs(started.elapsed().as_secs_f64())
                .with_size_mib(index.size_bytes() as f64 / BYTES_PER_MIB),
        );

        Ok(index)
    }

    /// Load the cached boundary map, or derive it from the text index.
    ///
    /// Derivation locates every record terminator in the indexed text, so
    /// it never needs the reference file either.
    pub fn ensure_boundaries<I: TextIndex, W: Write>(
        &self,
        index: &I,
        diag: &mut Diag<W>,
    ) -> Result<BoundaryMap, Error> {
        let boundary_path = self.boundary_path();

        if let Some(map) = BoundaryMap::load(&boundary_path) {
            return Ok(map);
        }

        diag.emit(
            &Event::info("Record index does not exist. Building it now.")
                .with_file(&boundary_path),
        );
        let started = Instant::now();

        let map = BoundaryMap::from_terminators(index.locate(&[RECORD_TERMINATOR]));
        self.persist(&boundary_path, |staged| map.store(staged))?;

        diag.emit(
            &Event::info("Built record index.")
                .with_file(&boundary_path)
                .with_num_records(map.num_records())
                .with_elapsed_secs(started.elapsed().as_secs_f64())
                .with_size_mib(map.size_bytes() as f64 / BYTES_PER_MIB),
        );

        Ok(map)
    }

    fn persist<F>(&self, target: &Path, write: F) -> Result<(), Error>
    where
        F: FnOnce(&Path) -> io::Result<()>,
    {
        self.persist_inner(target, write)
            .map_err(|source| Error::CacheWrite {
                path: target.to_path_buf(),
                source,
            })
    }

    fn persist_inner<F>(&self, target: &Path, write: F) -> io::Result<()>
    where
        F: FnOnce(&Path) -> io::Result<()>,
    {
        let staged = tempfile::Builder::new()
            .prefix(".fmlocate-")
            .tempfile_in(&self.work_dir)?;

        write(staged.path())?;

        // Rename fails with EXDEV when the work directory is on another
        // filesystem than the reference; copy instead.
        if let Err(persist_err) = staged.persist(target) {
            std::fs::copy(persist_err.file.path(), target)?;
        }

        Ok(())
    }
}

fn cache_path(reference: &Path, suffix: &str) -> PathBuf {
    // Append rather than replace: genome.txt -> genome.txt.fm9.
    let mut name = OsString::from(reference.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
