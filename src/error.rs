//! Validated runtime failures, kept distinct from unexpected faults so the
//! driver can map them to the documented exit codes.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Expected, validated runtime errors. Anything else that reaches the driver
/// is treated as an unexpected internal fault.
#[derive(Debug, Error)]
pub enum Error {
    /// The reference file could not be opened and no cached index exists.
    #[error("File `{}` does not exist.", path.display())]
    ReferenceMissing { path: PathBuf },

    /// A freshly built index or boundary cache could not be persisted.
    #[error("Could not store cache file: {}", path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A located hit falls outside every record span. Indicates a boundary
    /// map that does not correspond to the index it is being used with.
    #[error("Invalid hit: cannot associate a record.")]
    UnmappedHit { offset: u64 },

    /// An opened query source failed mid-read.
    #[error("Could not read queries from `{source_name}`.")]
    QueryRead {
        source_name: String,
        #[source]
        source: io::Error,
    },

    /// Result rows could not be written to standard output.
    #[error("Could not write hits to standard output.")]
    OutputWrite {
        #[source]
        source: io::Error,
    },
}
