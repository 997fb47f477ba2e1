//! Errors raised by document storage and consistency checks.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between a document and its file.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no changes to write")]
    NotDirty,

    #[error("nothing to write: document has no lines")]
    NoContent,

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A line's terminator slot holds something other than the terminator.
    #[error("line {row} ends in {terminator:#04x} instead of the terminator")]
    Inconsistent { row: usize, terminator: u8 },
}
