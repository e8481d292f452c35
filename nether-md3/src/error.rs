//! Error types for MD3 reading and writing

use std::io;

/// Errors that can occur when reading, writing or building MD3 models
#[derive(Debug, thiserror::Error)]
pub enum Md3Error {
    /// Stream ended before a record was complete
    #[error("unexpected end of file")]
    UnexpectedEof,

    /// Any other I/O failure on the underlying stream
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A vertex grid row did not match the grid width
    #[error("vertex grid row {row} has {found} vertices, expected {expected}")]
    RaggedVertexGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A computed byte offset does not fit the format's i32 offset fields
    #[error("offset {0} does not fit in a 32-bit offset field")]
    OffsetOverflow(u64),

    /// A stored offset points before the start of the model
    #[error("offset {0} points before the start of the model")]
    InvalidOffset(i64),

    /// A list is too long for the format's i32 count fields
    #[error("{what} count {count} does not fit in a 32-bit count field")]
    CountOverflow { what: &'static str, count: usize },

    /// A header count exceeds the format maximum (strict reads only)
    #[error("{what} count {count} exceeds maximum {max}")]
    CountExceedsLimit {
        what: &'static str,
        count: i32,
        max: usize,
    },

    /// Host-supplied mesh data is inconsistent
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Md3Error>;

/// Map a raw read error, keeping truncation distinguishable
pub(crate) fn read_error(err: io::Error) -> Md3Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Md3Error::UnexpectedEof
    } else {
        Md3Error::Io(err)
    }
}
