//! Error kinds for the pager.
//!
//! Usage errors never appear here: argument validation is owned by the CLI
//! layer, which reports and exits on its own.

use std::io;

use thiserror::Error;

/// Fatal conditions surfaced to the top-level handler.
///
/// Interrupted I/O is always retried at the call site and never becomes an
/// `Error`.
#[derive(Debug, Error)]
pub enum Error {
    /// Read, write, open, or ioctl failure.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// Terminal attributes could not be read or applied.
    #[error("cannot configure terminal: {0}")]
    TerminalConfig(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
