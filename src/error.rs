use std::io;

use thiserror::Error;

pub type GopherResult<T> = Result<T, GopherError>;

/// Per-request failures. The `Display` text is sent to the client in a
/// type `3` menu line, so it names selectors, never local paths.
#[derive(Debug, Error)]
pub enum GopherError {
    /// Traversal attempt or malformed request line
    #[error("Bad selector")]
    BadSelector,

    #[error("Cannot find {0}")]
    NotFound(String),

    #[error("Cannot list {selector}: {source}")]
    Listing {
        selector: String,
        #[source]
        source: io::Error,
    },

    #[error("Cannot render gophermap for {selector}: {source}")]
    Gophermap {
        selector: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}
