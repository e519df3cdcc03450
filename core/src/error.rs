//! Error types for the socket client.
//!
//! # Design
//! One variant per stage of a request/response cycle, so callers can tell a
//! dead socket from a daemon that speaks broken HTTP. Every variant is fatal
//! for the current call: nothing is retried and no partial `Response` is
//! handed back. Malformed header lines are not errors at all; the header
//! parser drops them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Boxed error produced by a `BodyDecoder`.
pub type DecodeError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `Client` operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The socket at `path` could not be opened.
    #[error("failed to connect to {}: {source}", path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the encoded request failed.
    #[error("failed to write request: {0}")]
    Write(#[source] io::Error),

    /// Reading from the connection failed.
    #[error("failed to read response: {0}")]
    Read(#[source] io::Error),

    /// The peer closed the stream before the response was complete.
    #[error("connection closed {0}")]
    ConnectionClosed(&'static str),

    /// The first response line is not `VERSION CODE [REASON]`.
    #[error("malformed status line: {0:?}")]
    StatusLine(String),

    /// No header terminator within the configured limit.
    #[error("response head exceeds {limit} bytes")]
    HeadTooLarge { limit: usize },

    /// The chunked body does not follow the size/data/terminator framing.
    #[error("invalid chunked framing: {0}")]
    ChunkFraming(String),

    /// The decoded body grew past the configured limit.
    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// The response uses a body framing the client does not read.
    #[error("unsupported response body framing: {0}")]
    UnsupportedBody(String),

    /// The assembled body could not be decoded into the requested type.
    #[error("failed to decode {status} response body: {source}")]
    BodyDecode {
        status: u16,
        #[source]
        source: DecodeError,
    },

    /// Shutting the socket down failed.
    #[error("failed to close connection: {0}")]
    Close(#[source] io::Error),
}
