//! Buffered reading of one response from a byte stream.
//!
//! # Design
//! A single growable buffer is filled `read_size` bytes at a time and
//! consumed through a cursor. The head is complete once the first blank line
//! is in the buffer, however many reads that took; bytes after it stay in
//! the buffer and are the start of the body. The chunked decoder is then fed
//! from the same buffer, so a read may carry any mix of head, size lines and
//! payload.

use std::io::{self, Read};

use tracing::{debug, warn};

use crate::chunked::ChunkedDecoder;
use crate::error::ClientError;
use crate::headers::HeaderMap;
use crate::http::StatusLine;

/// Status line and headers of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: StatusLine,
    pub headers: HeaderMap,
}

/// How the body following a head is delimited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyFraming {
    Chunked,
    /// The status code forbids a body.
    Empty,
    /// Any other framing, described for the error message.
    Unsupported(String),
}

impl ResponseHead {
    /// Parse a head block: status line, then header lines.
    pub fn parse(block: &str) -> Result<Self, ClientError> {
        let (first, rest) = match block.split_once('\n') {
            Some((first, rest)) => (first, rest),
            None => (block, ""),
        };
        let status = StatusLine::parse(first.trim_end_matches('\r'))?;
        let headers = HeaderMap::parse(rest);
        Ok(Self { status, headers })
    }

    pub fn body_framing(&self) -> BodyFraming {
        if let Some(coding) = self.headers.get("Transfer-Encoding") {
            return if coding.trim().eq_ignore_ascii_case("chunked") {
                BodyFraming::Chunked
            } else {
                BodyFraming::Unsupported(format!("transfer-encoding {coding:?}"))
            };
        }
        if status_forbids_body(self.status.code) {
            return BodyFraming::Empty;
        }
        match self.headers.get("Content-Length") {
            Some(length) => BodyFraming::Unsupported(format!("content-length {length}")),
            None => BodyFraming::Unsupported("close-delimited body".to_string()),
        }
    }
}

/// 1xx, 204 and 304 responses never carry a body.
pub fn status_forbids_body(code: u16) -> bool {
    (100..200).contains(&code) || code == 204 || code == 304
}

/// Reads one response from `conn`.
pub struct ResponseReader<'c, C> {
    conn: &'c mut C,
    buf: Vec<u8>,
    pos: usize,
    read_size: usize,
}

impl<'c, C: Read> ResponseReader<'c, C> {
    pub fn new(conn: &'c mut C, read_size: usize) -> Self {
        Self {
            conn,
            buf: Vec::with_capacity(read_size),
            pos: 0,
            read_size: read_size.max(1),
        }
    }

    /// Read until the blank line ending the head and parse it.
    pub fn read_head(&mut self, max_head_size: usize) -> Result<ResponseHead, ClientError> {
        // Offset below which the buffered head holds no terminator.
        let mut scanned = 0;
        let head_len = loop {
            if let Some(end) = find_head_end(&self.buf[self.pos..], scanned) {
                break end;
            }
            scanned = self.buf.len() - self.pos;
            if self.buf.len() - self.pos > max_head_size {
                return Err(ClientError::HeadTooLarge {
                    limit: max_head_size,
                });
            }
            if self.fill()? == 0 {
                return Err(ClientError::ConnectionClosed(if self.buf.is_empty() {
                    "before the status line"
                } else {
                    "inside the response head"
                }));
            }
        };
        if head_len > max_head_size {
            return Err(ClientError::HeadTooLarge {
                limit: max_head_size,
            });
        }

        let block = String::from_utf8_lossy(&self.buf[self.pos..self.pos + head_len]).into_owned();
        self.pos += head_len;
        let head = ResponseHead::parse(&block)?;
        debug!(
            status = head.status.code,
            headers = head.headers.len(),
            buffered = self.buf.len() - self.pos,
            "response head"
        );
        Ok(head)
    }

    /// Read the rest of a chunked body from the buffer and the connection.
    pub fn read_chunked_body(&mut self, max_body_size: usize) -> Result<Vec<u8>, ClientError> {
        let mut decoder = ChunkedDecoder::new(max_body_size);
        loop {
            self.pos += decoder.decode(&self.buf[self.pos..])?;
            if decoder.is_complete() {
                break;
            }
            if self.fill()? == 0 {
                if decoder.saw_last_chunk() {
                    debug!("stream ended before chunked trailer terminator");
                }
                break;
            }
        }
        debug!(chunks = decoder.chunks(), "chunked body done");

        let leftover = self.buf.len() - self.pos;
        if leftover > 0 {
            warn!(bytes = leftover, "discarding data after end of chunked body");
        }
        decoder.finish()
    }

    /// Append up to `read_size` bytes from the connection to the buffer.
    fn fill(&mut self) -> Result<usize, ClientError> {
        if self.pos > 0 {
            self.buf.drain(..self.pos);
            self.pos = 0;
        }
        let start = self.buf.len();
        self.buf.resize(start + self.read_size, 0);
        loop {
            match self.conn.read(&mut self.buf[start..]) {
                Ok(n) => {
                    self.buf.truncate(start + n);
                    debug!(bytes = n, "read from connection");
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buf.truncate(start);
                    return Err(ClientError::Read(e));
                }
            }
        }
    }
}

/// Length of the head including its terminating blank line, if complete.
///
/// Only line feeds at or after `from` are examined; each one looks back for
/// the end of the previous line, so a terminator split across reads is
/// still found when scanning resumes at the old buffer length.
fn find_head_end(buf: &[u8], from: usize) -> Option<usize> {
    let start = from.min(buf.len());
    buf[start..]
        .iter()
        .enumerate()
        .filter(|&(_, &b)| b == b'\n')
        .map(|(offset, _)| start + offset)
        .find(|&i| {
            (i >= 1 && buf[i - 1] == b'\n') || (i >= 2 && buf[i - 1] == b'\r' && buf[i - 2] == b'\n')
        })
        .map(|i| i + 1)
}
