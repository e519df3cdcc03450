//! Incremental decoder for `Transfer-Encoding: chunked` bodies.
//!
//! # Format
//!
//! ```text
//! chunk-size (hex) [; extensions] CRLF
//! chunk-data CRLF
//! ...
//! 0 CRLF
//! [trailer-field CRLF]*
//! CRLF
//! ```
//!
//! # Design
//! The decoder owns no I/O. The reader feeds it the unconsumed part of its
//! receive buffer and the decoder reports how many bytes it used. A size line
//! or trailer line is only consumed once its line break has arrived, so the
//! result does not depend on how the stream was split into reads. Payload is
//! copied out as raw bytes; text decoding happens on the assembled body.
//!
//! Bare LF is accepted wherever CRLF is expected.

use tracing::{debug, trace};

use crate::error::ClientError;

/// Longest size or trailer line accepted while waiting for its line break.
const MAX_LINE_LEN: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Waiting for a chunk size line.
    Size,
    /// Copying payload; `remaining` bytes of the current chunk are left.
    Data { remaining: usize },
    /// Payload done, expecting its line break.
    DataEnd,
    /// Zero-size chunk seen, skipping trailer fields up to the blank line.
    Trailers,
    Complete,
}

/// Reassembles a chunked body from arbitrarily split input.
#[derive(Debug)]
pub struct ChunkedDecoder {
    state: State,
    body: Vec<u8>,
    max_body_size: usize,
    chunks: usize,
}

impl ChunkedDecoder {
    pub fn new(max_body_size: usize) -> Self {
        Self {
            state: State::Size,
            body: Vec::new(),
            max_body_size,
            chunks: 0,
        }
    }

    /// Decode a complete chunked body held in memory.
    pub fn decode_all(input: &[u8], max_body_size: usize) -> Result<Vec<u8>, ClientError> {
        let mut decoder = Self::new(max_body_size);
        decoder.decode(input)?;
        decoder.finish()
    }

    /// Consume as much of `input` as forms complete framing units.
    ///
    /// Returns the number of bytes used. Unused bytes must be presented
    /// again, with more data appended, on the next call.
    pub fn decode(&mut self, input: &[u8]) -> Result<usize, ClientError> {
        let mut pos = 0;
        loop {
            match self.state {
                State::Size => {
                    let Some((line, used)) = next_line(&input[pos..])? else {
                        return Ok(pos);
                    };
                    pos += used;
                    let size = parse_chunk_size(line)?;
                    debug!(size, chunk = self.chunks, "chunk size line");
                    if size == 0 {
                        self.state = State::Trailers;
                        continue;
                    }
                    if size > self.max_body_size.saturating_sub(self.body.len()) {
                        return Err(ClientError::BodyTooLarge {
                            limit: self.max_body_size,
                        });
                    }
                    self.chunks += 1;
                    self.state = State::Data { remaining: size };
                }
                State::Data { remaining } => {
                    let available = input.len() - pos;
                    if available == 0 {
                        return Ok(pos);
                    }
                    let take = available.min(remaining);
                    self.body.extend_from_slice(&input[pos..pos + take]);
                    pos += take;
                    self.state = if take == remaining {
                        State::DataEnd
                    } else {
                        State::Data {
                            remaining: remaining - take,
                        }
                    };
                }
                State::DataEnd => {
                    let rest = &input[pos..];
                    if rest.starts_with(b"\r\n") {
                        pos += 2;
                    } else if rest.starts_with(b"\n") {
                        pos += 1;
                    } else if rest.is_empty() || rest == b"\r" {
                        return Ok(pos);
                    } else {
                        return Err(ClientError::ChunkFraming(
                            "expected line break after chunk data".to_string(),
                        ));
                    }
                    self.state = State::Size;
                }
                State::Trailers => {
                    let Some((line, used)) = next_line(&input[pos..])? else {
                        return Ok(pos);
                    };
                    pos += used;
                    if line.is_empty() {
                        self.state = State::Complete;
                    } else {
                        trace!(field = %String::from_utf8_lossy(line), "skipping trailer field");
                    }
                }
                State::Complete => return Ok(pos),
            }
        }
    }

    /// Whether the terminating blank line has been consumed.
    pub fn is_complete(&self) -> bool {
        self.state == State::Complete
    }

    /// Whether the zero-size chunk has been seen.
    ///
    /// A stream that ends here is accepted: the payload is already whole and
    /// only the optional trailer section is missing.
    pub fn saw_last_chunk(&self) -> bool {
        matches!(self.state, State::Trailers | State::Complete)
    }

    /// Number of non-empty chunks decoded so far.
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    /// Hand back the body once the last chunk has been seen.
    pub fn finish(self) -> Result<Vec<u8>, ClientError> {
        if self.saw_last_chunk() {
            Ok(self.body)
        } else {
            Err(ClientError::ConnectionClosed("inside chunked body"))
        }
    }
}

/// Split one line off the front of `buf`, without its CRLF or LF.
///
/// `None` means the line break has not arrived yet.
fn next_line(buf: &[u8]) -> Result<Option<(&[u8], usize)>, ClientError> {
    match buf.iter().position(|&b| b == b'\n') {
        Some(end) => {
            let line = &buf[..end];
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            Ok(Some((line, end + 1)))
        }
        None if buf.len() > MAX_LINE_LEN => Err(ClientError::ChunkFraming(format!(
            "no line break within {MAX_LINE_LEN} bytes"
        ))),
        None => Ok(None),
    }
}

fn parse_chunk_size(line: &[u8]) -> Result<usize, ClientError> {
    let invalid = || {
        ClientError::ChunkFraming(format!(
            "invalid chunk size line {:?}",
            String::from_utf8_lossy(line)
        ))
    };

    let digits = match line.iter().position(|&b| b == b';') {
        Some(ext) => &line[..ext],
        None => line,
    };
    let digits = std::str::from_utf8(digits).map_err(|_| invalid())?.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    usize::from_str_radix(digits, 16).map_err(|_| invalid())
}
