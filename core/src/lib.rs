//! Minimal HTTP/1.1 client for JSON APIs served over a Unix socket.
//!
//! # Overview
//! Speaks just enough HTTP/1.1 to talk to a same-host daemon such as the
//! Docker Engine: GET-style requests with no body, responses framed with
//! `Transfer-Encoding: chunked`, bodies decoded with serde.
//!
//! # Design
//! - `HttpRequest::encode` produces the request bytes; it is pure.
//! - `ResponseReader` reads the head into a growable buffer and hands any
//!   extra bytes to `ChunkedDecoder`, which frames the body independently
//!   of how the stream was split into reads.
//! - `Client` ties the pieces together over any `Read + Write` stream and
//!   decodes the finished body through a `BodyDecoder`.
//! - Bodies framed by `Content-Length` or connection close are reported as
//!   `ClientError::UnsupportedBody` rather than read.

pub mod chunked;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod headers;
pub mod http;
pub mod reader;
pub mod types;

pub use chunked::ChunkedDecoder;
pub use client::Client;
pub use config::ClientConfig;
pub use decode::{BodyDecoder, Json};
pub use error::ClientError;
pub use headers::HeaderMap;
pub use http::{HttpMethod, HttpRequest, Response, StatusLine, Version};
pub use reader::{status_forbids_body, BodyFraming, ResponseHead, ResponseReader};
pub use types::{ComponentVersion, ContainerSummary, ErrorMessage, Platform, SystemVersion};
