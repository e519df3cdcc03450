//! HTTP/1.1 request and response types for the socket transport.
//!
//! # Design
//! `HttpRequest` is plain data describing one GET-style call: method, path,
//! host and protocol version. `encode` turns it into the exact request bytes
//! with a fixed `Accept: application/json` header and no body. Paths are
//! written verbatim; callers pass an already-valid origin-form path.
//!
//! The response side is `StatusLine` (first line of the head) and
//! `Response<T>`, the envelope handed back to callers once the body has been
//! decoded into `T`.

use std::fmt;

use crate::error::ClientError;
use crate::headers::HeaderMap;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP protocol version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Version {
    Http10,
    #[default]
    Http11,
}

impl Version {
    pub fn as_str(self) -> &'static str {
        match self {
            Version::Http10 => "HTTP/1.0",
            Version::Http11 => "HTTP/1.1",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "HTTP/1.0" => Some(Version::Http10),
            "HTTP/1.1" => Some(Version::Http11),
            _ => None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub host: String,
    pub version: Version,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            host: host.into(),
            version: Version::Http11,
        }
    }

    pub fn get(path: impl Into<String>, host: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path, host)
    }

    /// Request line plus the `Host` and `Accept` headers, CRLF-terminated,
    /// followed by the blank line that ends the head.
    pub fn encode(&self) -> Vec<u8> {
        format!(
            "{} {} {}\r\nHost: {}\r\nAccept: application/json\r\n\r\n",
            self.method, self.path, self.version, self.host
        )
        .into_bytes()
    }
}

/// First line of a response: `VERSION CODE [REASON]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub version: Version,
    pub code: u16,
    pub reason: String,
}

impl StatusLine {
    pub fn parse(line: &str) -> Result<Self, ClientError> {
        let malformed = || ClientError::StatusLine(line.to_string());

        let mut tokens = line.split_whitespace();
        let version = tokens.next().ok_or_else(malformed)?;
        let code = tokens.next().ok_or_else(malformed)?;
        let reason = tokens.collect::<Vec<_>>().join(" ");

        let version = Version::parse(version).ok_or_else(malformed)?;
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let code = code.parse().map_err(|_| malformed())?;

        Ok(Self {
            version,
            code,
            reason,
        })
    }
}

/// A completed response with its body decoded into `T`.
#[derive(Debug, Clone)]
pub struct Response<T> {
    pub status: u16,
    pub version: Version,
    pub headers: HeaderMap,
    pub body: T,
    /// The request this is the answer to.
    pub request: HttpRequest,
}

impl<T> Response<T> {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Replace the body, keeping status, headers and request.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            status: self.status,
            version: self.version,
            headers: self.headers,
            body: f(self.body),
            request: self.request,
        }
    }
}
