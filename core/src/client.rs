//! Blocking HTTP/1.1 client over a byte stream.
//!
//! # Design
//! `Client` owns its connection and runs one request/response cycle at a
//! time: encode the request, write it out, read the head, read the chunked
//! body, decode it. Each cycle reads exactly one framed response, so the
//! same connection can carry further requests afterwards. A cycle that fails
//! after the request was written leaves the stream at an unknown position,
//! so the client refuses further requests from then on. Dropping the client
//! closes the connection on every path, including errors.
//!
//! The connection is any `Read + Write` stream; `Client::connect` opens the
//! usual Unix socket. The decoder is pluggable and defaults to JSON.

use std::io::{self, Read, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::decode::{BodyDecoder, Json};
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, Response};
use crate::reader::{status_forbids_body, BodyFraming, ResponseReader};

/// Synchronous client for a JSON API served over a stream socket.
#[derive(Debug)]
pub struct Client<C = UnixStream, D = Json> {
    conn: C,
    config: ClientConfig,
    decoder: D,
    /// A cycle failed mid-response; the stream is out of step.
    broken: bool,
}

impl Client<UnixStream, Json> {
    /// Open `config.socket_path` and apply the configured timeouts.
    pub fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let connect_err = |source| ClientError::Connect {
            path: config.socket_path.clone(),
            source,
        };
        let conn = UnixStream::connect(&config.socket_path).map_err(connect_err)?;
        conn.set_read_timeout(config.read_timeout).map_err(connect_err)?;
        conn.set_write_timeout(config.write_timeout).map_err(connect_err)?;
        debug!(path = %config.socket_path.display(), "connected");
        Ok(Self::with_connection(conn, config))
    }
}

impl<D> Client<UnixStream, D> {
    /// Shut the socket down in both directions and release it.
    pub fn close(self) -> Result<(), ClientError> {
        match self.conn.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(ClientError::Close(e)),
        }
    }
}

impl<C: Read + Write> Client<C, Json> {
    pub fn with_connection(conn: C, config: ClientConfig) -> Self {
        Self::with_decoder(conn, config, Json)
    }
}

impl<C: Read + Write, D: BodyDecoder> Client<C, D> {
    pub fn with_decoder(conn: C, config: ClientConfig, decoder: D) -> Self {
        Self {
            conn,
            config,
            decoder,
            broken: false,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `GET path` with the configured `Host`, body decoded into `T`.
    pub fn get<T: DeserializeOwned>(&mut self, path: &str) -> Result<Response<T>, ClientError> {
        let request = HttpRequest::get(path, self.config.host.as_str());
        self.send(request)
    }

    /// Send `request` and decode the body into `T`, whatever the status.
    ///
    /// A response that carries no body (to `HEAD`, or status 1xx, 204, 304)
    /// is decoded as if the body were JSON `null`, so `()` or `Option<_>`
    /// accept it.
    pub fn send<T: DeserializeOwned>(&mut self, request: HttpRequest) -> Result<Response<T>, ClientError> {
        let Response {
            status,
            version,
            headers,
            body,
            request,
        } = self.send_raw(request)?;
        let bodiless = request.method == HttpMethod::Head || status_forbids_body(status);
        let bytes: &[u8] = if bodiless { b"null" } else { &body };
        let body = self
            .decoder
            .decode(bytes)
            .map_err(|source| ClientError::BodyDecode { status, source })?;
        Ok(Response {
            status,
            version,
            headers,
            body,
            request,
        })
    }

    /// Send `request` and return the body bytes undecoded.
    pub fn send_raw(&mut self, request: HttpRequest) -> Result<Response<Vec<u8>>, ClientError> {
        if self.broken {
            return Err(ClientError::ConnectionClosed("after a failed response"));
        }
        self.broken = true;
        let response = self.exchange(request)?;
        self.broken = false;
        Ok(response)
    }

    /// One request/response cycle on the connection.
    fn exchange(&mut self, request: HttpRequest) -> Result<Response<Vec<u8>>, ClientError> {
        debug!(method = %request.method, path = %request.path, "sending request");
        self.write_request(&request.encode())?;

        let mut reader = ResponseReader::new(&mut self.conn, self.config.read_size);
        let head = reader.read_head(self.config.max_head_size)?;
        let framing = if request.method == HttpMethod::Head {
            BodyFraming::Empty
        } else {
            head.body_framing()
        };
        debug!(status = head.status.code, ?framing, "response framing");

        let body = match framing {
            BodyFraming::Chunked => reader.read_chunked_body(self.config.max_body_size)?,
            BodyFraming::Empty => Vec::new(),
            BodyFraming::Unsupported(what) => return Err(ClientError::UnsupportedBody(what)),
        };

        Ok(Response {
            status: head.status.code,
            version: head.status.version,
            headers: head.headers,
            body,
            request,
        })
    }

    /// Give back the connection.
    pub fn into_inner(self) -> C {
        self.conn
    }

    /// Write all of `bytes`, resuming after short writes.
    fn write_request(&mut self, bytes: &[u8]) -> Result<(), ClientError> {
        let mut written = 0;
        while written < bytes.len() {
            match self.conn.write(&bytes[written..]) {
                Ok(0) => return Err(ClientError::Write(io::Error::from(io::ErrorKind::WriteZero))),
                Ok(n) => {
                    written += n;
                    debug!(bytes = n, remaining = bytes.len() - written, "wrote to connection");
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ClientError::Write(e)),
            }
        }
        self.conn.flush().map_err(ClientError::Write)
    }
}
