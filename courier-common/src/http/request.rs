//! Request reader for parsing HTTP/1.1 requests from a stream

use std::io;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::time::timeout;

use super::error::HttpError;
use super::{MAX_BODY_LENGTH, MAX_HEADER_COUNT, MAX_HEADER_LINE_LENGTH, MAX_REQUEST_LINE_LENGTH};

/// Default idle timeout (waiting for the first byte of a request)
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for completing a request once the first byte is received
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A parsed HTTP request
#[derive(Debug, Clone)]
pub struct Request {
    /// The request method (e.g., "POST")
    pub method: String,
    /// The request path (e.g., "/reg")
    pub path: String,
    /// The HTTP version string ("HTTP/1.0" or "HTTP/1.1")
    pub version: String,
    /// Header name/value pairs in arrival order
    pub headers: Vec<(String, String)>,
    /// The request body (empty when no `Content-Length` was given)
    pub body: Vec<u8>,
}

impl Request {
    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the connection should stay open after this request
    ///
    /// HTTP/1.1 defaults to keep-alive, HTTP/1.0 to close; an explicit
    /// `Connection` header overrides either way.
    pub fn keep_alive(&self) -> bool {
        match self.header("connection") {
            Some(v) if v.eq_ignore_ascii_case("close") => false,
            Some(v) if v.eq_ignore_ascii_case("keep-alive") => true,
            _ => self.version == "HTTP/1.1",
        }
    }
}

/// Reads HTTP requests from an async reader
pub struct RequestReader<R> {
    reader: R,
}

impl<R> RequestReader<R> {
    /// Create a new request reader
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Get a reference to the underlying reader
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Get a mutable reference to the underlying reader
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consume the request reader and return the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: AsyncReadExt + Unpin> RequestReader<R> {
    /// Read the next request from the stream
    ///
    /// Returns `Ok(None)` if the connection is cleanly closed between
    /// requests.
    ///
    /// # Note
    ///
    /// This method has no timeout - it will wait indefinitely for data.
    /// For production use, prefer
    /// [`read_request_with_full_timeout`](Self::read_request_with_full_timeout).
    pub async fn read_request(&mut self) -> Result<Option<Request>, HttpError> {
        let first_byte = match self.read_byte_allow_eof().await? {
            Some(b) => b,
            None => return Ok(None), // Clean disconnect
        };

        self.read_request_after_first_byte(first_byte).await.map(Some)
    }

    /// Read the next request with a timeout applied after the first byte
    ///
    /// Waits indefinitely for the first byte (allowing idle connections),
    /// then the entire request must complete within `request_timeout`.
    pub async fn read_request_with_timeout(
        &mut self,
        request_timeout: Duration,
    ) -> Result<Option<Request>, HttpError> {
        let first_byte = match self.read_byte_allow_eof().await? {
            Some(b) => b,
            None => return Ok(None), // Clean disconnect
        };

        match timeout(request_timeout, self.read_request_after_first_byte(first_byte)).await {
            Ok(result) => result.map(Some),
            Err(_) => Err(HttpError::RequestTimeout),
        }
    }

    /// Read the next request with a full timeout (including the idle wait)
    ///
    /// Unlike [`read_request_with_timeout`](Self::read_request_with_timeout),
    /// this applies `idle_timeout` while waiting for the first byte, so idle
    /// connections are eventually dropped.
    pub async fn read_request_with_full_timeout(
        &mut self,
        idle_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Option<Request>, HttpError> {
        let first_byte = match timeout(idle_timeout, self.read_byte_allow_eof()).await {
            Ok(Ok(Some(b))) => b,
            Ok(Ok(None)) => return Ok(None), // Clean disconnect
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(HttpError::IdleTimeout),
        };

        match timeout(request_timeout, self.read_request_after_first_byte(first_byte)).await {
            Ok(result) => result.map(Some),
            Err(_) => Err(HttpError::RequestTimeout),
        }
    }

    /// Complete reading a request after the first byte has been received
    async fn read_request_after_first_byte(
        &mut self,
        first_byte: u8,
    ) -> Result<Request, HttpError> {
        // Step 1: Request line
        let line = self
            .read_line(Some(first_byte), MAX_REQUEST_LINE_LENGTH)
            .await?;
        let (method, path, version) = parse_request_line(&line)?;

        // Step 2: Headers until the empty line
        let mut headers = Vec::new();
        loop {
            let line = self.read_line(None, MAX_HEADER_LINE_LENGTH).await?;
            if line.is_empty() {
                break;
            }
            if headers.len() >= MAX_HEADER_COUNT {
                return Err(HttpError::TooManyHeaders);
            }
            headers.push(parse_header(&line)?);
        }

        // Step 3: Body, delimited by Content-Length (chunked is not supported)
        let length = body_length(&headers)?;
        if length > MAX_BODY_LENGTH {
            return Err(HttpError::BodyTooLarge {
                length,
                max: MAX_BODY_LENGTH,
            });
        }
        let mut body = vec![0u8; length as usize];
        self.reader.read_exact(&mut body).await?;

        Ok(Request {
            method,
            path,
            version,
            headers,
            body,
        })
    }

    /// Read a line terminated by LF, stripping a trailing CR
    ///
    /// `first_byte` is prepended when the caller already consumed it.
    async fn read_line(
        &mut self,
        first_byte: Option<u8>,
        max: usize,
    ) -> Result<String, HttpError> {
        let mut line: Vec<u8> = Vec::new();
        let mut pending = first_byte;

        loop {
            let byte = match pending.take() {
                Some(b) => b,
                None => self.read_byte().await?,
            };

            if byte == b'\n' {
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                return String::from_utf8(line).map_err(|_| HttpError::InvalidHeader);
            }

            if line.len() >= max {
                return Err(HttpError::LineTooLong);
            }
            line.push(byte);
        }
    }

    /// Read a single byte, returning None on clean EOF
    async fn read_byte_allow_eof(&mut self) -> Result<Option<u8>, HttpError> {
        let mut buf = [0u8; 1];
        match self.reader.read_exact(&mut buf).await {
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Read a single byte
    async fn read_byte(&mut self) -> Result<u8, HttpError> {
        let mut buf = [0u8; 1];
        self.reader.read_exact(&mut buf).await?;
        Ok(buf[0])
    }
}

/// Parse `METHOD PATH VERSION`
fn parse_request_line(line: &str) -> Result<(String, String, String), HttpError> {
    let mut parts = line.split_whitespace();
    let method = parts.next().ok_or(HttpError::InvalidRequestLine)?;
    let path = parts.next().ok_or(HttpError::InvalidRequestLine)?;
    let version = parts.next().ok_or(HttpError::InvalidRequestLine)?;
    if parts.next().is_some() || method.is_empty() || !path.starts_with('/') {
        return Err(HttpError::InvalidRequestLine);
    }
    if version != "HTTP/1.1" && version != "HTTP/1.0" {
        return Err(HttpError::UnsupportedVersion(version.to_string()));
    }
    Ok((method.to_string(), path.to_string(), version.to_string()))
}

/// Parse `Name: value`
fn parse_header(line: &str) -> Result<(String, String), HttpError> {
    let (name, value) = line.split_once(':').ok_or(HttpError::InvalidHeader)?;
    if name.is_empty() || name.contains(' ') {
        return Err(HttpError::InvalidHeader);
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Determine the body length from the headers
///
/// Absent `Content-Length` means an empty body. `Transfer-Encoding` is
/// rejected outright; the relay protocol never chunks.
fn body_length(headers: &[(String, String)]) -> Result<u64, HttpError> {
    if headers
        .iter()
        .any(|(n, _)| n.eq_ignore_ascii_case("transfer-encoding"))
    {
        return Err(HttpError::InvalidHeader);
    }
    match headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
    {
        Some((_, v)) => v.parse().map_err(|_| HttpError::InvalidContentLength),
        None => Ok(0),
    }
}
