//! Error type for HTTP framing

use std::fmt;
use std::io;

/// Errors produced while reading or writing HTTP frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    /// Underlying I/O failure
    Io(String),
    /// The peer closed the connection in the middle of a request
    ConnectionClosed,
    /// No data arrived within the idle window
    IdleTimeout,
    /// A request started but did not complete within the timeout
    RequestTimeout,
    /// The request line is not `METHOD PATH VERSION`
    InvalidRequestLine,
    /// The request used an HTTP version other than 1.0 or 1.1
    UnsupportedVersion(String),
    /// A request or header line exceeded its length limit
    LineTooLong,
    /// More headers than [`MAX_HEADER_COUNT`](super::MAX_HEADER_COUNT)
    TooManyHeaders,
    /// A header line is malformed (or uses an unsupported transfer encoding)
    InvalidHeader,
    /// The `Content-Length` header is not a decimal integer
    InvalidContentLength,
    /// The declared body length exceeds the allowed maximum
    BodyTooLarge { length: u64, max: u64 },
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::ConnectionClosed => write!(f, "connection closed mid-request"),
            Self::IdleTimeout => write!(f, "idle timeout waiting for request"),
            Self::RequestTimeout => write!(f, "request did not complete in time"),
            Self::InvalidRequestLine => write!(f, "invalid request line"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported HTTP version: {v}"),
            Self::LineTooLong => write!(f, "request or header line too long"),
            Self::TooManyHeaders => write!(f, "too many headers"),
            Self::InvalidHeader => write!(f, "malformed header"),
            Self::InvalidContentLength => write!(f, "invalid Content-Length"),
            Self::BodyTooLarge { length, max } => {
                write!(f, "body of {length} bytes exceeds maximum of {max}")
            }
        }
    }
}

impl std::error::Error for HttpError {}

impl From<io::Error> for HttpError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::ConnectionClosed
        } else {
            Self::Io(err.to_string())
        }
    }
}

impl From<HttpError> for io::Error {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Io(msg) => io::Error::other(msg),
            HttpError::ConnectionClosed => {
                io::Error::new(io::ErrorKind::ConnectionReset, "connection closed")
            }
            other => io::Error::other(other.to_string()),
        }
    }
}
