//! Minimal HTTP/1.1 framing for the relay wire protocol
//!
//! The relay speaks plain HTTP: one POST per operation, JSON bodies, generic
//! status text on errors. This module is the byte-level layer — request
//! parsing with hard size limits and timeouts, and response writing. Routing
//! and payload handling live in the server crate.

mod error;
mod request;
mod response;

pub use error::HttpError;
pub use request::{DEFAULT_IDLE_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, Request, RequestReader};
pub use response::{ResponseWriter, status_text};

/// Maximum length of the request line in bytes
pub const MAX_REQUEST_LINE_LENGTH: usize = 4 * 1024;

/// Maximum length of a single header line in bytes
pub const MAX_HEADER_LINE_LENGTH: usize = 8 * 1024;

/// Maximum number of headers per request
pub const MAX_HEADER_COUNT: usize = 64;

/// Maximum request body size in bytes
///
/// Large enough for any key registration or relayed ciphertext blob; small
/// enough that a single connection cannot balloon server memory.
pub const MAX_BODY_LENGTH: u64 = 1024 * 1024;
