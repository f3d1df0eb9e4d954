//! Courier Common Library
//!
//! Shared types, cryptography, and wire framing for the Courier relay.

use std::time::Duration;

mod error_kind;
pub mod http;
pub mod keys;
pub mod protocol;

pub use error_kind::{
    ERROR_KIND_AUTH_DENIED, ERROR_KIND_BAD_KEY, ERROR_KIND_BAD_SIG, ERROR_KIND_BAD_UUID,
    ERROR_KIND_GROUP_EXISTS, ERROR_KIND_KEY_EXISTS, ERROR_KIND_KEY_NOT_EXIST,
    ERROR_KIND_NO_SUCH_UUID, ERROR_KIND_PROTOCOL_ERROR, ErrorKind,
};

/// Default port for Courier relay connections
pub const DEFAULT_PORT: u16 = 7800;

/// Default port as a string for display.
///
/// This is the string representation of [`DEFAULT_PORT`], provided as a
/// constant because Rust doesn't support const string formatting.
pub const DEFAULT_PORT_STR: &str = "7800";

/// How long an issued challenge stays valid.
///
/// A signed fingerprint authenticates requests until its challenge token is
/// older than this. Tokens are overwritten by re-issue but never evicted.
pub const CHALLENGE_TTL: Duration = Duration::from_secs(60 * 60);

/// Length of a hex-encoded SHA-256 fingerprint
pub const FINGERPRINT_HEX_LENGTH: usize = 64;
