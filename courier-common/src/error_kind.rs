//! Machine-readable error kinds for relay operations
//!
//! Component actors deliver these kinds on their reply channels so the
//! request handlers can distinguish failures for the event log. On the wire
//! every kind collapses to a generic HTTP 400 — the specific reason is never
//! disclosed to the client.

use std::fmt;

// =============================================================================
// String Constants
// =============================================================================

/// Error kind string: fingerprint already registered
pub const ERROR_KIND_KEY_EXISTS: &str = "key_exists";

/// Error kind string: fingerprint not registered
pub const ERROR_KIND_KEY_NOT_EXIST: &str = "key_not_exist";

/// Error kind string: malformed PEM or non-RSA key
pub const ERROR_KIND_BAD_KEY: &str = "bad_key";

/// Error kind string: signature decode or verification failure
pub const ERROR_KIND_BAD_SIG: &str = "bad_sig";

/// Error kind string: missing or expired challenge token
pub const ERROR_KIND_AUTH_DENIED: &str = "auth_denied";

/// Error kind string: malformed group UUID
pub const ERROR_KIND_BAD_UUID: &str = "bad_uuid";

/// Error kind string: read against an unknown or drained group
pub const ERROR_KIND_NO_SUCH_UUID: &str = "no_such_uuid";

/// Error kind string: UUID collision on group creation
pub const ERROR_KIND_GROUP_EXISTS: &str = "group_exists";

/// Error kind string: malformed JSON, unreadable body, wrong method
pub const ERROR_KIND_PROTOCOL_ERROR: &str = "protocol_error";

// =============================================================================
// Enum
// =============================================================================

/// Error kinds carried on actor reply channels
///
/// These identify why a request was refused. Handlers record the kind in the
/// event log; the client only ever sees a generic 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Registration with a fingerprint that is already present
    ///
    /// Registration is once-per-key; the stored key is never replaced.
    KeyExists,

    /// Proof verification for an unregistered fingerprint
    KeyNotExist,

    /// Malformed PEM or a key type other than RSA
    BadKey,

    /// Signature failure
    ///
    /// Covers both base64 decode errors and PKCS#1 v1.5 verification
    /// failures, on registration and on challenge proofs.
    BadSig,

    /// Authentication denied
    ///
    /// No challenge token exists for the fingerprint, or the token is
    /// older than the challenge TTL.
    AuthDenied,

    /// Malformed group UUID in a read or write request
    BadUuid,

    /// Read against a group with no log entry
    NoSuchUuid,

    /// UUID collision on group creation (vanishingly rare)
    GroupExists,

    /// Protocol error
    ///
    /// The client sent malformed JSON, an unreadable body, or used the
    /// wrong method.
    Protocol,
}

impl ErrorKind {
    /// Convert to the string representation used in logs and replies
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeyExists => ERROR_KIND_KEY_EXISTS,
            Self::KeyNotExist => ERROR_KIND_KEY_NOT_EXIST,
            Self::BadKey => ERROR_KIND_BAD_KEY,
            Self::BadSig => ERROR_KIND_BAD_SIG,
            Self::AuthDenied => ERROR_KIND_AUTH_DENIED,
            Self::BadUuid => ERROR_KIND_BAD_UUID,
            Self::NoSuchUuid => ERROR_KIND_NO_SUCH_UUID,
            Self::GroupExists => ERROR_KIND_GROUP_EXISTS,
            Self::Protocol => ERROR_KIND_PROTOCOL_ERROR,
        }
    }

    /// Parse from string
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ERROR_KIND_KEY_EXISTS => Some(Self::KeyExists),
            ERROR_KIND_KEY_NOT_EXIST => Some(Self::KeyNotExist),
            ERROR_KIND_BAD_KEY => Some(Self::BadKey),
            ERROR_KIND_BAD_SIG => Some(Self::BadSig),
            ERROR_KIND_AUTH_DENIED => Some(Self::AuthDenied),
            ERROR_KIND_BAD_UUID => Some(Self::BadUuid),
            ERROR_KIND_NO_SUCH_UUID => Some(Self::NoSuchUuid),
            ERROR_KIND_GROUP_EXISTS => Some(Self::GroupExists),
            ERROR_KIND_PROTOCOL_ERROR => Some(Self::Protocol),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ErrorKind> for String {
    fn from(kind: ErrorKind) -> Self {
        kind.as_str().to_string()
    }
}
