//! Protocol definitions for the Courier relay
//!
//! ## FingerPrint vs SignedFingerPrint
//!
//! - **FingerPrint**: lowercase hex SHA-256 of the registered PEM string.
//!   The only identity handle that ever appears on the wire.
//! - **SignedFingerPrint**: a fingerprint plus a detached signature over the
//!   caller's current challenge UUID. Every privileged request carries one.
//!
//! Field names follow the wire format exactly (PascalCase, `UUID`/`GroupID`
//! spelled out), so each field carries an explicit rename rather than a
//! container-level rule.

use serde::{Deserialize, Serialize};

/// Proof of current authentication presented by a client
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedFingerPrint {
    /// Hex SHA-256 of the registered public-key PEM
    #[serde(rename = "FingerPrint", default)]
    pub finger_print: String,
    /// Base64 PKCS#1 v1.5 signature over SHA-256 of the challenge UUID
    #[serde(rename = "SignedChallenge", default)]
    pub signed_challenge: String,
}

/// A group chat: a server-assigned UUID and a fixed member list
///
/// The UUID supplied by a client on creation is ignored; the Directory
/// always mints its own.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "UUID", default)]
    pub uuid: String,
    /// Member fingerprints, in client-supplied order
    #[serde(rename = "Members", default)]
    pub members: Vec<String>,
}

/// A single relayed message
///
/// Content is opaque ciphertext as far as the server is concerned.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Msg {
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "Content", default)]
    pub content: String,
}

/// Request body for `POST /reg`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterIn {
    /// PKIX-PEM encoded RSA public key
    #[serde(rename = "Public", default)]
    pub public: String,
    /// Base64 PKCS#1 v1.5 self-signature over SHA-256 of `Public`
    #[serde(rename = "Sig", default)]
    pub sig: String,
}

/// Request body for `POST /chal`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeIn {
    #[serde(rename = "FingerPrint", default)]
    pub finger_print: String,
}

/// Reply body for `POST /chal`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeOut {
    /// The challenge UUID the client must sign
    #[serde(rename = "UUID", default)]
    pub uuid: String,
}

/// Request body for `POST /convo`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupIn {
    #[serde(rename = "Group", default)]
    pub group: Group,
    #[serde(rename = "SignedFingerPrint", default)]
    pub signed_finger_print: SignedFingerPrint,
}

/// Reply body for `POST /convo`
///
/// Exactly one of the fields is non-empty: `uuid` on success, `error` when
/// the minted UUID collided with an existing group.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOut {
    #[serde(rename = "Error", default)]
    pub error: String,
    #[serde(rename = "UUID", default)]
    pub uuid: String,
}

/// Request body for `POST /read`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadIn {
    #[serde(rename = "SignedFingerPrint", default)]
    pub signed_finger_print: SignedFingerPrint,
    #[serde(rename = "GroupID", default)]
    pub group_id: String,
}

/// Reply body for `POST /read`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOut {
    #[serde(rename = "Msgs", default)]
    pub msgs: Vec<Msg>,
}

/// Request body for `POST /write`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteIn {
    #[serde(rename = "SignedFingerPrint", default)]
    pub signed_finger_print: SignedFingerPrint,
    #[serde(rename = "GroupID", default)]
    pub group_id: String,
    #[serde(rename = "Content", default)]
    pub content: String,
}

/// Request body for `POST /list`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListIn {
    #[serde(rename = "SignedFingerPrint", default)]
    pub signed_finger_print: SignedFingerPrint,
}

/// Reply body for `POST /list`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOut {
    #[serde(rename = "GroupUUIDs", default)]
    pub group_uuids: Vec<String>,
}
