//! RSA public-key material: PEM parsing, fingerprints, detached signatures
//!
//! Keys travel as PKIX (SPKI) DER wrapped in PEM. The PEM label is written as
//! `RSA PUBLIC KEY` but ignored on parse; only the DER payload decides whether
//! the key is acceptable. Fingerprints are computed over the exact bytes of
//! the PEM string, so any whitespace difference yields a different identity.
//!
//! Signatures are PKCS#1 v1.5 over SHA-256, transported as standard base64.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::ErrorKind;

/// PEM tag used when encoding public keys
///
/// Kept for wire compatibility even though the payload is PKIX, not PKCS#1.
pub const PUBLIC_KEY_PEM_TAG: &str = "RSA PUBLIC KEY";

/// Parse a PKIX PEM encoded RSA public key
///
/// The PEM label is not checked. Fails with `BadKey` when the PEM envelope is
/// malformed or the DER payload is not an RSA public key.
pub fn parse_public_rsa(public: &str) -> Result<RsaPublicKey, ErrorKind> {
    let block = pem::parse(public).map_err(|_| ErrorKind::BadKey)?;
    RsaPublicKey::from_public_key_der(block.contents()).map_err(|_| ErrorKind::BadKey)
}

/// Encode an RSA public key as a PKIX PEM string
pub fn encode_public_rsa(key: &RsaPublicKey) -> Result<String, ErrorKind> {
    let der = key.to_public_key_der().map_err(|_| ErrorKind::BadKey)?;
    let block = pem::Pem::new(PUBLIC_KEY_PEM_TAG, der.as_bytes().to_vec());
    Ok(pem::encode(&block))
}

/// Compute the fingerprint of a public-key PEM string
///
/// Lowercase hex SHA-256 over the exact bytes of the string.
pub fn fingerprint(public: &str) -> String {
    hex::encode(Sha256::digest(public.as_bytes()))
}

/// Verify a base64 detached signature over a payload
///
/// The signature must be PKCS#1 v1.5 over SHA-256 of `payload`. Fails with
/// `BadSig` on base64 decode errors as well as verification failures.
pub fn verify_signature(
    key: &RsaPublicKey,
    payload: &[u8],
    sig_base64: &str,
) -> Result<(), ErrorKind> {
    let sig = BASE64.decode(sig_base64).map_err(|_| ErrorKind::BadSig)?;
    let hashed = Sha256::digest(payload);
    key.verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, &sig)
        .map_err(|_| ErrorKind::BadSig)
}

/// Produce a base64 detached signature over a payload
///
/// Client-side counterpart of [`verify_signature`]; the server itself never
/// signs anything.
pub fn sign_payload(key: &RsaPrivateKey, payload: &[u8]) -> Result<String, ErrorKind> {
    let hashed = Sha256::digest(payload);
    let sig = key
        .sign(Pkcs1v15Sign::new::<Sha256>(), &hashed)
        .map_err(|_| ErrorKind::BadSig)?;
    Ok(BASE64.encode(sig))
}
