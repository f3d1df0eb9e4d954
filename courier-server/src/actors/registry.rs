//! Registry actor: the fingerprint-to-public-key map
//!
//! The registry is the only component that touches key material. It accepts
//! new registrations and verifies challenge proofs on behalf of the
//! challenger; it never initiates a request to any other actor.

use std::collections::HashMap;

use rsa::RsaPublicKey;
use tokio::sync::{mpsc, oneshot};

use courier_common::protocol::SignedFingerPrint;
use courier_common::{ErrorKind, keys};

use super::REQUEST_CHANNEL_CAPACITY;

enum RegistryRequest {
    Register {
        public: String,
        sig: String,
        reply: oneshot::Sender<Result<(), ErrorKind>>,
    },
    VerifyProof {
        signed: SignedFingerPrint,
        uuid: String,
        reply: oneshot::Sender<Result<(), ErrorKind>>,
    },
}

/// The registry actor state
pub struct Registry {
    keys: HashMap<String, RsaPublicKey>,
    rx: mpsc::Receiver<RegistryRequest>,
}

/// Cloneable handle for sending requests to the registry actor
#[derive(Clone)]
pub struct RegistryHandle {
    tx: mpsc::Sender<RegistryRequest>,
}

impl Registry {
    /// Spawn the registry actor and return a handle to it
    pub fn spawn() -> RegistryHandle {
        let (tx, rx) = mpsc::channel(REQUEST_CHANNEL_CAPACITY);
        let actor = Registry {
            keys: HashMap::new(),
            rx,
        };
        tokio::spawn(actor.run());
        RegistryHandle { tx }
    }

    async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            match request {
                RegistryRequest::Register { public, sig, reply } => {
                    let _ = reply.send(self.register(&public, &sig));
                }
                RegistryRequest::VerifyProof { signed, uuid, reply } => {
                    let _ = reply.send(self.verify_proof(&signed, &uuid));
                }
            }
        }
    }

    /// Store a key under its fingerprint and check the self-signature
    ///
    /// The key is inserted before the signature is verified and a `BadSig`
    /// outcome does not remove it; a retry with the same PEM must report
    /// `KeyExists`.
    fn register(&mut self, public: &str, sig: &str) -> Result<(), ErrorKind> {
        let key = keys::parse_public_rsa(public)?;
        let finger_print = keys::fingerprint(public);
        if self.keys.contains_key(&finger_print) {
            return Err(ErrorKind::KeyExists);
        }
        self.keys.insert(finger_print.clone(), key);
        let stored = &self.keys[&finger_print];
        keys::verify_signature(stored, public.as_bytes(), sig)
    }

    /// Check a signed challenge against the stored key for a fingerprint
    fn verify_proof(&self, signed: &SignedFingerPrint, uuid: &str) -> Result<(), ErrorKind> {
        let key = self
            .keys
            .get(&signed.finger_print)
            .ok_or(ErrorKind::KeyNotExist)?;
        keys::verify_signature(key, uuid.as_bytes(), &signed.signed_challenge)
    }
}

impl RegistryHandle {
    /// Register a PEM public key with its base64 self-signature
    pub async fn register(&self, public: String, sig: String) -> Result<(), ErrorKind> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(RegistryRequest::Register { public, sig, reply })
            .await
            .map_err(|_| ErrorKind::Protocol)?;
        response.await.map_err(|_| ErrorKind::Protocol)?
    }

    /// Verify a signed fingerprint against a challenge UUID
    pub async fn verify_proof(
        &self,
        signed: SignedFingerPrint,
        uuid: String,
    ) -> Result<(), ErrorKind> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(RegistryRequest::VerifyProof {
                signed,
                uuid,
                reply,
            })
            .await
            .map_err(|_| ErrorKind::Protocol)?;
        response.await.map_err(|_| ErrorKind::Protocol)?
    }
}
