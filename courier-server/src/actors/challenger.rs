//! Challenger actor: per-fingerprint authentication tokens
//!
//! Issues time-based challenge UUIDs and validates signed fingerprints
//! against them. Verification delegates the cryptographic check to the
//! registry; while that call is in flight the challenger accepts no other
//! request, which keeps issue/verify for a fingerprint strictly ordered.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use courier_common::ErrorKind;
use courier_common::protocol::SignedFingerPrint;

use super::{REQUEST_CHANNEL_CAPACITY, RegistryHandle};

/// An outstanding challenge for one fingerprint
struct Challenge {
    uuid: String,
    issued_at: Instant,
}

enum ChallengerRequest {
    Issue {
        finger_print: String,
        reply: oneshot::Sender<String>,
    },
    Verify {
        signed: SignedFingerPrint,
        reply: oneshot::Sender<Result<(), ErrorKind>>,
    },
}

/// The challenger actor state
pub struct Challenger {
    tokens: HashMap<String, Challenge>,
    ttl: Duration,
    node_id: [u8; 6],
    registry: RegistryHandle,
    rx: mpsc::Receiver<ChallengerRequest>,
}

/// Cloneable handle for sending requests to the challenger actor
#[derive(Clone)]
pub struct ChallengerHandle {
    tx: mpsc::Sender<ChallengerRequest>,
}

impl Challenger {
    /// Spawn the challenger actor and return a handle to it
    ///
    /// `ttl` is how long an issued token authenticates; production passes
    /// [`courier_common::CHALLENGE_TTL`].
    pub fn spawn(registry: RegistryHandle, ttl: Duration) -> ChallengerHandle {
        let (tx, rx) = mpsc::channel(REQUEST_CHANNEL_CAPACITY);
        let mut node_id = [0u8; 6];
        node_id.copy_from_slice(&Uuid::new_v4().as_bytes()[..6]);
        let actor = Challenger {
            tokens: HashMap::new(),
            ttl,
            node_id,
            registry,
            rx,
        };
        tokio::spawn(actor.run());
        ChallengerHandle { tx }
    }

    async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            match request {
                ChallengerRequest::Issue {
                    finger_print,
                    reply,
                } => {
                    let _ = reply.send(self.issue(finger_print));
                }
                ChallengerRequest::Verify { signed, reply } => {
                    let _ = reply.send(self.verify(&signed).await);
                }
            }
        }
    }

    /// Mint a fresh time-based UUID for a fingerprint
    ///
    /// Overwrites any token already outstanding for that fingerprint.
    fn issue(&mut self, finger_print: String) -> String {
        let uuid = Uuid::now_v1(&self.node_id).to_string();
        self.tokens.insert(
            finger_print,
            Challenge {
                uuid: uuid.clone(),
                issued_at: Instant::now(),
            },
        );
        uuid
    }

    /// Validate a signed fingerprint against its outstanding token
    ///
    /// The token is left in place on success and on expiry: a signed
    /// fingerprint stays reusable until its token ages out or is replaced.
    async fn verify(&self, signed: &SignedFingerPrint) -> Result<(), ErrorKind> {
        let token = self
            .tokens
            .get(&signed.finger_print)
            .ok_or(ErrorKind::AuthDenied)?;
        if token.issued_at.elapsed() > self.ttl {
            return Err(ErrorKind::AuthDenied);
        }
        // The registry never calls back into the challenger, so blocking
        // here cannot deadlock.
        self.registry
            .verify_proof(signed.clone(), token.uuid.clone())
            .await
    }
}

impl ChallengerHandle {
    /// Issue a challenge UUID for a fingerprint
    pub async fn issue(&self, finger_print: String) -> Result<String, ErrorKind> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(ChallengerRequest::Issue {
                finger_print,
                reply,
            })
            .await
            .map_err(|_| ErrorKind::Protocol)?;
        response.await.map_err(|_| ErrorKind::Protocol)
    }

    /// Verify a signed fingerprint against its current challenge
    pub async fn verify(&self, signed: SignedFingerPrint) -> Result<(), ErrorKind> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(ChallengerRequest::Verify { signed, reply })
            .await
            .map_err(|_| ErrorKind::Protocol)?;
        response.await.map_err(|_| ErrorKind::Protocol)?
    }
}
