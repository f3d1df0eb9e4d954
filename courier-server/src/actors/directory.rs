//! Directory actor: group membership and its inverse index
//!
//! Owns two maps kept in lockstep: group UUID to ordered member list, and
//! member fingerprint to the ordered list of groups it belongs to. Both are
//! mutated inside a single request handler, so they can never be observed
//! out of sync.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use courier_common::ErrorKind;

use super::REQUEST_CHANNEL_CAPACITY;

enum DirectoryRequest {
    Make {
        members: Vec<String>,
        reply: oneshot::Sender<Result<String, ErrorKind>>,
    },
    List {
        finger_print: String,
        reply: oneshot::Sender<Vec<String>>,
    },
}

/// The directory actor state
pub struct Directory {
    forward: HashMap<Uuid, Vec<String>>,
    inverse: HashMap<String, Vec<Uuid>>,
    rx: mpsc::Receiver<DirectoryRequest>,
}

/// Cloneable handle for sending requests to the directory actor
#[derive(Clone)]
pub struct DirectoryHandle {
    tx: mpsc::Sender<DirectoryRequest>,
}

impl Directory {
    /// Spawn the directory actor and return a handle to it
    pub fn spawn() -> DirectoryHandle {
        let (tx, rx) = mpsc::channel(REQUEST_CHANNEL_CAPACITY);
        let actor = Directory {
            forward: HashMap::new(),
            inverse: HashMap::new(),
            rx,
        };
        tokio::spawn(actor.run());
        DirectoryHandle { tx }
    }

    async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            match request {
                DirectoryRequest::Make { members, reply } => {
                    let _ = reply.send(self.make(members));
                }
                DirectoryRequest::List {
                    finger_print,
                    reply,
                } => {
                    let _ = reply.send(self.list(&finger_print));
                }
            }
        }
    }

    /// Create a group with a freshly minted UUID
    ///
    /// Members are stored as given; the directory does not require them to
    /// be registered fingerprints. A collision with an existing UUID is
    /// reported as `GroupExists` rather than silently replacing the group.
    fn make(&mut self, members: Vec<String>) -> Result<String, ErrorKind> {
        let uuid = Uuid::new_v4();
        if self.forward.contains_key(&uuid) {
            return Err(ErrorKind::GroupExists);
        }
        self.forward.insert(uuid, members.clone());
        for member in members {
            self.inverse.entry(member).or_default().push(uuid);
        }
        Ok(uuid.to_string())
    }

    /// List the group UUIDs a fingerprint belongs to
    ///
    /// An unknown fingerprint yields an empty list, not an error.
    fn list(&self, finger_print: &str) -> Vec<String> {
        match self.inverse.get(finger_print) {
            Some(uuids) => uuids.iter().map(Uuid::to_string).collect(),
            None => Vec::new(),
        }
    }
}

impl DirectoryHandle {
    /// Create a group; returns the minted UUID
    pub async fn make(&self, members: Vec<String>) -> Result<String, ErrorKind> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(DirectoryRequest::Make { members, reply })
            .await
            .map_err(|_| ErrorKind::Protocol)?;
        response.await.map_err(|_| ErrorKind::Protocol)?
    }

    /// List the groups a fingerprint is a member of
    pub async fn list(&self, finger_print: String) -> Result<Vec<String>, ErrorKind> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(DirectoryRequest::List {
                finger_print,
                reply,
            })
            .await
            .map_err(|_| ErrorKind::Protocol)?;
        response.await.map_err(|_| ErrorKind::Protocol)
    }
}
