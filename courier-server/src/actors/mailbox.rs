//! Mailbox actor: append-only per-group message logs
//!
//! Writes append in arrival order; a read hands back the whole log for a
//! group and clears it in the same step, which is atomic because the actor
//! owns the map.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use courier_common::ErrorKind;
use courier_common::protocol::Msg;

use super::REQUEST_CHANNEL_CAPACITY;

enum MailboxRequest {
    Write {
        from: String,
        group_id: String,
        content: String,
        reply: oneshot::Sender<Result<(), ErrorKind>>,
    },
    Read {
        group_id: String,
        reply: oneshot::Sender<Result<Vec<Msg>, ErrorKind>>,
    },
}

/// The mailbox actor state
pub struct Mailbox {
    logs: HashMap<Uuid, Vec<Msg>>,
    rx: mpsc::Receiver<MailboxRequest>,
}

/// Cloneable handle for sending requests to the mailbox actor
#[derive(Clone)]
pub struct MailboxHandle {
    tx: mpsc::Sender<MailboxRequest>,
}

impl Mailbox {
    /// Spawn the mailbox actor and return a handle to it
    pub fn spawn() -> MailboxHandle {
        let (tx, rx) = mpsc::channel(REQUEST_CHANNEL_CAPACITY);
        let actor = Mailbox {
            logs: HashMap::new(),
            rx,
        };
        tokio::spawn(actor.run());
        MailboxHandle { tx }
    }

    async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            match request {
                MailboxRequest::Write {
                    from,
                    group_id,
                    content,
                    reply,
                } => {
                    let _ = reply.send(self.write(from, &group_id, content));
                }
                MailboxRequest::Read { group_id, reply } => {
                    let _ = reply.send(self.read(&group_id));
                }
            }
        }
    }

    /// Append a message to a group log
    ///
    /// The writer is not required to be a member of the group, and the log
    /// is created on first write. Only the UUID syntax is checked.
    fn write(&mut self, from: String, group_id: &str, content: String) -> Result<(), ErrorKind> {
        let uuid = Uuid::parse_str(group_id).map_err(|_| ErrorKind::BadUuid)?;
        self.logs
            .entry(uuid)
            .or_default()
            .push(Msg { from, content });
        Ok(())
    }

    /// Return the full log for a group and clear it
    ///
    /// The next read of the same group sees nothing (unless written again).
    fn read(&mut self, group_id: &str) -> Result<Vec<Msg>, ErrorKind> {
        let uuid = Uuid::parse_str(group_id).map_err(|_| ErrorKind::BadUuid)?;
        self.logs.remove(&uuid).ok_or(ErrorKind::NoSuchUuid)
    }
}

impl MailboxHandle {
    /// Append a message to a group log
    pub async fn write(
        &self,
        from: String,
        group_id: String,
        content: String,
    ) -> Result<(), ErrorKind> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(MailboxRequest::Write {
                from,
                group_id,
                content,
                reply,
            })
            .await
            .map_err(|_| ErrorKind::Protocol)?;
        response.await.map_err(|_| ErrorKind::Protocol)?
    }

    /// Drain and return the log for a group
    pub async fn read(&self, group_id: String) -> Result<Vec<Msg>, ErrorKind> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(MailboxRequest::Read { group_id, reply })
            .await
            .map_err(|_| ErrorKind::Protocol)?;
        response.await.map_err(|_| ErrorKind::Protocol)?
    }
}
