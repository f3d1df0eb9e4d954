//! Request handlers for relay endpoints

mod challenge;
mod group_create;
mod list;
mod log_page;
mod read;
mod register;
mod write;

#[cfg(test)]
pub mod testing;

pub use challenge::handle_challenge;
pub use group_create::handle_group_create;
pub use list::handle_list;
pub use log_page::handle_log_page;
pub use read::handle_read;
pub use register::handle_register;
pub use write::handle_write;

use std::io;
use std::net::SocketAddr;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWrite;

use courier_common::ErrorKind;
use courier_common::http::ResponseWriter;

use crate::actors::{
    ChallengerHandle, DirectoryHandle, EventLogHandle, MailboxHandle, RegistryHandle,
};

/// Context passed to all handlers with shared resources
pub struct HandlerContext<'a, W> {
    pub writer: &'a mut ResponseWriter<W>,
    pub peer_addr: SocketAddr,
    pub registry: &'a RegistryHandle,
    pub challenger: &'a ChallengerHandle,
    pub directory: &'a DirectoryHandle,
    pub mailbox: &'a MailboxHandle,
    pub events: &'a EventLogHandle,
    pub debug: bool,
}

impl<'a, W: AsyncWrite + Unpin> HandlerContext<'a, W> {
    /// Send a 200 with the literal body `OK`
    pub async fn send_ok(&mut self) -> io::Result<()> {
        self.writer.write_text(200, "OK").await.map_err(Into::into)
    }

    /// Send a 200 with a JSON body
    pub async fn send_json<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        self.writer.write_json(value).await.map_err(Into::into)
    }

    /// Refuse the request: log the reason, reply with a generic 400
    ///
    /// The error kind goes to the event log and (with `--debug`) to stderr;
    /// the client only ever sees the status text.
    pub async fn refuse(&mut self, description: &str, kind: ErrorKind) -> io::Result<()> {
        if self.debug {
            eprintln!("{} from {}: {}", description, self.peer_addr, kind);
        }
        self.events
            .record(description, Some(kind.to_string()))
            .await;
        self.writer.bad_request().await.map_err(Into::into)
    }
}

/// Parse a JSON request body into its typed form
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ErrorKind> {
    serde_json::from_slice(body).map_err(|_| ErrorKind::Protocol)
}
