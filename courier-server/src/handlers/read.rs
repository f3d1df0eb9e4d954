//! Handler for `POST /read` - drain a group's message log
//!
//! Reading is destructive: the reply carries everything accumulated since
//! the last read, and the log is cleared in the same step. A group with
//! nothing to deliver reads as an empty message list.

use std::io;

use tokio::io::AsyncWrite;

use courier_common::ErrorKind;
use courier_common::protocol::{ReadIn, ReadOut};

use super::{HandlerContext, parse_json};

/// Handle a read request
pub async fn handle_read<W>(body: &[u8], ctx: &mut HandlerContext<'_, W>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let input: ReadIn = match parse_json(body) {
        Ok(input) => input,
        Err(kind) => return ctx.refuse("read: malformed request", kind).await,
    };

    if let Err(kind) = ctx.challenger.verify(input.signed_finger_print).await {
        return ctx.refuse("read: authentication failed", kind).await;
    }

    match ctx.mailbox.read(input.group_id).await {
        Ok(msgs) => ctx.send_json(&ReadOut { msgs }).await,
        // A drained or never-written group delivers an empty list
        Err(ErrorKind::NoSuchUuid) => ctx.send_json(&ReadOut { msgs: Vec::new() }).await,
        Err(kind) => ctx.refuse("read: rejected", kind).await,
    }
}
