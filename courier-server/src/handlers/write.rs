//! Handler for `POST /write` - append a message to a group log
//!
//! Any authenticated fingerprint may write to any syntactically valid group
//! UUID; membership is not checked and the log is created on first write.

use std::io;

use tokio::io::AsyncWrite;

use courier_common::protocol::WriteIn;

use super::{HandlerContext, parse_json};

/// Handle a write request
pub async fn handle_write<W>(body: &[u8], ctx: &mut HandlerContext<'_, W>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let input: WriteIn = match parse_json(body) {
        Ok(input) => input,
        Err(kind) => return ctx.refuse("write: malformed request", kind).await,
    };

    let from = input.signed_finger_print.finger_print.clone();
    if let Err(kind) = ctx.challenger.verify(input.signed_finger_print).await {
        return ctx.refuse("write: authentication failed", kind).await;
    }

    match ctx.mailbox.write(from, input.group_id, input.content).await {
        Ok(()) => ctx.send_ok().await,
        Err(kind) => ctx.refuse("write: rejected", kind).await,
    }
}
