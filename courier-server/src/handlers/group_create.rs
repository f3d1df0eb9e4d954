//! Handler for `POST /convo` - group creation
//!
//! The first of the privileged endpoints: the signed fingerprint must
//! verify before the directory is consulted. The client-supplied group UUID
//! is ignored; the directory mints its own.

use std::io;

use tokio::io::AsyncWrite;

use courier_common::protocol::{GroupIn, GroupOut};

use super::{HandlerContext, parse_json};

/// Handle a group creation request
pub async fn handle_group_create<W>(body: &[u8], ctx: &mut HandlerContext<'_, W>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let input: GroupIn = match parse_json(body) {
        Ok(input) => input,
        Err(kind) => return ctx.refuse("group create: malformed request", kind).await,
    };

    if let Err(kind) = ctx.challenger.verify(input.signed_finger_print).await {
        return ctx
            .refuse("group create: authentication failed", kind)
            .await;
    }

    match ctx.directory.make(input.group.members).await {
        Ok(uuid) => {
            ctx.send_json(&GroupOut {
                error: String::new(),
                uuid,
            })
            .await
        }
        Err(kind) => {
            // UUID collision: reported in the reply body, not as an HTTP error
            ctx.events
                .record("group create: rejected", Some(kind.to_string()))
                .await;
            ctx.send_json(&GroupOut {
                error: kind.to_string(),
                uuid: String::new(),
            })
            .await
        }
    }
}
