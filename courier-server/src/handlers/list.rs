//! Handler for `POST /list` - group membership listing

use std::io;

use tokio::io::AsyncWrite;

use courier_common::protocol::{ListIn, ListOut};

use super::{HandlerContext, parse_json};

/// Handle a listing request
pub async fn handle_list<W>(body: &[u8], ctx: &mut HandlerContext<'_, W>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let input: ListIn = match parse_json(body) {
        Ok(input) => input,
        Err(kind) => return ctx.refuse("list: malformed request", kind).await,
    };

    let finger_print = input.signed_finger_print.finger_print.clone();
    if let Err(kind) = ctx.challenger.verify(input.signed_finger_print).await {
        return ctx.refuse("list: authentication failed", kind).await;
    }

    match ctx.directory.list(finger_print).await {
        Ok(group_uuids) => ctx.send_json(&ListOut { group_uuids }).await,
        Err(kind) => ctx.refuse("list: rejected", kind).await,
    }
}
