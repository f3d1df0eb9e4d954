//! Handler for `POST /chal` - challenge issuance
//!
//! Hands out the UUID the client must sign to authenticate its next
//! privileged requests. Issuance itself is unauthenticated; holding a
//! challenge proves nothing until it is signed with the registered key.

use std::io;

use tokio::io::AsyncWrite;

use courier_common::ErrorKind;
use courier_common::protocol::{ChallengeIn, ChallengeOut};

use super::{HandlerContext, parse_json};

/// Handle a challenge request
pub async fn handle_challenge<W>(body: &[u8], ctx: &mut HandlerContext<'_, W>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let input: ChallengeIn = match parse_json(body) {
        Ok(input) => input,
        Err(kind) => return ctx.refuse("challenge: malformed request", kind).await,
    };

    let uuid = match ctx.challenger.issue(input.finger_print).await {
        Ok(uuid) => uuid,
        Err(kind) => return ctx.refuse("challenge: issue failed", kind).await,
    };
    // An empty UUID is the challenger's generation-failure sentinel
    if uuid.is_empty() {
        return ctx
            .refuse("challenge: empty UUID", ErrorKind::Protocol)
            .await;
    }

    ctx.send_json(&ChallengeOut { uuid }).await
}
