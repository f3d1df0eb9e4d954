//! Handler for `POST /reg` - public key registration
//!
//! Registration is the one operation that needs no challenge: the request
//! proves possession by self-signing the key it registers.

use std::io;

use tokio::io::AsyncWrite;

use courier_common::protocol::RegisterIn;

use super::{HandlerContext, parse_json};

/// Handle a registration request
pub async fn handle_register<W>(body: &[u8], ctx: &mut HandlerContext<'_, W>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let input: RegisterIn = match parse_json(body) {
        Ok(input) => input,
        Err(kind) => return ctx.refuse("register: malformed request", kind).await,
    };

    match ctx.registry.register(input.public, input.sig).await {
        Ok(()) => ctx.send_ok().await,
        Err(kind) => ctx.refuse("register: rejected", kind).await,
    }
}
