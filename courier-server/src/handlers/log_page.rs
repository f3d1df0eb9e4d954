//! Handler for `GET /log` - the diagnostic event page

use std::io;

use tokio::io::AsyncWrite;

use super::HandlerContext;

/// Handle a log page request
pub async fn handle_log_page<W>(ctx: &mut HandlerContext<'_, W>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let page = ctx.events.page().await;
    ctx.writer.write_text(200, &page).await.map_err(Into::into)
}
