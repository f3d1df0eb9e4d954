//! Response writer for sending HTTP replies to a stream

use serde::Serialize;
use tokio::io::AsyncWriteExt;

use super::error::HttpError;

/// Reason phrase for the status codes the relay actually sends
pub fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Unknown",
    }
}

/// Writes HTTP responses to an async writer
pub struct ResponseWriter<W> {
    writer: W,
}

impl<W> ResponseWriter<W> {
    /// Create a new response writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Get a reference to the underlying writer
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Get a mutable reference to the underlying writer
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consume the response writer and return the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: AsyncWriteExt + Unpin> ResponseWriter<W> {
    /// Write a complete response with the given status, content type, and body
    pub async fn write_response(
        &mut self,
        status: u16,
        content_type: &str,
        body: &[u8],
    ) -> Result<(), HttpError> {
        let head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n\r\n",
            status,
            status_text(status),
            content_type,
            body.len()
        );
        self.writer.write_all(head.as_bytes()).await?;
        self.writer.write_all(body).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Write a plain-text response
    pub async fn write_text(&mut self, status: u16, body: &str) -> Result<(), HttpError> {
        self.write_response(status, "text/plain; charset=utf-8", body.as_bytes())
            .await
    }

    /// Write a 200 response with a JSON body
    pub async fn write_json<T: Serialize>(&mut self, value: &T) -> Result<(), HttpError> {
        let body = serde_json::to_vec(value).map_err(|e| HttpError::Io(e.to_string()))?;
        self.write_response(200, "application/json", &body).await
    }

    /// Write a 400 with generic status text
    ///
    /// Every refused request answers identically; the reason is never put on
    /// the wire.
    pub async fn bad_request(&mut self) -> Result<(), HttpError> {
        self.write_text(400, status_text(400)).await
    }

    /// Write a 405 with generic status text
    pub async fn method_not_allowed(&mut self) -> Result<(), HttpError> {
        self.write_text(405, status_text(405)).await
    }
}
