//! Client connection handling

use std::io;
use std::net::SocketAddr;

use tokio::io::BufReader;
use tokio::net::TcpStream;

use courier_common::http::{
    DEFAULT_IDLE_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, HttpError, Request, RequestReader,
    ResponseWriter,
};

use crate::actors::{
    ChallengerHandle, DirectoryHandle, EventLogHandle, MailboxHandle, RegistryHandle,
};
use crate::handlers::{
    HandlerContext, handle_challenge, handle_group_create, handle_list, handle_log_page,
    handle_read, handle_register, handle_write,
};

/// Endpoints that accept POST
const POST_ROUTES: &[&str] = &["/reg", "/chal", "/convo", "/read", "/write", "/list"];

/// The diagnostic page, GET only
const LOG_ROUTE: &str = "/log";

/// Parameters for handling a connection
#[derive(Clone)]
pub struct ConnectionParams {
    pub peer_addr: SocketAddr,
    pub registry: RegistryHandle,
    pub challenger: ChallengerHandle,
    pub directory: DirectoryHandle,
    pub mailbox: MailboxHandle,
    pub events: EventLogHandle,
    pub debug: bool,
}

/// Handle a client connection
///
/// Serves requests until the client disconnects, the connection idles out,
/// or a framing error makes the byte stream unusable.
pub async fn handle_connection(socket: TcpStream, params: ConnectionParams) -> io::Result<()> {
    let (read_half, write_half) = socket.into_split();
    let mut request_reader = RequestReader::new(BufReader::new(read_half));
    let mut response_writer = ResponseWriter::new(write_half);

    loop {
        let request = match request_reader
            .read_request_with_full_timeout(DEFAULT_IDLE_TIMEOUT, DEFAULT_REQUEST_TIMEOUT)
            .await
        {
            Ok(Some(request)) => request,
            Ok(None) => return Ok(()), // Clean disconnect
            Err(HttpError::IdleTimeout) => return Ok(()),
            Err(e) => {
                // The stream is no longer aligned on a request boundary;
                // answer 400 if possible and drop the connection.
                params
                    .events
                    .record("unreadable request", Some(e.to_string()))
                    .await;
                let _ = response_writer.bad_request().await;
                return Err(e.into());
            }
        };

        let keep_alive = request.keep_alive();
        dispatch(&request, &mut response_writer, &params).await?;

        if !keep_alive {
            return Ok(());
        }
    }
}

/// Route a request to its handler
async fn dispatch<W>(
    request: &Request,
    writer: &mut ResponseWriter<W>,
    params: &ConnectionParams,
) -> io::Result<()>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    let mut ctx = HandlerContext {
        writer,
        peer_addr: params.peer_addr,
        registry: &params.registry,
        challenger: &params.challenger,
        directory: &params.directory,
        mailbox: &params.mailbox,
        events: &params.events,
        debug: params.debug,
    };

    match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/reg") => handle_register(&request.body, &mut ctx).await,
        ("POST", "/chal") => handle_challenge(&request.body, &mut ctx).await,
        ("POST", "/convo") => handle_group_create(&request.body, &mut ctx).await,
        ("POST", "/read") => handle_read(&request.body, &mut ctx).await,
        ("POST", "/write") => handle_write(&request.body, &mut ctx).await,
        ("POST", "/list") => handle_list(&request.body, &mut ctx).await,
        ("GET", LOG_ROUTE) => handle_log_page(&mut ctx).await,
        (method, path) if is_known_path(path) => {
            params
                .events
                .record(format!("wrong method for {path}: {method}"), None)
                .await;
            ctx.writer.method_not_allowed().await.map_err(Into::into)
        }
        (method, path) => {
            if params.debug {
                eprintln!("Unmatched page from {}: {method} {path}", params.peer_addr);
            }
            params
                .events
                .record(format!("unmatched page: {method} {path}"), None)
                .await;
            ctx.writer.bad_request().await.map_err(Into::into)
        }
    }
}

fn is_known_path(path: &str) -> bool {
    POST_ROUTES.contains(&path) || path == LOG_ROUTE
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

    use crate::actors::{Challenger, Directory, EventLog, Mailbox, Registry};
    use crate::handlers::testing::test_key;
    use courier_common::CHALLENGE_TTL;

    struct TestClient {
        reader: BufReader<OwnedReadHalf>,
        writer: OwnedWriteHalf,
    }

    /// Spin up the actor set and a connection handler over a real socket
    async fn connect() -> TestClient {
        let registry = Registry::spawn();
        let challenger = Challenger::spawn(registry.clone(), CHALLENGE_TTL);
        let directory = Directory::spawn();
        let mailbox = Mailbox::spawn();
        let events = EventLog::spawn();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (socket, peer_addr) = listener.accept().await.unwrap();
            let params = ConnectionParams {
                peer_addr,
                registry,
                challenger,
                directory,
                mailbox,
                events,
                debug: false,
            };
            let _ = handle_connection(socket, params).await;
        });
        let (read_half, write_half) = TcpStream::connect(addr).await.unwrap().into_split();
        TestClient {
            reader: BufReader::new(read_half),
            writer: write_half,
        }
    }

    impl TestClient {
        /// Send raw bytes and read back one complete response
        async fn send_and_read(&mut self, request: &str) -> (u16, String) {
            self.writer.write_all(request.as_bytes()).await.unwrap();

            let mut status_line = String::new();
            self.reader.read_line(&mut status_line).await.unwrap();
            let status: u16 = status_line.split_whitespace().nth(1).unwrap().parse().unwrap();

            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                self.reader.read_line(&mut line).await.unwrap();
                if line.trim_end().is_empty() {
                    break;
                }
                if let Some(value) = line
                    .to_ascii_lowercase()
                    .strip_prefix("content-length:")
                {
                    content_length = value.trim().parse().unwrap();
                }
            }

            let mut body = vec![0u8; content_length];
            self.reader.read_exact(&mut body).await.unwrap();
            (status, String::from_utf8(body).unwrap())
        }
    }

    #[tokio::test]
    async fn test_register_over_the_wire() {
        let mut client = connect().await;
        let payload = serde_json::to_string(&test_key(0).register_in()).unwrap();
        let request = format!(
            "POST /reg HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            payload.len(),
            payload
        );

        let (status, body) = client.send_and_read(&request).await;
        assert_eq!(status, 200);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let mut client = connect().await;
        let request = "GET /reg HTTP/1.1\r\nConnection: close\r\n\r\n";

        let (status, _) = client.send_and_read(request).await;
        assert_eq!(status, 405);
    }

    #[tokio::test]
    async fn test_unknown_path_is_400() {
        let mut client = connect().await;
        let request = "POST /nope HTTP/1.1\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

        let (status, _) = client.send_and_read(request).await;
        assert_eq!(status, 400);
    }

    #[tokio::test]
    async fn test_log_route_is_get_only() {
        let mut client = connect().await;
        let request = "POST /log HTTP/1.1\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

        let (status, _) = client.send_and_read(request).await;
        assert_eq!(status, 405);
    }

    #[tokio::test]
    async fn test_keep_alive_serves_multiple_requests() {
        let mut client = connect().await;

        let (status, _) = client.send_and_read("GET /log HTTP/1.1\r\n\r\n").await;
        assert_eq!(status, 200);

        let (status, _) = client
            .send_and_read("GET /log HTTP/1.1\r\nConnection: close\r\n\r\n")
            .await;
        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn test_malformed_request_line_is_400_and_close() {
        let mut client = connect().await;
        let (status, _) = client.send_and_read("garbage\r\n\r\n").await;
        assert_eq!(status, 400);

        // The handler gives up on the stream after a framing error
        let mut rest = Vec::new();
        client.reader.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }
}
