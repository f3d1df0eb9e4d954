//! Shared test utilities for handler tests

use std::net::SocketAddr;
use std::sync::LazyLock;
use std::time::Duration;

use rsa::{RsaPrivateKey, RsaPublicKey};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};

use courier_common::http::ResponseWriter;
use courier_common::keys::{encode_public_rsa, fingerprint, sign_payload};
use courier_common::protocol::{RegisterIn, SignedFingerPrint};
use courier_common::CHALLENGE_TTL;

use super::HandlerContext;
use crate::actors::{
    Challenger, ChallengerHandle, Directory, DirectoryHandle, EventLog, EventLogHandle, Mailbox,
    MailboxHandle, Registry, RegistryHandle,
};

// ========================================================================
// Cached RSA Keypairs for Test Performance
// ========================================================================
//
// Generating a 2048-bit RSA key takes a noticeable fraction of a second,
// and nearly every handler test needs at least one. A small pool generated
// once and shared across the suite keeps the tests fast; individual tests
// pick keys by index so two tests that must not collide use different
// indices.

/// A test identity: private key plus its wire representations
pub struct TestKey {
    pub private: RsaPrivateKey,
    pub pem: String,
    pub finger_print: String,
}

impl TestKey {
    fn generate() -> Self {
        let private = RsaPrivateKey::new(&mut rand::thread_rng(), 2048)
            .expect("test key generation failed");
        let pem = encode_public_rsa(&RsaPublicKey::from(&private))
            .expect("test key encoding failed");
        let finger_print = fingerprint(&pem);
        Self {
            private,
            pem,
            finger_print,
        }
    }

    /// Base64 self-signature over the PEM, as `/reg` expects
    pub fn self_signature(&self) -> String {
        sign_payload(&self.private, self.pem.as_bytes()).expect("test signing failed")
    }

    /// Registration payload for this key
    pub fn register_in(&self) -> RegisterIn {
        RegisterIn {
            public: self.pem.clone(),
            sig: self.self_signature(),
        }
    }

    /// A signed fingerprint over the given challenge UUID
    pub fn signed_finger_print(&self, uuid: &str) -> SignedFingerPrint {
        SignedFingerPrint {
            finger_print: self.finger_print.clone(),
            signed_challenge: sign_payload(&self.private, uuid.as_bytes())
                .expect("test signing failed"),
        }
    }
}

/// Pool of pre-generated keypairs shared by the whole test suite
static KEY_POOL: LazyLock<Vec<TestKey>> =
    LazyLock::new(|| (0..3).map(|_| TestKey::generate()).collect());

/// Get a cached test keypair by index
pub fn test_key(index: usize) -> &'static TestKey {
    &KEY_POOL[index]
}

// ========================================================================
// Handler Test Context
// ========================================================================

/// Test context that owns all resources needed for handler testing
pub struct TestContext {
    pub client: BufReader<OwnedReadHalf>,
    pub response_writer: ResponseWriter<OwnedWriteHalf>,
    pub peer_addr: SocketAddr,
    pub registry: RegistryHandle,
    pub challenger: ChallengerHandle,
    pub directory: DirectoryHandle,
    pub mailbox: MailboxHandle,
    pub events: EventLogHandle,
}

impl TestContext {
    /// Create a HandlerContext from this TestContext
    pub fn handler_context(&mut self) -> HandlerContext<'_, OwnedWriteHalf> {
        HandlerContext {
            writer: &mut self.response_writer,
            peer_addr: self.peer_addr,
            registry: &self.registry,
            challenger: &self.challenger,
            directory: &self.directory,
            mailbox: &self.mailbox,
            events: &self.events,
            debug: false, // Tests don't need debug logging
        }
    }

    /// Read one HTTP response from the client side of the socket pair
    ///
    /// Returns the status code and the body bytes.
    pub async fn read_response(&mut self) -> (u16, Vec<u8>) {
        let mut status_line = String::new();
        self.client
            .read_line(&mut status_line)
            .await
            .expect("failed to read status line");
        let status: u16 = status_line
            .split_whitespace()
            .nth(1)
            .expect("status line missing code")
            .parse()
            .expect("status code not numeric");

        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            self.client
                .read_line(&mut line)
                .await
                .expect("failed to read header line");
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some(value) = line
                .to_ascii_lowercase()
                .strip_prefix("content-length:")
                .map(str::trim)
            {
                content_length = value.parse().expect("bad content length");
            }
        }

        let mut body = vec![0u8; content_length];
        self.client
            .read_exact(&mut body)
            .await
            .expect("failed to read body");
        (status, body)
    }

    /// Read a response and parse its JSON body
    pub async fn read_json_response<T: serde::de::DeserializeOwned>(&mut self) -> (u16, T) {
        let (status, body) = self.read_response().await;
        let parsed = serde_json::from_slice(&body).expect("response body was not valid JSON");
        (status, parsed)
    }

    /// Register a test key through the registry actor
    pub async fn register(&self, key: &TestKey) {
        self.registry
            .register(key.pem.clone(), key.self_signature())
            .await
            .expect("test registration failed");
    }

    /// Register a key, issue it a challenge, and sign it
    ///
    /// Returns the signed fingerprint used by every privileged request.
    pub async fn authenticate(&self, key: &TestKey) -> SignedFingerPrint {
        self.register(key).await;
        self.challenge(key).await
    }

    /// Issue (or re-issue) a challenge for an already registered key
    pub async fn challenge(&self, key: &TestKey) -> SignedFingerPrint {
        let uuid = self
            .challenger
            .issue(key.finger_print.clone())
            .await
            .expect("test challenge failed");
        key.signed_finger_print(&uuid)
    }
}

/// Helper to create a test context using real TCP sockets
pub async fn create_test_context() -> TestContext {
    create_test_context_with_ttl(CHALLENGE_TTL).await
}

/// Helper to create a test context with a custom challenge TTL
pub async fn create_test_context_with_ttl(ttl: Duration) -> TestContext {
    let registry = Registry::spawn();
    let challenger = Challenger::spawn(registry.clone(), ttl);
    let directory = Directory::spawn();
    let mailbox = Mailbox::spawn();
    let events = EventLog::spawn();

    // Create TCP pair on localhost so handlers write to a real socket
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let client_handle = tokio::spawn(async move { TcpStream::connect(addr).await.unwrap() });
    let (server_stream, peer_addr) = listener.accept().await.unwrap();
    let (_server_read_half, server_write_half) = server_stream.into_split();
    let response_writer = ResponseWriter::new(server_write_half);

    let client = client_handle.await.unwrap();
    let (client_read_half, _client_write_half) = client.into_split();
    let client = BufReader::new(client_read_half);

    TestContext {
        client,
        response_writer,
        peer_addr,
        registry,
        challenger,
        directory,
        mailbox,
        events,
    }
}
