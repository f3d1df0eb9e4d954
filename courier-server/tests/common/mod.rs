//! Shared helpers for end-to-end tests
//!
//! Each test gets its own server: a fresh actor set behind a real TCP
//! listener on an ephemeral port, driven by a minimal HTTP client below.

use std::net::SocketAddr;
use std::sync::LazyLock;
use std::time::Duration;

use rsa::{RsaPrivateKey, RsaPublicKey};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use courier_common::CHALLENGE_TTL;
use courier_common::keys::{encode_public_rsa, fingerprint, sign_payload};
use courier_common::protocol::SignedFingerPrint;
use courier_server::actors::{Challenger, Directory, EventLog, Mailbox, Registry};
use courier_server::connection::{ConnectionParams, handle_connection};

// ============================================================================
// Test Identities
// ============================================================================

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

    /// Registration body for `/reg`
    pub fn register_body(&self) -> String {
        serde_json::json!({
            "Public": self.pem,
            "Sig": sign_payload(&self.private, self.pem.as_bytes()).unwrap(),
        })
        .to_string()
    }

    /// A signed fingerprint over the given challenge UUID
    pub fn signed_finger_print(&self, uuid: &str) -> SignedFingerPrint {
        SignedFingerPrint {
            finger_print: self.finger_print.clone(),
            signed_challenge: sign_payload(&self.private, uuid.as_bytes()).unwrap(),
        }
    }
}

/// RSA keygen is slow; generate a small pool once for the whole binary.
/// Tests each run against their own server, so sharing keys is safe.
static KEY_POOL: LazyLock<Vec<TestKey>> =
    LazyLock::new(|| (0..2).map(|_| TestKey::generate()).collect());

/// Get a cached test keypair by index
pub fn test_key(index: usize) -> &'static TestKey {
    &KEY_POOL[index]
}

// ============================================================================
// Server Under Test
// ============================================================================

/// Start a relay server on an ephemeral port with the production TTL
pub async fn start_server() -> SocketAddr {
    start_server_with_ttl(CHALLENGE_TTL).await
}

/// Start a relay server with a custom challenge TTL
pub async fn start_server_with_ttl(ttl: Duration) -> SocketAddr {
    let registry = Registry::spawn();
    let challenger = Challenger::spawn(registry.clone(), ttl);
    let directory = Directory::spawn();
    let mailbox = Mailbox::spawn();
    let events = EventLog::spawn();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((socket, peer_addr)) = listener.accept().await else {
                return;
            };
            let params = ConnectionParams {
                peer_addr,
                registry: registry.clone(),
                challenger: challenger.clone(),
                directory: directory.clone(),
                mailbox: mailbox.clone(),
                events: events.clone(),
                debug: false,
            };
            tokio::spawn(async move {
                let _ = handle_connection(socket, params).await;
            });
        }
    });

    addr
}

// ============================================================================
// Minimal HTTP Client
// ============================================================================

/// Issue a request and return (status, body)
async fn request(addr: SocketAddr, method: &str, path: &str, body: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: courier\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len(),
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    let response = String::from_utf8(response).expect("response was not UTF-8");

    let status: u16 = response
        .split_whitespace()
        .nth(1)
        .expect("missing status code")
        .parse()
        .expect("status code not numeric");
    let body = response
        .split_once("\r\n\r\n")
        .map(|(_, b)| b.to_string())
        .unwrap_or_default();
    (status, body)
}

/// POST a JSON body
pub async fn post(addr: SocketAddr, path: &str, body: &str) -> (u16, String) {
    request(addr, "POST", path, body).await
}

/// GET a page
pub async fn get(addr: SocketAddr, path: &str) -> (u16, String) {
    request(addr, "GET", path, "").await
}

// ============================================================================
// Protocol Shortcuts
// ============================================================================

/// Register a key, expecting success
pub async fn register(addr: SocketAddr, key: &TestKey) {
    let (status, body) = post(addr, "/reg", &key.register_body()).await;
    assert_eq!(status, 200, "registration failed: {body}");
    assert_eq!(body, "OK");
}

/// Fetch a challenge for a key and sign it
pub async fn authenticate(addr: SocketAddr, key: &TestKey) -> SignedFingerPrint {
    let body = serde_json::json!({ "FingerPrint": key.finger_print }).to_string();
    let (status, body) = post(addr, "/chal", &body).await;
    assert_eq!(status, 200, "challenge failed: {body}");
    let reply: serde_json::Value = serde_json::from_str(&body).unwrap();
    let uuid = reply["UUID"].as_str().expect("challenge reply had no UUID");
    key.signed_finger_print(uuid)
}
