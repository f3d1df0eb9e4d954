//! Courier Relay Server
//!
//! Server-side backbone for an end-to-end-encrypted group messaging service:
//! clients are identified by public-key fingerprints, privileged requests
//! authenticate with signed challenges, and groups are opaque buckets of
//! ciphertext relayed between subscribed fingerprints.

use std::io;
use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use tokio::net::TcpListener;

use courier_common::CHALLENGE_TTL;
use courier_server::actors::{Challenger, Directory, EventLog, Mailbox, Registry};
use courier_server::args::Args;
use courier_server::connection::{self, ConnectionParams};
use courier_server::constants::*;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Print banner first
    println!("{}{}", MSG_BANNER, env!("CARGO_PKG_VERSION"));

    // Spawn the component actors; the challenger holds the only
    // inter-actor dependency (it consults the registry during verification)
    let registry = Registry::spawn();
    let challenger = Challenger::spawn(registry.clone(), CHALLENGE_TTL);
    let directory = Directory::spawn();
    let mailbox = Mailbox::spawn();
    let events = EventLog::spawn();

    let listener = setup_listener(args.bind, args.port).await;

    // Setup graceful shutdown handling
    let shutdown_signal = setup_shutdown_signal();

    let debug = args.debug;
    tokio::select! {
        _ = shutdown_signal => {
            println!("{}", MSG_SHUTDOWN_RECEIVED);
        }
        // Accept loop
        _ = async {
            loop {
                match listener.accept().await {
                    Ok((socket, peer_addr)) => {
                        let params = ConnectionParams {
                            peer_addr,
                            registry: registry.clone(),
                            challenger: challenger.clone(),
                            directory: directory.clone(),
                            mailbox: mailbox.clone(),
                            events: events.clone(),
                            debug,
                        };

                        // Spawn a new task to handle this connection
                        tokio::spawn(async move {
                            if let Err(e) = connection::handle_connection(socket, params).await {
                                log_connection_error(&e, peer_addr, debug);
                            }
                        });
                    }
                    Err(e) => {
                        eprintln!("{}{}", ERR_ACCEPT, e);
                    }
                }
            }
        } => {}
    }
}

/// Bind the listener or exit
async fn setup_listener(bind: IpAddr, port: u16) -> TcpListener {
    let addr = SocketAddr::new(bind, port);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("{}{}: {}", ERR_BIND_FAILED, addr, e);
            std::process::exit(1);
        }
    };
    println!("{}{}", MSG_LISTENING, addr);
    listener
}

/// Log connection errors, filtering out ordinary disconnects
///
/// Clients that vanish mid-request show up as connection resets; those are
/// only worth printing in debug mode.
fn log_connection_error(error: &io::Error, peer_addr: SocketAddr, debug: bool) {
    if error.kind() == io::ErrorKind::ConnectionReset && !debug {
        return;
    }
    eprintln!("{}{}: {}", ERR_CONNECTION, peer_addr, error);
}

/// Setup graceful shutdown signal handling (Ctrl+C)
async fn setup_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate()).expect(ERR_SIGNAL_SIGTERM);
        let mut sigint = signal(SignalKind::interrupt()).expect(ERR_SIGNAL_SIGINT);

        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.expect(ERR_SIGNAL_CTRLC);
    }
}
