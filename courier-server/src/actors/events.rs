//! Event log actor: the in-memory diagnostic trail
//!
//! Handlers record why requests were refused; the log renders as a plain
//! text page served at `GET /log`. Recording is fire-and-forget so the
//! request path never waits on diagnostics.

use std::fmt;

use tokio::sync::{mpsc, oneshot};

use super::EVENT_CHANNEL_CAPACITY;

/// A single diagnostic event
#[derive(Debug, Clone)]
pub struct Event {
    pub description: String,
    pub error: Option<String>,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => f.write_str(&self.description),
            Some(err) => write!(f, "{} : {}", self.description, err),
        }
    }
}

enum EventLogRequest {
    Record(Event),
    Page {
        reply: oneshot::Sender<String>,
    },
}

/// The event log actor state
pub struct EventLog {
    events: Vec<Event>,
    rx: mpsc::Receiver<EventLogRequest>,
}

/// Cloneable handle for sending requests to the event log actor
#[derive(Clone)]
pub struct EventLogHandle {
    tx: mpsc::Sender<EventLogRequest>,
}

impl EventLog {
    /// Spawn the event log actor and return a handle to it
    pub fn spawn() -> EventLogHandle {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let actor = EventLog {
            events: Vec::new(),
            rx,
        };
        tokio::spawn(actor.run());
        EventLogHandle { tx }
    }

    async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            match request {
                EventLogRequest::Record(event) => self.events.push(event),
                EventLogRequest::Page { reply } => {
                    let _ = reply.send(self.page());
                }
            }
        }
    }

    /// Render the log as one event per line
    fn page(&self) -> String {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&event.to_string());
            out.push('\n');
        }
        out
    }
}

impl EventLogHandle {
    /// Record an event; failures to record are silently dropped
    pub async fn record(&self, description: impl Into<String>, error: Option<String>) {
        let event = Event {
            description: description.into(),
            error,
        };
        let _ = self.tx.send(EventLogRequest::Record(event)).await;
    }

    /// Render the current log page
    pub async fn page(&self) -> String {
        let (reply, response) = oneshot::channel();
        if self
            .tx
            .send(EventLogRequest::Page { reply })
            .await
            .is_err()
        {
            return String::new();
        }
        response.await.unwrap_or_default()
    }
}
