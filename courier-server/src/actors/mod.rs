//! Component actors owning the relay's mutable state
//!
//! Each stateful component (key registry, challenger, group directory,
//! mailbox, event log) runs as one long-lived task that owns its map
//! exclusively. Requests arrive on an mpsc channel as an enum variant
//! carrying a oneshot reply sender; the actor produces exactly one reply per
//! request before taking the next, so requests to the same component are
//! totally ordered by channel arrival and no locking is needed anywhere.
//!
//! The dependency graph between actors is acyclic: handlers send to any
//! actor, the challenger sends to the registry during proof verification,
//! and nothing sends upstream.

mod challenger;
mod directory;
mod events;
mod mailbox;
mod registry;

pub use challenger::{Challenger, ChallengerHandle};
pub use directory::{Directory, DirectoryHandle};
pub use events::{Event, EventLog, EventLogHandle};
pub use mailbox::{Mailbox, MailboxHandle};
pub use registry::{Registry, RegistryHandle};

/// Request channel depth for the component actors
///
/// Effectively unbuffered: a sender parks until the actor accepts its
/// request, which is what gives the arrival-order guarantee its meaning.
pub(crate) const REQUEST_CHANNEL_CAPACITY: usize = 1;

/// Request channel depth for the event log
///
/// Recording an event is fire-and-forget, so a little slack keeps handlers
/// from stalling on diagnostics.
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 64;
