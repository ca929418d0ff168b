//! # draftroom-realtime
//!
//! The collaboration hub: a process-lifetime, in-memory registry of live
//! connections grouped by document, with presence tracking and event
//! fan-out. The hub broadcasts opaque application-level events; it does no
//! merging of concurrent edits and has no dependency on storage.

pub mod connection;
pub mod hub;
pub mod message;

pub use connection::handle::{ConnectionHandle, ConnectionId};
pub use hub::CollabHub;
pub use message::types::{ClientMessage, ServerEvent};
