//! Realtime chat: wire events and the message pipeline.
//!
//! The WebSocket gateway ([`crate::ws`]) parses inbound [`events::ClientEvent`]s
//! and hands them to the [`pipeline::MessagePipeline`], which persists the
//! message and fans the resulting [`events::ServerEvent`] out to the sender
//! and (if online) the recipient.

pub mod events;
pub mod pipeline;

pub use events::{ClientEvent, MessageDelivery, ServerEvent};
pub use pipeline::MessagePipeline;
