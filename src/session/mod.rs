//! Wire protocol and WebSocket hosting: tagged inbound/outbound message
//! enums, room-state views, combat event batching, and the actix server
//! that bridges sockets to room mailboxes.

mod message;
mod protocol;
mod server;
mod view;

pub use message::*;
pub use protocol::*;
pub use server::*;
pub use view::*;

/// Per-client outbound frame channel; the bridge task drains it into the
/// socket so rooms never block on I/O.
pub type Outbox = tokio::sync::mpsc::UnboundedSender<String>;
