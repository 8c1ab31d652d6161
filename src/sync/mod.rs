//! Configuration synchronization.
//!
//! Every view holds a [`SyncClient`]. Three channels tell it that the
//! canonical section config changed:
//!
//! 1. the same-process [`LocalBus`], fed by [`SyncClient::publish`],
//! 2. a signal key in the shared [`SignalStore`](crate::storage::SignalStore),
//!    written by `publish` and observed by every *other* view,
//! 3. server pushes on a websocket ([`SocketChannel`]).
//!
//! Each notification makes the client refetch the full snapshot.

pub mod bus;
pub mod client;
pub mod error;
pub mod event;
pub mod machine;
pub mod message;
pub mod socket;

pub use bus::{LocalBus, Subscription};
pub use client::SyncClient;
pub use error::{SyncError, SyncResult};
pub use event::{ChangeNotification, Origin};
pub use machine::{CloseKind, ConnectionMachine, ConnectionState, ReconnectPolicy};
pub use message::ServerMessage;
pub use socket::{socket_url, SocketChannel, SocketStatus};
