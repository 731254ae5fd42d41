//! Line-Oriented Chat Relay Library
//!
//! A TCP chat relay built on tokio using the Actor pattern for state
//! management. Each connected peer negotiates a unique display name,
//! then exchanges messages under three delivery modes: broadcast to
//! everyone, multicast to a listed subset, and one-to-one delivery.
//!
//! # Features
//! - Line-oriented wire protocol (one frame per line)
//! - Display-name negotiation with uniqueness enforcement
//! - Broadcast, multicast and unicast message routing
//! - Per-peer active-list views, refreshed on every join and leave
//! - Disconnection handling with exactly-once teardown
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `RelayServer` is the central actor owning the roster, the session
//!   directory and every session's outbound channel
//! - Each connection has a `handler` task pair communicating with the
//!   server
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use chat_relay::{RelayServer, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:9001").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(RelayServer::new(cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod error;
pub mod handler;
pub mod protocol;
pub mod roster;
pub mod router;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use error::{AppError, ProtocolError, SendError};
pub use handler::handle_connection;
pub use protocol::{ClientFrame, ServerFrame};
pub use roster::{Directory, Roster};
pub use router::Delivery;
pub use server::{RelayServer, ServerCommand};
pub use session::Session;
pub use types::SessionId;
