//! Session struct definition
//!
//! Represents one connected peer with its negotiated name and outbound
//! frame channel.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::protocol::ServerFrame;
use crate::types::SessionId;

/// Connected peer information
///
/// Holds the state the relay keeps per connection: the unique session ID,
/// the display name (None until negotiation completes) and the outbound
/// frame channel drained by the connection's write task. The channel is
/// the only path to the peer's socket, so concurrent deliveries from
/// different senders can never interleave within a line.
#[derive(Debug)]
pub struct Session {
    /// Unique identifier for this session
    pub id: SessionId,
    /// Display name (None while negotiating)
    pub name: Option<String>,
    /// Server → Client frame channel
    pub sender: mpsc::Sender<ServerFrame>,
}

impl Session {
    /// Create a new session with the given ID and sender channel
    pub fn new(id: SessionId, sender: mpsc::Sender<ServerFrame>) -> Self {
        Self {
            id,
            name: None,
            sender,
        }
    }

    /// Send a frame to this peer
    ///
    /// Returns an error if the channel is closed (peer disconnected).
    pub async fn send(&self, frame: ServerFrame) -> Result<(), SendError> {
        self.sender
            .send(frame)
            .await
            .map_err(|_| SendError::ChannelClosed)
    }

    /// Check whether this session has completed name negotiation
    pub fn is_active(&self) -> bool {
        self.name.is_some()
    }

    /// Record the negotiated display name
    pub fn register(&mut self, name: String) {
        self.name = Some(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_creation() {
        let (tx, _rx) = mpsc::channel(32);
        let session = Session::new(SessionId::new(), tx);

        assert!(session.name.is_none());
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn test_session_register() {
        let (tx, _rx) = mpsc::channel(32);
        let mut session = Session::new(SessionId::new(), tx);

        session.register("alice".to_string());

        assert!(session.is_active());
        assert_eq!(session.name.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_session_send() {
        let (tx, mut rx) = mpsc::channel(32);
        let session = Session::new(SessionId::new(), tx);

        session.send(ServerFrame::SubmitName).await.unwrap();
        assert_eq!(rx.recv().await, Some(ServerFrame::SubmitName));

        drop(rx);
        assert!(session.send(ServerFrame::NameAccepted).await.is_err());
    }
}
