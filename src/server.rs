//! RelayServer Actor implementation
//!
//! The central actor that owns all shared state: the session table, the
//! roster of registered names and the session directory. Uses the Actor
//! pattern with mpsc channels for message passing, so name checks,
//! registrations and teardown sequences never interleave.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::protocol::{ClientFrame, ServerFrame};
use crate::roster::{Directory, Roster};
use crate::router;
use crate::session::Session;
use crate::types::SessionId;

/// Commands sent from connection handlers to the RelayServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New connection accepted
    Connect {
        session_id: SessionId,
        sender: mpsc::Sender<ServerFrame>,
    },
    /// One line read from the connection. While the session is
    /// negotiating this is a name candidate, afterwards a chat frame.
    Line {
        session_id: SessionId,
        line: String,
    },
    /// Connection ended (EOF, transport error, or handler shutdown)
    Disconnect { session_id: SessionId },
}

/// The main RelayServer actor
///
/// Processes commands strictly in order; all roster and directory
/// mutation happens on this task.
pub struct RelayServer {
    /// All connected sessions, negotiating or active
    sessions: HashMap<SessionId, Session>,
    /// Names currently in use
    roster: Roster,
    /// Registered session <-> name mapping
    directory: Directory,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl RelayServer {
    /// Create a new RelayServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            sessions: HashMap::new(),
            roster: Roster::new(),
            directory: Directory::new(),
            receiver,
        }
    }

    /// Run the RelayServer event loop
    ///
    /// Continuously receives and processes commands until all senders
    /// are dropped.
    pub async fn run(mut self) {
        info!("RelayServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd).await;
        }

        info!("RelayServer shutting down");
    }

    /// Process a single command
    async fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { session_id, sender } => {
                self.handle_connect(session_id, sender).await;
            }
            ServerCommand::Line { session_id, line } => {
                self.handle_line(session_id, line).await;
            }
            ServerCommand::Disconnect { session_id } => {
                self.teardown(session_id).await;
            }
        }
    }

    /// Handle a new connection: record the session and open negotiation
    async fn handle_connect(&mut self, session_id: SessionId, sender: mpsc::Sender<ServerFrame>) {
        info!("Session {} connected", session_id);
        let session = Session::new(session_id, sender);
        let _ = session.send(ServerFrame::SubmitName).await;
        self.sessions.insert(session_id, session);
        debug!(
            "Total sessions: {}, registered: {}",
            self.sessions.len(),
            self.directory.len()
        );
    }

    /// Handle one inbound line, interpreted by the session's state
    async fn handle_line(&mut self, session_id: SessionId, line: String) {
        let Some(session) = self.sessions.get(&session_id) else {
            return;
        };

        if session.is_active() {
            self.handle_frame(session_id, line).await;
        } else {
            self.handle_name_candidate(session_id, line).await;
        }
    }

    /// Attempt to register a candidate name for a negotiating session
    ///
    /// Invalid or taken candidates re-prompt; success activates the
    /// session and refreshes every peer's active list.
    async fn handle_name_candidate(&mut self, session_id: SessionId, candidate: String) {
        let Some(session) = self.sessions.get_mut(&session_id) else {
            return;
        };

        if !is_valid_name(&candidate) || !self.roster.try_register(&candidate) {
            debug!(
                "Session {} candidate name {:?} rejected",
                session_id, candidate
            );
            let _ = session.send(ServerFrame::SubmitName).await;
            return;
        }

        session.register(candidate.clone());
        self.directory.insert(session_id, candidate.clone());
        info!("Session {} registered as '{}'", session_id, candidate);

        let _ = session.send(ServerFrame::NameAccepted).await;
        self.refresh_active_lists().await;
    }

    /// Route one chat frame from an active session
    async fn handle_frame(&mut self, session_id: SessionId, line: String) {
        let Some(sender_name) = self.directory.name_of(session_id).map(str::to_string) else {
            return;
        };

        let frame = match ClientFrame::parse(&line) {
            Ok(frame) => frame,
            Err(e) => {
                // Contained to this connection: close it, leave the
                // rest of the relay untouched
                warn!("Session {} sent malformed frame: {}", session_id, e);
                self.teardown(session_id).await;
                return;
            }
        };

        debug!("Session {} ({}) -> {:?}", session_id, sender_name, frame);

        for delivery in router::plan(session_id, &sender_name, &frame, &self.directory) {
            if let Some(target) = self.sessions.get(&delivery.target) {
                let _ = target.send(delivery.frame).await;
            }
        }
    }

    /// Tear down a session; runs at most once per session
    ///
    /// Releases the name, removes the directory entry and refreshes the
    /// surviving peers' active lists. Dropping the session (and with it
    /// the outbound channel) is what closes the connection.
    async fn teardown(&mut self, session_id: SessionId) {
        let Some(_session) = self.sessions.remove(&session_id) else {
            return;
        };

        info!("Session {} disconnected", session_id);

        if let Some(name) = self.directory.remove(session_id) {
            self.roster.release(&name);
            info!("Name '{}' released", name);
            self.refresh_active_lists().await;
        }

        debug!(
            "Total sessions: {}, registered: {}",
            self.sessions.len(),
            self.directory.len()
        );
    }

    /// Send every registered session its personalized active list
    async fn refresh_active_lists(&self) {
        for (id, name) in self.directory.entries() {
            if let Some(session) = self.sessions.get(&id) {
                let view = self.directory.view_for(name);
                let _ = session.send(ServerFrame::ActiveList(view)).await;
            }
        }
    }
}

/// Names must be addressable in the SEND recipient syntax: non-empty,
/// no whitespace, no commas. Case-sensitive, no other normalization.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(',') && !name.chars().any(char::is_whitespace)
}
