//! Wire protocol definitions
//!
//! Line-oriented bidirectional protocol: one frame per line, a leading
//! tag word selecting the frame type. Inbound lines are parsed into
//! `ClientFrame`, outbound frames are encoded from `ServerFrame`.
//!
//! Delivery instructions carry the delivery tag, the recipient list and
//! the body as distinct fields (`SEND alice,bob hello`), so no
//! fixed-offset substring slicing is needed anywhere.

use std::fmt;

use crate::error::ProtocolError;

/// Client → Server frame
///
/// Sent by a session that has completed name negotiation. Lines received
/// while negotiating are raw name candidates and never reach this parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientFrame {
    /// Deliver the body to every active session, sender included
    Broadcast { body: String },
    /// Deliver the body to the listed names: one name is a unicast,
    /// two or more a multicast. The sender always receives its own copy.
    Send {
        recipients: Vec<String>,
        body: String,
    },
}

impl ClientFrame {
    /// Parse one inbound line from an active session.
    ///
    /// Unknown tags and `SEND` frames without any recipient name are
    /// rejected; the caller closes the offending session.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        if let Some(rest) = strip_tag(line, "BROADCAST") {
            return Ok(ClientFrame::Broadcast {
                body: rest.to_string(),
            });
        }

        if let Some(rest) = strip_tag(line, "SEND") {
            let (list, body) = match rest.split_once(' ') {
                Some((list, body)) => (list, body),
                None => (rest, ""),
            };
            let recipients: Vec<String> = list
                .split(',')
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            if recipients.is_empty() {
                return Err(ProtocolError::EmptyRecipients);
            }
            return Ok(ClientFrame::Send {
                recipients,
                body: body.to_string(),
            });
        }

        Err(ProtocolError::UnrecognizedFrame(line.to_string()))
    }
}

/// Server → Client frame
///
/// Encoded with `Display`; the handler appends the line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerFrame {
    /// Request a candidate display name
    SubmitName,
    /// Registration succeeded; the client may now send messages
    NameAccepted,
    /// Refreshed roster view, already excluding the recipient's own name
    ActiveList(Vec<String>),
    /// A delivered chat line, pre-rendered as `<sender>: <body>`
    Message(String),
}

impl ServerFrame {
    /// Render a chat line for delivery
    pub fn message(sender: &str, body: &str) -> Self {
        ServerFrame::Message(format!("{}: {}", sender, body))
    }
}

impl fmt::Display for ServerFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerFrame::SubmitName => write!(f, "SUBMITNAME"),
            ServerFrame::NameAccepted => write!(f, "NAMEACCEPTED"),
            ServerFrame::ActiveList(names) => {
                if names.is_empty() {
                    write!(f, "ACTIVELIST")
                } else {
                    write!(f, "ACTIVELIST {}", names.join(","))
                }
            }
            ServerFrame::Message(rendered) => write!(f, "MESSAGE {}", rendered),
        }
    }
}

/// Split `TAG body` or bare `TAG` off a line, or return None.
fn strip_tag<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    match line.strip_prefix(tag) {
        Some("") => Some(""),
        Some(rest) => rest.strip_prefix(' '),
        None => None,
    }
}
