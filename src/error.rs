//! Error types for the chat relay
//!
//! Defines application-level errors, protocol parse errors and message
//! send errors. Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// Covers fatal per-connection errors; everything here ends the
/// connection it occurred on and nothing else.
#[derive(Debug, Error)]
pub enum AppError {
    /// Line codec error (IO failure, oversize line or invalid UTF-8)
    #[error("Line codec error: {0}")]
    Codec(#[from] tokio_util::codec::LinesCodecError),

    /// Channel send error (fatal - internal channel broken)
    #[error("Channel send error")]
    ChannelSend,
}

/// Protocol parse errors
///
/// Raised when a line from an active session does not form a valid frame.
/// The offending session is closed; other sessions are unaffected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// Line does not start with a known delivery tag
    #[error("Unrecognized frame: {0:?}")]
    UnrecognizedFrame(String),

    /// SEND frame with no usable recipient names
    #[error("Empty recipient list")]
    EmptyRecipients,
}

/// Message send errors
///
/// Occurs when attempting to send frames through closed channels.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}
