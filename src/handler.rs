//! Connection handler
//!
//! Handles individual client connections: line framing over the TCP
//! stream, forwarding inbound lines to the RelayServer and draining the
//! session's outbound frame channel back to the socket.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tracing::{debug, error, info};

use crate::error::AppError;
use crate::protocol::ServerFrame;
use crate::server::ServerCommand;
use crate::types::SessionId;

/// Upper bound on one protocol line; longer input is a codec error that
/// ends the offending connection
const MAX_LINE_BYTES: usize = 8 * 1024;

/// Buffer size for the per-session outbound frame channel
const FRAME_BUFFER_SIZE: usize = 32;

/// Handle a new TCP connection
///
/// Registers the session with the RelayServer, then runs a read task
/// (socket lines -> commands) and a write task (outbound frames ->
/// socket) until either side ends, and reports the disconnect.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    let (read_half, write_half) = stream.into_split();
    let mut line_reader =
        FramedRead::new(read_half, LinesCodec::new_with_max_length(MAX_LINE_BYTES));
    let mut line_writer =
        FramedWrite::new(write_half, LinesCodec::new_with_max_length(MAX_LINE_BYTES));

    // Generate session ID
    let session_id = SessionId::new();
    info!("Session {} connected from {}", session_id, peer_addr);

    // Create channel for server -> client frames
    let (frame_tx, mut frame_rx) = mpsc::channel::<ServerFrame>(FRAME_BUFFER_SIZE);

    // Register with the RelayServer; it opens name negotiation
    if cmd_tx
        .send(ServerCommand::Connect {
            session_id,
            sender: frame_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to register session {} - server closed", session_id);
        return Err(AppError::ChannelSend);
    }

    // Clone cmd_tx for read task
    let cmd_tx_read = cmd_tx.clone();

    // Spawn read task (socket line -> ServerCommand)
    let mut read_task = tokio::spawn(async move {
        while let Some(line_result) = line_reader.next().await {
            let line = line_result?;
            if cmd_tx_read
                .send(ServerCommand::Line { session_id, line })
                .await
                .is_err()
            {
                debug!("Server closed, ending read task for {}", session_id);
                break;
            }
        }
        debug!("Read task ended for {}", session_id);
        Ok::<(), AppError>(())
    });

    // Spawn write task (ServerFrame -> socket line)
    let mut write_task = tokio::spawn(async move {
        while let Some(frame) = frame_rx.recv().await {
            if line_writer.send(frame.to_string()).await.is_err() {
                debug!("Socket send failed, ending write task");
                break;
            }
        }
        debug!("Write task ended for session");

        // Flush and shut the write half down when done
        let _ = SinkExt::<String>::close(&mut line_writer).await;
    });

    // Wait for either task to complete. When the read side ends (EOF or
    // transport error) the write task keeps draining until teardown
    // drops the session's sender; when the write side ends first the
    // session is already gone, so the read half is torn down too.
    let result = tokio::select! {
        res = &mut read_task => {
            debug!("Read task completed for {}", session_id);
            res.unwrap_or_else(|_| Ok(()))
        }
        _ = &mut write_task => {
            debug!("Write task completed for {}", session_id);
            read_task.abort();
            Ok(())
        }
    };

    // Send disconnect command; teardown on the actor is idempotent
    let _ = cmd_tx.send(ServerCommand::Disconnect { session_id }).await;

    info!("Session {} handler finished", session_id);

    result
}
