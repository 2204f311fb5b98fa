//! Connection supervisor.
//!
//! Each connection runs three tasks:
//!
//! - the supervisor (this function's task), racing liveness against the idle timeout
//! - the reader, turning inbound lines into commands and raising liveness
//! - the delivery loop, draining the participant's mailbox to the socket
//!
//! Whatever ends the connection (peer close, read error, oversized line, idle
//! timeout), cleanup runs exactly once here, after the reader has stopped.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::StreamExt;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpStream,
    sync::{mpsc, oneshot},
};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};

use irori_shared::time::{elapsed_millis_since, get_timestamp_millis, timestamp_to_rfc3339};

use crate::{
    domain::{Mailbox, Participant, RegistryError, Session, SystemReply, Timestamp},
    infrastructure::delivery::spawn_delivery_loop,
    ui::state::AppState,
    usecase::{ConnectError, LeaveNotice},
};

/// Longest inbound line in bytes, excluding the delimiter.
pub const MAX_LINE_LENGTH: usize = 4096;

/// Why the reader stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderExit {
    /// Peer closed the connection
    Eof,
    /// Read failed (including non UTF-8 input)
    Error,
    /// Line exceeded `MAX_LINE_LENGTH`
    Oversized,
    /// Stopped by the supervisor
    Shutdown,
}

/// How the supervisor loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    ReaderFinished,
    IdleTimeout,
}

/// Serve one accepted TCP connection.
pub async fn handle_tcp_stream(state: Arc<AppState>, stream: TcpStream, peer: SocketAddr) {
    let (reader, writer) = stream.into_split();
    handle_connection(state, reader, writer, peer.to_string()).await;
}

/// Serve one connection over any byte stream halves.
///
/// `address` is the peer's address string, used as the initial display name.
pub async fn handle_connection<R, W>(state: Arc<AppState>, reader: R, writer: W, address: String)
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (mailbox, mailbox_rx) = Mailbox::new();
    let participant = Participant::new(
        address.clone(),
        mailbox,
        Timestamp::new(get_timestamp_millis()),
    );
    let delivery_task = spawn_delivery_loop(mailbox_rx, writer, address.clone());

    let name = match state
        .connect_participant_usecase
        .execute(participant.clone())
        .await
    {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Rejecting connection from '{}': {}", address, e);
            if matches!(e, ConnectError::Rejected(RegistryError::NameOccupied(_)))
                && let Err(err) = participant.send_direct(SystemReply::NameOccupied.to_string())
            {
                tracing::debug!("Rejection notice for '{}' dropped: {}", address, err);
            }
            close_mailbox(&participant);
            let _ = delivery_task.await;
            return;
        }
    };
    tracing::debug!("'{}' connected", name);

    let (liveness_tx, mut liveness_rx) = mpsc::channel(1);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let reader_task = tokio::spawn(read_loop(
        state.clone(),
        reader,
        Session::new(name, participant.clone()),
        liveness_tx,
        shutdown_rx,
    ));

    let verdict = supervise(&mut liveness_rx, state.idle_timeout).await;
    if verdict == Verdict::IdleTimeout {
        tracing::info!("'{}' timed out after {:?}", address, state.idle_timeout);
        if let Err(e) = participant.send_direct(SystemReply::IdleTimeout.to_string()) {
            tracing::debug!("Timeout notice for '{}' dropped: {}", address, e);
        }
        let _ = shutdown_tx.send(());
    }

    let exit = match reader_task.await {
        Ok(exit) => exit,
        Err(e) => {
            tracing::error!("Reader task for '{}' failed: {}", address, e);
            ReaderExit::Error
        }
    };

    let notice = match (verdict, exit) {
        (Verdict::ReaderFinished, ReaderExit::Error) => LeaveNotice::Silent,
        _ => LeaveNotice::Announce,
    };

    // The timeout notice must reach the socket before it is closed
    if verdict == Verdict::IdleTimeout {
        close_mailbox(&participant);
        let _ = delivery_task.await;
        disconnect(&state, &participant, notice).await;
    } else {
        disconnect(&state, &participant, notice).await;
        close_mailbox(&participant);
        let _ = delivery_task.await;
    }
}

/// Waits on liveness signals, re-arming the idle timer after each one.
async fn supervise(liveness: &mut mpsc::Receiver<()>, idle_timeout: Duration) -> Verdict {
    loop {
        match tokio::time::timeout(idle_timeout, liveness.recv()).await {
            Ok(Some(())) => continue,
            Ok(None) => return Verdict::ReaderFinished,
            Err(_) => return Verdict::IdleTimeout,
        }
    }
}

async fn read_loop<R>(
    state: Arc<AppState>,
    reader: R,
    mut session: Session,
    liveness: mpsc::Sender<()>,
    mut shutdown: oneshot::Receiver<()>,
) -> ReaderExit
where
    R: AsyncRead + Unpin,
{
    // Strips one "\n" or "\r\n"; a final unterminated line is still yielded
    let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
    loop {
        let line = tokio::select! {
            _ = &mut shutdown => return ReaderExit::Shutdown,
            line = lines.next() => line,
        };

        match line {
            Some(Ok(line)) => {
                tracing::debug!("Received from '{}': {}", session.name, line);
                match state
                    .handle_command_usecase
                    .execute(&mut session, &line)
                    .await
                {
                    Ok(outcome) => tracing::debug!("'{}' -> {:?}", session.name, outcome),
                    Err(e) => tracing::warn!("Command from '{}' failed: {}", session.name, e),
                }
                // Full means a signal is already pending
                let _ = liveness.try_send(());
            }
            None => {
                tracing::debug!("'{}' closed the connection", session.name);
                return ReaderExit::Eof;
            }
            Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                tracing::warn!(
                    "'{}' sent a line longer than {} bytes",
                    session.name,
                    MAX_LINE_LENGTH
                );
                let reply = SystemReply::LineTooLong(MAX_LINE_LENGTH).to_string();
                if let Err(e) = session.participant.send_direct(reply) {
                    tracing::debug!("Oversized-line notice for '{}' dropped: {}", session.name, e);
                }
                return ReaderExit::Oversized;
            }
            Some(Err(LinesCodecError::Io(e))) => {
                tracing::warn!("Read error from '{}': {}", session.name, e);
                return ReaderExit::Error;
            }
        }
    }
}

async fn disconnect(state: &AppState, participant: &Participant, notice: LeaveNotice) {
    match state
        .disconnect_participant_usecase
        .execute(participant, notice)
        .await
    {
        Ok(name) => tracing::info!(
            "'{}' disconnected (connected at {}, {} ms)",
            name,
            timestamp_to_rfc3339(participant.connected_at.value()),
            elapsed_millis_since(participant.connected_at.value())
        ),
        Err(e) => tracing::warn!("Failed to disconnect '{}': {}", participant.address, e),
    }
}

fn close_mailbox(participant: &Participant) {
    if let Err(e) = participant.mailbox.close() {
        tracing::debug!("Mailbox for '{}' already closed: {}", participant.address, e);
    }
}
