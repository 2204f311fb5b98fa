//! Per-participant mailbox.
//!
//! An unbounded FIFO of outbound lines with an explicit `Close` terminal entry,
//! so "closed" is distinguishable from "empty". Only the owning participant's
//! delivery loop holds the receiving side.

use tokio::sync::mpsc::{self, error::TryRecvError};

use super::MailboxError;

#[derive(Debug)]
enum MailboxItem {
    Line(String),
    Close,
}

/// Sending side of a mailbox. Cheap to clone; the registry holds one copy.
#[derive(Debug, Clone)]
pub struct Mailbox {
    sender: mpsc::UnboundedSender<MailboxItem>,
}

/// Receiving side of a mailbox, owned by the delivery loop.
#[derive(Debug)]
pub struct MailboxReceiver {
    receiver: mpsc::UnboundedReceiver<MailboxItem>,
    closed: bool,
}

impl Mailbox {
    pub fn new() -> (Mailbox, MailboxReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Mailbox { sender },
            MailboxReceiver {
                receiver,
                closed: false,
            },
        )
    }

    /// Enqueue a line.
    ///
    /// Fails with `MailboxError::Closed` once the delivery loop has stopped.
    pub fn push(&self, line: impl Into<String>) -> Result<(), MailboxError> {
        self.sender
            .send(MailboxItem::Line(line.into()))
            .map_err(|_| MailboxError::Closed)
    }

    /// Enqueue the terminal entry. Lines pushed before it are still delivered.
    pub fn close(&self) -> Result<(), MailboxError> {
        self.sender
            .send(MailboxItem::Close)
            .map_err(|_| MailboxError::Closed)
    }
}

impl MailboxReceiver {
    /// Next line in FIFO order.
    ///
    /// Returns `None` after the terminal entry or once every sender is gone;
    /// from then on the mailbox rejects new lines.
    pub async fn recv(&mut self) -> Option<String> {
        if self.closed {
            return None;
        }
        match self.receiver.recv().await {
            Some(MailboxItem::Line(line)) => Some(line),
            Some(MailboxItem::Close) | None => {
                self.close();
                None
            }
        }
    }

    /// Next line if one is already queued, without waiting.
    pub fn try_recv(&mut self) -> Option<String> {
        if self.closed {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(MailboxItem::Line(line)) => Some(line),
            Ok(MailboxItem::Close) | Err(TryRecvError::Disconnected) => {
                self.close();
                None
            }
            Err(TryRecvError::Empty) => None,
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
        self.receiver.close();
    }
}
