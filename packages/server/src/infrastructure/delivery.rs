//! Participant delivery loop.
//!
//! Drains one participant's mailbox into the write half of its connection,
//! appending the line delimiter to every entry.

use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    task::JoinHandle,
};

use crate::domain::MailboxReceiver;

/// Spawns the delivery loop for one participant.
///
/// The task ends when the mailbox is closed or a write fails, and shuts the
/// write half down on the way out.
pub fn spawn_delivery_loop<W>(mailbox: MailboxReceiver, writer: W, peer: String) -> JoinHandle<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(delivery_loop(mailbox, writer, peer))
}

pub async fn delivery_loop<W>(mut mailbox: MailboxReceiver, mut writer: W, peer: String)
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = mailbox.recv().await {
        let mut batch = line;
        batch.push('\n');
        // Lines already queued go out in the same write
        while let Some(next) = mailbox.try_recv() {
            batch.push_str(&next);
            batch.push('\n');
        }

        // A broken pipe also surfaces on the read side
        if let Err(e) = write_batch(&mut writer, &batch).await {
            tracing::warn!("Failed to write to '{}': {}", peer, e);
            break;
        }
    }
    mailbox.close();

    if let Err(e) = writer.shutdown().await {
        tracing::debug!("Failed to shut down writer for '{}': {}", peer, e);
    }
    tracing::debug!("Delivery loop for '{}' finished", peer);
}

async fn write_batch<W>(writer: &mut W, batch: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(batch.as_bytes()).await?;
    writer.flush().await
}
