//! mpsc キューを使った MessageBroadcaster 実装
//!
//! ## 責務
//!
//! - 複数の生産者から整形済みの行を受け付ける（`publish`）
//! - 1 つのループがキューを消費し、メッセージごとに Registry の snapshot を取り直して
//!   全参加者の Mailbox へコピーする
//!
//! ## 配送の保証
//!
//! - 同じ受信者の Mailbox には publish 順に届く（Mailbox 自体が FIFO）
//! - snapshot はメッセージごとに取るため、途中で参加・離脱した参加者への配送は best-effort

use std::sync::Arc;

use async_trait::async_trait;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::domain::{BroadcastError, MessageBroadcaster, ParticipantRegistry};

/// キューの既定の容量
pub const DEFAULT_BROADCAST_CAPACITY: usize = 1024;

/// mpsc キューを使った MessageBroadcaster 実装
#[derive(Debug, Clone)]
pub struct ChannelBroadcaster {
    sender: mpsc::Sender<String>,
}

impl ChannelBroadcaster {
    /// キューを作成し、ファンアウトループを起動する
    ///
    /// ループは全ての `ChannelBroadcaster` が破棄されるまで動き続ける。
    pub fn spawn(
        registry: Arc<dyn ParticipantRegistry>,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(broadcast_loop(receiver, registry));
        (Self { sender }, handle)
    }
}

#[async_trait]
impl MessageBroadcaster for ChannelBroadcaster {
    async fn publish(&self, line: String) -> Result<(), BroadcastError> {
        self.sender
            .send(line)
            .await
            .map_err(|_| BroadcastError::ChannelClosed)
    }
}

async fn broadcast_loop(
    mut receiver: mpsc::Receiver<String>,
    registry: Arc<dyn ParticipantRegistry>,
) {
    while let Some(line) = receiver.recv().await {
        let delivered = fan_out(registry.as_ref(), &line).await;
        tracing::debug!("Broadcasted to {} participant(s): {}", delivered, line);
    }
    tracing::debug!("Broadcast loop stopped");
}

/// 現在オンラインの全参加者の Mailbox に 1 行をコピーする
///
/// 終了済みの Mailbox は読み飛ばす。届けた数を返す。
pub async fn fan_out(registry: &dyn ParticipantRegistry, line: &str) -> usize {
    let mut delivered = 0;
    for entry in registry.snapshot().await {
        // ブロードキャストでは一部の送信失敗を許容
        match entry.participant.mailbox.push(line) {
            Ok(()) => delivered += 1,
            Err(e) => {
                tracing::debug!("Skipping '{}' during broadcast: {}", entry.name, e);
            }
        }
    }
    delivered
}
