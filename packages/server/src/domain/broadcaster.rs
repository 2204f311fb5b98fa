//! Broadcast Channel trait 定義

use async_trait::async_trait;

use super::BroadcastError;

/// 全オンライン参加者への配信を受け付けるキュー
///
/// 生産者は複数（各接続のコマンド処理）、消費者は 1 つのブロードキャストループ。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageBroadcaster: Send + Sync {
    /// 整形済みの 1 行をキューに積む
    ///
    /// キューが満杯の場合は空きが出るまで待つ（バックプレッシャー）。
    async fn publish(&self, line: String) -> Result<(), BroadcastError>;
}
