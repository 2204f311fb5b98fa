//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 切断・タイムアウト・読み取りエラーのいずれでも Registry から確実に削除されることを確認
//! - 退出通知が必要な場合だけ配信されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：改名後の参加者の切断と退出通知
//! - 読み取りエラー：通知なしで削除
//! - エッジケース：既に削除済みの参加者（冪等）

use std::sync::Arc;

use crate::domain::{
    LEFT_TEXT, MessageBroadcaster, Participant, ParticipantName, ParticipantRegistry,
    format_broadcast,
};

use super::error::DisconnectError;

/// 退出通知を配信するかどうか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveNotice {
    /// 他の参加者に退出を通知する（切断・タイムアウト）
    Announce,
    /// 通知しない（読み取りエラー）
    Silent,
}

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Registry（オンライン参加者の管理）
    registry: Arc<dyn ParticipantRegistry>,
    /// Broadcaster（全員への配信）
    broadcaster: Arc<dyn MessageBroadcaster>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        registry: Arc<dyn ParticipantRegistry>,
        broadcaster: Arc<dyn MessageBroadcaster>,
    ) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// 参加者切断を実行
    ///
    /// 参加者は ID で削除するため、改名後でも現在の名前のエントリが消える。
    ///
    /// # Returns
    ///
    /// * `Ok(ParticipantName)` - 削除時点の名前
    /// * `Err(DisconnectError)` - 既に削除済み、または退出通知の配信失敗
    pub async fn execute(
        &self,
        participant: &Participant,
        notice: LeaveNotice,
    ) -> Result<ParticipantName, DisconnectError> {
        // 1. Registry から削除
        let name = self
            .registry
            .unregister_participant(participant.id)
            .await
            .ok_or_else(|| DisconnectError::ParticipantNotFound(participant.address.clone()))?;
        tracing::info!("'{}' left ({} online)", name, self.registry.count().await);

        // 2. 残っている参加者に退出を通知
        if notice == LeaveNotice::Announce {
            let line = format_broadcast(&participant.address, &name, LEFT_TEXT);
            self.broadcaster
                .publish(line)
                .await
                .map_err(|e| DisconnectError::BroadcastFailed(e.to_string()))?;
        }

        Ok(name)
    }
}
