//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 接続直後の参加者がリモートアドレスを名前として Registry に登録されることを確認
//! - 入室通知が Broadcast Channel 経由で配信されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録と入室通知
//! - 異常系：同じ名前が既に使用中

use std::sync::Arc;

use crate::domain::{
    JOINED_TEXT, MessageBroadcaster, Participant, ParticipantName, ParticipantRegistry,
    format_broadcast,
};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Registry（オンライン参加者の管理）
    registry: Arc<dyn ParticipantRegistry>,
    /// Broadcaster（全員への配信）
    broadcaster: Arc<dyn MessageBroadcaster>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        registry: Arc<dyn ParticipantRegistry>,
        broadcaster: Arc<dyn MessageBroadcaster>,
    ) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// 参加者接続を実行
    ///
    /// # Returns
    ///
    /// * `Ok(ParticipantName)` - 登録された名前（リモートアドレス）
    /// * `Err(ConnectError)` - 登録失敗（Registry は変更されない）
    pub async fn execute(&self, participant: Participant) -> Result<ParticipantName, ConnectError> {
        // 1. リモートアドレスを初期表示名にする
        let name = participant
            .default_name()
            .map_err(|_| ConnectError::InvalidAddress(participant.address.clone()))?;

        // 2. Registry に登録
        self.registry
            .register(name.clone(), participant.clone())
            .await?;
        tracing::info!(
            "'{}' joined ({} online)",
            name,
            self.registry.count().await
        );

        // 3. 入室通知（失敗しても接続は継続する）
        let notice = format_broadcast(&participant.address, &name, JOINED_TEXT);
        if let Err(e) = self.broadcaster.publish(notice).await {
            tracing::warn!("Failed to broadcast join notice for '{}': {}", name, e);
        }

        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Mailbox, MailboxReceiver, MockMessageBroadcaster, RegistryError, Timestamp},
        infrastructure::registry::InMemoryParticipantRegistry,
    };

    fn participant(address: &str) -> (Participant, MailboxReceiver) {
        let (mailbox, rx) = Mailbox::new();
        (
            Participant::new(address.to_string(), mailbox, Timestamp::new(0)),
            rx,
        )
    }

    #[tokio::test]
    async fn test_connect_registers_address_and_announces_join() {
        // テスト項目: リモートアドレスの名前で登録され、入室通知が配信される
        // given (前提条件):
        let registry = Arc::new(InMemoryParticipantRegistry::new());
        let mut broadcaster = MockMessageBroadcaster::new();
        broadcaster
            .expect_publish()
            .withf(|line| line == "[127.0.0.1:5000]127.0.0.1:5000:已上线")
            .times(1)
            .returning(|_| Ok(()));
        let usecase = ConnectParticipantUseCase::new(registry.clone(), Arc::new(broadcaster));
        let (alice, _rx) = participant("127.0.0.1:5000");

        // when (操作):
        let result = usecase.execute(alice.clone()).await;

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "127.0.0.1:5000");
        let found = registry
            .lookup(&ParticipantName::try_from("127.0.0.1:5000").unwrap())
            .await
            .unwrap();
        assert_eq!(found.id, alice.id);
    }

    #[tokio::test]
    async fn test_connect_with_occupied_name_is_rejected() {
        // テスト項目: 同じ名前が使用中なら拒否され、入室通知は配信されない
        // given (前提条件):
        let registry = Arc::new(InMemoryParticipantRegistry::new());
        let (squatter, _rx1) = participant("other");
        registry
            .register(ParticipantName::try_from("127.0.0.1:5000").unwrap(), squatter)
            .await
            .unwrap();
        let mut broadcaster = MockMessageBroadcaster::new();
        broadcaster.expect_publish().times(0);
        let usecase = ConnectParticipantUseCase::new(registry.clone(), Arc::new(broadcaster));
        let (alice, _rx2) = participant("127.0.0.1:5000");

        // when (操作):
        let result = usecase.execute(alice).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConnectError::Rejected(RegistryError::NameOccupied(
                "127.0.0.1:5000".to_string()
            )))
        );
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_connect_with_empty_address_is_rejected() {
        // テスト項目: アドレスが空の場合は登録されない
        // given (前提条件):
        let registry = Arc::new(InMemoryParticipantRegistry::new());
        let mut broadcaster = MockMessageBroadcaster::new();
        broadcaster.expect_publish().times(0);
        let usecase = ConnectParticipantUseCase::new(registry.clone(), Arc::new(broadcaster));
        let (nobody, _rx) = participant("");

        // when (操作):
        let result = usecase.execute(nobody).await;

        // then (期待する結果):
        assert_eq!(result, Err(ConnectError::InvalidAddress(String::new())));
        assert_eq!(registry.count().await, 0);
    }
}
