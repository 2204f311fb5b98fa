//! UseCase: 受信した 1 行の解釈と実行
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - HandleCommandUseCase::execute() メソッド
//! - who / rename| / to| / 通常メッセージの振り分け
//!
//! ### なぜこのテストが必要か
//! - 個別メッセージが宛先以外に届かないことを保証する
//! - 改名が Registry の一意性を壊さないことを保証する
//! - 書式誤りが送信者への返信だけで済み、接続を切らないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：一覧、改名、個別メッセージ、ブロードキャスト
//! - 異常系：使用中の名前、存在しない宛先、空の本文、書式誤り

use std::sync::Arc;

use crate::domain::{
    Command, CommandParseError, MessageBroadcaster, ParticipantName, ParticipantRegistry,
    RegistryError, Session, SystemReply, format_broadcast, format_private_message,
    format_who_entry,
};

use super::error::CommandError;

/// コマンド処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// 空行
    Ignored,
    /// オンライン一覧を送った（行数）
    Listed(usize),
    /// 改名した（新しい名前）
    Renamed(ParticipantName),
    /// 個別メッセージを送った（宛先）
    PrivateMessageSent(ParticipantName),
    /// 全員に配信した
    Broadcasted,
    /// 送信者にエラーを返信した
    Rejected(SystemReply),
}

/// コマンド処理のユースケース
pub struct HandleCommandUseCase {
    /// Registry（オンライン参加者の管理）
    registry: Arc<dyn ParticipantRegistry>,
    /// Broadcaster（全員への配信）
    broadcaster: Arc<dyn MessageBroadcaster>,
}

impl HandleCommandUseCase {
    /// 新しい HandleCommandUseCase を作成
    pub fn new(
        registry: Arc<dyn ParticipantRegistry>,
        broadcaster: Arc<dyn MessageBroadcaster>,
    ) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// 1 行を解釈して実行
    ///
    /// # Arguments
    ///
    /// * `session` - 送信者のセッション（改名時は名前が更新される）
    /// * `line` - 区切り文字を除いた受信行
    ///
    /// # Returns
    ///
    /// * `Ok(CommandOutcome)` - 実行結果（書式誤りなどの返信も含む）
    /// * `Err(CommandError)` - 送信者がオフライン、またはブロードキャスト失敗
    pub async fn execute(
        &self,
        session: &mut Session,
        line: &str,
    ) -> Result<CommandOutcome, CommandError> {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(CommandParseError::MalformedRename) => {
                return Ok(reject(session, SystemReply::RenameUsage));
            }
            Err(CommandParseError::MalformedPrivateMessage) => {
                return Ok(reject(session, SystemReply::PrivateMessageUsage));
            }
        };

        match command {
            Command::Empty => Ok(CommandOutcome::Ignored),
            Command::Who => Ok(self.list_online(session).await),
            Command::Rename { new_name } => self.rename(session, new_name).await,
            Command::PrivateMessage { target, content } => {
                Ok(self.send_private_message(session, target, content).await)
            }
            Command::Broadcast(text) => self.broadcast(session, text).await,
        }
    }

    /// オンライン参加者 1 人につき 1 行を送信者だけに返す
    async fn list_online(&self, session: &Session) -> CommandOutcome {
        let entries = self.registry.snapshot().await;
        for entry in &entries {
            send_reply(
                session,
                format_who_entry(&entry.participant.address, &entry.name),
            );
        }
        CommandOutcome::Listed(entries.len())
    }

    async fn rename(
        &self,
        session: &mut Session,
        new_name: &str,
    ) -> Result<CommandOutcome, CommandError> {
        let Ok(new_name) = ParticipantName::try_from(new_name) else {
            return Ok(reject(session, SystemReply::RenameUsage));
        };

        match self
            .registry
            .rename_if_available(&session.name, new_name.clone())
            .await
        {
            Ok(()) => {
                tracing::info!("'{}' renamed to '{}'", session.name, new_name);
                session.name = new_name.clone();
                send_reply(session, SystemReply::Renamed(new_name.clone()).to_string());
                Ok(CommandOutcome::Renamed(new_name))
            }
            Err(RegistryError::NameOccupied(_)) => Ok(reject(session, SystemReply::NameOccupied)),
            Err(RegistryError::ParticipantNotFound(name)) => {
                Err(CommandError::ParticipantOffline(name))
            }
        }
    }

    /// 宛先だけに届ける。送信者へのエコーはしない。
    async fn send_private_message(
        &self,
        session: &Session,
        target: &str,
        content: &str,
    ) -> CommandOutcome {
        let Ok(target_name) = ParticipantName::try_from(target) else {
            return reject(session, SystemReply::PrivateMessageUsage);
        };
        let Some(recipient) = self.registry.lookup(&target_name).await else {
            return reject(session, SystemReply::TargetNotFound);
        };
        if content.is_empty() {
            return reject(session, SystemReply::EmptyContent);
        }

        if let Err(e) = recipient.send_direct(format_private_message(&session.name, content)) {
            tracing::debug!("'{}' left before the private message arrived: {}", target_name, e);
        }
        CommandOutcome::PrivateMessageSent(target_name)
    }

    async fn broadcast(
        &self,
        session: &Session,
        text: &str,
    ) -> Result<CommandOutcome, CommandError> {
        let line = format_broadcast(&session.participant.address, &session.name, text);
        self.broadcaster
            .publish(line)
            .await
            .map_err(|e| CommandError::BroadcastFailed(e.to_string()))?;
        Ok(CommandOutcome::Broadcasted)
    }
}

fn reject(session: &Session, reply: SystemReply) -> CommandOutcome {
    send_reply(session, reply.to_string());
    CommandOutcome::Rejected(reply)
}

fn send_reply(session: &Session, text: String) {
    if let Err(e) = session.participant.send_direct(text) {
        tracing::debug!("Reply to '{}' dropped: {}", session.name, e);
    }
}
