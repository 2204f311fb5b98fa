//! Domain error types.

use thiserror::Error;

/// Value Object の生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// 参加者名が空文字列
    #[error("Participant name must not be empty")]
    EmptyName,
}

/// Registry 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// 名前が別の参加者によって使用中
    #[error("Name '{0}' is already occupied")]
    NameOccupied(String),

    /// 参加者が Registry に存在しない
    #[error("Participant '{0}' not found")]
    ParticipantNotFound(String),
}

/// Mailbox への送信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailboxError {
    /// 配送ループが既に終了している
    #[error("Mailbox is closed")]
    Closed,
}

/// Broadcast Channel への送信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    /// ブロードキャストループが停止している
    #[error("Broadcast channel is closed")]
    ChannelClosed,
}
