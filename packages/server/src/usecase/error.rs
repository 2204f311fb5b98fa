//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::RegistryError;

/// 参加者接続のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// リモートアドレスから表示名を作れない
    #[error("Invalid participant address: '{0}'")]
    InvalidAddress(String),

    /// Registry への登録が拒否された
    #[error("Registration rejected: {0}")]
    Rejected(#[from] RegistryError),
}

/// 参加者切断のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisconnectError {
    /// 既に Registry から削除されている
    #[error("Participant '{0}' is not online")]
    ParticipantNotFound(String),

    /// 退出通知を配信できなかった
    #[error("Failed to broadcast leave notice: {0}")]
    BroadcastFailed(String),
}

/// コマンド処理のエラー
///
/// 書式誤りなどのプロトコルエラーは送信者への返信で扱い、ここには含めない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// 送信者が既に Registry に存在しない
    #[error("Participant '{0}' is no longer online")]
    ParticipantOffline(String),

    /// ブロードキャストに失敗
    #[error("Failed to broadcast message: {0}")]
    BroadcastFailed(String),
}
