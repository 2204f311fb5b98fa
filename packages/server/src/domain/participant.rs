//! Participant エンティティと関連する Value Object
//!
//! ## 設計ノート
//!
//! - `Participant` は接続ごとのハンドル（ID・アドレス・Mailbox）で、安価に clone できる
//! - 表示名は Registry のキーと接続ごとの `Session` が保持する
//! - Registry が「誰がオンラインか」の唯一の情報源

use std::fmt;

use uuid::Uuid;

use super::{Mailbox, MailboxError, ValueObjectError};

/// 参加者の表示名（Value Object）
///
/// 空でない任意の文字列。大文字小文字を区別し、バイト単位で比較する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantName(String);

impl ParticipantName {
    /// 新しい ParticipantName を作成
    ///
    /// # Errors
    ///
    /// 空文字列の場合は `ValueObjectError::EmptyName` を返す
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyName);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ParticipantName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ParticipantName {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 参加者 ID（接続ごとに払い出す UUID v4）
///
/// 同じ名前を一時的に主張する 2 つの接続を区別するために使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// 接続中の参加者
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    /// リモートアドレス（初期表示名を兼ねる）
    pub address: String,
    pub mailbox: Mailbox,
    pub connected_at: Timestamp,
}

impl Participant {
    pub fn new(address: String, mailbox: Mailbox, connected_at: Timestamp) -> Self {
        Self {
            id: ParticipantId::generate(),
            address,
            mailbox,
            connected_at,
        }
    }

    /// 初期表示名（リモートアドレス）
    pub fn default_name(&self) -> Result<ParticipantName, ValueObjectError> {
        ParticipantName::new(self.address.clone())
    }

    /// Broadcast Channel を経由せずにこの参加者の Mailbox へ直接送る
    pub fn send_direct(&self, text: impl Into<String>) -> Result<(), MailboxError> {
        self.mailbox.push(text)
    }
}

/// 接続ごとのセッション状態
///
/// 現在の表示名はこの接続の読み取りタスクだけが書き換える。
#[derive(Debug, Clone)]
pub struct Session {
    pub name: ParticipantName,
    pub participant: Participant,
}

impl Session {
    pub fn new(name: ParticipantName, participant: Participant) -> Self {
        Self { name, participant }
    }
}
