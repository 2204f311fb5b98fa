//! Registry trait 定義
//!
//! オンライン参加者の「名前 → Participant」対応表へのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 不変条件
//!
//! - 1 つの名前に対応するエントリは常に高々 1 つ
//! - 全ての読み書きは実装内部の排他ロックの中で行い、生のマップは外に出さない
//! - 走査が必要な呼び出し側は `snapshot` のコピーを使う（I/O 中にロックを保持しない）

use async_trait::async_trait;

use super::{Participant, ParticipantId, ParticipantName, RegistryError};

/// `snapshot` が返す 1 エントリ
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub name: ParticipantName,
    pub participant: Participant,
}

/// Participant Registry trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParticipantRegistry: Send + Sync {
    /// 参加者を登録
    ///
    /// 名前が別の参加者（ID が異なる）に使われている場合は `NameOccupied` を返し、何も変更しない。
    async fn register(
        &self,
        name: ParticipantName,
        participant: Participant,
    ) -> Result<(), RegistryError>;

    /// 名前で登録を削除（存在しなくてもエラーにしない）
    async fn unregister(&self, name: &ParticipantName);

    /// 指定 ID の参加者を、現在どの名前で登録されていても削除
    ///
    /// 削除した場合はその時点の名前を返す。
    async fn unregister_participant(&self, id: ParticipantId) -> Option<ParticipantName>;

    /// 名前で参加者を検索
    async fn lookup(&self, name: &ParticipantName) -> Option<Participant>;

    /// 現時点の全エントリのコピー（名前順）
    async fn snapshot(&self) -> Vec<RegistryEntry>;

    /// 1 つのクリティカルセクション内で改名
    ///
    /// `new_name` が使用中（`old_name` と同じ場合も含む）なら `NameOccupied`、
    /// `old_name` が存在しなければ `ParticipantNotFound` を返し、何も変更しない。
    async fn rename_if_available(
        &self,
        old_name: &ParticipantName,
        new_name: ParticipantName,
    ) -> Result<(), RegistryError>;

    /// オンライン人数
    async fn count(&self) -> usize;
}
