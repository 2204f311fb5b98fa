//! InMemory Participant Registry 実装
//!
//! ドメイン層が定義する ParticipantRegistry trait の具体的な実装。
//! HashMap を 1 つの Mutex で保護し、全ての操作をロック内で完結させます。
//! ロックはマップの読み書きの間だけ保持し、I/O をまたいで保持しません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Participant, ParticipantId, ParticipantName, ParticipantRegistry, RegistryEntry,
    RegistryError,
};

/// インメモリ Participant Registry 実装
#[derive(Debug, Default)]
pub struct InMemoryParticipantRegistry {
    /// 名前 → 参加者
    participants: Mutex<HashMap<ParticipantName, Participant>>,
}

impl InMemoryParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParticipantRegistry for InMemoryParticipantRegistry {
    async fn register(
        &self,
        name: ParticipantName,
        participant: Participant,
    ) -> Result<(), RegistryError> {
        let mut participants = self.participants.lock().await;
        if let Some(existing) = participants.get(&name)
            && existing.id != participant.id
        {
            return Err(RegistryError::NameOccupied(name.as_str().to_string()));
        }
        tracing::debug!("Registered '{}' ({})", name, participant.id);
        participants.insert(name, participant);
        Ok(())
    }

    async fn unregister(&self, name: &ParticipantName) {
        let mut participants = self.participants.lock().await;
        if participants.remove(name).is_some() {
            tracing::debug!("Unregistered '{}'", name);
        }
    }

    async fn unregister_participant(&self, id: ParticipantId) -> Option<ParticipantName> {
        let mut participants = self.participants.lock().await;
        let name = participants
            .iter()
            .find(|(_, participant)| participant.id == id)
            .map(|(name, _)| name.clone())?;
        participants.remove(&name);
        tracing::debug!("Unregistered '{}' ({})", name, id);
        Some(name)
    }

    async fn lookup(&self, name: &ParticipantName) -> Option<Participant> {
        let participants = self.participants.lock().await;
        participants.get(name).cloned()
    }

    async fn snapshot(&self) -> Vec<RegistryEntry> {
        let mut entries: Vec<RegistryEntry> = {
            let participants = self.participants.lock().await;
            participants
                .iter()
                .map(|(name, participant)| RegistryEntry {
                    name: name.clone(),
                    participant: participant.clone(),
                })
                .collect()
        };

        // Sort by name for consistent ordering
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    async fn rename_if_available(
        &self,
        old_name: &ParticipantName,
        new_name: ParticipantName,
    ) -> Result<(), RegistryError> {
        let mut participants = self.participants.lock().await;
        if participants.contains_key(&new_name) {
            return Err(RegistryError::NameOccupied(new_name.as_str().to_string()));
        }
        let participant = participants
            .remove(old_name)
            .ok_or_else(|| RegistryError::ParticipantNotFound(old_name.as_str().to_string()))?;
        tracing::debug!("Renamed '{}' -> '{}'", old_name, new_name);
        participants.insert(new_name, participant);
        Ok(())
    }

    async fn count(&self) -> usize {
        let participants = self.participants.lock().await;
        participants.len()
    }
}
