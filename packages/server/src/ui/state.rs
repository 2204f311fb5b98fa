//! Shared application state.

use std::{sync::Arc, time::Duration};

use crate::usecase::{ConnectParticipantUseCase, DisconnectParticipantUseCase, HandleCommandUseCase};

/// State shared by every connection handler
pub struct AppState {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// HandleCommandUseCase（コマンド処理のユースケース）
    pub handle_command_usecase: Arc<HandleCommandUseCase>,
    /// 無発言でタイムアウトするまでの時間
    pub idle_timeout: Duration,
}
