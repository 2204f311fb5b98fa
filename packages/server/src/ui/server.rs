//! Server execution logic.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::net::TcpListener;

use crate::usecase::{ConnectParticipantUseCase, DisconnectParticipantUseCase, HandleCommandUseCase};

use super::{
    error::ServerError, handler::handle_tcp_stream, signal::shutdown_signal, state::AppState,
};

/// Line-based TCP chat server
///
/// This struct holds the use cases shared by every connection and runs the accept loop.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_participant_usecase,
///     disconnect_participant_usecase,
///     handle_command_usecase,
///     Duration::from_secs(10),
/// );
/// server.run("127.0.0.1".to_string(), 8888).await?;
/// ```
pub struct Server {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// HandleCommandUseCase（コマンド処理のユースケース）
    handle_command_usecase: Arc<HandleCommandUseCase>,
    /// 無発言でタイムアウトするまでの時間
    idle_timeout: Duration,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `connect_participant_usecase` - UseCase for participant connection
    /// * `disconnect_participant_usecase` - UseCase for participant disconnection
    /// * `handle_command_usecase` - UseCase for inbound line handling
    /// * `idle_timeout` - How long a connection may stay silent
    pub fn new(
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
        handle_command_usecase: Arc<HandleCommandUseCase>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            connect_participant_usecase,
            disconnect_participant_usecase,
            handle_command_usecase,
            idle_timeout,
        }
    }

    /// Run the chat server until Ctrl+C
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8888)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if accepting a connection fails.
    pub async fn run(self, host: String, port: u16) -> Result<(), ServerError> {
        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr.clone(),
                source,
            })?;

        tracing::info!(
            "Chat server listening on {}",
            listener.local_addr().map_err(ServerError::LocalAddr)?
        );
        tracing::info!("Connect with: irori-client --host {} --port {}", host, port);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Accept connections on `listener` until `shutdown` resolves
    ///
    /// Each accepted connection is served on its own task.
    ///
    /// # Errors
    ///
    /// Returns an error if accepting a connection fails.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        let app_state = Arc::new(AppState {
            connect_participant_usecase: self.connect_participant_usecase,
            disconnect_participant_usecase: self.disconnect_participant_usecase,
            handle_command_usecase: self.handle_command_usecase,
            idle_timeout: self.idle_timeout,
        });

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => {
                    let (stream, peer) = accepted.map_err(ServerError::Accept)?;
                    tracing::debug!("Accepted connection from {}", peer);
                    tokio::spawn(handle_tcp_stream(app_state.clone(), stream, peer));
                }
            }
        }

        Ok(())
    }
}
