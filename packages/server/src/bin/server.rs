//! Line-based TCP chat server.
//!
//! Every line a client sends is broadcast to all connected clients, except for
//! the commands `who`, `rename|<name>` and `to|<name>|<content>`.
//! Clients that stay silent longer than the idle timeout are disconnected.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-server
//! cargo run --bin irori-server -- --host 0.0.0.0 --port 9000 --idle-timeout-secs 300
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;

use irori_server::{
    domain::{MessageBroadcaster, ParticipantRegistry},
    infrastructure::{
        broadcast::{ChannelBroadcaster, DEFAULT_BROADCAST_CAPACITY},
        registry::InMemoryParticipantRegistry,
    },
    ui::{Server, ServerConfig},
    usecase::{ConnectParticipantUseCase, DisconnectParticipantUseCase, HandleCommandUseCase},
};
use irori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "irori-server")]
#[command(about = "Line-based TCP chat server with presence, rename and private messages", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = ServerConfig::DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = ServerConfig::DEFAULT_PORT)]
    port: u16,

    /// Seconds of silence before a client is disconnected
    #[arg(long, default_value_t = ServerConfig::DEFAULT_IDLE_TIMEOUT_SECS)]
    idle_timeout_secs: u64,

    /// Capacity of the shared broadcast queue
    #[arg(long, default_value_t = DEFAULT_BROADCAST_CAPACITY)]
    broadcast_capacity: usize,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            idle_timeout: Duration::from_secs(args.idle_timeout_secs),
            broadcast_capacity: args.broadcast_capacity,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::from(Args::parse());

    // Initialize dependencies in order:
    // 1. Registry
    // 2. Broadcaster (spawns the fan-out loop)
    // 3. UseCases
    // 4. Server

    // 1. Create Registry (in-memory)
    let registry: Arc<dyn ParticipantRegistry> = Arc::new(InMemoryParticipantRegistry::new());

    // 2. Create Broadcaster
    let (broadcaster, _broadcast_loop) =
        ChannelBroadcaster::spawn(registry.clone(), config.broadcast_capacity);
    let broadcaster: Arc<dyn MessageBroadcaster> = Arc::new(broadcaster);

    // 3. Create UseCases
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        registry.clone(),
        broadcaster.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        registry.clone(),
        broadcaster.clone(),
    ));
    let handle_command_usecase = Arc::new(HandleCommandUseCase::new(registry, broadcaster));

    // 4. Create and run the server
    let server = Server::new(
        connect_participant_usecase,
        disconnect_participant_usecase,
        handle_command_usecase,
        config.idle_timeout,
    );
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
