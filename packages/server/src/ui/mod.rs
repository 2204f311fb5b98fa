//! TCP chat server: accept loop and per-connection supervision.

mod config;
mod error;
pub mod handler;
mod server;
mod signal;
pub mod state;

pub use config::ServerConfig;
pub use error::ServerError;
pub use server::Server;
pub use signal::shutdown_signal;
