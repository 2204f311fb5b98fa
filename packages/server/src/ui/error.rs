//! Server-level errors.

use thiserror::Error;

/// Errors that stop the accept loop.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Accepting a connection failed
    #[error("Failed to accept connection: {0}")]
    Accept(#[source] std::io::Error),

    /// The bound address could not be read back
    #[error("Failed to read local address: {0}")]
    LocalAddr(#[source] std::io::Error),
}
