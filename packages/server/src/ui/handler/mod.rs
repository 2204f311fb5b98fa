//! Connection handlers.

pub mod connection;

pub use connection::{MAX_LINE_LENGTH, handle_connection, handle_tcp_stream};
