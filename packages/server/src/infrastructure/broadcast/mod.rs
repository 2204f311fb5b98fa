//! Broadcast Channel の実装
//!
//! - `channel`: tokio の mpsc キューと 1 つのファンアウトループを使った実装

pub mod channel;

pub use channel::{ChannelBroadcaster, DEFAULT_BROADCAST_CAPACITY, fan_out};
