//! Utilities shared by the irori server and client.

pub mod logger;
pub mod time;
