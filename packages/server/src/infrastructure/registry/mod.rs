//! Participant Registry の実装
//!
//! - `inmemory`: HashMap + Mutex を使った実装

pub mod inmemory;

pub use inmemory::InMemoryParticipantRegistry;
