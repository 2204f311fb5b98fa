//! Terminal client for the irori line chat server.

pub mod error;
pub mod runner;
pub mod session;
pub mod ui;

pub use runner::run_client;
