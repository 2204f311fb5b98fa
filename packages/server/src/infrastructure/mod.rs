//! Infrastructure layer: concrete registry, broadcast channel and delivery loop.

pub mod broadcast;
pub mod delivery;
pub mod registry;
