//! Line-based TCP chat server library.
//!
//! Every connection becomes a named participant. Lines are broadcast to all
//! online participants, with a small command language for listing (`who`),
//! renaming (`rename|<name>`) and private messages (`to|<name>|<content>`).

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
