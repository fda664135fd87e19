//! Domain types, error taxonomy, and pure chat helpers shared by the
//! persistence and API crates.

pub mod chat;
pub mod error;
pub mod types;
