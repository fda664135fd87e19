//! Request handlers, one module per resource.

pub mod auth;
pub mod chat;
pub mod posts;
pub mod users;
