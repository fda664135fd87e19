//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - Serializable response/projection structs for API output

pub mod auth_session;
pub mod chat;
pub mod post;
pub mod user;
