//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the write operations that entity supports

pub mod assignment;
pub mod borrow_request;
pub mod notification;
pub mod project;
pub mod task;
pub mod user;
