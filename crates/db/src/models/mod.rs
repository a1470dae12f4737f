//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Query-parameter structs for list endpoints

pub mod review_history;
pub mod review_job;
pub mod status;
pub mod webhook;
