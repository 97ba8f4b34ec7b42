//! Data models
//!
//! Each entity has a `*Record` wire type that tolerates every field name the
//! API has used, and a canonical type the rest of the code reads.

pub mod activity;
pub mod employee;
pub mod user;

// Re-exports
pub use activity::*;
pub use employee::*;
pub use user::*;
