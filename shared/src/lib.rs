//! Shared types for SmartPass
//!
//! Canonical domain types used by the client and the CLI, plus the adapters
//! that turn the API's loosely-shaped JSON into them.

pub mod error;
pub mod models;
pub mod pagination;
pub mod stats;
pub mod util;

// Re-exports
pub use error::{RecordError, RecordResult};
pub use pagination::{Page, PageBody};
pub use serde::{Deserialize, Serialize};
pub use stats::{DashboardStats, RecentActivity};
