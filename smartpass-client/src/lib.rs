//! SmartPass Client - REST client for the SmartPass API
//!
//! Typed calls for employees, admin users, the activity log and the public
//! badge lookup, plus [`BadgeIssuer`], which renders badge codes with
//! `smartpass-qr` and stores them on employee records.
//!
//! Every wire payload is mapped onto the canonical types in `shared` before
//! it leaves this crate.

mod api;
pub mod badge;
pub mod config;
pub mod error;
pub mod http;
pub mod session;

pub use api::{Resolution, SmartPassClient};
pub use badge::{BadgeError, BadgeIssuer, BadgeResult, Enrollment};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use session::{NoSession, SessionProvider, SharedSession, StaticSession};
