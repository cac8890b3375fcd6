//! Parley chat server.
//!
//! An in-memory [`store::MessageStore`] behind a stateless HTTP surface
//! ([`service::router`]). Clients poll `/messages/get/` for the newest page
//! and follow pagination tokens to walk older history.

pub mod config;
pub mod error;
pub mod service;
pub mod store;

pub use config::ServerConfig;
pub use error::ServiceError;
pub use service::{router, AppState};
pub use store::MessageStore;
