//! Parley polling chat client.
//!
//! [`Reconciler`] holds the merge rules for the client-side view.
//! [`ChatClient`] runs them on a single task, fed by a periodic newest-page
//! poll and by user commands, over any [`ChatTransport`].

pub mod client;
pub mod config;
pub mod error;
pub mod reconciler;
pub mod transport;

pub use client::{ChatClient, ViewSnapshot};
pub use config::ClientConfig;
pub use error::ClientError;
pub use reconciler::{Insertion, Reconciler};
pub use transport::{ChatTransport, HttpTransport};
