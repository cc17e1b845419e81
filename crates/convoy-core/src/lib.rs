//! Core client library for the Convoy webhook-delivery API.
//!
//! Provides the HTTP gateway, paginated fetching with append-on-next
//! semantics, session lifecycle, configuration, and the domain types the
//! display layer (`convoy-dash`) consumes.

pub mod config;
pub mod fetcher;
pub mod gateway;
pub mod logging;
pub mod session;
pub mod types;

pub use fetcher::Fetcher;
pub use gateway::{Gateway, GatewayError, GatewayErrorKind};
pub use session::Session;
