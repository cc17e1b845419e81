//! Command handlers.

pub mod auth;
pub mod config;
pub mod deliveries;
pub mod events;

pub(crate) mod render;
