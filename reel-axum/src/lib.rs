//! reel-axum: Axum adapter for reel-stream.
//!
//! Exposes the content routes (list, chunk, metadata, size) over any
//! [`reel_stream::ContentStreamAdapter`], plus the configuration and app
//! wiring used by the `reel-server` binary.

pub mod app;
pub mod config;
pub mod params;
pub mod rest;
pub mod state;
mod error;
pub use error::ReelAxumError;
pub use state::ReelState;

pub use app::ReelApp;
pub use config::ServerConfig;
