//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Domain types
//! - `wire.rs` — The device's text formats
//! - `state.rs` — State containers with update methods (for feed-driven data)
//! - `client.rs` — Sub-client with HTTP methods

pub mod maintenance;
pub mod series;
