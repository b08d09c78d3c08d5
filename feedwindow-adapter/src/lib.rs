//! Async driver utilities for the `feedwindow` crate.
//!
//! The `feedwindow` crate is synchronous and I/O free: it hands out page requests and expects
//! their results back. This crate closes that loop on a tokio runtime:
//!
//! - [`PostSource`]: the data source seam, with [`HttpPostSource`] for REST endpoints
//! - [`FeedDriver`]: owns a `Feed`, serializes every event through one channel, runs fetches on
//!   spawned tasks and publishes [`FeedSnapshot`]s for the rendering surface
//! - [`FeedConfig`]: JSON configuration with defaults
#![forbid(unsafe_code)]

pub mod config;
mod driver;
mod http;
mod source;


pub use config::{ConfigError, FeedConfig};
pub use driver::{DriverClosed, FeedDriver, FeedHandle, FeedSnapshot, RowSnapshot};
pub use http::HttpPostSource;
pub use source::PostSource;
