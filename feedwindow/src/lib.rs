//! A headless windowing and incremental pagination engine for infinite lists.
//!
//! For an async driver and an HTTP data source, see the `feedwindow-adapter` crate.
//!
//! The crate covers the logic behind an "infinite scroll" list that pulls fixed-size pages from a
//! remote source: the page loader (append-only, single-flight, reset-safe), the fixed-row range
//! calculation with overscan, the load-more policy, and the composition of the rows to paint.
//!
//! It is UI-agnostic. A TUI/GUI/web layer is expected to provide:
//! - scroll offsets of the list container (or of the document, in regular mode)
//! - sentinel and viewport geometry for the intersection check
//! - the actual fetch for each [`PageRequest`] the feed hands out
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

pub mod compose;
mod error;
mod feed;
mod loader;
mod options;
pub mod policy;
mod range;
mod scroll;
mod types;
mod visibility;

#[cfg(test)]
mod tests;

pub use compose::{ErrorDisplay, FeedStatus, compose_all, compose_window, for_each_window_item};
pub use error::FetchError;
pub use feed::{Feed, FeedEvent};
pub use loader::{LoadOutcome, LoadState, PageLoader, PageRequest};
pub use options::FeedOptions;
pub use policy::{LoadTrigger, should_load_more};
pub use range::calculate_visible_range;
pub use scroll::ScrollTracker;
pub use types::{Post, RenderMode, ScrollDirection, Span, VisibleRange, WindowItem};
pub use visibility::{ObserverConfig, VisibilityTrigger};
