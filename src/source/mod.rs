//! Feed retrieval abstraction.
//!
//! This module defines the [`FeedRetriever`] trait and the [`Feed`] /
//! [`RawEntry`] types every retriever produces.  The production
//! implementation is [`HttpRetriever`]; tests plug in an in-memory one.
//!
//! ## Adding a retriever
//!
//! 1. Create a new file in this directory (e.g. `file.rs`).
//! 2. Define a struct and implement [`FeedRetriever`] for it.
//! 3. Add `mod file;` below and re-export your struct.
//! 4. Construct it in `main.rs` and hand it to [`crate::pipeline::run`].
//!
//! Filtering, normalization and emission are retriever-agnostic.

mod entry;
mod http;

pub use entry::{Feed, RawEntry};
pub use http::HttpRetriever;

use async_trait::async_trait;

use crate::error::FetchError;

/// Turns a feed address into a parsed [`Feed`].
///
/// The pipeline may run several retrievals at once, so implementations must
/// be shareable across tasks.
#[async_trait]
pub trait FeedRetriever: Send + Sync {
    /// Fetch and parse the feed at `address`.
    ///
    /// Content that is not a recognisable feed must be reported as
    /// [`FetchError::Malformed`] rather than as an empty feed.
    async fn retrieve(&self, address: &str) -> Result<Feed, FetchError>;
}
