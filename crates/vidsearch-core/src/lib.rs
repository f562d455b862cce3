//! Video-search client core
//!
//! Provides an async client for a public video-search API together with
//! the per-page search state that every listing page needs.
//!
//! # Overview
//!
//! This crate provides:
//! - [`ResilientFetcher`], an HTTP client with a per-attempt timeout and
//!   linear-backoff retry on rate limiting, server errors and network failures
//! - [`SearchSession`], the search/pagination state machine for one page view
//! - Wire types and parsers for the provider's search and by-id endpoints
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vidsearch_core::{ResilientFetcher, Result, SearchSession, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let fetcher = Arc::new(ResilientFetcher::new()?);
//!     let mut session = SearchSession::new(fetcher, SessionConfig::for_category("cooking"))?;
//!
//!     let page = session.search().await?;
//!     for video in &page.items {
//!         println!("{} ({})", video.title, video.length_min);
//!     }
//!
//!     // Paging is a no-op (no request) past the last page
//!     session.next_page().await?;
//!
//!     // Single video lookup
//!     if let Some(first) = session.last_result().items.first() {
//!         let video = session.fetch_item_detail(&first.id).await?;
//!         println!("Embed: {}", video.embed);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events (request attempts, retries, searches)
//! but never installs a subscriber; that is left to the application.

mod error;
mod fetcher;
pub mod parser;
mod session;
mod types;
pub mod url;

// Re-export fetcher types
pub use fetcher::{FetchOptions, FetcherConfig, ResilientFetcher, backoff_delay};

// Re-export error types
pub use error::{Result, VidsearchError};

// Re-export parser functions
pub use parser::{parse_search_results, parse_video_detail};

// Re-export session API
pub use session::{DEFAULT_QUERY, SearchSession, SessionConfig, SessionSnapshot, SessionStatus};

// Re-export data types
pub use types::{
    DEFAULT_PER_PAGE, MAX_PER_PAGE, Order, SearchRequest, SearchResultPage, ThumbSize, Thumbnail,
    VideoSummary,
};

// Re-export URL helper functions for convenience
pub use url::{DEFAULT_BASE_URL, build_detail_url, build_search_url};
