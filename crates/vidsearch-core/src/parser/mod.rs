//! Response parsers for the provider API
//!
//! Contains modules for parsing the search and by-id endpoints.

pub mod detail;
pub mod search;

pub use detail::parse_video_detail;
pub use search::parse_search_results;
