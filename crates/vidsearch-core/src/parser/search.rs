//! Search response parser
//!
//! Turns the provider's search payload into a [`SearchResultPage`].

use serde::Deserialize;

use crate::error::{Result, VidsearchError};
use crate::types::{SearchResultPage, VideoSummary};

/// Wire shape of the search endpoint
///
/// Every field is optional; absent or null values default to
/// empty/zero instead of failing the search.
#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    videos: Option<Vec<VideoSummary>>,
    #[serde(default)]
    total_count: Option<u64>,
    #[serde(default)]
    total_pages: Option<u32>,
    #[serde(default)]
    page: Option<u32>,
}

/// Parses a search response body
///
/// # Arguments
/// * `body` - Raw JSON returned by the search endpoint
/// * `requested_page` - Page that was asked for; used when the provider
///   omits `page` or reports 0
///
/// # Errors
/// Returns `ParseError` if the body is not a JSON object or a field
/// has an incompatible type
pub fn parse_search_results(body: &str, requested_page: u32) -> Result<SearchResultPage> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| VidsearchError::ParseError(e.to_string()))?;

    if !value.is_object() {
        return Err(VidsearchError::ParseError(
            "search response is not a JSON object".to_string(),
        ));
    }

    let response: SearchResponse =
        serde_json::from_value(value).map_err(|e| VidsearchError::ParseError(e.to_string()))?;

    let current_page = match response.page {
        Some(page) if page >= 1 => page,
        _ => requested_page.max(1),
    };

    Ok(SearchResultPage {
        items: response.videos.unwrap_or_default(),
        total_count: response.total_count.unwrap_or_default(),
        total_pages: response.total_pages.unwrap_or_default(),
        current_page,
    })
}
