//! URL helper functions for the provider API
//!
//! Provides functions for building search and by-id lookup URLs.

use crate::types::{SearchRequest, ThumbSize};

/// Default provider API root
pub const DEFAULT_BASE_URL: &str = "https://www.eporner.com/api/v2/video";

/// Encodes `(key, value)` pairs into a query string
fn encode_pairs(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds the search endpoint URL for a request
///
/// # Arguments
/// * `base_url` - Provider API root without trailing slash
/// * `request` - Search parameters to encode
///
/// # Example
/// ```
/// use vidsearch_core::url::build_search_url;
/// use vidsearch_core::{Order, SearchRequest, ThumbSize};
///
/// let request = SearchRequest {
///     query: "street food".to_string(),
///     page: 1,
///     per_page: 30,
///     order: Order::Latest,
///     thumb_size: ThumbSize::Medium,
///     content_filter: false,
/// };
/// let url = build_search_url("https://api.example.test/v2/video", &request);
/// assert_eq!(
///     url,
///     concat!(
///         "https://api.example.test/v2/video/search/",
///         "?query=street%20food&per_page=30&page=1",
///         "&thumbsize=medium&order=latest&gay=0&format=json"
///     )
/// );
/// ```
pub fn build_search_url(base_url: &str, request: &SearchRequest) -> String {
    format!(
        "{}/search/?{}",
        base_url.trim_end_matches('/'),
        encode_pairs(&request.query_pairs())
    )
}

/// Builds the by-id lookup URL for a single video
///
/// # Example
/// ```
/// use vidsearch_core::url::build_detail_url;
/// use vidsearch_core::ThumbSize;
///
/// let url = build_detail_url("https://api.example.test/v2/video", "IsabcDXoE4x", ThumbSize::Big);
/// assert_eq!(
///     url,
///     "https://api.example.test/v2/video/id/?id=IsabcDXoE4x&thumbsize=big&format=json"
/// );
/// ```
pub fn build_detail_url(base_url: &str, id: &str, thumb_size: ThumbSize) -> String {
    let pairs = [
        ("id", id.to_string()),
        ("thumbsize", thumb_size.as_str().to_string()),
        ("format", "json".to_string()),
    ];
    format!(
        "{}/id/?{}",
        base_url.trim_end_matches('/'),
        encode_pairs(&pairs)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Order;

    fn request(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            page: 3,
            per_page: 60,
            order: Order::TopRated,
            thumb_size: ThumbSize::Small,
            content_filter: true,
        }
    }

    #[test]
    fn test_build_search_url_simple() {
        let url = build_search_url(DEFAULT_BASE_URL, &request("cats"));
        assert_eq!(
            url,
            concat!(
                "https://www.eporner.com/api/v2/video/search/",
                "?query=cats&per_page=60&page=3&thumbsize=small&order=top-rated&gay=1&format=json"
            )
        );
    }

    #[test]
    fn test_build_search_url_encodes_query() {
        let url = build_search_url("http://localhost", &request("fish & chips/more"));
        assert!(url.starts_with("http://localhost/search/?query=fish%20%26%20chips%2Fmore&"));
    }

    #[test]
    fn test_build_search_url_trailing_slash_base() {
        let url = build_search_url("http://localhost/", &request("cats"));
        assert!(url.starts_with("http://localhost/search/?"));
    }

    #[test]
    fn test_build_detail_url() {
        let url = build_detail_url(DEFAULT_BASE_URL, "abc123", ThumbSize::Medium);
        assert_eq!(
            url,
            "https://www.eporner.com/api/v2/video/id/?id=abc123&thumbsize=medium&format=json"
        );
    }

    #[test]
    fn test_build_detail_url_encodes_id() {
        let url = build_detail_url("http://localhost", "a b", ThumbSize::Big);
        assert_eq!(url, "http://localhost/id/?id=a%20b&thumbsize=big&format=json");
    }
}
