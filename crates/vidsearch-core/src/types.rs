//! Core data types for the video-search client
//!
//! Request parameters, result pages and the provider's per-video payload.

use serde::{Deserialize, Deserializer, Serialize};

/// Default number of results requested per page
pub const DEFAULT_PER_PAGE: u32 = 30;

/// Largest page size the provider accepts
pub const MAX_PER_PAGE: u32 = 1000;

/// Result ordering understood by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Order {
    #[default]
    Latest,
    TopRated,
    MostPopular,
    TopWeekly,
    TopMonthly,
}

impl Order {
    /// Wire value used in the `order` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Latest => "latest",
            Order::TopRated => "top-rated",
            Order::MostPopular => "most-popular",
            Order::TopWeekly => "top-weekly",
            Order::TopMonthly => "top-monthly",
        }
    }
}

/// Thumbnail size hint passed through to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbSize {
    Small,
    #[default]
    Medium,
    Big,
}

impl ThumbSize {
    /// Wire value used in the `thumbsize` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            ThumbSize::Small => "small",
            ThumbSize::Medium => "medium",
            ThumbSize::Big => "big",
        }
    }
}

/// Parameters of a single search dispatch
///
/// A fresh copy is taken for every fetch, so mutating the session
/// never affects a request already in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free text or the fixed category keyword, never empty
    pub query: String,

    /// Requested page, starting at 1
    pub page: u32,

    /// Results per page, `1..=MAX_PER_PAGE`
    pub per_page: u32,

    /// Result ordering
    pub order: Order,

    /// Display hint only
    pub thumb_size: ThumbSize,

    /// Maps to the provider's binary `gay` parameter
    pub content_filter: bool,
}

impl SearchRequest {
    /// Query-string pairs in the order the provider documents them
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("query", self.query.clone()),
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
            ("thumbsize", self.thumb_size.as_str().to_string()),
            ("order", self.order.as_str().to_string()),
            ("gay", if self.content_filter { "1" } else { "0" }.to_string()),
            ("format", "json".to_string()),
        ]
    }
}

/// One page of search results, replaced wholesale after each successful search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultPage {
    pub items: Vec<VideoSummary>,
    pub total_count: u64,
    pub total_pages: u32,
    pub current_page: u32,
}

impl SearchResultPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Thumbnail reference as returned by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thumbnail {
    #[serde(deserialize_with = "null_as_default")]
    pub size: String,
    #[serde(deserialize_with = "lenient_u64")]
    pub width: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub height: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub src: String,
}

/// A video as returned by the provider
///
/// Passed through to the caller without validation; every field
/// falls back to its default when the provider omits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSummary {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,

    /// Comma-separated tag list
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: String,

    #[serde(deserialize_with = "lenient_u64")]
    pub views: u64,

    /// Rating, sent by the provider as either a string or a number
    #[serde(deserialize_with = "lenient_string")]
    pub rate: String,

    /// Video page URL
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,

    /// Upload timestamp (e.g., "2024-03-01 18:22:05")
    #[serde(deserialize_with = "null_as_default")]
    pub added: String,

    #[serde(deserialize_with = "lenient_u64")]
    pub length_sec: u64,

    /// Duration in `H:MM:SS` or `M:SS` form
    #[serde(deserialize_with = "null_as_default")]
    pub length_min: String,

    /// Playable embed URL
    #[serde(deserialize_with = "null_as_default")]
    pub embed: String,

    pub default_thumb: Option<Thumbnail>,
    #[serde(deserialize_with = "null_as_default")]
    pub thumbs: Vec<Thumbnail>,
}

impl VideoSummary {
    /// Duration in seconds
    ///
    /// Parses `length_min` (`H:MM:SS` or `M:SS`) and falls back to
    /// `length_sec` when that is missing or malformed.
    pub fn duration_secs(&self) -> Option<u64> {
        parse_clock(&self.length_min).or(if self.length_sec > 0 {
            Some(self.length_sec)
        } else {
            None
        })
    }

    /// Tags split out of the comma-separated `keywords` field
    pub fn keyword_list(&self) -> Vec<&str> {
        self.keywords
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect()
    }

    /// Source URL of the default thumbnail, if the provider sent one
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.default_thumb
            .as_ref()
            .map(|t| t.src.as_str())
            .filter(|src| !src.is_empty())
    }
}

/// Parses `H:MM:SS` or `M:SS` into seconds
fn parse_clock(text: &str) -> Option<u64> {
    let parts: Vec<u64> = text
        .trim()
        .split(':')
        .map(|p| p.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    match parts.as_slice() {
        [m, s] if *s < 60 => Some(m * 60 + s),
        [h, m, s] if *m < 60 && *s < 60 => Some(h * 3600 + m * 60 + s),
        _ => None,
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or_default(),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}
