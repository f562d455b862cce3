//! By-id lookup response parser

use crate::error::{Result, VidsearchError};
use crate::types::VideoSummary;

/// Parses the by-id endpoint body into a single video
///
/// The provider answers an unknown id with an empty payload (`[]`,
/// `{}`, `null` or nothing at all). That is reported as `NotFound`
/// so callers can tell it apart from transport failures.
///
/// # Errors
/// - `NotFound` for an empty payload or an object without an id
/// - `ParseError` for anything that is not a video object
pub fn parse_video_detail(body: &str, id: &str) -> Result<VideoSummary> {
    if body.trim().is_empty() {
        return Err(VidsearchError::NotFound(id.to_string()));
    }

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| VidsearchError::ParseError(e.to_string()))?;

    let object = match value {
        serde_json::Value::Null => return Err(VidsearchError::NotFound(id.to_string())),
        serde_json::Value::Array(items) => match items.into_iter().next() {
            Some(first) => first,
            None => return Err(VidsearchError::NotFound(id.to_string())),
        },
        other => other,
    };

    if !object.is_object() {
        return Err(VidsearchError::ParseError(
            "detail response is not a video object".to_string(),
        ));
    }

    let video: VideoSummary =
        serde_json::from_value(object).map_err(|e| VidsearchError::ParseError(e.to_string()))?;

    if video.id.is_empty() {
        return Err(VidsearchError::NotFound(id.to_string()));
    }

    Ok(video)
}
