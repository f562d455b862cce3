//! Tauri commands for vidsearch
//!
//! Thin wrappers over [`SessionRegistry`]; every command is keyed by the
//! frontend page that owns the session and reports errors as strings.

use tauri::State;
use vidsearch_core::{Order, SessionSnapshot, ThumbSize, VideoSummary};

use crate::SessionRegistry;

/// Open (or replace) the search session for a page
///
/// Does not search; follow with `search` to load the first page.
#[tauri::command]
pub async fn open_session(
    state: State<'_, SessionRegistry>,
    page: String,
    query: String,
    per_page: Option<u32>,
) -> Result<SessionSnapshot, String> {
    state.open(&page, &query, per_page).await
}

/// Discard a page's session when the page is left
#[tauri::command]
pub async fn close_session(
    state: State<'_, SessionRegistry>,
    page: String,
) -> Result<bool, String> {
    Ok(state.close(&page).await)
}

#[tauri::command]
pub async fn get_session(
    state: State<'_, SessionRegistry>,
    page: String,
) -> Result<SessionSnapshot, String> {
    state.snapshot(&page).await
}

/// Run the page's current request
#[tauri::command]
pub async fn search(
    state: State<'_, SessionRegistry>,
    page: String,
) -> Result<SessionSnapshot, String> {
    state.search(&page).await
}

/// Load the next page; returns the unchanged snapshot on the last page
#[tauri::command]
pub async fn next_page(
    state: State<'_, SessionRegistry>,
    page: String,
) -> Result<SessionSnapshot, String> {
    state.next_page(&page).await
}

/// Load the previous page; returns the unchanged snapshot on page 1
#[tauri::command]
pub async fn previous_page(
    state: State<'_, SessionRegistry>,
    page: String,
) -> Result<SessionSnapshot, String> {
    state.previous_page(&page).await
}

#[tauri::command]
pub async fn go_to_page(
    state: State<'_, SessionRegistry>,
    page: String,
    number: u32,
) -> Result<SessionSnapshot, String> {
    state.go_to_page(&page, number).await
}

#[tauri::command]
pub async fn set_query(
    state: State<'_, SessionRegistry>,
    page: String,
    query: String,
) -> Result<SessionSnapshot, String> {
    state.set_query(&page, &query).await
}

/// Change ordering (`latest`, `top-rated`, `most-popular`, `top-weekly`, `top-monthly`)
#[tauri::command]
pub async fn set_order(
    state: State<'_, SessionRegistry>,
    page: String,
    order: Order,
) -> Result<SessionSnapshot, String> {
    state.set_order(&page, order).await
}

#[tauri::command]
pub async fn set_content_filter(
    state: State<'_, SessionRegistry>,
    page: String,
    enabled: bool,
) -> Result<SessionSnapshot, String> {
    state.set_content_filter(&page, enabled).await
}

/// Change thumbnail size (`small`, `medium`, `big`)
#[tauri::command]
pub async fn set_thumb_size(
    state: State<'_, SessionRegistry>,
    page: String,
    size: ThumbSize,
) -> Result<SessionSnapshot, String> {
    state.set_thumb_size(&page, size).await
}

/// Look up a single video when the user selects it
#[tauri::command]
pub async fn fetch_detail(
    state: State<'_, SessionRegistry>,
    page: String,
    id: String,
) -> Result<VideoSummary, String> {
    state.fetch_detail(&page, &id).await
}
