//! vidsearch Tauri integration
//!
//! Provides a Tauri plugin that keeps one [`SearchSession`] per page of the
//! frontend and exposes the session operations as commands.
//!
//! # Usage
//!
//! Register the plugin in your Tauri application:
//!
//! ```ignore
//! fn main() {
//!     tauri::Builder::default()
//!         .plugin(vidsearch_tauri::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
//!
//! Then invoke commands from the frontend:
//!
//! ```javascript
//! import { invoke } from '@tauri-apps/api/core';
//!
//! // One session per category page
//! let state = await invoke('plugin:vidsearch|open_session', {
//!     page: 'cooking',
//!     query: 'cooking',
//! });
//!
//! // Pagination and filters return the new snapshot
//! state = await invoke('plugin:vidsearch|next_page', { page: 'cooking' });
//! state = await invoke('plugin:vidsearch|set_order', { page: 'cooking', order: 'top-rated' });
//!
//! // Single video lookup
//! const video = await invoke('plugin:vidsearch|fetch_detail', {
//!     page: 'cooking',
//!     id: state.items[0].id,
//! });
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use tauri::{
    Manager, Runtime,
    plugin::{Builder, TauriPlugin},
};
use vidsearch_core::{
    FetcherConfig, Order, ResilientFetcher, SearchSession, SessionConfig, SessionSnapshot,
    ThumbSize, VideoSummary,
};

mod commands;

/// Sessions of every open page, sharing one fetcher
///
/// Each page's session sits behind its own lock, held for the whole of a
/// search so two commands for the same page never overlap. The map lock
/// is only held long enough to look a session up, so a slow search on
/// one page never blocks another page.
pub struct SessionRegistry {
    fetcher: Arc<ResilientFetcher>,
    pub(crate) sessions: Mutex<HashMap<String, SharedSession>>,
}

type SharedSession = Arc<Mutex<SearchSession>>;

impl SessionRegistry {
    /// Create a registry using `VIDSEARCH_*` environment configuration
    pub fn new() -> Result<Self, String> {
        Self::with_config(FetcherConfig::from_env())
    }

    /// Create a registry with an explicit fetcher configuration
    pub fn with_config(config: FetcherConfig) -> Result<Self, String> {
        let fetcher = ResilientFetcher::with_config(config).map_err(|e| e.to_string())?;
        Ok(Self {
            fetcher: Arc::new(fetcher),
            sessions: Mutex::new(HashMap::new()),
        })
    }

    /// Open (or replace) the session for `page`
    pub async fn open(
        &self,
        page: &str,
        query: &str,
        per_page: Option<u32>,
    ) -> Result<SessionSnapshot, String> {
        let mut config = SessionConfig::for_category(query);
        if let Some(per_page) = per_page {
            config.per_page = per_page;
        }

        let session =
            SearchSession::new(Arc::clone(&self.fetcher), config).map_err(|e| e.to_string())?;
        let snapshot = session.snapshot();

        tracing::info!(page, query, "opening search session");
        self.sessions
            .lock()
            .await
            .insert(page.to_string(), Arc::new(Mutex::new(session)));
        Ok(snapshot)
    }

    /// Discard the session for `page`; returns whether one existed
    ///
    /// A search already running on that page finishes on its own copy.
    pub async fn close(&self, page: &str) -> bool {
        let removed = self.sessions.lock().await.remove(page).is_some();
        tracing::info!(page, removed, "closing search session");
        removed
    }

    /// Look up a page's session, releasing the map lock before returning
    async fn session(&self, page: &str) -> Result<SharedSession, String> {
        self.sessions
            .lock()
            .await
            .get(page)
            .cloned()
            .ok_or_else(|| missing(page))
    }

    pub async fn snapshot(&self, page: &str) -> Result<SessionSnapshot, String> {
        let session = self.session(page).await?;
        let session = session.lock().await;
        Ok(session.snapshot())
    }

    pub async fn search(&self, page: &str) -> Result<SessionSnapshot, String> {
        let session = self.session(page).await?;
        let mut session = session.lock().await;
        session.search().await.map_err(|e| e.to_string())?;
        Ok(session.snapshot())
    }

    pub async fn next_page(&self, page: &str) -> Result<SessionSnapshot, String> {
        let session = self.session(page).await?;
        let mut session = session.lock().await;
        session.next_page().await.map_err(|e| e.to_string())?;
        Ok(session.snapshot())
    }

    pub async fn previous_page(&self, page: &str) -> Result<SessionSnapshot, String> {
        let session = self.session(page).await?;
        let mut session = session.lock().await;
        session.previous_page().await.map_err(|e| e.to_string())?;
        Ok(session.snapshot())
    }

    /// Jump to page `number` and search; out-of-range or current page is a no-op
    pub async fn go_to_page(&self, page: &str, number: u32) -> Result<SessionSnapshot, String> {
        let session = self.session(page).await?;
        let mut session = session.lock().await;
        if session.go_to_page(number) {
            session.search().await.map_err(|e| e.to_string())?;
        }
        Ok(session.snapshot())
    }

    /// Replace the query and search from page 1
    pub async fn set_query(&self, page: &str, query: &str) -> Result<SessionSnapshot, String> {
        let session = self.session(page).await?;
        let mut session = session.lock().await;
        session.set_query(query).map_err(|e| e.to_string())?;
        session.search().await.map_err(|e| e.to_string())?;
        Ok(session.snapshot())
    }

    /// Change the ordering and search from page 1
    pub async fn set_order(&self, page: &str, order: Order) -> Result<SessionSnapshot, String> {
        let session = self.session(page).await?;
        let mut session = session.lock().await;
        session.set_order(order);
        session.search().await.map_err(|e| e.to_string())?;
        Ok(session.snapshot())
    }

    /// Toggle the content filter and search from page 1
    pub async fn set_content_filter(
        &self,
        page: &str,
        enabled: bool,
    ) -> Result<SessionSnapshot, String> {
        let session = self.session(page).await?;
        let mut session = session.lock().await;
        session.set_content_filter(enabled);
        session.search().await.map_err(|e| e.to_string())?;
        Ok(session.snapshot())
    }

    /// Change the thumbnail size and reload the current page
    pub async fn set_thumb_size(
        &self,
        page: &str,
        size: ThumbSize,
    ) -> Result<SessionSnapshot, String> {
        let session = self.session(page).await?;
        let mut session = session.lock().await;
        session.set_thumb_size(size);
        session.search().await.map_err(|e| e.to_string())?;
        Ok(session.snapshot())
    }

    pub async fn fetch_detail(&self, page: &str, id: &str) -> Result<VideoSummary, String> {
        let session = self.session(page).await?;
        let session = session.lock().await;
        session.fetch_item_detail(id).await.map_err(|e| e.to_string())
    }
}

fn missing(page: &str) -> String {
    format!("No search session open for page '{}'", page)
}

/// Initialize the vidsearch plugin
///
/// # Returns
/// A configured TauriPlugin ready to be registered with the Tauri application
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new("vidsearch")
        .invoke_handler(tauri::generate_handler![
            commands::open_session,
            commands::close_session,
            commands::get_session,
            commands::search,
            commands::next_page,
            commands::previous_page,
            commands::go_to_page,
            commands::set_query,
            commands::set_order,
            commands::set_content_filter,
            commands::set_thumb_size,
            commands::fetch_detail
        ])
        .setup(|app, _api| {
            let registry = SessionRegistry::new().map_err(Box::<dyn std::error::Error>::from)?;
            app.manage(registry);
            Ok(())
        })
        .build()
}

// Re-export types for convenience
pub use vidsearch_core::SessionSnapshot as Snapshot;
pub use vidsearch_core::VideoSummary as Video;

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SessionRegistry {
        SessionRegistry::with_config(FetcherConfig::default()).expect("Registry should build")
    }

    #[test]
    fn test_registry_creation() {
        let registry = registry();
        assert!(registry.sessions.try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_open_and_close_session() {
        let registry = registry();
        let snapshot = registry
            .open("cooking", "cooking", Some(60))
            .await
            .expect("Session should open");

        assert_eq!(snapshot.request.query, "cooking");
        assert_eq!(snapshot.request.per_page, 60);
        assert!(snapshot.items.is_empty());

        assert!(registry.snapshot("cooking").await.is_ok());
        assert!(registry.close("cooking").await);
        assert!(!registry.close("cooking").await);
    }

    #[tokio::test]
    async fn test_open_rejects_blank_query() {
        let registry = registry();
        let result = registry.open("cooking", "  ", None).await;
        assert!(result.unwrap_err().contains("empty"));
    }

    #[tokio::test]
    async fn test_unknown_page_is_reported() {
        let registry = registry();
        let result = registry.search("travel").await;
        assert_eq!(
            result.unwrap_err(),
            "No search session open for page 'travel'"
        );
    }

    #[tokio::test]
    async fn test_set_query_blank_fails_before_fetching() {
        let registry = registry();
        registry.open("cooking", "cooking", None).await.unwrap();
        let result = registry.set_query("cooking", "").await;
        assert!(result.unwrap_err().contains("empty"));

        let snapshot = registry.snapshot("cooking").await.unwrap();
        assert_eq!(snapshot.request.query, "cooking");
        assert_eq!(snapshot.generation, 0);
    }

    #[tokio::test]
    async fn test_next_page_without_results_is_noop() {
        let registry = registry();
        registry.open("cooking", "cooking", None).await.unwrap();
        let snapshot = registry.next_page("cooking").await.unwrap();
        assert_eq!(snapshot.request.page, 1);
        assert_eq!(snapshot.generation, 0);
    }

    #[tokio::test]
    async fn test_slow_search_does_not_block_other_pages() {
        use std::time::Duration;
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/"))
            .and(query_param("query", "cooking"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "videos": [],
                        "total_count": 0,
                        "total_pages": 1,
                        "page": 1
                    }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let registry = Arc::new(
            SessionRegistry::with_config(FetcherConfig {
                base_url: server.uri(),
                ..FetcherConfig::default()
            })
            .unwrap(),
        );
        registry.open("cooking", "cooking", None).await.unwrap();
        registry.open("travel", "travel", None).await.unwrap();

        let slow = Arc::clone(&registry);
        let handle = tokio::spawn(async move { slow.search("cooking").await });
        tokio::time::sleep(Duration::from_millis(100)).await;

        let snapshot = tokio::time::timeout(Duration::from_millis(500), registry.snapshot("travel"))
            .await
            .expect("Other page should not wait for the slow search")
            .unwrap();
        assert_eq!(snapshot.request.query, "travel");

        let closed = tokio::time::timeout(Duration::from_millis(500), registry.close("travel"))
            .await
            .expect("Closing another page should not wait for the slow search");
        assert!(closed);

        let result = handle.await.unwrap();
        assert_eq!(result.unwrap().generation, 1);
    }
}
