//! Per-page search session
//!
//! Holds the current search parameters and the last successful result
//! page, and enforces the pagination and filter-reset rules.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{Result, VidsearchError};
use crate::fetcher::ResilientFetcher;
use crate::parser::{parse_search_results, parse_video_detail};
use crate::types::{
    DEFAULT_PER_PAGE, MAX_PER_PAGE, Order, SearchRequest, SearchResultPage, ThumbSize,
    VideoSummary,
};
use crate::url::{build_detail_url, build_search_url};

/// Query used when a page has no fixed category keyword
pub const DEFAULT_QUERY: &str = "all";

/// Initial parameters of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Initial (or fixed category) query, must not be blank
    pub query: String,
    /// Page size, fixed for the session's lifetime
    pub per_page: u32,
    pub order: Order,
    pub thumb_size: ThumbSize,
    pub content_filter: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_string(),
            per_page: DEFAULT_PER_PAGE,
            order: Order::default(),
            thumb_size: ThumbSize::default(),
            content_filter: false,
        }
    }
}

impl SessionConfig {
    /// Configuration for a category page whose query is a fixed keyword
    pub fn for_category(keyword: impl Into<String>) -> Self {
        Self {
            query: keyword.into(),
            ..Self::default()
        }
    }
}

/// Where the session is in its search lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "lowercase")]
pub enum SessionStatus {
    /// Nothing searched yet
    Idle,
    /// A search is in flight
    Searching,
    /// Last search succeeded
    Populated,
    /// Last search failed; holds the error message
    Failed(String),
}

/// Serializable view of a session for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub request: SearchRequest,
    pub status: SessionStatus,
    /// Items to display; empty while the session is `Failed`
    pub items: Vec<VideoSummary>,
    pub total_count: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    /// Sequence number of the most recently dispatched search
    pub generation: u64,
}

type RenderCallback = Box<dyn Fn(&SearchResultPage) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(&VidsearchError) + Send + Sync>;

/// Search state for one page view
///
/// Mutators only change the pending request; nothing is fetched until
/// [`SearchSession::search`] (or one of the paging helpers) runs.
///
/// # Example
/// ```no_run
/// # async fn example() -> vidsearch_core::Result<()> {
/// use std::sync::Arc;
/// use vidsearch_core::{Order, ResilientFetcher, SearchSession, SessionConfig};
///
/// let fetcher = Arc::new(ResilientFetcher::new()?);
/// let mut session = SearchSession::new(fetcher, SessionConfig::for_category("cooking"))?;
/// session.on_render(|page| println!("{} results", page.total_count));
///
/// session.set_order(Order::TopRated);
/// session.search().await?;
/// session.next_page().await?;
/// # Ok(())
/// # }
/// ```
pub struct SearchSession {
    fetcher: Arc<ResilientFetcher>,
    request: SearchRequest,
    last_result: SearchResultPage,
    status: SessionStatus,
    generation: u64,
    on_render: Option<RenderCallback>,
    on_error: Option<ErrorCallback>,
}

impl std::fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("request", &self.request)
            .field("status", &self.status)
            .field("total_pages", &self.last_result.total_pages)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl SearchSession {
    /// Create a session in the `Idle` state
    ///
    /// # Errors
    /// `InvalidInput` if the query is blank or `per_page` is outside `1..=1000`
    pub fn new(fetcher: Arc<ResilientFetcher>, config: SessionConfig) -> Result<Self> {
        let query = config.query.trim();
        if query.is_empty() {
            return Err(VidsearchError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }
        if config.per_page == 0 || config.per_page > MAX_PER_PAGE {
            return Err(VidsearchError::InvalidInput(format!(
                "Page size must be between 1 and {}, got {}",
                MAX_PER_PAGE, config.per_page
            )));
        }

        Ok(Self {
            fetcher,
            request: SearchRequest {
                query: query.to_string(),
                page: 1,
                per_page: config.per_page,
                order: config.order,
                thumb_size: config.thumb_size,
                content_filter: config.content_filter,
            },
            last_result: SearchResultPage::default(),
            status: SessionStatus::Idle,
            generation: 0,
            on_render: None,
            on_error: None,
        })
    }

    /// Register the callback invoked with every successfully fetched page
    pub fn on_render<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&SearchResultPage) + Send + Sync + 'static,
    {
        self.on_render = Some(Box::new(callback));
        self
    }

    /// Register the callback invoked with every failure
    pub fn on_error<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&VidsearchError) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    pub fn last_result(&self) -> &SearchResultPage {
        &self.last_result
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the free-text query and go back to page 1
    ///
    /// # Errors
    /// `InvalidInput` if `text` is blank; the request is left unchanged
    pub fn set_query(&mut self, text: &str) -> Result<()> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(VidsearchError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }
        self.request.query = trimmed.to_string();
        self.request.page = 1;
        Ok(())
    }

    pub fn set_order(&mut self, order: Order) {
        self.request.order = order;
        self.request.page = 1;
    }

    pub fn set_content_filter(&mut self, enabled: bool) {
        self.request.content_filter = enabled;
        self.request.page = 1;
    }

    /// Display hint only; keeps the current page
    pub fn set_thumb_size(&mut self, size: ThumbSize) {
        self.request.thumb_size = size;
    }

    /// Whether a following page exists according to the last result
    pub fn has_next_page(&self) -> bool {
        self.last_result.total_pages > 1 && self.request.page < self.last_result.total_pages
    }

    /// Whether a preceding page exists according to the last result
    pub fn has_previous_page(&self) -> bool {
        self.last_result.total_pages > 1 && self.request.page > 1
    }

    /// Advance the requested page; returns `false` (no-op) at the last page
    pub fn go_to_next_page(&mut self) -> bool {
        if self.request.page >= self.last_result.total_pages {
            return false;
        }
        self.request.page += 1;
        true
    }

    /// Step back one page; returns `false` (no-op) on the first page
    pub fn go_to_previous_page(&mut self) -> bool {
        if self.request.page <= 1 {
            return false;
        }
        self.request.page -= 1;
        true
    }

    /// Jump to `page`; returns `false` (no-op) if it is outside `1..=total_pages`
    /// or is already the requested page
    pub fn go_to_page(&mut self, page: u32) -> bool {
        if page == 0 || page > self.last_result.total_pages || page == self.request.page {
            return false;
        }
        self.request.page = page;
        true
    }

    /// Run the current request against the provider
    ///
    /// On success the last result is replaced, the render callback runs and
    /// the new page is returned. On failure the last result is kept, the
    /// error callback runs and the error is returned. The session stays
    /// usable either way.
    ///
    /// If the provider reports fewer pages than were requested, the
    /// requested page is clamped to the last available one (page 1 when
    /// there are no results at all).
    pub async fn search(&mut self) -> Result<&SearchResultPage> {
        self.generation += 1;
        self.status = SessionStatus::Searching;

        let request = self.request.clone();
        let url = build_search_url(self.fetcher.base_url(), &request);

        tracing::info!(
            query = %request.query,
            page = request.page,
            order = request.order.as_str(),
            generation = self.generation,
            "searching"
        );

        let outcome = self
            .fetcher
            .fetch_text(&url)
            .await
            .and_then(|body| parse_search_results(&body, request.page));

        match outcome {
            Ok(page) => {
                tracing::debug!(
                    items = page.items.len(),
                    total_count = page.total_count,
                    total_pages = page.total_pages,
                    "search completed"
                );

                let last = page.total_pages.max(1);
                if self.request.page > last {
                    tracing::debug!(
                        requested = self.request.page,
                        total_pages = page.total_pages,
                        "clamping requested page"
                    );
                    self.request.page = last;
                }

                self.last_result = page;
                self.status = SessionStatus::Populated;
                if let Some(render) = &self.on_render {
                    render(&self.last_result);
                }
                Ok(&self.last_result)
            }
            Err(e) => {
                tracing::warn!(error = %e, generation = self.generation, "search failed");
                self.status = SessionStatus::Failed(e.to_string());
                if let Some(report) = &self.on_error {
                    report(&e);
                }
                Err(e)
            }
        }
    }

    /// Move to the next page and search; without a next page nothing is fetched
    pub async fn next_page(&mut self) -> Result<&SearchResultPage> {
        if self.go_to_next_page() {
            self.search().await
        } else {
            Ok(&self.last_result)
        }
    }

    /// Move to the previous page and search; on page 1 nothing is fetched
    pub async fn previous_page(&mut self) -> Result<&SearchResultPage> {
        if self.go_to_previous_page() {
            self.search().await
        } else {
            Ok(&self.last_result)
        }
    }

    /// Look up a single video by id
    ///
    /// Independent of the search state: the last result and status are untouched.
    ///
    /// # Errors
    /// - `InvalidInput` if `id` is blank
    /// - `NotFound` if the provider returns an empty payload
    /// - any fetcher error for transport or provider failures
    pub async fn fetch_item_detail(&self, id: &str) -> Result<VideoSummary> {
        let id = id.trim();
        if id.is_empty() {
            return Err(VidsearchError::InvalidInput(
                "Video ID cannot be empty".to_string(),
            ));
        }

        let url = build_detail_url(self.fetcher.base_url(), id, self.request.thumb_size);
        tracing::info!(id, "fetching video detail");

        let outcome = self
            .fetcher
            .fetch_text(&url)
            .await
            .and_then(|body| parse_video_detail(&body, id));

        if let Err(e) = &outcome {
            tracing::warn!(id, error = %e, "detail lookup failed");
            if let Some(report) = &self.on_error {
                report(e);
            }
        }
        outcome
    }

    /// Current state for the presentation layer
    pub fn snapshot(&self) -> SessionSnapshot {
        let items = match self.status {
            SessionStatus::Failed(_) => Vec::new(),
            _ => self.last_result.items.clone(),
        };

        SessionSnapshot {
            request: self.request.clone(),
            status: self.status.clone(),
            items,
            total_count: self.last_result.total_count,
            total_pages: self.last_result.total_pages,
            current_page: self.last_result.current_page,
            has_next_page: self.has_next_page(),
            has_previous_page: self.has_previous_page(),
            generation: self.generation,
        }
    }
}
