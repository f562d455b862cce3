//! Live search against the provider, paging forward once
//!
//! Run with `RUST_LOG=vidsearch_core=debug cargo run --example search_demo -- "street food"`.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use vidsearch_core::{FetcherConfig, Order, ResilientFetcher, SearchSession, SessionConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let query = std::env::args().nth(1).unwrap_or_else(|| "cooking".to_string());

    let fetcher = Arc::new(ResilientFetcher::with_config(FetcherConfig::from_env())?);
    let mut session = SearchSession::new(
        fetcher,
        SessionConfig {
            per_page: 10,
            ..SessionConfig::for_category(query)
        },
    )?;
    session
        .on_render(|page| {
            println!(
                "\n=== page {} of {} ({} results) ===",
                page.current_page, page.total_pages, page.total_count
            );
            for video in &page.items {
                println!(
                    "{:>8} views  {:>8}  {}",
                    video.views, video.length_min, video.title
                );
            }
        })
        .on_error(|e| eprintln!("search failed: {}", e));

    session.set_order(Order::TopWeekly);
    session.search().await?;
    session.next_page().await?;

    if let Some(first) = session.last_result().items.first() {
        let video = session.fetch_item_detail(&first.id).await?;
        println!("\nDetail: {} -> {}", video.title, video.embed);
        println!("Tags: {}", video.keyword_list().join(", "));
    }

    Ok(())
}
