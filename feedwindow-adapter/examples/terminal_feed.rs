// Example: drive a feed against a live REST endpoint and print each frame.
//
// Usage: cargo run -p feedwindow-adapter --example terminal_feed [config.json]
// Set FEEDWINDOW_BASE_URL to point at another server and RUST_LOG=debug for driver logs.
use std::time::Duration;

use anyhow::{Context, Result};
use feedwindow::{RenderMode, Span};
use feedwindow_adapter::{FeedConfig, FeedDriver, FeedSnapshot, HttpPostSource};
use tokio::sync::watch;
use tracing::info;

/// Waits for the next published frame, then for any load it started to finish.
async fn settle(rx: &mut watch::Receiver<FeedSnapshot>) -> Result<FeedSnapshot> {
    let wait = async {
        rx.changed().await?;
        let snap = rx.wait_for(|s| !s.status.loading).await?;
        Ok::<_, watch::error::RecvError>(snap.clone())
    };
    tokio::time::timeout(Duration::from_secs(15), wait)
        .await
        .context("timed out waiting for the feed")?
        .context("feed driver stopped")
}

fn print_frame(snap: &FeedSnapshot) {
    println!(
        "-- offset={} loaded={} range={}..={} trigger={:?}",
        snap.scroll_offset,
        snap.status.loaded,
        snap.range.start_index,
        snap.range.end_index,
        snap.last_trigger
    );
    for row in snap.rows.iter().take(5) {
        println!("  #{:<3} @{:<6} {}", row.post.id, row.top, row.post.title);
    }
    if snap.rows.len() > 5 {
        println!("  ... {} more rows", snap.rows.len() - 5);
    }
    if let Some((err, display)) = &snap.status.error {
        println!("  error ({display:?}): {err}");
    }
    if let Some(total) = snap.status.end_of_list {
        println!("  end of list: {total} posts loaded");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("feedwindow_adapter=info".parse()?),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => FeedConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => FeedConfig::default(),
    }
    .with_env_overrides();
    info!(base_url = %config.base_url, mode = ?config.mode, "starting feed");

    let source = HttpPostSource::from_config(&config)?;
    let (handle, mut rx, task) = FeedDriver::spawn(source, config.options, config.mode);
    handle.mount(0)?;
    print_frame(&settle(&mut rx).await?);

    let item_height = u64::from(config.options.item_height);
    let viewport_height = u64::from(config.options.container_height);
    for step in 1..=12u64 {
        let snap = rx.borrow().clone();
        if snap.status.end_of_list.is_some() || snap.status.is_blocking_error() {
            break;
        }
        let offset = step * 5 * item_height;
        match config.mode {
            RenderMode::Virtualized => handle.scroll(offset)?,
            RenderMode::Regular => {
                // The sentinel sits right after the last row.
                let sentinel = Span::new(snap.total_height as i64, 1);
                handle.observe_sentinel(sentinel, Span::new(offset as i64, viewport_height))?;
                handle.window_scroll(offset, viewport_height, snap.total_height)?;
            }
        }
        print_frame(&settle(&mut rx).await?);
    }

    handle.teardown()?;
    task.await?;
    Ok(())
}
