use std::sync::Arc;

use feedwindow::{
    Feed, FeedEvent, FeedOptions, FeedStatus, FetchError, LoadTrigger, ObserverConfig,
    PageRequest, Post, RenderMode, Span, VisibleRange,
};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::PostSource;

/// A rendered row, owned so it can cross the snapshot channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowSnapshot {
    pub index: usize,
    pub top: u64,
    pub post: Post,
}

/// Everything a rendering surface needs to paint one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedSnapshot {
    pub mode: RenderMode,
    pub rows: Vec<RowSnapshot>,
    /// Placeholder rows appended while a page loads.
    pub skeleton_tops: Vec<u64>,
    pub range: VisibleRange,
    pub status: FeedStatus,
    pub total_height: u64,
    pub scroll_offset: u64,
    pub generation: u64,
    pub last_trigger: Option<LoadTrigger>,
}

impl FeedSnapshot {
    pub fn capture(feed: &Feed) -> Self {
        Self {
            mode: feed.mode(),
            rows: feed
                .window()
                .into_iter()
                .map(|w| RowSnapshot {
                    index: w.index,
                    top: w.top,
                    post: w.item.clone(),
                })
                .collect(),
            skeleton_tops: feed.skeleton_tops(),
            range: feed.range(),
            status: feed.status(),
            total_height: feed.total_height(),
            scroll_offset: feed.scroll_offset(),
            generation: feed.loader().generation(),
            last_trigger: feed.last_trigger(),
        }
    }
}

/// Returned when sending to a driver that has stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("feed driver has shut down")]
pub struct DriverClosed;

/// Cloneable sender for feed events.
///
/// Scroll listeners, sentinel observers and UI buttons each hold a handle; all of them feed the
/// same driver task, which applies events one at a time.
#[derive(Clone, Debug)]
pub struct FeedHandle {
    tx: mpsc::UnboundedSender<FeedEvent>,
}

impl FeedHandle {
    pub fn send(&self, event: FeedEvent) -> Result<(), DriverClosed> {
        self.tx.send(event).map_err(|_| DriverClosed)
    }

    pub fn mount(&self, scroll_offset: u64) -> Result<(), DriverClosed> {
        self.send(FeedEvent::Mounted { scroll_offset })
    }

    pub fn scroll(&self, offset: u64) -> Result<(), DriverClosed> {
        self.send(FeedEvent::Scrolled { offset })
    }

    pub fn resize(&self, container_height: u32) -> Result<(), DriverClosed> {
        self.send(FeedEvent::ViewportResized { container_height })
    }

    pub fn window_scroll(
        &self,
        scroll_top: u64,
        window_height: u64,
        document_height: u64,
    ) -> Result<(), DriverClosed> {
        self.send(FeedEvent::WindowScrolled {
            scroll_top,
            window_height,
            document_height,
        })
    }

    pub fn observe_sentinel(&self, sentinel: Span, viewport: Span) -> Result<(), DriverClosed> {
        self.send(FeedEvent::SentinelObserved { sentinel, viewport })
    }

    pub fn configure_observer(&self, config: ObserverConfig) -> Result<(), DriverClosed> {
        self.send(FeedEvent::ObserverConfigured(config))
    }

    pub fn set_mode(&self, mode: RenderMode) -> Result<(), DriverClosed> {
        self.send(FeedEvent::ModeChanged(mode))
    }

    /// Clears the list. Call [`mount`](Self::mount) afterwards to load it again.
    pub fn reset(&self) -> Result<(), DriverClosed> {
        self.send(FeedEvent::Reset)
    }

    pub fn retry(&self) -> Result<(), DriverClosed> {
        self.send(FeedEvent::Retry)
    }

    /// Stops the driver. In-flight fetches are cancelled.
    pub fn teardown(&self) -> Result<(), DriverClosed> {
        self.send(FeedEvent::Teardown)
    }
}

/// Sends the fetch result back to the driver, or `PageAbandoned` if the task is dropped first
/// (aborted or panicked), so the loader never stays stuck in `Loading`.
struct FetchGuard {
    request: PageRequest,
    results: mpsc::UnboundedSender<FeedEvent>,
    finished: bool,
}

impl FetchGuard {
    fn new(request: PageRequest, results: mpsc::UnboundedSender<FeedEvent>) -> Self {
        Self {
            request,
            results,
            finished: false,
        }
    }

    fn finish(mut self, result: Result<Vec<Post>, FetchError>) {
        self.finished = true;
        let _ = self.results.send(FeedEvent::PageLoaded {
            request: self.request,
            result,
        });
    }
}

impl Drop for FetchGuard {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.results.send(FeedEvent::PageAbandoned {
                request: self.request,
            });
        }
    }
}

/// Runs a [`Feed`] on a tokio task and performs its page fetches.
///
/// The driver is the only owner of the feed. Events arrive from [`FeedHandle`]s, fetch results
/// arrive from spawned fetch tasks, and after every event a fresh [`FeedSnapshot`] is published
/// on a `watch` channel.
pub struct FeedDriver<S> {
    feed: Feed,
    source: Arc<S>,
    events: mpsc::UnboundedReceiver<FeedEvent>,
    results_tx: mpsc::UnboundedSender<FeedEvent>,
    results: mpsc::UnboundedReceiver<FeedEvent>,
    snapshots: watch::Sender<FeedSnapshot>,
    fetch: Option<JoinHandle<()>>,
}

impl<S: PostSource> FeedDriver<S> {
    pub fn new(
        source: S,
        options: FeedOptions,
        mode: RenderMode,
    ) -> (Self, FeedHandle, watch::Receiver<FeedSnapshot>) {
        let feed = Feed::new(options, mode);
        let (tx, events) = mpsc::unbounded_channel();
        let (results_tx, results) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = watch::channel(FeedSnapshot::capture(&feed));
        let driver = Self {
            feed,
            source: Arc::new(source),
            events,
            results_tx,
            results,
            snapshots,
            fetch: None,
        };
        (driver, FeedHandle { tx }, snapshot_rx)
    }

    /// Creates a driver and runs it on the current tokio runtime.
    pub fn spawn(
        source: S,
        options: FeedOptions,
        mode: RenderMode,
    ) -> (FeedHandle, watch::Receiver<FeedSnapshot>, JoinHandle<()>) {
        let (driver, handle, snapshots) = Self::new(source, options, mode);
        let task = tokio::spawn(driver.run());
        (handle, snapshots, task)
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    /// Processes events until teardown or until every [`FeedHandle`] is dropped.
    pub async fn run(mut self) {
        info!(
            mode = ?self.feed.mode(),
            page_size = self.feed.options().page_size,
            total_items = self.feed.options().total_items,
            "feed driver started"
        );
        loop {
            // User events go first so a reset is applied before any result already queued.
            let event = tokio::select! {
                biased;
                event = self.events.recv() => event.unwrap_or(FeedEvent::Teardown),
                Some(event) = self.results.recv() => event,
            };
            let stop = matches!(event, FeedEvent::Teardown);
            self.apply(event);
            if stop {
                break;
            }
        }
        info!(loaded = self.feed.items().len(), "feed driver stopped");
    }

    fn apply(&mut self, event: FeedEvent) {
        match &event {
            FeedEvent::PageLoaded { request, result } => {
                if request.generation != self.feed.loader().generation() {
                    warn!(
                        page = request.page,
                        generation = request.generation,
                        "discarding page from before reset"
                    );
                }
                match result {
                    Ok(posts) => info!(page = request.page, received = posts.len(), "page loaded"),
                    Err(err) => warn!(page = request.page, error = %err, "page fetch failed"),
                }
                self.release_fetch(*request);
            }
            FeedEvent::PageAbandoned { request } => {
                debug!(page = request.page, "page fetch abandoned");
                self.release_fetch(*request);
            }
            FeedEvent::Reset | FeedEvent::Teardown => self.cancel_fetch(),
            _ => {}
        }

        if let Some(request) = self.feed.handle(event) {
            debug!(trigger = ?self.feed.last_trigger(), "load triggered");
            self.spawn_fetch(request);
        }
        self.snapshots.send_replace(FeedSnapshot::capture(&self.feed));
    }

    fn spawn_fetch(&mut self, request: PageRequest) {
        info!(
            page = request.page,
            start = request.start,
            limit = request.limit,
            "fetching page"
        );
        let source = Arc::clone(&self.source);
        let guard = FetchGuard::new(request, self.results_tx.clone());
        self.fetch = Some(tokio::spawn(async move {
            let result = source.fetch_page(request.start, request.limit).await;
            guard.finish(result);
        }));
    }

    /// Forgets the task handle once the current request has reported back.
    fn release_fetch(&mut self, request: PageRequest) {
        if self.feed.loader().in_flight() == Some(request) {
            self.fetch = None;
        }
    }

    fn cancel_fetch(&mut self) {
        if let Some(task) = self.fetch.take() {
            debug!("cancelling in-flight fetch");
            task.abort();
        }
    }
}
