use alloc::vec::Vec;

use crate::compose::{self, FeedStatus};
use crate::policy::{near_document_bottom, should_load_more};
use crate::{
    FeedOptions, FetchError, LoadOutcome, LoadTrigger, ObserverConfig, PageLoader, PageRequest,
    Post, RenderMode, ScrollTracker, Span, VisibilityTrigger, VisibleRange, WindowItem,
};

/// Everything that can happen to a feed.
///
/// Scroll listeners, sentinel observers, UI buttons and fetch completions are independent
/// producers; [`Feed::handle`] is the one consumer that mutates state.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedEvent {
    /// The list was mounted with its container at `scroll_offset`.
    Mounted { scroll_offset: u64 },
    /// The list's own scroll container moved.
    Scrolled { offset: u64 },
    ViewportResized { container_height: u32 },
    /// The document (window) scrolled. Only used in regular mode.
    WindowScrolled {
        scroll_top: u64,
        window_height: u64,
        document_height: u64,
    },
    /// New sentinel/viewport geometry from the intersection observer.
    SentinelObserved { sentinel: Span, viewport: Span },
    ObserverConfigured(ObserverConfig),
    PageLoaded {
        request: PageRequest,
        result: Result<Vec<Post>, FetchError>,
    },
    /// The fetch for `request` ended without a result (cancelled or crashed).
    PageAbandoned { request: PageRequest },
    Reset,
    Retry,
    ModeChanged(RenderMode),
    Teardown,
}

/// Coordinates pagination, scrolling and windowing for one list.
///
/// The feed owns the [`PageLoader`], the [`ScrollTracker`] and the [`VisibilityTrigger`] and is
/// the only place they are mutated. Each call to [`handle`](Self::handle) applies one event,
/// recomputes the render range, re-evaluates the load triggers of the current mode and returns
/// the page request to fetch, if any. Since the loader is single-flight, at most one request is
/// ever outstanding regardless of how many triggers fire.
#[derive(Clone, Debug)]
pub struct Feed {
    options: FeedOptions,
    mode: RenderMode,
    loader: PageLoader,
    scroll: ScrollTracker,
    visibility: VisibilityTrigger,
    range: VisibleRange,
    active: bool,
    last_trigger: Option<LoadTrigger>,
}

impl Feed {
    pub fn new(options: FeedOptions, mode: RenderMode) -> Self {
        fdebug!(
            page_size = options.page_size,
            total_items = options.total_items,
            ?mode,
            "Feed::new"
        );
        Self {
            loader: PageLoader::new(options.page_size, options.total_items),
            visibility: VisibilityTrigger::new(options.observer),
            scroll: ScrollTracker::new(),
            range: VisibleRange::default(),
            active: false,
            last_trigger: None,
            options,
            mode,
        }
    }

    pub fn options(&self) -> &FeedOptions {
        &self.options
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn loader(&self) -> &PageLoader {
        &self.loader
    }

    pub fn scroll(&self) -> &ScrollTracker {
        &self.scroll
    }

    pub fn visibility(&self) -> &VisibilityTrigger {
        &self.visibility
    }

    pub fn items(&self) -> &[Post] {
        self.loader.items()
    }

    pub fn range(&self) -> VisibleRange {
        self.range
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll.offset()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn last_trigger(&self) -> Option<LoadTrigger> {
        self.last_trigger
    }

    pub fn total_height(&self) -> u64 {
        compose::total_height(self.loader.len(), self.options.item_height)
    }

    pub fn status(&self) -> FeedStatus {
        FeedStatus::from_loader(&self.loader, self.options.skeleton_count)
    }

    /// The rows to paint for the current mode.
    pub fn window(&self) -> Vec<WindowItem<'_>> {
        match self.mode {
            RenderMode::Virtualized => {
                compose::compose_window(self.loader.items(), self.range, self.options.item_height)
            }
            RenderMode::Regular => {
                compose::compose_all(self.loader.items(), self.options.item_height)
            }
        }
    }

    /// Top offsets of the placeholder rows to paint while a page is loading.
    pub fn skeleton_tops(&self) -> Vec<u64> {
        let status = self.status();
        compose::skeleton_slots(status.loaded, status.skeleton_rows, self.options.item_height)
            .collect()
    }

    /// Applies `event` and returns the page to fetch, if a load was started.
    pub fn handle(&mut self, event: FeedEvent) -> Option<PageRequest> {
        ftrace!(?event, "Feed::handle");
        match event {
            FeedEvent::Mounted { scroll_offset } => {
                self.active = true;
                self.scroll.attach(scroll_offset);
                if !self.visibility.is_connected() {
                    self.visibility.connect();
                }
                self.recompute_range();
                if let Some(request) = self.loader.mount() {
                    self.last_trigger = Some(LoadTrigger::Mount);
                    return Some(request);
                }
                self.evaluate()
            }
            FeedEvent::Scrolled { offset } => {
                if !self.scroll.on_scroll(offset) {
                    return None;
                }
                self.recompute_range();
                self.evaluate()
            }
            FeedEvent::ViewportResized { container_height } => {
                self.options.container_height = container_height;
                self.recompute_range();
                self.evaluate()
            }
            FeedEvent::WindowScrolled {
                scroll_top,
                window_height,
                document_height,
            } => {
                if !self.active || self.mode != RenderMode::Regular || !self.can_load_more() {
                    return None;
                }
                if near_document_bottom(
                    scroll_top,
                    window_height,
                    document_height,
                    self.options.bottom_threshold,
                ) {
                    return self.load(LoadTrigger::NearDocumentBottom);
                }
                None
            }
            FeedEvent::SentinelObserved { sentinel, viewport } => {
                self.visibility.observe(sentinel, viewport)?;
                self.evaluate()
            }
            FeedEvent::ObserverConfigured(config) => {
                self.options.observer = config;
                self.visibility.set_config(config);
                None
            }
            FeedEvent::PageLoaded { request, result } => {
                match self.loader.complete(request, result) {
                    LoadOutcome::Stale => return None,
                    LoadOutcome::Appended { .. } => self.recompute_range(),
                    LoadOutcome::Failed => return None,
                }
                self.evaluate()
            }
            FeedEvent::PageAbandoned { request } => {
                self.loader.abandon(request);
                None
            }
            FeedEvent::Reset => {
                self.loader.reset();
                self.scroll.rewind();
                self.visibility.reset();
                self.last_trigger = None;
                self.recompute_range();
                None
            }
            FeedEvent::Retry => {
                if !self.active {
                    return None;
                }
                self.load(LoadTrigger::Retry)
            }
            FeedEvent::ModeChanged(mode) => {
                if self.mode == mode {
                    return None;
                }
                fdebug!(?mode, "render mode changed");
                self.mode = mode;
                self.visibility.reset();
                self.recompute_range();
                self.evaluate()
            }
            FeedEvent::Teardown => {
                self.active = false;
                self.scroll.detach();
                self.visibility.disconnect();
                None
            }
        }
    }

    fn recompute_range(&mut self) {
        self.range = self.options.range_for(self.scroll.offset(), self.loader.len());
    }

    fn can_load_more(&self) -> bool {
        self.loader.has_next_page() && !self.loader.is_loading() && !self.loader.is_empty()
    }

    fn evaluate(&mut self) -> Option<PageRequest> {
        if !self.active {
            return None;
        }
        match self.mode {
            RenderMode::Virtualized => {
                if should_load_more(
                    self.range.end_index,
                    self.loader.len(),
                    self.loader.has_next_page(),
                    self.loader.is_loading(),
                    self.options.load_more_buffer,
                ) {
                    return self.load(LoadTrigger::RangeNearEnd);
                }
                None
            }
            RenderMode::Regular => {
                if self.visibility.is_intersecting() && self.can_load_more() {
                    return self.load(LoadTrigger::SentinelVisible);
                }
                None
            }
        }
    }

    fn load(&mut self, trigger: LoadTrigger) -> Option<PageRequest> {
        let request = self.loader.load_next_page()?;
        fdebug!(?trigger, page = request.page, "load triggered");
        self.last_trigger = Some(trigger);
        Some(request)
    }
}
