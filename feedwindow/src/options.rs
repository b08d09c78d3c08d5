use crate::ObserverConfig;

/// Configuration for [`crate::Feed`] and its parts.
///
/// Every field has a default matching the public JSON placeholder API (100 posts, pages of 10)
/// and a fixed row height layout. Adapters usually start from `FeedOptions::default()` and
/// override a few fields with the `with_*` builders.
///
/// With `serde`, missing fields fall back to their defaults, so partial config files work.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FeedOptions {
    /// Row height in the scroll axis, in pixels.
    pub item_height: u32,
    /// Height of the scroll container, in pixels.
    pub container_height: u32,
    /// Rows rendered beyond each edge of the viewport.
    pub overscan: usize,
    /// Request the next page once the rendered range gets this close to the loaded end.
    pub load_more_buffer: usize,
    pub page_size: usize,
    /// Known total number of items at the source.
    pub total_items: usize,
    /// Placeholder rows shown while a page is loading.
    pub skeleton_count: usize,
    /// Regular mode: distance from the document bottom that triggers a load.
    pub bottom_threshold: u64,
    /// Regular mode: sentinel observer configuration.
    pub observer: ObserverConfig,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            item_height: 180,
            container_height: 600,
            overscan: 3,
            load_more_buffer: 5,
            page_size: 10,
            total_items: 100,
            skeleton_count: 3,
            bottom_threshold: 200,
            observer: ObserverConfig::new(0.0, 100),
        }
    }
}

impl FeedOptions {
    pub fn new(page_size: usize, total_items: usize) -> Self {
        Self {
            page_size,
            total_items,
            ..Self::default()
        }
    }

    pub fn with_item_height(mut self, item_height: u32) -> Self {
        self.item_height = item_height;
        self
    }

    pub fn with_container_height(mut self, container_height: u32) -> Self {
        self.container_height = container_height;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_load_more_buffer(mut self, buffer: usize) -> Self {
        self.load_more_buffer = buffer;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_total_items(mut self, total_items: usize) -> Self {
        self.total_items = total_items;
        self
    }

    pub fn with_skeleton_count(mut self, count: usize) -> Self {
        self.skeleton_count = count;
        self
    }

    pub fn with_bottom_threshold(mut self, threshold: u64) -> Self {
        self.bottom_threshold = threshold;
        self
    }

    pub fn with_observer(mut self, observer: ObserverConfig) -> Self {
        self.observer = observer;
        self
    }
}
