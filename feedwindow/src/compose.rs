use alloc::vec::Vec;

use crate::{FetchError, PageLoader, Post, VisibleRange, WindowItem};

/// Calls `f` for every loaded item in `range`, in index order, with its top offset.
///
/// Indexes past the end of `items` are skipped.
pub fn for_each_window_item<'a>(
    items: &'a [Post],
    range: VisibleRange,
    item_height: u32,
    mut f: impl FnMut(WindowItem<'a>),
) {
    if items.is_empty() {
        return;
    }
    let end = range.end_index.min(items.len() - 1);
    if range.start_index > end {
        return;
    }
    let height = u64::from(item_height);
    for (offset, item) in items[range.start_index..=end].iter().enumerate() {
        let index = range.start_index + offset;
        f(WindowItem {
            index,
            item,
            top: (index as u64).saturating_mul(height),
        });
    }
}

/// Collects the positioned items covering `range`.
pub fn compose_window(items: &[Post], range: VisibleRange, item_height: u32) -> Vec<WindowItem<'_>> {
    let mut out = Vec::with_capacity(range.len().min(items.len()));
    for_each_window_item(items, range, item_height, |it| out.push(it));
    out
}

/// Positions every loaded item, as rendered by the non-virtualized list.
pub fn compose_all(items: &[Post], item_height: u32) -> Vec<WindowItem<'_>> {
    let height = u64::from(item_height);
    items
        .iter()
        .enumerate()
        .map(|(index, item)| WindowItem {
            index,
            item,
            top: (index as u64).saturating_mul(height),
        })
        .collect()
}

/// Height of the scroll area for `len` rows of `item_height` pixels.
pub fn total_height(len: usize, item_height: u32) -> u64 {
    (len as u64).saturating_mul(u64::from(item_height))
}

/// Top offsets of `count` placeholder rows following the last loaded row.
pub fn skeleton_slots(len: usize, count: usize, item_height: u32) -> impl Iterator<Item = u64> {
    let height = u64::from(item_height);
    (len..len.saturating_add(count)).map(move |i| (i as u64).saturating_mul(height))
}

/// How an error should be presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorDisplay {
    /// Nothing loaded yet: the retry prompt replaces the list.
    Blocking,
    /// Items already on screen stay; the retry prompt sits below them.
    Inline,
}

/// Status affordances derived from the loader, shared by both render modes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedStatus {
    pub loaded: usize,
    pub has_next_page: bool,
    pub loading: bool,
    /// Nothing to show yet and the first page is on its way.
    pub initial_skeleton: bool,
    /// Placeholder rows to append after the loaded rows.
    pub skeleton_rows: usize,
    pub error: Option<(FetchError, ErrorDisplay)>,
    /// Set to the number of loaded items once the whole list is loaded.
    pub end_of_list: Option<usize>,
    /// Whether a sentinel should be placed after the last row.
    pub sentinel: bool,
}

impl FeedStatus {
    pub fn from_loader(loader: &PageLoader, skeleton_count: usize) -> Self {
        let loaded = loader.len();
        let loading = loader.is_loading();
        let has_next_page = loader.has_next_page();

        let error = match loader.error() {
            Some(err) if loaded == 0 => Some((err.clone(), ErrorDisplay::Blocking)),
            Some(err) if !loading => Some((err.clone(), ErrorDisplay::Inline)),
            _ => None,
        };

        Self {
            loaded,
            has_next_page,
            loading,
            initial_skeleton: loaded == 0 && loading,
            skeleton_rows: if loading && has_next_page {
                skeleton_count
            } else {
                0
            },
            error,
            end_of_list: (!has_next_page && !loading && loaded > 0).then_some(loaded),
            sentinel: has_next_page,
        }
    }

    pub fn is_blocking_error(&self) -> bool {
        matches!(self.error, Some((_, ErrorDisplay::Blocking)))
    }
}
