use crate::{FeedOptions, VisibleRange};

/// Maps a scroll offset and fixed-row geometry to the range of rows to render.
///
/// - `visible_start_index` is the row under the top edge of the viewport.
/// - `visible_end_index` is the last row intersecting `[scroll_offset, scroll_offset + container_height)`.
/// - `start_index`/`end_index` extend the visible rows by `overscan` on each side, clamped to the list.
///
/// Returns an all-zero range when `total_items == 0`. Offsets past the end of the list clamp the
/// visible rows to the last row, so `start <= visible_start <= visible_end <= end < total_items`
/// always holds.
pub fn calculate_visible_range(
    scroll_offset: u64,
    item_height: u32,
    container_height: u32,
    total_items: usize,
    overscan: usize,
) -> VisibleRange {
    if total_items == 0 {
        return VisibleRange::default();
    }

    let item_height = u64::from(item_height.max(1));
    let last = total_items - 1;

    let visible_start = to_index(scroll_offset / item_height);
    let viewport_end = scroll_offset.saturating_add(u64::from(container_height));
    let visible_end = to_index(viewport_end.div_ceil(item_height).saturating_sub(1))
        .max(visible_start)
        .min(last);
    let visible_start = visible_start.min(visible_end);

    VisibleRange {
        start_index: visible_start.saturating_sub(overscan),
        end_index: visible_end.saturating_add(overscan).min(last),
        visible_start_index: visible_start,
        visible_end_index: visible_end,
    }
}

fn to_index(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

impl FeedOptions {
    /// Computes the render range for `total_items` loaded rows at `scroll_offset`.
    pub fn range_for(&self, scroll_offset: u64, total_items: usize) -> VisibleRange {
        calculate_visible_range(
            scroll_offset,
            self.item_height,
            self.container_height,
            total_items,
            self.overscan,
        )
    }

    /// Height of the scroll area for `len` rows.
    pub fn total_height(&self, len: usize) -> u64 {
        (len as u64).saturating_mul(u64::from(self.item_height))
    }
}
