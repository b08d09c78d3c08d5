/// Why a page load was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LoadTrigger {
    /// First mount of the list.
    Mount,
    /// Virtualized mode: the rendered range approached the loaded end.
    RangeNearEnd,
    /// Regular mode: the sentinel entered the observer margin.
    SentinelVisible,
    /// Regular mode: the window scrolled within the bottom threshold of the document.
    NearDocumentBottom,
    /// The user asked to retry after an error.
    Retry,
}

/// Decides whether another page should be requested for the current render range.
///
/// Equivalent to `end_index >= total_loaded - buffer` without underflow, gated on there being
/// more to load, nothing in flight, and at least one page already present.
pub fn should_load_more(
    end_index: usize,
    total_loaded: usize,
    has_next_page: bool,
    loading: bool,
    buffer: usize,
) -> bool {
    end_index.saturating_add(buffer) >= total_loaded
        && has_next_page
        && !loading
        && total_loaded > 0
}

/// Returns `true` when the bottom of the window is within `threshold` pixels of the document end.
pub fn near_document_bottom(
    scroll_top: u64,
    window_height: u64,
    document_height: u64,
    threshold: u64,
) -> bool {
    scroll_top.saturating_add(window_height) >= document_height.saturating_sub(threshold)
}
