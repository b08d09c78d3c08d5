use std::future::Future;

use feedwindow::{FetchError, Post};

/// A remote list that can be read one page at a time.
///
/// The driver keeps the source in an `Arc` and calls it from spawned tasks, so implementations
/// only need shared access.
pub trait PostSource: Send + Sync + 'static {
    /// Fetches up to `limit` posts starting at index `start`.
    fn fetch_page(
        &self,
        start: usize,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Post>, FetchError>> + Send;
}

impl<S: PostSource> PostSource for std::sync::Arc<S> {
    fn fetch_page(
        &self,
        start: usize,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Post>, FetchError>> + Send {
        (**self).fetch_page(start, limit)
    }
}
