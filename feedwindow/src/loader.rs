use alloc::vec::Vec;

use crate::{FetchError, Post};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
}

/// A page fetch issued by [`PageLoader::load_next_page`].
///
/// The request is stamped with the loader generation it was issued for. Results are handed back
/// through [`PageLoader::complete`], which drops them if the loader was reset in the meantime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PageRequest {
    pub generation: u64,
    /// Page cursor at issue time.
    pub page: usize,
    /// Index of the first requested item (`page * page_size`).
    pub start: usize,
    pub limit: usize,
}

/// What [`PageLoader::complete`] did with a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Appended { added: usize },
    Failed,
    /// The request belongs to an earlier generation and was ignored.
    Stale,
}

/// Owns the fetched item sequence, the page cursor and the load state.
///
/// The loader performs no I/O. It hands out [`PageRequest`]s and accepts their results, which
/// keeps it usable from a synchronous event loop and from async drivers alike.
///
/// Invariants:
/// - At most one request is outstanding; `load_next_page` returns `None` while loading.
/// - The sequence only grows, page by page, in cursor order, until `reset`.
/// - `Loading` is cleared by every `complete`/`abandon` of the current generation.
#[derive(Clone, Debug)]
pub struct PageLoader {
    items: Vec<Post>,
    page: usize,
    state: LoadState,
    error: Option<FetchError>,
    generation: u64,
    in_flight: Option<PageRequest>,
    mounted: bool,
    page_size: usize,
    total_items: usize,
}

impl PageLoader {
    pub fn new(page_size: usize, total_items: usize) -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            state: LoadState::Idle,
            error: None,
            generation: 0,
            in_flight: None,
            mounted: false,
            page_size: page_size.max(1),
            total_items,
        }
    }

    pub fn items(&self) -> &[Post] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of pages appended so far.
    pub fn page_cursor(&self) -> usize {
        self.page
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn in_flight(&self) -> Option<PageRequest> {
        self.in_flight
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn has_next_page(&self) -> bool {
        self.items.len() < self.total_items
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Triggers the initial load the first time the list is mounted.
    ///
    /// Later calls return `None` until [`reset`](Self::reset) re-arms it.
    pub fn mount(&mut self) -> Option<PageRequest> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        self.load_next_page()
    }

    /// Starts loading the next page.
    ///
    /// Returns `None` (and does nothing) while a request is outstanding or when every known item
    /// has been loaded. The loading flag is set before returning, so a second call made before
    /// the first request resolves is dropped.
    pub fn load_next_page(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() {
            ftrace!(page = self.page, "load_next_page: already loading");
            return None;
        }
        if !self.has_next_page() {
            ftrace!(len = self.items.len(), "load_next_page: no more pages");
            return None;
        }

        let request = PageRequest {
            generation: self.generation,
            page: self.page,
            start: self.page.saturating_mul(self.page_size),
            limit: self.page_size,
        };
        self.in_flight = Some(request);
        self.state = LoadState::Loading;
        self.error = None;
        fdebug!(
            generation = request.generation,
            page = request.page,
            start = request.start,
            limit = request.limit,
            "load_next_page"
        );
        Some(request)
    }

    /// Applies the result of `request`.
    pub fn complete(
        &mut self,
        request: PageRequest,
        result: Result<Vec<Post>, FetchError>,
    ) -> LoadOutcome {
        if !self.owns(request) {
            fwarn!(
                request_generation = request.generation,
                generation = self.generation,
                page = request.page,
                "discarding stale page"
            );
            return LoadOutcome::Stale;
        }

        self.in_flight = None;
        self.state = LoadState::Idle;

        match result {
            Ok(mut posts) => {
                let remaining = self.total_items.saturating_sub(self.items.len());
                if posts.len() > remaining {
                    fwarn!(
                        received = posts.len(),
                        remaining,
                        "source returned more items than expected"
                    );
                    posts.truncate(remaining);
                }
                let added = posts.len();
                self.items.extend(posts);
                self.page += 1;
                self.error = None;
                fdebug!(added, len = self.items.len(), page = self.page, "page appended");
                LoadOutcome::Appended { added }
            }
            Err(err) => {
                fwarn!(page = request.page, error = %err, "page load failed");
                self.error = Some(err);
                LoadOutcome::Failed
            }
        }
    }

    /// Releases the loading flag for a request that will never produce a result.
    ///
    /// Returns `false` for stale requests, which are ignored.
    pub fn abandon(&mut self, request: PageRequest) -> bool {
        if !self.owns(request) {
            return false;
        }
        fdebug!(page = request.page, "page request abandoned");
        self.in_flight = None;
        self.state = LoadState::Idle;
        true
    }

    /// Clears everything and starts a new generation. Does not start a reload.
    pub fn reset(&mut self) {
        self.items.clear();
        self.page = 0;
        self.state = LoadState::Idle;
        self.error = None;
        self.in_flight = None;
        self.mounted = false;
        self.generation = self.generation.wrapping_add(1);
        fdebug!(generation = self.generation, "page loader reset");
    }

    fn owns(&self, request: PageRequest) -> bool {
        self.in_flight == Some(request)
    }
}
