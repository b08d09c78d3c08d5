use alloc::string::String;

/// A single post as served by the remote list endpoint.
///
/// Immutable once fetched. The wire format uses `userId` for the owner.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Post {
    pub id: u64,
    #[serde(rename = "userId")]
    pub owner_id: u64,
    pub title: String,
    pub body: String,
}

/// The slice of the list to render.
///
/// All indexes are inclusive. `start_index..=end_index` includes overscan, while
/// `visible_start_index..=visible_end_index` is what the viewport actually covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VisibleRange {
    pub start_index: usize,
    pub end_index: usize,
    pub visible_start_index: usize,
    pub visible_end_index: usize,
}

impl VisibleRange {
    /// Number of indexes covered by the overscanned range.
    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index) + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index <= self.end_index
    }
}

/// A positioned item produced by the view composer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowItem<'a> {
    pub index: usize,
    pub item: &'a Post,
    /// Offset from the top of the scroll area, in pixels.
    pub top: u64,
}

/// A contiguous segment on the scroll axis, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub start: i64,
    pub size: u64,
}

impl Span {
    pub fn new(start: i64, size: u64) -> Self {
        Self { start, size }
    }

    pub fn end(&self) -> i64 {
        self.start.saturating_add(self.size as i64)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// How the rendering surface paints the list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Every loaded item is rendered; a sentinel and a document-bottom threshold drive loading.
    #[default]
    Regular,
    /// Only the overscanned visible range is rendered; the range policy drives loading.
    Virtualized,
}

impl RenderMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Regular => Self::Virtualized,
            Self::Virtualized => Self::Regular,
        }
    }
}
