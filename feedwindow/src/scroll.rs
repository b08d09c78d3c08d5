use core::cmp;

use crate::ScrollDirection;

/// Republishes a scroll container's offset.
///
/// The tracker mirrors a passive scroll listener: while attached, every event overwrites the
/// offset (no debouncing); once detached, events are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScrollTracker {
    offset: u64,
    direction: Option<ScrollDirection>,
    attached: bool,
    events: u64,
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to the container and publishes its current offset.
    pub fn attach(&mut self, initial_offset: u64) {
        self.attached = true;
        self.direction = None;
        self.offset = initial_offset;
        ftrace!(initial_offset, "scroll tracker attached");
    }

    pub fn detach(&mut self) {
        if self.attached {
            ftrace!(offset = self.offset, "scroll tracker detached");
        }
        self.attached = false;
        self.direction = None;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Handles one scroll event. Returns `true` when the published offset changed.
    pub fn on_scroll(&mut self, offset: u64) -> bool {
        if !self.attached {
            return false;
        }
        self.events = self.events.wrapping_add(1);
        let prev = self.offset;
        self.offset = offset;
        self.direction = match offset.cmp(&prev) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.direction,
        };
        offset != prev
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn direction(&self) -> Option<ScrollDirection> {
        self.direction
    }

    /// Number of scroll events observed while attached.
    pub fn event_count(&self) -> u64 {
        self.events
    }

    /// Moves the offset back to the top without detaching, e.g. after the list was cleared.
    pub fn rewind(&mut self) {
        self.offset = 0;
        self.direction = None;
    }
}
