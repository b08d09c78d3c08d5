use crate::Span;

/// Intersection observer settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Minimum visible fraction of the sentinel, in `0.0..=1.0`.
    pub threshold: f32,
    /// Pixels added to both ends of the root viewport before testing. May be negative.
    pub root_margin: i64,
}

impl ObserverConfig {
    pub fn new(threshold: f32, root_margin: i64) -> Self {
        Self {
            threshold,
            root_margin,
        }
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self::new(0.1, 0)
    }
}

/// Tracks whether a sentinel is within a margin of the viewport.
///
/// The UI layer reports sentinel and viewport geometry through [`observe`](Self::observe) (what
/// a browser compositor would deliver asynchronously). Changing the configuration disconnects
/// the current observer and connects a new one, which starts with a cleared flag.
#[derive(Clone, Debug)]
pub struct VisibilityTrigger {
    config: ObserverConfig,
    observer_id: u64,
    connected: bool,
    is_intersecting: bool,
}

impl VisibilityTrigger {
    /// Creates a connected trigger.
    pub fn new(config: ObserverConfig) -> Self {
        Self {
            config,
            observer_id: 1,
            connected: true,
            is_intersecting: false,
        }
    }

    pub fn config(&self) -> ObserverConfig {
        self.config
    }

    /// Identifies the current observer; increases on every reconnect.
    pub fn observer_id(&self) -> u64 {
        self.observer_id
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_intersecting(&self) -> bool {
        self.is_intersecting
    }

    /// Replaces the configuration, recreating the observer if anything changed.
    ///
    /// Returns `true` when the observer was recreated.
    pub fn set_config(&mut self, config: ObserverConfig) -> bool {
        if self.connected && self.config == config {
            return false;
        }
        self.config = config;
        self.connect();
        true
    }

    /// Connects a fresh observer with the current configuration.
    pub fn connect(&mut self) {
        self.observer_id = self.observer_id.wrapping_add(1);
        self.connected = true;
        self.is_intersecting = false;
        ftrace!(
            observer_id = self.observer_id,
            threshold = self.config.threshold,
            root_margin = self.config.root_margin,
            "visibility observer connected"
        );
    }

    /// Stops observing. Later observations are ignored until [`connect`](Self::connect).
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.is_intersecting = false;
    }

    pub fn reset(&mut self) {
        self.is_intersecting = false;
    }

    /// Records a new intersection measurement.
    ///
    /// Returns the updated flag, or `None` when disconnected.
    pub fn observe(&mut self, sentinel: Span, viewport: Span) -> Option<bool> {
        if !self.connected {
            return None;
        }
        self.is_intersecting = intersects(sentinel, viewport, self.config);
        Some(self.is_intersecting)
    }
}

impl Default for VisibilityTrigger {
    fn default() -> Self {
        Self::new(ObserverConfig::default())
    }
}

/// Returns `true` when `target` touches the margin-expanded `root` with at least
/// `config.threshold` of its size visible.
pub fn intersects(target: Span, root: Span, config: ObserverConfig) -> bool {
    let root_start = root.start.saturating_sub(config.root_margin);
    let root_end = root.end().saturating_add(config.root_margin);
    if root_end < root_start {
        return false;
    }

    let overlap_start = target.start.max(root_start);
    let overlap_end = target.end().min(root_end);
    if overlap_end < overlap_start {
        return false;
    }

    if target.size == 0 {
        return true;
    }
    let ratio = (overlap_end - overlap_start) as f64 / target.size as f64;
    ratio >= f64::from(config.threshold.clamp(0.0, 1.0))
}
