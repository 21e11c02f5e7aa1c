//! Volume state with mute save/restore
//!
//! Tracks the gain level last pushed to the graph plus the level to restore
//! on unmute. Invariant: the level is 0.0 while muted and the cache holds
//! the pre-mute value.

/// Volume level plus the pre-mute cache
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Volume {
    /// Current gain level in [0, 1]
    level: f32,

    /// Level to restore on unmute
    cache: f32,
}

impl Volume {
    /// Create a new volume state. The initial level is clamped to [0, 1].
    pub(crate) fn new(level: f32) -> Self {
        let level = level.clamp(0.0, 1.0);
        Self { level, cache: level }
    }

    /// Current gain level
    pub(crate) fn level(&self) -> f32 {
        self.level
    }

    /// Level that unmute would restore
    pub(crate) fn cache(&self) -> f32 {
        self.cache
    }

    /// Set the level directly. Does not touch the cache, and performs no
    /// clamping: range validation is the caller's responsibility.
    pub(crate) fn set(&mut self, level: f32) {
        self.level = level;
    }

    /// Save the live gain into the cache and zero the level
    pub(crate) fn mute_from(&mut self, live_gain: f32) {
        self.cache = live_gain;
        self.level = 0.0;
    }

    /// Restore the cached level. Returns the level to push back to the graph.
    pub(crate) fn unmute(&mut self) -> f32 {
        self.level = self.cache;
        self.level
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}
