//! Platform-agnostic media element trait
//!
//! Abstracts the native media element (an HTML audio element in the browser,
//! a decoder front-end elsewhere) so the player core carries no platform
//! dependency. Implementors own the actual resource; the player only drives
//! it through this surface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::Result;

/// Preload behavior hint for the element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreloadHint {
    /// Do not preload anything
    None,
    /// Fetch metadata only (duration, dimensions)
    Metadata,
    /// Platform may preload the whole resource
    Auto,
}

/// Signal reported by the element while loading a new source
///
/// The safe loader treats these as a one-shot group: the first signal
/// resolves the load attempt and the rest are discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadEvent {
    /// Enough data buffered to start playback
    CanPlay,
    /// The element failed to fetch or decode the resource
    Error(String),
    /// Loading was aborted
    Aborted,
    /// Loading stalled waiting for data
    Stalled,
}

/// Platform-agnostic media element
///
/// Transport fields (`current_time`, `duration`, `is_paused`, `has_ended`)
/// are synchronous reads; only the native play attempt suspends. `duration`
/// returns `NaN` until metadata is available, matching browser semantics.
#[async_trait]
pub trait MediaElement: Send + Sync + 'static {
    /// Last source path assigned, if any
    fn source(&self) -> Option<String>;

    /// Assign a new source path. Does not start playback.
    fn set_source(&self, path: &str);

    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// Move the playback position
    fn set_current_time(&self, seconds: f64);

    /// Total duration in seconds, `NaN` while unknown
    fn duration(&self) -> f64;

    /// Whether the element is currently paused
    fn is_paused(&self) -> bool;

    /// Whether playback ran to the end of the current source
    fn has_ended(&self) -> bool;

    /// Set the preload hint
    fn set_preload(&self, hint: PreloadHint);

    /// Attempt to start native playback
    ///
    /// Resolves once the platform accepts or rejects the attempt. Failure
    /// maps to [`crate::PlayerError::Playback`].
    async fn play(&self) -> Result<()>;

    /// Pause native playback. Never fails, even when nothing is playing.
    fn pause(&self);

    /// Subscribe to load signals for the current and future sources
    ///
    /// Callers subscribe before assigning a new source so no signal is
    /// missed; dropping the receiver detaches the whole listener group.
    fn load_events(&self) -> broadcast::Receiver<LoadEvent>;
}
