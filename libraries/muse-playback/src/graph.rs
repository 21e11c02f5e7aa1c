//! Platform-agnostic audio graph trait
//!
//! The processing context behind the element: a run-state, a node factory,
//! and connections between node handles. Node handles are opaque to the
//! player; it only ever connects them and reads/writes gain values.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Run-state of the audio-processing context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextState {
    /// Processing audio
    Running,
    /// Paused by the platform (commonly: awaiting a user gesture)
    Suspended,
    /// Released; no further processing possible
    Closed,
}

impl ContextState {
    /// Whether safe-variant transport operations may proceed
    pub fn is_running(self) -> bool {
        matches!(self, ContextState::Running)
    }
}

/// Platform-agnostic audio graph
///
/// Implementors own the context and every node created through it; the
/// player and builder never destroy nodes, only wire and drive them.
pub trait AudioGraph: Send + Sync + 'static {
    /// Opaque node handle
    type Node: Clone + Send + Sync + 'static;

    /// Current context run-state
    fn state(&self) -> ContextState;

    /// Derive the source node for the associated media element
    ///
    /// Fails with [`crate::PlayerError::Initialization`] when the context
    /// cannot be created, e.g. before any user interaction.
    fn create_media_source(&self) -> Result<Self::Node>;

    /// Create a gain node
    fn create_gain(&self) -> Self::Node;

    /// Create an analyser node
    fn create_analyser(&self) -> Self::Node;

    /// Create a stereo panner node
    fn create_stereo_panner(&self) -> Self::Node;

    /// Create a wave shaper node
    fn create_wave_shaper(&self) -> Self::Node;

    /// Connect the output of `from` into `to`
    ///
    /// No compatibility validation is performed at this layer.
    fn connect(&self, from: &Self::Node, to: &Self::Node);

    /// Read the live gain value of a gain node
    fn gain_value(&self, gain: &Self::Node) -> f32;

    /// Write the gain value of a gain node
    fn set_gain_value(&self, gain: &Self::Node, value: f32);
}
