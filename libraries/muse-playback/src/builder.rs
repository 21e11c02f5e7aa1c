//! Player builder - audio graph construction and wiring
//!
//! Staging object that activates the graph, lets the caller hang analysis
//! and effects taps off the source node, and finally hands everything to a
//! [`Player`]. Consumed by `build()`, so a second player over the same graph
//! cannot be produced by accident.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::element::{MediaElement, PreloadHint};
use crate::error::{PlayerError, Result};
use crate::graph::AudioGraph;
use crate::player::Player;
use crate::tick::DEFAULT_TICK_INTERVAL;

/// Builder for a [`Player`]
///
/// The element and graph are owned externally and shared in; the builder
/// only wires nodes. Call [`start`](Self::start) before any operation that
/// touches the graph.
pub struct PlayerBuilder<E: MediaElement, G: AudioGraph> {
    element: Arc<E>,
    graph: Arc<G>,
    source: Option<G::Node>,
    gain: Option<G::Node>,
    song_path: Option<String>,
    volume: f32,
    tick_interval: Duration,
    gain_connected: bool,
}

impl<E: MediaElement, G: AudioGraph> PlayerBuilder<E, G> {
    /// Create a builder over a media element and its audio graph
    pub fn new(element: Arc<E>, graph: Arc<G>) -> Self {
        Self {
            element,
            graph,
            source: None,
            gain: None,
            song_path: None,
            volume: 1.0,
            tick_interval: DEFAULT_TICK_INTERVAL,
            gain_connected: false,
        }
    }

    /// Activate the graph: derive the source node from the element and
    /// create the gain stage. Idempotent once it has succeeded.
    ///
    /// Fails with [`PlayerError::Initialization`] when the platform refuses
    /// to create the context (commonly: no prior user interaction).
    pub fn start(&mut self) -> Result<()> {
        if self.source.is_some() {
            return Ok(());
        }
        let source = self.graph.create_media_source()?;
        let gain = self.graph.create_gain();
        debug!("audio graph activated");
        self.source = Some(source);
        self.gain = Some(gain);
        Ok(())
    }

    fn source_node(&self) -> Result<&G::Node> {
        self.source.as_ref().ok_or(PlayerError::NotStarted)
    }

    /// Create an analyser fed by the source node and return it for external
    /// composition. Not retained by the player after `build()`.
    pub fn add_analyser(&self) -> Result<G::Node> {
        let source = self.source_node()?;
        let analyser = self.graph.create_analyser();
        self.graph.connect(source, &analyser);
        Ok(analyser)
    }

    /// Create a stereo panner fed by the source node and return it for
    /// external composition. Not retained by the player after `build()`.
    pub fn add_stereo_panner_node(&self) -> Result<G::Node> {
        let source = self.source_node()?;
        let panner = self.graph.create_stereo_panner();
        self.graph.connect(source, &panner);
        Ok(panner)
    }

    /// Create a wave shaper fed by the source node and return it for
    /// external composition. Not retained by the player after `build()`.
    pub fn add_wave_shaper_node(&self) -> Result<G::Node> {
        let source = self.source_node()?;
        let shaper = self.graph.create_wave_shaper();
        self.graph.connect(source, &shaper);
        Ok(shaper)
    }

    /// Connect a caller-supplied node to the source node's output.
    /// No compatibility validation is performed at this layer.
    pub fn connect_custom_node(&self, node: &G::Node) -> Result<()> {
        self.graph.connect(self.source_node()?, node);
        Ok(())
    }

    /// Stage a song path to preload; does not touch the element
    pub fn add_song_path(&mut self, path: &str) {
        self.song_path = Some(path.to_owned());
    }

    /// Stage the initial volume, clamped to [0, 1]
    pub fn stage_volume(&mut self, level: f32) {
        self.volume = level.clamp(0.0, 1.0);
    }

    /// Override the tick period used by the player's subscription loops
    pub fn tick_interval(&mut self, period: Duration) {
        self.tick_interval = period;
    }

    /// Connect source → gain ahead of other taps, for callers who want the
    /// gain stage applied upstream of effects. `build()` will then not
    /// connect it again.
    pub fn connect_gain(&mut self) -> Result<()> {
        let (Some(source), Some(gain)) = (self.source.as_ref(), self.gain.as_ref()) else {
            return Err(PlayerError::NotStarted);
        };
        self.graph.connect(source, gain);
        self.gain_connected = true;
        Ok(())
    }

    /// Finish the build: connect the gain stage if not already connected,
    /// set the element's preload hint to metadata-only, and hand everything
    /// to a new [`Player`].
    pub fn build(mut self) -> Result<Player<E, G>> {
        let source = self.source.take().ok_or(PlayerError::NotStarted)?;
        let gain = self.gain.take().ok_or(PlayerError::NotStarted)?;

        if !self.gain_connected {
            self.graph.connect(&source, &gain);
        }
        self.element.set_preload(PreloadHint::Metadata);

        Ok(Player::new(
            self.element,
            self.graph,
            source,
            gain,
            self.volume,
            self.song_path,
            self.tick_interval,
        ))
    }
}
