//! Muse Player - Playback Control
//!
//! Platform-agnostic playback control over a caller-supplied media element
//! and audio graph.
//!
//! This crate provides:
//! - A builder that activates the audio graph, wires optional analysis and
//!   effects taps, and hands off to a player
//! - Transport control in paired safe/unsafe families (play, pause, toggle,
//!   seek)
//! - Volume control with mute save/restore
//! - Song loading with a one-shot ready/failed outcome
//! - Clock-style time formatting for UI display
//! - Per-tick publish/subscribe channels for current time and duration,
//!   driven only while at least one listener is registered
//!
//! # Architecture
//!
//! `muse-playback` is completely platform-agnostic:
//! - No dependency on the browser media element
//! - No dependency on any particular audio backend
//! - No UI or persistence concerns
//!
//! The media element and the audio-processing graph are provided via the
//! [`MediaElement`] and [`AudioGraph`] traits; the crate orchestrates
//! exactly one element and one gain stage through them.
//!
//! # Example
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use muse_playback::{
//!     AudioGraph, ContextState, LoadEvent, MediaElement, PlayerBuilder, PreloadHint, Result,
//! };
//! use std::sync::Arc;
//! use tokio::sync::broadcast;
//!
//! // Implement the element and graph for your platform
//! struct MyElement {
//!     load_tx: broadcast::Sender<LoadEvent>,
//!     // ... platform handle
//! }
//!
//! #[async_trait]
//! impl MediaElement for MyElement {
//!     fn source(&self) -> Option<String> { None }
//!     fn set_source(&self, _path: &str) {}
//!     fn current_time(&self) -> f64 { 0.0 }
//!     fn set_current_time(&self, _seconds: f64) {}
//!     fn duration(&self) -> f64 { f64::NAN }
//!     fn is_paused(&self) -> bool { true }
//!     fn has_ended(&self) -> bool { false }
//!     fn set_preload(&self, _hint: PreloadHint) {}
//!     async fn play(&self) -> Result<()> { Ok(()) }
//!     fn pause(&self) {}
//!     fn load_events(&self) -> broadcast::Receiver<LoadEvent> {
//!         self.load_tx.subscribe()
//!     }
//! }
//!
//! struct MyGraph {
//!     // ... platform context
//! }
//!
//! impl AudioGraph for MyGraph {
//!     type Node = u32;
//!     fn state(&self) -> ContextState { ContextState::Running }
//!     fn create_media_source(&self) -> Result<Self::Node> { Ok(0) }
//!     fn create_gain(&self) -> Self::Node { 1 }
//!     fn create_analyser(&self) -> Self::Node { 2 }
//!     fn create_stereo_panner(&self) -> Self::Node { 3 }
//!     fn create_wave_shaper(&self) -> Self::Node { 4 }
//!     fn connect(&self, _from: &Self::Node, _to: &Self::Node) {}
//!     fn gain_value(&self, _gain: &Self::Node) -> f32 { 1.0 }
//!     fn set_gain_value(&self, _gain: &Self::Node, _value: f32) {}
//! }
//!
//! # async fn demo() -> Result<()> {
//! let (load_tx, _) = broadcast::channel(8);
//! let element = Arc::new(MyElement { load_tx });
//! let graph = Arc::new(MyGraph {});
//!
//! let mut builder = PlayerBuilder::new(element, graph);
//! builder.start()?;
//! let _analyser = builder.add_analyser()?;
//! builder.add_song_path("/music/intro.ogg");
//! let player = builder.build()?;
//!
//! // Control playback
//! player.try_play_async().await?;
//! player.change_volume(0.8);
//!
//! // Bind the UI to time ticks
//! let subscription = player.subscribe_to_formatted_current_time_tick(|clock| {
//!     println!("{clock}");
//! });
//! // ... later
//! subscription.unsubscribe();
//! player.pause();
//! # Ok(())
//! # }
//! ```

mod builder;
mod clock;
mod element;
mod error;
mod graph;
mod player;
mod tick;
mod volume;

#[cfg(test)]
mod test_support;

// Public exports
pub use builder::PlayerBuilder;
pub use clock::format_clock;
pub use element::{LoadEvent, MediaElement, PreloadHint};
pub use error::{PlayerError, Result};
pub use graph::{AudioGraph, ContextState};
pub use player::Player;
pub use tick::{TickSubscription, DEFAULT_TICK_INTERVAL};
