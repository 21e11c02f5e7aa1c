//! Player - runtime playback control and state
//!
//! Wraps one media element, one audio graph, one source node, and one gain
//! node. Exposes transport controls in safe/unsafe families, volume control
//! with mute save/restore, song loading, time formatting, and the tick
//! subscription entry points.
//!
//! Transport operations come in three flavors sharing the same success-path
//! effects:
//! - fire-and-forget (`play`, `play_toggle`, `seek`, `new_song`): spawn the
//!   native attempt and return immediately; failure only shows up as
//!   `is_playing()` turning false (and a warning log)
//! - async (`play_async`, `play_toggle_async`, `seek_async`): await the
//!   native outcome without checking context readiness first
//! - safe async (`try_play_async`, `try_play_toggle_async`,
//!   `try_seek_async`, `try_new_song_async`): reject with
//!   [`PlayerError::NotReady`] while the context is suspended or closed,
//!   before touching the element

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::clock::format_clock;
use crate::element::{LoadEvent, MediaElement};
use crate::error::{PlayerError, Result};
use crate::graph::AudioGraph;
use crate::tick::{self, Channel, Listener, TickSubscription};
use crate::volume::Volume;

/// Mutable player state shared with spawned play attempts and tick drivers
struct PlayerState {
    current_song_path: Option<String>,
    volume: Volume,
    is_playing: bool,
    time: f64,
    /// Generation counter for play attempts. Every attempt (and every
    /// superseding pause or song change) bumps it; an attempt may only
    /// write `is_playing` while its generation is still current, so a
    /// late-resolving attempt cannot stomp state set by a later call.
    play_epoch: u64,
}

/// Stateful music player over a media element and audio graph
///
/// Built by [`PlayerBuilder`](crate::PlayerBuilder); the element, graph, and
/// nodes are owned externally and handed over at construction. All methods
/// take `&self`; internal state lives behind a lock so tick drivers and
/// spawned play attempts observe consistent values.
pub struct Player<E: MediaElement, G: AudioGraph> {
    element: Arc<E>,
    graph: Arc<G>,
    // Retained so the graph wiring outlives the builder; the player never
    // reconnects it.
    _source: G::Node,
    gain: G::Node,
    state: Arc<Mutex<PlayerState>>,
    tick_interval: Duration,
    current_time_ticks: Arc<Channel<f64>>,
    formatted_time_ticks: Arc<Channel<String>>,
    formatted_duration_ticks: Arc<Channel<String>>,
}

impl<E: MediaElement, G: AudioGraph> Player<E, G> {
    pub(crate) fn new(
        element: Arc<E>,
        graph: Arc<G>,
        source: G::Node,
        gain: G::Node,
        volume: f32,
        current_song_path: Option<String>,
        tick_interval: Duration,
    ) -> Self {
        let volume = Volume::new(volume);
        graph.set_gain_value(&gain, volume.level());

        Self {
            element,
            graph,
            _source: source,
            gain,
            state: Arc::new(Mutex::new(PlayerState {
                current_song_path,
                volume,
                is_playing: false,
                time: 0.0,
                play_epoch: 0,
            })),
            tick_interval,
            current_time_ticks: Channel::new(),
            formatted_time_ticks: Channel::new(),
            formatted_duration_ticks: Channel::new(),
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, PlayerState> {
        self.state.lock().expect("player state lock poisoned")
    }

    // ===== Volume Control =====

    /// Toggle mute: restore the cached level when the live gain is zero,
    /// otherwise save the live gain and zero it. Toggling twice with no
    /// intervening `change_volume` restores the original level.
    pub fn mute_toggle(&self) {
        let live = self.graph.gain_value(&self.gain);
        let mut state = self.lock_state();
        if live == 0.0 {
            let restored = state.volume.unmute();
            self.graph.set_gain_value(&self.gain, restored);
        } else {
            state.volume.mute_from(live);
            self.graph.set_gain_value(&self.gain, 0.0);
        }
    }

    /// Save the live gain and zero it
    pub fn mute(&self) {
        let live = self.graph.gain_value(&self.gain);
        let mut state = self.lock_state();
        state.volume.mute_from(live);
        self.graph.set_gain_value(&self.gain, 0.0);
    }

    /// Restore the gain saved by the last mute
    pub fn unmute(&self) {
        let mut state = self.lock_state();
        let restored = state.volume.unmute();
        self.graph.set_gain_value(&self.gain, restored);
    }

    /// Set the gain directly. Leaves the mute cache untouched; the caller
    /// is responsible for keeping `level` in [0, 1].
    pub fn change_volume(&self, level: f32) {
        self.lock_state().volume.set(level);
        self.graph.set_gain_value(&self.gain, level);
    }

    /// Current volume level as last observed
    pub fn volume(&self) -> f32 {
        self.lock_state().volume.level()
    }

    // ===== Transport Control =====

    /// Fire-and-forget play. No-op when already marked playing; otherwise
    /// spawns the native attempt. Must be called within a tokio runtime.
    pub fn play(&self) {
        if self.lock_state().is_playing {
            return;
        }
        self.spawn_play_attempt();
    }

    /// Await the native play outcome. Resolves immediately as a no-op when
    /// already marked playing, without issuing a competing native attempt.
    pub async fn play_async(&self) -> Result<()> {
        if self.lock_state().is_playing {
            return Ok(());
        }
        self.drive_play().await
    }

    /// Safe play: rejects with [`PlayerError::NotReady`] while the context
    /// is suspended or closed, without attempting playback.
    pub async fn try_play_async(&self) -> Result<()> {
        self.ensure_running()?;
        if self.lock_state().is_playing {
            return Ok(());
        }
        self.drive_play().await
    }

    /// Pause the element and mark not playing. Designed to succeed even
    /// when the graph is unusable: pausing is a logical no-op when nothing
    /// is playing.
    pub fn pause(&self) {
        self.element.pause();
        let mut state = self.lock_state();
        state.play_epoch += 1;
        state.is_playing = false;
    }

    /// Fire-and-forget toggle: play when the element is paused, pause
    /// otherwise. Must be called within a tokio runtime.
    pub fn play_toggle(&self) {
        if self.element.is_paused() {
            self.spawn_play_attempt();
        } else {
            self.pause();
        }
    }

    /// Toggle awaiting the native outcome when it plays
    pub async fn play_toggle_async(&self) -> Result<()> {
        if self.element.is_paused() {
            self.drive_play().await
        } else {
            self.pause();
            Ok(())
        }
    }

    /// Safe toggle: rejects up front while the context is suspended/closed
    pub async fn try_play_toggle_async(&self) -> Result<()> {
        self.ensure_running()?;
        self.play_toggle_async().await
    }

    /// Fire-and-forget seek: move the position and attempt to play.
    /// Must be called within a tokio runtime.
    pub fn seek(&self, seconds: f64) {
        self.element.set_current_time(seconds);
        self.spawn_play_attempt();
    }

    /// Seek awaiting the native play outcome
    pub async fn seek_async(&self, seconds: f64) -> Result<()> {
        self.element.set_current_time(seconds);
        self.drive_play().await
    }

    /// Safe seek: rejects with [`PlayerError::NotReady`] while the context
    /// is suspended or closed, without moving the position.
    pub async fn try_seek_async(&self, seconds: f64) -> Result<()> {
        if !self.graph.state().is_running() {
            let mut state = self.lock_state();
            state.play_epoch += 1;
            state.is_playing = false;
            return Err(PlayerError::NotReady);
        }
        self.element.set_current_time(seconds);
        self.drive_play().await
    }

    // ===== Song Loading =====

    /// Assign a new source with no feedback on whether it loads
    pub fn new_song(&self, path: &str) {
        self.element.set_source(path);
        self.lock_state().current_song_path = Some(path.to_owned());
    }

    /// Assign a new source and await the element's first load signal:
    /// resolves on `CanPlay`, rejects on error/abort/stall. Loads metadata
    /// only; call [`try_play_async`](Self::try_play_async) afterwards to
    /// start playback.
    pub async fn try_new_song_async(&self, path: &str) -> Result<()> {
        // Subscribe before assigning the source so the first signal for the
        // new resource cannot be missed.
        let mut signals = self.element.load_events();
        self.element.set_source(path);
        {
            let mut state = self.lock_state();
            state.current_song_path = Some(path.to_owned());
            state.play_epoch += 1;
            state.is_playing = false;
        }

        loop {
            match signals.recv().await {
                Ok(LoadEvent::CanPlay) => {
                    debug!(path, "song ready");
                    return Ok(());
                }
                Ok(LoadEvent::Error(reason)) => {
                    warn!(path, %reason, "song failed to load");
                    return Err(PlayerError::Load {
                        path: path.to_owned(),
                        reason,
                    });
                }
                Ok(LoadEvent::Aborted) => {
                    return Err(PlayerError::Load {
                        path: path.to_owned(),
                        reason: "load aborted".to_owned(),
                    });
                }
                Ok(LoadEvent::Stalled) => {
                    return Err(PlayerError::Load {
                        path: path.to_owned(),
                        reason: "load stalled".to_owned(),
                    });
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(PlayerError::Load {
                        path: path.to_owned(),
                        reason: "element no longer reports load signals".to_owned(),
                    });
                }
            }
        }
    }

    // ===== Time & Formatting =====

    /// Element duration as a clock string, `"0:00"` while unavailable
    pub fn get_formatted_duration(&self) -> String {
        format_clock(self.element.duration())
    }

    /// Element position as a clock string, `"0:00"` while unavailable
    pub fn get_formatted_current_time(&self) -> String {
        format_clock(self.element.current_time())
    }

    /// Register for raw current-time ticks. The callback fires once
    /// immediately, then once per tick period while registered.
    /// Must be called within a tokio runtime.
    pub fn subscribe_to_time_tick(
        &self,
        callback: impl Fn(&f64) + Send + Sync + 'static,
    ) -> TickSubscription<f64> {
        let sampler = self.time_sampler();
        self.subscribe(&self.current_time_ticks, callback, sampler)
    }

    /// Register for formatted current-time ticks
    pub fn subscribe_to_formatted_current_time_tick(
        &self,
        callback: impl Fn(&String) + Send + Sync + 'static,
    ) -> TickSubscription<String> {
        let sampler = self.formatted_time_sampler();
        self.subscribe(&self.formatted_time_ticks, callback, sampler)
    }

    /// Register for formatted duration ticks
    pub fn subscribe_to_formatted_duration_time(
        &self,
        callback: impl Fn(&String) + Send + Sync + 'static,
    ) -> TickSubscription<String> {
        let sampler = self.formatted_duration_sampler();
        self.subscribe(&self.formatted_duration_ticks, callback, sampler)
    }

    // ===== State Queries =====

    /// Last known playback intent
    pub fn is_playing(&self) -> bool {
        self.lock_state().is_playing
    }

    /// Path last assigned through a load operation or staged on the builder
    pub fn current_song_path(&self) -> Option<String> {
        self.lock_state().current_song_path.clone()
    }

    /// Most recently sampled playback position. Only advances while at
    /// least one time-tick subscriber is active.
    pub fn current_time_hint(&self) -> f64 {
        self.lock_state().time
    }

    // ===== Internal =====

    fn ensure_running(&self) -> Result<()> {
        if self.graph.state().is_running() {
            Ok(())
        } else {
            Err(PlayerError::NotReady)
        }
    }

    fn begin_attempt(&self) -> u64 {
        let mut state = self.lock_state();
        state.play_epoch += 1;
        state.play_epoch
    }

    /// Apply an attempt's outcome unless a later call superseded it
    fn finish_attempt(&self, epoch: u64, playing: bool) {
        let mut state = self.lock_state();
        if state.play_epoch == epoch {
            state.is_playing = playing;
        }
    }

    async fn drive_play(&self) -> Result<()> {
        let epoch = self.begin_attempt();
        match self.element.play().await {
            Ok(()) => {
                self.finish_attempt(epoch, true);
                Ok(())
            }
            Err(err) => {
                self.finish_attempt(epoch, false);
                Err(err)
            }
        }
    }

    fn spawn_play_attempt(&self) {
        let element = Arc::clone(&self.element);
        let state = Arc::clone(&self.state);
        let epoch = self.begin_attempt();

        tokio::spawn(async move {
            let outcome = element.play().await;
            let mut state = state.lock().expect("player state lock poisoned");
            if state.play_epoch != epoch {
                return;
            }
            match outcome {
                Ok(()) => state.is_playing = true,
                Err(err) => {
                    state.is_playing = false;
                    warn!(error = %err, "playback attempt failed");
                }
            }
        });
    }

    fn subscribe<T: Send + 'static>(
        &self,
        channel: &Arc<Channel<T>>,
        callback: impl Fn(&T) + Send + Sync + 'static,
        mut sampler: impl FnMut() -> T + Send + 'static,
    ) -> TickSubscription<T> {
        let listener: Listener<T> = Arc::new(callback);

        // Immediate tick so the subscriber gets a value without waiting a
        // full period.
        listener(&sampler());

        let (subscription, start_driver) = channel.register(listener);
        if start_driver {
            tick::spawn_driver(Arc::clone(channel), self.tick_interval, sampler);
        }
        subscription
    }

    fn time_sampler(&self) -> impl FnMut() -> f64 + Send + 'static {
        let element = Arc::clone(&self.element);
        let graph = Arc::clone(&self.graph);
        let gain = self.gain.clone();
        let state = Arc::clone(&self.state);
        move || {
            reconcile(&*element, &*graph, &gain, &state);
            let now = element.current_time();
            state.lock().expect("player state lock poisoned").time = now;
            now
        }
    }

    fn formatted_time_sampler(&self) -> impl FnMut() -> String + Send + 'static {
        let element = Arc::clone(&self.element);
        let graph = Arc::clone(&self.graph);
        let gain = self.gain.clone();
        let state = Arc::clone(&self.state);
        move || {
            reconcile(&*element, &*graph, &gain, &state);
            let now = element.current_time();
            state.lock().expect("player state lock poisoned").time = now;
            format_clock(now)
        }
    }

    fn formatted_duration_sampler(&self) -> impl FnMut() -> String + Send + 'static {
        let element = Arc::clone(&self.element);
        let graph = Arc::clone(&self.graph);
        let gain = self.gain.clone();
        let state = Arc::clone(&self.state);
        move || {
            reconcile(&*element, &*graph, &gain, &state);
            format_clock(element.duration())
        }
    }
}

/// Per-tick state reconciliation: pick up playback ending outside our
/// control and externally-driven gain changes.
fn reconcile<E: MediaElement, G: AudioGraph>(
    element: &E,
    graph: &G,
    gain: &G::Node,
    state: &Mutex<PlayerState>,
) {
    let mut state = state.lock().expect("player state lock poisoned");
    if element.has_ended() || element.is_paused() {
        state.is_playing = false;
    }
    state.volume.set(graph.gain_value(gain));
}
