//! In-memory element and graph fakes for unit tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::element::{LoadEvent, MediaElement, PreloadHint};
use crate::error::{PlayerError, Result};
use crate::graph::{AudioGraph, ContextState};

/// Fake media element recording every interaction
pub(crate) struct FakeElement {
    src: Mutex<Option<String>>,
    time: Mutex<f64>,
    duration: Mutex<f64>,
    paused: AtomicBool,
    ended: AtomicBool,
    preload: Mutex<PreloadHint>,
    play_error: Mutex<Option<String>>,
    play_delay: Mutex<Option<Duration>>,
    staged_load_outcome: Mutex<Option<LoadEvent>>,
    play_calls: AtomicUsize,
    pause_calls: AtomicUsize,
    load_tx: broadcast::Sender<LoadEvent>,
}

impl FakeElement {
    pub(crate) fn new(duration: f64) -> Arc<Self> {
        let (load_tx, _) = broadcast::channel(8);
        Arc::new(Self {
            src: Mutex::new(None),
            time: Mutex::new(0.0),
            duration: Mutex::new(duration),
            paused: AtomicBool::new(true),
            ended: AtomicBool::new(false),
            preload: Mutex::new(PreloadHint::Auto),
            play_error: Mutex::new(None),
            play_delay: Mutex::new(None),
            staged_load_outcome: Mutex::new(None),
            play_calls: AtomicUsize::new(0),
            pause_calls: AtomicUsize::new(0),
            load_tx,
        })
    }

    pub(crate) fn set_time(&self, seconds: f64) {
        *self.time.lock().unwrap() = seconds;
    }

    /// Make every play attempt fail with the given reason
    pub(crate) fn fail_playback(&self, reason: &str) {
        *self.play_error.lock().unwrap() = Some(reason.to_owned());
    }

    /// Delay play resolution, for overlapping-call tests
    pub(crate) fn delay_play(&self, delay: Duration) {
        *self.play_delay.lock().unwrap() = Some(delay);
    }

    /// Stage the load signal emitted when the next source is assigned
    pub(crate) fn load_outcome(&self, event: LoadEvent) {
        *self.staged_load_outcome.lock().unwrap() = Some(event);
    }

    pub(crate) fn play_calls(&self) -> usize {
        self.play_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn pause_calls(&self) -> usize {
        self.pause_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn preload(&self) -> PreloadHint {
        *self.preload.lock().unwrap()
    }
}

#[async_trait]
impl MediaElement for FakeElement {
    fn source(&self) -> Option<String> {
        self.src.lock().unwrap().clone()
    }

    fn set_source(&self, path: &str) {
        *self.src.lock().unwrap() = Some(path.to_owned());
        if let Some(event) = self.staged_load_outcome.lock().unwrap().clone() {
            let _ = self.load_tx.send(event);
        }
    }

    fn current_time(&self) -> f64 {
        *self.time.lock().unwrap()
    }

    fn set_current_time(&self, seconds: f64) {
        *self.time.lock().unwrap() = seconds;
    }

    fn duration(&self) -> f64 {
        *self.duration.lock().unwrap()
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn has_ended(&self) -> bool {
        self.ended.load(Ordering::SeqCst)
    }

    fn set_preload(&self, hint: PreloadHint) {
        *self.preload.lock().unwrap() = hint;
    }

    async fn play(&self) -> Result<()> {
        self.play_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.play_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(reason) = self.play_error.lock().unwrap().clone() {
            return Err(PlayerError::Playback(reason));
        }

        self.paused.store(false, Ordering::SeqCst);
        self.ended.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&self) {
        self.pause_calls.fetch_add(1, Ordering::SeqCst);
        self.paused.store(true, Ordering::SeqCst);
    }

    fn load_events(&self) -> broadcast::Receiver<LoadEvent> {
        self.load_tx.subscribe()
    }
}

/// Node role inside the fake graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    MediaSource,
    Gain,
    Analyser,
    StereoPanner,
    WaveShaper,
}

struct NodeRecord {
    kind: NodeKind,
    gain: f32,
}

/// Fake audio graph with numbered node handles
pub(crate) struct FakeGraph {
    state: Mutex<ContextState>,
    nodes: Mutex<Vec<NodeRecord>>,
    connections: Mutex<Vec<(usize, usize)>>,
    media_source_fails: AtomicBool,
}

impl FakeGraph {
    pub(crate) fn new(state: ContextState) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state),
            nodes: Mutex::new(Vec::new()),
            connections: Mutex::new(Vec::new()),
            media_source_fails: AtomicBool::new(false),
        })
    }

    pub(crate) fn fail_media_source(&self) {
        self.media_source_fails.store(true, Ordering::SeqCst);
    }

    fn push_node(&self, kind: NodeKind) -> usize {
        let mut nodes = self.nodes.lock().unwrap();
        nodes.push(NodeRecord { kind, gain: 1.0 });
        nodes.len() - 1
    }

    fn player_gain_node(&self) -> usize {
        self.nodes
            .lock()
            .unwrap()
            .iter()
            .position(|node| node.kind == NodeKind::Gain)
            .expect("no gain node created")
    }

    /// Live gain of the player's gain stage
    pub(crate) fn player_gain(&self) -> f32 {
        let id = self.player_gain_node();
        self.nodes.lock().unwrap()[id].gain
    }

    /// Drive the gain stage externally, bypassing the player
    pub(crate) fn set_player_gain(&self, value: f32) {
        let id = self.player_gain_node();
        self.nodes.lock().unwrap()[id].gain = value;
    }

    /// Number of connections from nodes of kind `from` into nodes of kind `to`
    pub(crate) fn connections_between(&self, from: NodeKind, to: NodeKind) -> usize {
        let nodes = self.nodes.lock().unwrap();
        self.connections
            .lock()
            .unwrap()
            .iter()
            .filter(|(a, b)| nodes[*a].kind == from && nodes[*b].kind == to)
            .count()
    }
}

impl AudioGraph for FakeGraph {
    type Node = usize;

    fn state(&self) -> ContextState {
        *self.state.lock().unwrap()
    }

    fn create_media_source(&self) -> Result<Self::Node> {
        if self.media_source_fails.load(Ordering::SeqCst) {
            return Err(PlayerError::Initialization(
                "no prior user interaction".to_owned(),
            ));
        }
        Ok(self.push_node(NodeKind::MediaSource))
    }

    fn create_gain(&self) -> Self::Node {
        self.push_node(NodeKind::Gain)
    }

    fn create_analyser(&self) -> Self::Node {
        self.push_node(NodeKind::Analyser)
    }

    fn create_stereo_panner(&self) -> Self::Node {
        self.push_node(NodeKind::StereoPanner)
    }

    fn create_wave_shaper(&self) -> Self::Node {
        self.push_node(NodeKind::WaveShaper)
    }

    fn connect(&self, from: &Self::Node, to: &Self::Node) {
        self.connections.lock().unwrap().push((*from, *to));
    }

    fn gain_value(&self, gain: &Self::Node) -> f32 {
        self.nodes.lock().unwrap()[*gain].gain
    }

    fn set_gain_value(&self, gain: &Self::Node, value: f32) {
        self.nodes.lock().unwrap()[*gain].gain = value;
    }
}
