//! Publish/subscribe hub for periodic tick emissions
//!
//! Three independent channels fan sampled values out to UI listeners. Each
//! channel is driven by a cooperative task spawned on first subscription;
//! the task samples once per tick period and exits as soon as the listener
//! list becomes empty, so an idle player schedules nothing. Re-subscribing
//! after the driver has exited starts a fresh one.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Default tick period, roughly one display refresh at 60 Hz
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Listener callback for a tick channel
pub(crate) type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle to a registered tick listener
///
/// Call [`unsubscribe`](TickSubscription::unsubscribe) to detach the
/// listener; when the last listener on a channel detaches, the channel's
/// driver stops at its next tick. Dropping the handle without calling
/// `unsubscribe` leaves the listener registered.
pub struct TickSubscription<T> {
    channel: Arc<Channel<T>>,
    id: u64,
}

impl<T: Send + 'static> TickSubscription<T> {
    /// Detach this listener from its channel
    pub fn unsubscribe(self) {
        self.channel.remove(self.id);
    }
}

/// One named tick channel: a listener list plus a driver flag
pub(crate) struct Channel<T> {
    state: Mutex<ChannelState<T>>,
}

struct ChannelState<T> {
    listeners: Vec<(u64, Listener<T>)>,
    next_id: u64,
    driving: bool,
}

impl<T: Send + 'static> Channel<T> {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ChannelState {
                listeners: Vec::new(),
                next_id: 0,
                driving: false,
            }),
        })
    }

    /// Register a listener
    ///
    /// Returns the subscription handle and whether the caller must spawn a
    /// driver for this channel (no driver was running). The driving flag is
    /// claimed under the listener lock so concurrent subscribers spawn at
    /// most one driver.
    pub(crate) fn register(self: &Arc<Self>, listener: Listener<T>) -> (TickSubscription<T>, bool) {
        let mut state = self.state.lock().expect("tick channel lock poisoned");
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.push((id, listener));

        let start_driver = !state.driving;
        if start_driver {
            state.driving = true;
        }

        (
            TickSubscription {
                channel: Arc::clone(self),
                id,
            },
            start_driver,
        )
    }

    fn remove(&self, id: u64) {
        let mut state = self.state.lock().expect("tick channel lock poisoned");
        state.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    /// Emit a value to every listener
    ///
    /// Returns `false` when no listeners remain; the driving flag is cleared
    /// under the same lock, so a re-subscribe racing with driver shutdown
    /// starts a fresh driver rather than being orphaned. Listeners are
    /// invoked outside the lock so a callback may subscribe or unsubscribe.
    pub(crate) fn emit(&self, value: &T) -> bool {
        let listeners: Vec<Listener<T>> = {
            let mut state = self.state.lock().expect("tick channel lock poisoned");
            if state.listeners.is_empty() {
                state.driving = false;
                return false;
            }
            state.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };

        for listener in listeners {
            listener(value);
        }
        true
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.state.lock().unwrap().listeners.len()
    }

    #[cfg(test)]
    fn is_driving(&self) -> bool {
        self.state.lock().unwrap().driving
    }
}

/// Spawn the driver task for a channel
///
/// Samples once per `period` and emits until the channel reports an empty
/// listener list. The subscriber that triggered the spawn already received
/// its initial value synchronously, so the interval's immediate first fire
/// is consumed before the loop.
pub(crate) fn spawn_driver<T: Send + 'static>(
    channel: Arc<Channel<T>>,
    period: Duration,
    mut sample: impl FnMut() -> T + Send + 'static,
) {
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval(period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticks.tick().await;

        loop {
            ticks.tick().await;
            let value = sample();
            if !channel.emit(&value) {
                debug!("tick channel empty, driver stopping");
                break;
            }
        }
    });
}
