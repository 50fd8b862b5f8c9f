//! Key hold stream composer
//!
//! ```text
//! RawKeyEvent ──► composer task ──► EventStream
//!                   ▲      │ keydown: spawn hold task
//!                   │      │ keyup:   cancel hold task
//!      HoldTick ────┴── hold task per key (interval)
//! ```
//!
//! Each held key runs its own interval task; all of them report back to the
//! composer, which owns the held-keys set and publishes every event. A hold
//! task ends only when its matching key-up cancels it (or on shutdown).

use super::hold_state::{normalize_key, KeyHoldState};
use crate::config::CockpitSettings;
use crate::error::CockpitError;
use crate::event::{InputEvent, KeyInput};
use crate::stream::{EventStream, Subscription};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// A native keyboard occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawKeyEvent {
    /// `repeat` is set for OS auto-repeat
    Down { key: String, repeat: bool },
    Up { key: String },
}

#[derive(Debug)]
struct HoldTick {
    key: String,
    generation: u64,
    dt: f64,
}

/// Ticks `held` for one key until cancelled.
async fn hold_sequence(
    key: String,
    generation: u64,
    period: Duration,
    ticks: mpsc::Sender<HoldTick>,
    cancel: CancellationToken,
) {
    let mut timer = tokio::time::interval_at(Instant::now() + period, period);
    let mut last_tick = Instant::now();
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = timer.tick() => {
                let now = Instant::now();
                let dt = now.duration_since(last_tick).as_secs_f64();
                last_tick = now;
                let tick = HoldTick { key: key.clone(), generation, dt };
                if ticks.send(tick).await.is_err() {
                    break;
                }
            }
        }
    }
    debug!("Hold sequence for '{}' ended", key);
}

pub(crate) struct KeyComposer {
    state: KeyHoldState,
    hold_tasks: HashMap<String, CancellationToken>,
    tick_sender: mpsc::Sender<HoldTick>,
    period: Duration,
    stream: EventStream,
    shutdown: CancellationToken,
}

impl KeyComposer {
    fn publish(&self, input: KeyInput) {
        self.stream.publish(InputEvent::Key(input));
    }

    fn handle_raw(&mut self, raw: RawKeyEvent) {
        match raw {
            RawKeyEvent::Down { repeat: true, key } => {
                debug!("Ignoring auto-repeat for '{}'", key);
            }
            RawKeyEvent::Down { key, repeat: false } => {
                let key = normalize_key(&key);
                let Some((generation, press)) = self.state.press(&key) else {
                    return;
                };
                debug!("Starting hold sequence for '{}'", key);
                let cancel = self.shutdown.child_token();
                self.hold_tasks.insert(key.clone(), cancel.clone());
                tokio::spawn(hold_sequence(
                    key,
                    generation,
                    self.period,
                    self.tick_sender.clone(),
                    cancel,
                ));
                self.publish(press);
            }
            RawKeyEvent::Up { key } => {
                let key = normalize_key(&key);
                if let Some(cancel) = self.hold_tasks.remove(&key) {
                    cancel.cancel();
                }
                match self.state.release(&key) {
                    Some(release) => {
                        debug!("Hold sequence for '{}' released", key);
                        self.publish(release);
                    }
                    None => debug!("Key-up for '{}' without a press", key),
                }
            }
        }
    }

    fn handle_tick(&mut self, tick: HoldTick) {
        if let Some(held) = self.state.tick(&tick.key, tick.generation, tick.dt) {
            self.publish(held);
        }
    }

    async fn run(
        mut self,
        mut raw_events: mpsc::Receiver<RawKeyEvent>,
        mut ticks: mpsc::Receiver<HoldTick>,
    ) {
        info!("Key composer loop started ({}ms hold interval)", self.period.as_millis());
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown signal received for key composer");
                    break;
                }
                raw = raw_events.recv() => match raw {
                    Some(raw) => self.handle_raw(raw),
                    None => {
                        info!("All keyboard handles dropped, stopping composer");
                        break;
                    }
                },
                Some(tick) = ticks.recv() => self.handle_tick(tick),
            }
        }
        for (_, cancel) in self.hold_tasks.drain() {
            cancel.cancel();
        }
    }
}

/// Public handle for the key composer task
///
/// Feed it native key-down/key-up occurrences; subscribers receive one
/// `press`, a `held` every `key_hold_interval_ms`, and one `release` per key.
///
/// # Performance Impact
///
/// Every held key owns a tokio task that wakes once per hold interval.
///
/// # Examples
///
/// ```rust
/// use cockpit::{CockpitSettings, EventStream, InputEvent, KeyPhase, KeyboardHandle};
///
/// # async fn demo() -> Result<(), cockpit::CockpitError> {
/// let mut keyboard = KeyboardHandle::spawn(&CockpitSettings::default(), EventStream::default());
/// let mut events = keyboard.subscribe();
///
/// keyboard.key_down("Space").await?;
/// if let Some(InputEvent::Key(key)) = events.recv().await {
///     assert_eq!(key.key, "space");
///     assert_eq!(key.event, KeyPhase::Press);
/// }
/// keyboard.key_up("Space").await?;
/// keyboard.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct KeyboardHandle {
    raw_sender: mpsc::Sender<RawKeyEvent>,
    stream: EventStream,
    shutdown: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
}

impl KeyboardHandle {
    /// Spawns the composer on the current tokio runtime.
    pub fn spawn(settings: &CockpitSettings, stream: EventStream) -> Self {
        info!("Spawning key composer");
        let (raw_sender, raw_receiver) = mpsc::channel(256);
        let (tick_sender, tick_receiver) = mpsc::channel(256);
        let shutdown = CancellationToken::new();

        let composer = KeyComposer {
            state: KeyHoldState::new(),
            hold_tasks: HashMap::new(),
            tick_sender,
            period: Duration::from_millis(settings.key_hold_interval_ms.max(1)),
            stream: stream.clone(),
            shutdown: shutdown.clone(),
        };
        let task_handle = tokio::spawn(composer.run(raw_receiver, tick_receiver));

        Self {
            raw_sender,
            stream,
            shutdown,
            task_handle: Some(task_handle),
        }
    }

    /// Subscribes to the stream the composer publishes into.
    pub fn subscribe(&self) -> Subscription {
        self.stream.subscribe()
    }

    /// Forwards one native occurrence to the composer.
    ///
    /// Fails with [`CockpitError::ChannelError`] once the composer has stopped.
    pub async fn send(&self, event: RawKeyEvent) -> Result<(), CockpitError> {
        self.raw_sender.send(event).await.map_err(|e| {
            CockpitError::ChannelError(format!("Key composer not running: {}", e))
        })
    }

    /// Shorthand for a non-repeat [`RawKeyEvent::Down`].
    pub async fn key_down(&self, key: &str) -> Result<(), CockpitError> {
        self.send(RawKeyEvent::Down {
            key: key.to_string(),
            repeat: false,
        })
        .await
    }

    pub async fn key_up(&self, key: &str) -> Result<(), CockpitError> {
        self.send(RawKeyEvent::Up {
            key: key.to_string(),
        })
        .await
    }

    /// Stops the composer and every hold task.
    pub async fn shutdown(&mut self) -> Result<(), CockpitError> {
        debug!("Sending shutdown signal to key composer");
        self.shutdown.cancel();
        match self.task_handle.take() {
            Some(handle) => handle.await.map_err(|e| {
                error!("Key composer task panicked: {}", e);
                CockpitError::TaskError(format!("Key composer task panicked: {}", e))
            }),
            None => {
                warn!("Key composer already shut down");
                Ok(())
            }
        }
    }
}

impl Drop for KeyboardHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
