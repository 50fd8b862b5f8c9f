//! Gamepad poller with statum state machine
//!
//! ```text
//! Discovering ──(first device seen)──► Polling ──(shutdown)──► done
//!      │
//!      └──(timeout)──► CockpitError::NoDevice
//! ```
//!
//! Polling runs in its own tokio task. Every tick samples the connected
//! device, normalizes it and publishes the tick's events (buttons, dpad,
//! axes) to the event stream. Connect requests and device listings reach the
//! task over a command channel, so tracking state has a single owner.

use super::cockpit::GamepadCockpit;
use super::profile::MappingProfile;
use super::source::{DeviceInfo, GamepadSource};
use crate::config::CockpitSettings;
use crate::error::CockpitError;
use crate::stream::{EventStream, Subscription};
use chrono::Local;
use statum::{machine, state};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[state]
#[derive(Debug, Clone)]
pub enum PollerState {
    Discovering,
    Polling,
}

#[machine]
pub struct GamepadPoller<S: PollerState> {
    cockpit: GamepadCockpit,
    settings: CockpitSettings,
    stream: EventStream,
}

impl<S: PollerState> GamepadPoller<S> {
    /// Settings the poller was created with
    pub fn settings(&self) -> &CockpitSettings {
        &self.settings
    }
}

impl GamepadPoller<Discovering> {
    pub fn create(
        source: Box<dyn GamepadSource>,
        settings: CockpitSettings,
        stream: EventStream,
    ) -> Self {
        debug!("Creating gamepad poller with settings: {:?}", settings);
        Self::new(GamepadCockpit::new(source), settings, stream)
    }

    /// Waits for a first device and connects to it under the default profile.
    pub async fn discover(mut self) -> Result<GamepadPoller<Polling>, CockpitError> {
        let waited_ms = self.settings.discovery_timeout_ms;
        let deadline = Instant::now() + Duration::from_millis(waited_ms);
        let retry = Duration::from_millis(self.settings.discovery_retry_ms.max(1));
        info!("Waiting up to {}ms for a gamepad", waited_ms);

        loop {
            let devices = self.cockpit.devices();
            if let Some(first) = devices.first() {
                info!("Found {} gamepads:", devices.len());
                for device in &devices {
                    info!("  [{}] {}", device.id, device.name);
                }
                let profile = self.settings.default_profile;
                self.cockpit.connect(first.id, profile)?;
                info!("Gamepad poller discovered a device, transitioning to Polling state");
                return Ok(self.transition());
            }

            if Instant::now() >= deadline {
                error!("No gamepad connected after {}ms", waited_ms);
                return Err(CockpitError::NoDevice { waited_ms });
            }
            tokio::time::sleep(retry).await;
        }
    }
}

/// Requests served by the poll task between ticks
#[derive(Debug)]
pub enum PollerCommand {
    Devices(oneshot::Sender<Vec<DeviceInfo>>),
    Connect {
        id: usize,
        profile: MappingProfile,
        reply: oneshot::Sender<Result<(), CockpitError>>,
    },
}

impl GamepadPoller<Polling> {
    /// One poll: sample, normalize, publish. Returns the number of events.
    pub fn tick(&mut self, dt: f64) -> usize {
        let events = self.cockpit.poll(dt);
        let count = events.len();
        if count > 0 {
            debug!("Tick produced {} events (dt {:.3}s)", count, dt);
        }
        self.stream.publish_all(events);
        count
    }

    pub fn handle_command(&mut self, command: PollerCommand) {
        match command {
            PollerCommand::Devices(reply) => {
                if reply.send(self.cockpit.devices()).is_err() {
                    warn!("Device list requester went away");
                }
            }
            PollerCommand::Connect { id, profile, reply } => {
                let result = self.cockpit.connect(id, profile);
                if reply.send(result).is_err() {
                    warn!("Connect requester went away");
                }
            }
        }
    }

    /// Main loop; returns once `shutdown` fires or every handle is gone.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<PollerCommand>,
        shutdown: CancellationToken,
    ) {
        let period = Duration::from_millis(self.settings.gamepad_poll_interval_ms.max(1));
        info!("Starting gamepad poll loop with {}ms interval", period.as_millis());

        let mut interval_timer = tokio::time::interval(period);
        interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_tick = Instant::now();

        let mut ticks: u64 = 0;
        let mut total_events: u64 = 0;
        let mut last_stats_time = Local::now();
        let stats_interval = chrono::Duration::seconds(30);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown signal received for gamepad poller");
                    break;
                }
                command = commands.recv() => {
                    match command {
                        Some(command) => self.handle_command(command),
                        None => {
                            info!("All gamepad handles dropped, stopping poller");
                            break;
                        }
                    }
                }
                now = interval_timer.tick() => {
                    let dt = now.duration_since(last_tick).as_secs_f64();
                    last_tick = now;
                    total_events += self.tick(dt) as u64;
                    ticks += 1;

                    let wall = Local::now();
                    if wall - last_stats_time > stats_interval {
                        info!(
                            "Gamepad poller stats: {} ticks, {} events since {}",
                            ticks,
                            total_events,
                            last_stats_time.format("%H:%M:%S")
                        );
                        ticks = 0;
                        total_events = 0;
                        last_stats_time = wall;
                    }
                }
            }
        }
    }
}

/// Public handle for a running gamepad poller
///
/// Owns the poll task. Dropping the handle stops the task; call
/// [`GamepadHandle::shutdown`] to also wait for it.
///
/// # Performance Impact
///
/// Each tick samples the device once and publishes one event per non-idle
/// button, dpad and stick, so a busy pad at the default 50ms interval produces
/// a few dozen events per second.
///
/// # Examples
///
/// ```rust
/// use cockpit::gamepad::VirtualSource;
/// use cockpit::{CockpitSettings, EventStream, GamepadHandle, InputEvent};
///
/// # async fn demo() -> Result<(), cockpit::CockpitError> {
/// let source = VirtualSource::new();
/// source.plug(0, "virtual pad");
///
/// let mut handle =
///     GamepadHandle::spawn(source.clone(), CockpitSettings::default(), EventStream::default())
///         .await?;
/// let mut events = handle.subscribe();
///
/// source.set_button(0, 0, true);
/// if let Some(InputEvent::Button(button)) = events.recv().await {
///     assert_eq!(button.id, 0);
/// }
/// handle.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct GamepadHandle {
    commands: mpsc::Sender<PollerCommand>,
    stream: EventStream,
    shutdown: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
}

impl GamepadHandle {
    /// Discovers a device, then spawns the poll loop.
    ///
    /// Fails with [`CockpitError::NoDevice`] when nothing shows up within
    /// `discovery_timeout_ms`.
    pub async fn spawn(
        source: impl GamepadSource,
        settings: CockpitSettings,
        stream: EventStream,
    ) -> Result<Self, CockpitError> {
        info!("Spawning gamepad poller");
        let poller = GamepadPoller::create(Box::new(source), settings, stream.clone())
            .discover()
            .await?;

        let (commands, command_receiver) = mpsc::channel(32);
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let task_handle = tokio::spawn(async move {
            poller.run(command_receiver, token).await;
            info!("Gamepad poller task finished");
        });
        info!("Gamepad poller successfully started");

        Ok(Self {
            commands,
            stream,
            shutdown,
            task_handle: Some(task_handle),
        })
    }

    /// Subscribes to the stream this poller publishes into.
    pub fn subscribe(&self) -> Subscription {
        self.stream.subscribe()
    }

    /// Devices the source currently enumerates, as seen by the poll task.
    pub async fn devices(&self) -> Result<Vec<DeviceInfo>, CockpitError> {
        let (reply, response) = oneshot::channel();
        self.send(PollerCommand::Devices(reply)).await?;
        response
            .await
            .map_err(|e| CockpitError::ChannelError(format!("No device list reply: {}", e)))
    }

    /// Connects to `id` under `profile`, discarding all tracked state.
    pub async fn connect(&self, id: usize, profile: MappingProfile) -> Result<(), CockpitError> {
        let (reply, response) = oneshot::channel();
        self.send(PollerCommand::Connect { id, profile, reply })
            .await?;
        response
            .await
            .map_err(|e| CockpitError::ChannelError(format!("No connect reply: {}", e)))?
    }

    /// Stops the poll loop and waits for the task to finish.
    pub async fn shutdown(&mut self) -> Result<(), CockpitError> {
        debug!("Sending shutdown signal to gamepad poller");
        self.shutdown.cancel();
        match self.task_handle.take() {
            Some(handle) => handle.await.map_err(|e| {
                error!("Gamepad poller task panicked: {}", e);
                CockpitError::TaskError(format!("Gamepad poller task panicked: {}", e))
            }),
            None => {
                debug!("Gamepad poller already shut down");
                Ok(())
            }
        }
    }

    async fn send(&self, command: PollerCommand) -> Result<(), CockpitError> {
        self.commands.send(command).await.map_err(|e| {
            CockpitError::ChannelError(format!("Gamepad poller not running: {}", e))
        })
    }
}

impl Drop for GamepadHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
