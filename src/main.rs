use cockpit::gamepad::GilrsSource;
use cockpit::{CockpitSettings, EventStream, GamepadHandle, InputEvent, KeyboardHandle};
use color_eyre::{eyre::eyre, Result};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let settings = setup_config().await?;
    let stream = EventStream::new(settings.event_buffer);
    let mut subscription = stream.subscribe();

    let source = GilrsSource::new().map_err(|e| eyre!("Failed to open gamepad backend: {}", e))?;
    let mut gamepad = GamepadHandle::spawn(source, settings.clone(), stream.clone())
        .await
        .map_err(|e| eyre!("Failed to start gamepad poller: {}", e))?;

    // No native keyboard source here; the composer shares the stream for embedders.
    let mut keyboard = KeyboardHandle::spawn(&settings, stream);

    for device in gamepad.devices().await? {
        info!("Available gamepad [{}] {}", device.id, device.name);
    }

    info!("Logging input events, press Ctrl+C to stop");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down");
                break;
            }
            event = subscription.recv() => match event {
                Some(event) => log_event(&event),
                None => break,
            }
        }
    }

    gamepad.shutdown().await?;
    keyboard.shutdown().await?;
    Ok(())
}

fn log_event(event: &InputEvent) {
    match event {
        InputEvent::Button(b) => info!("button {} {:?} held {:.2}s", b.id, b.status, b.held),
        InputEvent::Dpad(d) => info!("dpad {} {} held {:.2}s", d.id, d.direction, d.held),
        InputEvent::Axes(a) => debug!("stick {} ({:.3}, {:.3})", a.id, a.dx, a.dy),
        other => info!("{} event: {:?}", other.kind(), other),
    }
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    let level = match std::env::var("RUST_LOG").as_deref() {
        Ok("trace") => Level::TRACE,
        Ok("debug") => Level::DEBUG,
        Ok("warn") => Level::WARN,
        Ok("error") => Level::ERROR,
        _ => Level::INFO,
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

async fn setup_config() -> Result<CockpitSettings> {
    let path = CockpitSettings::default_path();
    CockpitSettings::ensure_default(&path).await?;
    let settings = CockpitSettings::load_from(&path).await?;
    debug!("Loaded settings from {}: {:?}", path.display(), settings);
    Ok(settings)
}
